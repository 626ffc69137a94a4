//! Composite work item.

use chrono::{DateTime, Utc};

use super::{TaskState, WorkId, WorkItem};
use crate::progress::{ProgressVisitor, WorkItemVisitor};

/// A grouping of tasks and nested epics.
///
/// Children are owned by value, so an epic can never contain itself and
/// progress recursion needs no cycle check.
#[derive(Debug, Clone)]
pub struct Epic {
    id: WorkId,
    title: String,
    children: Vec<WorkItem>,
    created_at: DateTime<Utc>,
}

impl Epic {
    pub fn new(id: WorkId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            children: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> WorkId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn children(&self) -> &[WorkItem] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [WorkItem] {
        &mut self.children
    }

    /// Append a task or nested epic.
    pub fn add_subtask(&mut self, item: impl Into<WorkItem>) {
        self.children.push(item.into());
    }

    /// DONE once every child is DONE; an empty epic is still IN PROGRESS.
    pub fn state(&self) -> TaskState {
        if !self.children.is_empty()
            && self
                .children
                .iter()
                .all(|child| child.state() == TaskState::Done)
        {
            TaskState::Done
        } else {
            TaskState::InProgress
        }
    }

    pub fn accept<V: WorkItemVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_epic(self)
    }

    /// Mean progress of the direct children; 100 for an empty epic.
    pub fn compute_progress(&self) -> f64 {
        self.accept(&mut ProgressVisitor)
    }
}
