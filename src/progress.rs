//! Progress aggregation over the work item tree.
//!
//! Tasks score 0 or 100; epics average their direct children, recursing
//! into nested epics. The tree is owned by value, so recursion always
//! terminates.

use crate::model::{Epic, Task, TaskState};

/// Double dispatch over [`crate::model::WorkItem`] variants.
pub trait WorkItemVisitor {
    type Output;

    fn visit_task(&mut self, task: &Task) -> Self::Output;
    fn visit_epic(&mut self, epic: &Epic) -> Self::Output;
}

/// Computes completion percentage in `[0, 100]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProgressVisitor;

impl WorkItemVisitor for ProgressVisitor {
    type Output = f64;

    fn visit_task(&mut self, task: &Task) -> f64 {
        if task.state() == TaskState::Done {
            100.0
        } else {
            0.0
        }
    }

    fn visit_epic(&mut self, epic: &Epic) -> f64 {
        let children = epic.children();
        if children.is_empty() {
            // Vacuously complete.
            return 100.0;
        }
        let sum: f64 = children.iter().map(|child| child.accept(self)).sum();
        sum / children.len() as f64
    }
}

/// Counts tasks per state across a subtree. Epics contribute their
/// descendants, not themselves.
#[derive(Debug, Default, Clone)]
pub struct StateCounter {
    pub todo: usize,
    pub in_progress: usize,
    pub review: usize,
    pub done: usize,
}

impl StateCounter {
    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.review + self.done
    }
}

impl WorkItemVisitor for StateCounter {
    type Output = ();

    fn visit_task(&mut self, task: &Task) {
        match task.state() {
            TaskState::Todo => self.todo += 1,
            TaskState::InProgress => self.in_progress += 1,
            TaskState::Review => self.review += 1,
            TaskState::Done => self.done += 1,
        }
    }

    fn visit_epic(&mut self, epic: &Epic) {
        for child in epic.children() {
            child.accept(self);
        }
    }
}
