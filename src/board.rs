//! Read-only board view over a repository's root items.

use serde::Serialize;

use crate::model::{Priority, Task, TaskState, WorkId, WorkItem};
use crate::progress::StateCounter;
use crate::repository::Repository;

pub struct Board<'a, R: Repository + ?Sized> {
    repository: &'a R,
}

/// One row of the board, flattened for display or JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ItemSummary {
    pub id: WorkId,
    pub kind: &'static str,
    pub title: String,
    pub state: TaskState,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
    pub description: Option<String>,
    pub progress: f64,
    pub children: usize,
    pub can_undo: bool,
    /// Rows for an epic's children, in insertion order.
    pub subtasks: Vec<ItemSummary>,
}

impl ItemSummary {
    pub fn of(item: &WorkItem) -> Self {
        let task = item.as_task();
        Self {
            id: item.id(),
            kind: item.kind(),
            title: item.title().to_string(),
            state: item.state(),
            priority: item.priority(),
            assignee: task.and_then(|t| t.assignee().map(str::to_string)),
            description: task.map(|t| t.description().to_string()),
            progress: item.compute_progress(),
            children: item.as_epic().map_or(0, |e| e.children().len()),
            can_undo: task.is_some_and(|t| t.can_undo()),
            subtasks: item
                .as_epic()
                .map(|e| e.children().iter().map(ItemSummary::of).collect())
                .unwrap_or_default(),
        }
    }
}

impl<'a, R: Repository + ?Sized> Board<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    /// Root items whose state label equals `state_name`, in repository
    /// order.
    pub fn tasks_in_state(&self, state_name: &str) -> Vec<&'a WorkItem> {
        self.repository
            .all_tasks()
            .iter()
            .filter(|item| item.state().name() == state_name)
            .collect()
    }

    /// One column per state, in workflow order.
    pub fn columns(&self) -> Vec<(TaskState, Vec<&'a WorkItem>)> {
        TaskState::ALL
            .iter()
            .map(|state| (*state, self.tasks_in_state(state.name())))
            .collect()
    }

    /// One column per state holding every task in the tree, epic children
    /// included, in pre-order.
    pub fn task_columns(&self) -> Vec<(TaskState, Vec<&'a Task>)> {
        let tasks = self.repository.tasks();
        TaskState::ALL
            .iter()
            .map(|state| {
                let column = tasks
                    .iter()
                    .copied()
                    .filter(|task| task.state() == *state)
                    .collect();
                (*state, column)
            })
            .collect()
    }

    /// Root rows; epics carry their children as nested `subtasks`.
    pub fn summaries(&self) -> Vec<ItemSummary> {
        self.repository
            .all_tasks()
            .iter()
            .map(ItemSummary::of)
            .collect()
    }

    /// Per-state task counts across the whole tree.
    pub fn counts(&self) -> StateCounter {
        let mut counter = StateCounter::default();
        for item in self.repository.all_tasks() {
            item.accept(&mut counter);
        }
        counter
    }
}
