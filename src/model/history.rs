//! Per-task undo log.
//!
//! A [`Memento`] is taken immediately before every transition, so the depth
//! of a [`History`] always equals the number of transitions that can still
//! be reversed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TaskState;
use super::task::Task;

/// Snapshot of the mutable, restorable part of a task.
///
/// Priority, id and title never change after creation, so they are not
/// captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memento {
    pub state: TaskState,
    pub assignee: Option<String>,
    pub description: String,
    pub recorded_at: DateTime<Utc>,
}

/// LIFO stack of mementos, owned by exactly one task.
#[derive(Debug, Clone, Default)]
pub struct History {
    stack: Vec<Memento>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, memento: Memento) {
        self.stack.push(memento);
    }

    /// Pop the newest memento and restore `task` from it.
    ///
    /// Returns `false` (and touches nothing) when the stack is empty. This
    /// is the raw restore; [`Task::undo`] is the entry point that also
    /// notifies observers.
    pub fn undo(&mut self, task: &mut Task) -> bool {
        match self.stack.pop() {
            Some(memento) => {
                task.restore(memento);
                true
            }
            None => false,
        }
    }

    pub(crate) fn pop(&mut self) -> Option<Memento> {
        self.stack.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Newest snapshot, if any.
    pub fn peek(&self) -> Option<&Memento> {
        self.stack.last()
    }
}
