//! Root-level item store.
//!
//! The contract is two operations: list the roots in insertion order and
//! append a root. Everything else is a provided lookup over the tree the
//! roots own.

use crate::error::{Error, Result};
use crate::model::{Epic, Task, WorkId, WorkItem};

pub trait Repository {
    /// Root items in insertion order.
    fn all_tasks(&self) -> &[WorkItem];

    fn all_tasks_mut(&mut self) -> &mut [WorkItem];

    /// Append a root item. No validation, no deduplication.
    fn add_task(&mut self, item: WorkItem);

    /// Find an item anywhere in the tree.
    fn find(&self, id: WorkId) -> Option<&WorkItem> {
        self.all_tasks().iter().find_map(|item| item.find(id))
    }

    fn find_mut(&mut self, id: WorkId) -> Option<&mut WorkItem> {
        self.all_tasks_mut()
            .iter_mut()
            .find_map(|item| item.find_mut(id))
    }

    fn task(&self, id: WorkId) -> Result<&Task> {
        match self.find(id) {
            Some(WorkItem::Task(task)) => Ok(task),
            Some(WorkItem::Epic(_)) => Err(Error::NotATask(id)),
            None => Err(Error::NotFound(id)),
        }
    }

    fn task_mut(&mut self, id: WorkId) -> Result<&mut Task> {
        match self.find_mut(id) {
            Some(WorkItem::Task(task)) => Ok(task),
            Some(WorkItem::Epic(_)) => Err(Error::NotATask(id)),
            None => Err(Error::NotFound(id)),
        }
    }

    fn epic_mut(&mut self, id: WorkId) -> Result<&mut Epic> {
        match self.find_mut(id) {
            Some(WorkItem::Epic(epic)) => Ok(epic),
            Some(WorkItem::Task(_)) => Err(Error::NotAnEpic(id)),
            None => Err(Error::NotFound(id)),
        }
    }

    /// Every task in the tree, roots first then descendants, pre-order.
    fn tasks(&self) -> Vec<&Task> {
        let mut out = Vec::new();
        for item in self.all_tasks() {
            item.collect_tasks(&mut out);
        }
        out
    }
}

/// Vec-backed repository.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    items: Vec<WorkItem>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Repository for InMemoryRepository {
    fn all_tasks(&self) -> &[WorkItem] {
        &self.items
    }

    fn all_tasks_mut(&mut self) -> &mut [WorkItem] {
        &mut self.items
    }

    fn add_task(&mut self, item: WorkItem) {
        self.items.push(item);
    }
}
