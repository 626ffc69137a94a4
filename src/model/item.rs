//! The polymorphic work item: a task or an epic.

use super::{Epic, Priority, Task, TaskState, WorkId};
use crate::progress::WorkItemVisitor;

#[derive(Debug, Clone)]
pub enum WorkItem {
    Task(Task),
    Epic(Epic),
}

impl WorkItem {
    pub fn id(&self) -> WorkId {
        match self {
            WorkItem::Task(task) => task.id(),
            WorkItem::Epic(epic) => epic.id(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            WorkItem::Task(task) => task.title(),
            WorkItem::Epic(epic) => epic.title(),
        }
    }

    /// Stored state for a task, derived state for an epic.
    pub fn state(&self) -> TaskState {
        match self {
            WorkItem::Task(task) => task.state(),
            WorkItem::Epic(epic) => epic.state(),
        }
    }

    /// Only tasks carry a priority.
    pub fn priority(&self) -> Option<Priority> {
        self.as_task().map(Task::priority)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            WorkItem::Task(_) => "task",
            WorkItem::Epic(_) => "epic",
        }
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            WorkItem::Task(task) => Some(task),
            WorkItem::Epic(_) => None,
        }
    }

    pub fn as_epic(&self) -> Option<&Epic> {
        match self {
            WorkItem::Epic(epic) => Some(epic),
            WorkItem::Task(_) => None,
        }
    }

    pub fn accept<V: WorkItemVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            WorkItem::Task(task) => task.accept(visitor),
            WorkItem::Epic(epic) => epic.accept(visitor),
        }
    }

    pub fn compute_progress(&self) -> f64 {
        match self {
            WorkItem::Task(task) => task.compute_progress(),
            WorkItem::Epic(epic) => epic.compute_progress(),
        }
    }

    // -----------------------------------------------------------------------
    // Tree lookups
    // -----------------------------------------------------------------------

    /// Depth-first search for `id` in this item and its descendants.
    pub fn find(&self, id: WorkId) -> Option<&WorkItem> {
        if self.id() == id {
            return Some(self);
        }
        match self {
            WorkItem::Epic(epic) => epic.children().iter().find_map(|child| child.find(id)),
            WorkItem::Task(_) => None,
        }
    }

    pub fn find_mut(&mut self, id: WorkId) -> Option<&mut WorkItem> {
        if self.id() == id {
            return Some(self);
        }
        match self {
            WorkItem::Epic(epic) => epic
                .children_mut()
                .iter_mut()
                .find_map(|child| child.find_mut(id)),
            WorkItem::Task(_) => None,
        }
    }

    /// Push every task in this subtree onto `out`, pre-order.
    pub fn collect_tasks<'a>(&'a self, out: &mut Vec<&'a Task>) {
        match self {
            WorkItem::Task(task) => out.push(task),
            WorkItem::Epic(epic) => {
                for child in epic.children() {
                    child.collect_tasks(out);
                }
            }
        }
    }
}

impl From<Task> for WorkItem {
    fn from(task: Task) -> Self {
        WorkItem::Task(task)
    }
}

impl From<Epic> for WorkItem {
    fn from(epic: Epic) -> Self {
        WorkItem::Epic(epic)
    }
}
