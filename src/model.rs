//! Core data model.
//!
//! A work item is either a [`Task`] (a leaf that moves through the workflow)
//! or an [`Epic`] (a grouping whose state and progress are derived from its
//! children). This module holds the shared vocabulary: ids, priorities, the
//! lifecycle state machine and the review guard.

pub mod epic;
pub mod history;
pub mod item;
pub mod task;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::observer::SharedObserver;

pub use epic::Epic;
pub use history::{History, Memento};
pub use item::WorkItem;
pub use task::Task;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Newtype for work item IDs. Assigned by the engine in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkId(pub u64);

impl std::fmt::Display for WorkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for WorkId {
    type Err = Error;

    /// Accepts `7` or `#7`.
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('#');
        digits
            .parse()
            .map(WorkId)
            .map_err(|_| Error::Other(format!("invalid work id: {s}")))
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Task priority. Ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    /// HIGH and URGENT tasks get the stricter review guard and senior-only
    /// assignment.
    pub fn is_high(self) -> bool {
        matches!(self, Priority::High | Priority::Urgent)
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(Error::Other(format!("invalid priority: {s}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    Todo,
    InProgress,
    Review,
    /// Terminal. Every edge out of here is refused.
    Done,
}

/// The three requests a state can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Start,
    Review,
    Complete,
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Edge::Start => "start",
            Edge::Review => "review",
            Edge::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

impl TaskState {
    pub const ALL: [TaskState; 4] = [
        TaskState::Todo,
        TaskState::InProgress,
        TaskState::Review,
        TaskState::Done,
    ];

    /// Board label for this state.
    pub fn name(self) -> &'static str {
        match self {
            TaskState::Todo => "TODO",
            TaskState::InProgress => "IN PROGRESS",
            TaskState::Review => "REVIEW",
            TaskState::Done => "DONE",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == TaskState::Done
    }

    /// The edge that moves this state forward. `Done` maps to `Complete`,
    /// which it refuses like every other edge.
    pub fn forward_edge(self) -> Edge {
        match self {
            TaskState::Todo => Edge::Start,
            TaskState::InProgress => Edge::Review,
            TaskState::Review | TaskState::Done => Edge::Complete,
        }
    }

    /// Apply `edge` to this state.
    ///
    /// Exactly one edge per non-terminal state is legal. `guard` is consulted
    /// only for IN_PROGRESS → REVIEW, and only after the edge itself is known
    /// to be legal; its `Err` becomes the refusal reason.
    pub fn transition<G>(self, edge: Edge, guard: G) -> Result<TaskState>
    where
        G: FnOnce() -> std::result::Result<(), String>,
    {
        use TaskState::*;

        match (self, edge) {
            (Todo, Edge::Start) => Ok(InProgress),
            (Todo, Edge::Review) => self.refuse("cannot review from TODO"),
            (Todo, Edge::Complete) => self.refuse("cannot complete from TODO"),

            (InProgress, Edge::Start) => self.refuse("already in progress"),
            (InProgress, Edge::Review) => {
                guard().map_err(|reason| Error::IllegalTransition { from: self, reason })?;
                Ok(Review)
            }
            (InProgress, Edge::Complete) => self.refuse("must go through review"),

            (Review, Edge::Start) => self.refuse("already started"),
            (Review, Edge::Review) => self.refuse("already in review"),
            (Review, Edge::Complete) => Ok(Done),

            (Done, _) => self.refuse("task is done"),
        }
    }

    fn refuse(self, reason: &str) -> Result<TaskState> {
        Err(Error::IllegalTransition {
            from: self,
            reason: reason.to_string(),
        })
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TaskState {
    type Err = Error;

    /// Accepts board labels (`IN PROGRESS`) as well as `IN_PROGRESS` and
    /// `in-progress`, in any case.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        match normalized.as_str() {
            "todo" => Ok(TaskState::Todo),
            "in_progress" => Ok(TaskState::InProgress),
            "review" => Ok(TaskState::Review),
            "done" => Ok(TaskState::Done),
            _ => Err(Error::Other(format!("invalid state: {s}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Review guard
// ---------------------------------------------------------------------------

/// Minimum description length (exclusive, in characters) a HIGH or URGENT
/// task needs before the strict guard lets it into review.
pub const HIGH_PRIORITY_MIN_DESCRIPTION: usize = 20;

/// Precondition on the IN_PROGRESS → REVIEW edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardPolicy {
    /// HIGH/URGENT tasks need a description longer than
    /// [`HIGH_PRIORITY_MIN_DESCRIPTION`] characters.
    #[default]
    Strict,
    /// No precondition.
    Lenient,
}

impl GuardPolicy {
    pub fn check(self, priority: Priority, description: &str) -> std::result::Result<(), String> {
        match self {
            GuardPolicy::Lenient => Ok(()),
            GuardPolicy::Strict => {
                if priority.is_high()
                    && description.chars().count() <= HIGH_PRIORITY_MIN_DESCRIPTION
                {
                    Err("description too short for high priority task".to_string())
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl std::fmt::Display for GuardPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GuardPolicy::Strict => "strict",
            GuardPolicy::Lenient => "lenient",
        };
        write!(f, "{s}")
    }
}

impl FromStr for GuardPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(GuardPolicy::Strict),
            "lenient" | "loose" => Ok(GuardPolicy::Lenient),
            _ => Err(Error::Config(format!(
                "invalid guard policy {s:?} (expected strict or lenient)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for creating new tasks. The engine's public API for submitting work.
pub struct NewTask {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) priority: Priority,
    pub(crate) assignee: Option<String>,
    pub(crate) guard: Option<GuardPolicy>,
    pub(crate) epic: Option<WorkId>,
    pub(crate) observers: Vec<SharedObserver>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::Medium,
            assignee: None,
            guard: None,
            epic: None,
            observers: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Skip automatic assignment and use this worker.
    pub fn assignee(mut self, worker: impl Into<String>) -> Self {
        self.assignee = Some(worker.into());
        self
    }

    /// Override the engine's default review guard for this task.
    pub fn guard(mut self, guard: GuardPolicy) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Place the task under an existing epic instead of at the root.
    pub fn epic(mut self, epic_id: WorkId) -> Self {
        self.epic = Some(epic_id);
        self
    }

    pub fn observer(mut self, observer: SharedObserver) -> Self {
        self.observers.push(observer);
        self
    }

    /// Build the task with an explicit id. `default_guard` applies when no
    /// guard was chosen on the builder.
    pub fn build(self, id: WorkId, default_guard: GuardPolicy) -> Task {
        let mut task = Task::new(id, self.title, self.description, self.priority)
            .with_guard(self.guard.unwrap_or(default_guard));
        if let Some(worker) = self.assignee {
            task.set_assignee(Some(worker));
        }
        for observer in self.observers {
            task.add_observer(observer);
        }
        task
    }
}
