//! The leaf work item.

use chrono::{DateTime, Utc};
use opentelemetry::KeyValue;
use tracing::{debug, info};

use super::history::{History, Memento};
use super::{Edge, GuardPolicy, Priority, TaskState, WorkId};
use crate::error::{Error, Result};
use crate::observer::{Observers, SharedObserver};
use crate::progress::{ProgressVisitor, WorkItemVisitor};
use crate::telemetry::metrics;

/// A unit of work moving through TODO → IN PROGRESS → REVIEW → DONE.
///
/// `state` is private: the only writer is [`Task::change_state`], which
/// records a [`Memento`] first and notifies observers after.
#[derive(Debug, Clone)]
pub struct Task {
    id: WorkId,
    title: String,
    description: String,
    priority: Priority,
    assignee: Option<String>,
    state: TaskState,
    guard: GuardPolicy,
    history: History,
    observers: Observers,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// A fresh TODO task with the strict review guard and no assignee.
    pub fn new(
        id: WorkId,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            description: description.into(),
            priority,
            assignee: None,
            state: TaskState::Todo,
            guard: GuardPolicy::default(),
            history: History::new(),
            observers: Observers::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_guard(mut self, guard: GuardPolicy) -> Self {
        self.guard = guard;
        self
    }

    pub fn id(&self) -> WorkId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn guard(&self) -> GuardPolicy {
        self.guard
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.updated_at = Utc::now();
    }

    pub fn set_assignee(&mut self, assignee: Option<String>) {
        self.assignee = assignee;
        self.updated_at = Utc::now();
    }

    pub fn add_observer(&mut self, observer: SharedObserver) {
        self.observers.add(observer);
    }

    pub fn observers(&self) -> &Observers {
        &self.observers
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    pub fn start(&mut self) -> Result<TaskState> {
        self.apply(Edge::Start)
    }

    pub fn review(&mut self) -> Result<TaskState> {
        self.apply(Edge::Review)
    }

    pub fn complete(&mut self) -> Result<TaskState> {
        self.apply(Edge::Complete)
    }

    /// Send whichever edge moves the current state forward, propagating a
    /// refusal.
    pub fn advance(&mut self) -> Result<TaskState> {
        self.apply(self.state.forward_edge())
    }

    /// Like [`Task::advance`], but a refusal is reported to observers as
    /// `"Error: <reason>"` instead of being returned.
    pub fn move_forward(&mut self) -> Option<TaskState> {
        match self.advance() {
            Ok(state) => Some(state),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    fn apply(&mut self, edge: Edge) -> Result<TaskState> {
        let from = self.state;
        let (guard, priority, description) = (self.guard, self.priority, &self.description);

        let next = match from.transition(edge, || guard.check(priority, description)) {
            Ok(next) => next,
            Err(e) => {
                debug!(id = %self.id, state = %from, %edge, error = %e, "transition refused");
                metrics::transitions_rejected().add(
                    1,
                    &[
                        KeyValue::new("state", from.name()),
                        KeyValue::new("edge", edge.to_string()),
                    ],
                );
                return Err(e);
            }
        };

        self.change_state(next);
        Ok(next)
    }

    /// Commit a transition: snapshot, assign, notify.
    ///
    /// This does not consult the transition table. Callers outside the
    /// state machine should use [`Task::start`], [`Task::review`],
    /// [`Task::complete`] or [`Task::move_forward`].
    pub fn change_state(&mut self, next: TaskState) {
        let from = self.state;
        let memento = self.snapshot();
        self.history.push(memento);
        self.state = next;
        self.updated_at = Utc::now();

        debug!(id = %self.id, from = %from, to = %next, "state committed");
        metrics::transitions().add(
            1,
            &[
                KeyValue::new("from", from.name()),
                KeyValue::new("to", next.name()),
            ],
        );

        self.observers.state_changed(self.id, next);
    }

    /// Route an error to observers as an informational message.
    pub(crate) fn report(&self, error: &Error) {
        self.observers.message(&format!("Error: {}", error.reason()));
    }

    // -----------------------------------------------------------------------
    // Undo
    // -----------------------------------------------------------------------

    /// Capture the restorable fields as they are right now.
    pub fn snapshot(&self) -> Memento {
        Memento {
            state: self.state,
            assignee: self.assignee.clone(),
            description: self.description.clone(),
            recorded_at: Utc::now(),
        }
    }

    /// Overwrite state, assignee and description from `memento`. Does not
    /// notify.
    pub fn restore(&mut self, memento: Memento) {
        self.state = memento.state;
        self.assignee = memento.assignee;
        self.description = memento.description;
        self.updated_at = Utc::now();
    }

    /// Reverse the most recent transition.
    ///
    /// Returns `false` and notifies nobody when there is nothing to undo.
    /// A successful undo fires `on_undo` once and never `on_state_change`.
    pub fn undo(&mut self) -> bool {
        let Some(memento) = self.history.pop() else {
            return false;
        };
        let from = self.state;
        self.restore(memento);

        info!(id = %self.id, from = %from, to = %self.state, "undo");
        metrics::undos().add(1, &[KeyValue::new("scope", "task")]);

        self.observers.undone(self.id);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    // -----------------------------------------------------------------------
    // Progress
    // -----------------------------------------------------------------------

    pub fn accept<V: WorkItemVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_task(self)
    }

    /// 100 when DONE, otherwise 0.
    pub fn compute_progress(&self) -> f64 {
        self.accept(&mut ProgressVisitor)
    }
}
