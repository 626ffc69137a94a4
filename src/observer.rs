//! Notification bus.
//!
//! Every task holds an ordered list of shared observers. Fan-out is
//! synchronous, in registration order, on the caller's thread. A panic in
//! an observer is not caught here; it unwinds through the mutating call.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;

use crate::model::{TaskState, WorkId};

/// Receiver of task notifications.
pub trait TaskObserver: Send + Sync {
    /// A transition was committed.
    fn on_state_change(&self, id: WorkId, new_state: TaskState);

    /// A transition was reversed.
    fn on_undo(&self, id: WorkId);

    /// Informational text, including swallowed transition errors.
    fn on_message(&self, message: &str);
}

pub type SharedObserver = Arc<dyn TaskObserver>;

/// Ordered, append-only observer list.
#[derive(Clone, Default)]
pub struct Observers {
    list: Vec<SharedObserver>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, observer: SharedObserver) {
        self.list.push(observer);
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedObserver> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn state_changed(&self, id: WorkId, new_state: TaskState) {
        for observer in &self.list {
            observer.on_state_change(id, new_state);
        }
    }

    pub fn undone(&self, id: WorkId) {
        for observer in &self.list {
            observer.on_undo(id);
        }
    }

    pub fn message(&self, message: &str) {
        for observer in &self.list {
            observer.on_message(message);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.list.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Activity log
// ---------------------------------------------------------------------------

/// Human-readable activity feed, read newest line first.
///
/// Lines are stored oldest first. A bounded feed drops its oldest line
/// once `limit` is reached.
#[derive(Debug, Default)]
pub struct ActivityLog {
    lines: Mutex<VecDeque<String>>,
    limit: Option<usize>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A feed that keeps at most `limit` lines.
    pub fn bounded(limit: usize) -> Self {
        Self {
            lines: Mutex::new(VecDeque::with_capacity(limit)),
            limit: Some(limit),
        }
    }

    /// Copy of the feed, newest first.
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn push(&self, line: String) {
        let mut lines = self.lock();
        if let Some(limit) = self.limit {
            if limit == 0 {
                return;
            }
            while lines.len() >= limit {
                lines.pop_front();
            }
        }
        lines.push_back(line);
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        // A poisoned feed is still a readable feed.
        self.lines.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TaskObserver for ActivityLog {
    fn on_state_change(&self, id: WorkId, new_state: TaskState) {
        self.push(format!("[Task {id}] Status changed to: {new_state}"));
    }

    fn on_undo(&self, id: WorkId) {
        self.push(format!("[Task {id}] Action undone"));
    }

    fn on_message(&self, message: &str) {
        self.push(format!("[System] {message}"));
    }
}

// ---------------------------------------------------------------------------
// Tracing bridge
// ---------------------------------------------------------------------------

/// Forwards notifications to `tracing` under the `taskflow::notify` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TaskObserver for TracingObserver {
    fn on_state_change(&self, id: WorkId, new_state: TaskState) {
        info!(target: "taskflow::notify", %id, state = %new_state, "state changed");
    }

    fn on_undo(&self, id: WorkId) {
        info!(target: "taskflow::notify", %id, "undone");
    }

    fn on_message(&self, message: &str) {
        info!(target: "taskflow::notify", message, "message");
    }
}
