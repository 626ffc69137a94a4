//! Structured events recorded from the notification bus.
//!
//! [`EventLog`] is an observer that turns every notification into a
//! sequenced, timestamped [`Event`]. Consumers poll it with
//! [`EventLog::events_since`] to build audit trails or feed a UI.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{TaskState, WorkId};
use crate::observer::TaskObserver;

/// A structured event emitted through the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic sequence number, starting at 1. Consumers can detect gaps.
    pub seq: u64,
    /// When this event occurred.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    StateChanged { id: WorkId, state: TaskState },
    Undone { id: WorkId },
    Message { text: String },
}

/// Append-only event recorder.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<Event>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events with `seq > since`, oldest first.
    pub fn events_since(&self, since: u64) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|event| event.seq > since)
            .cloned()
            .collect()
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> Vec<Event> {
        self.events_since(0)
    }

    fn record(&self, kind: EventKind) {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        let seq = events.last().map_or(1, |last| last.seq + 1);
        events.push(Event {
            seq,
            timestamp: Utc::now(),
            kind,
        });
    }
}

impl TaskObserver for EventLog {
    fn on_state_change(&self, id: WorkId, new_state: TaskState) {
        self.record(EventKind::StateChanged {
            id,
            state: new_state,
        });
    }

    fn on_undo(&self, id: WorkId) {
        self.record(EventKind::Undone { id });
    }

    fn on_message(&self, message: &str) {
        self.record(EventKind::Message {
            text: message.to_string(),
        });
    }
}
