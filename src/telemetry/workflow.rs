//! Workflow span helpers.
//!
//! Commands run inside a span so that the transition, undo and observer
//! events they trigger share one trace.

use tracing::Span;

use crate::model::WorkId;

/// Start a span for a command against one task.
///
/// The `task.state` field is declared empty and can be filled via
/// [`record_state_transition`].
pub fn start_command_span(command: &str, task_id: WorkId) -> Span {
    tracing::info_span!(
        "taskflow.command",
        "command.name" = command,
        "task.id" = task_id.0,
        "task.state" = tracing::field::Empty,
    )
}

/// Record a state transition on `span` and emit a scoped `info` event.
pub fn record_state_transition(span: &Span, from: &str, to: &str) {
    span.record("task.state", to);
    span.in_scope(|| {
        tracing::info!(from = from, to = to, "state_transition");
    });
}
