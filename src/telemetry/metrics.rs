//! Metric instrument factories for taskflow.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! Without a provider the instruments are no-ops.

use opentelemetry::metrics::{Counter, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("taskflow")
}

/// Counter: committed state transitions.
/// Labels: `from`, `to`.
pub fn transitions() -> Counter<u64> {
    meter()
        .u64_counter("taskflow.transitions")
        .with_description("Number of committed task state transitions")
        .build()
}

/// Counter: transitions refused by the state table or the review guard.
/// Labels: `state`, `edge`.
pub fn transitions_rejected() -> Counter<u64> {
    meter()
        .u64_counter("taskflow.transitions.rejected")
        .with_description("Number of refused task state transitions")
        .build()
}

/// Counter: successful undos.
/// Labels: `scope` ("task" | "command").
pub fn undos() -> Counter<u64> {
    meter()
        .u64_counter("taskflow.undo")
        .with_description("Number of undone actions")
        .build()
}

/// Counter: commands submitted to the invoker.
/// Labels: `command`, `result` ("ok" | "error").
pub fn commands() -> Counter<u64> {
    meter()
        .u64_counter("taskflow.commands")
        .with_description("Number of executed commands")
        .build()
}

/// Counter: assignment decisions.
/// Labels: `policy`, `result` ("assigned" | "none").
pub fn assignments() -> Counter<u64> {
    meter()
        .u64_counter("taskflow.assignments")
        .with_description("Number of assignment decisions")
        .build()
}
