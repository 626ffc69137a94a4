//! Error types for taskflow.

use thiserror::Error;

use crate::model::{TaskState, WorkId};

#[derive(Debug, Error)]
pub enum Error {
    /// A state refused the requested edge, or a guard blocked it.
    #[error("illegal transition from {from}: {reason}")]
    IllegalTransition { from: TaskState, reason: String },

    #[error("work item not found: {0}")]
    NotFound(WorkId),

    #[error("work item {0} is an epic, not a task")]
    NotATask(WorkId),

    #[error("work item {0} is a task, not an epic")]
    NotAnEpic(WorkId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// The human-readable reason carried by a refused transition.
    ///
    /// Other variants fall back to their display text.
    pub fn reason(&self) -> String {
        match self {
            Error::IllegalTransition { reason, .. } => reason.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
