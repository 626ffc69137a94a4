//! # taskflow
//!
//! Task workflow engine.
//!
//! Tasks move TODO → IN PROGRESS → REVIEW → DONE through a guarded state
//! machine, keep a per-task undo history, and notify observers of every
//! change. Epics group tasks and derive their progress. Commands give a
//! session-wide undo log, and assignment strategies pick a worker for new
//! tasks.

pub mod assignment;
pub mod board;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod model;
pub mod observer;
pub mod progress;
pub mod repository;
pub mod telemetry;
