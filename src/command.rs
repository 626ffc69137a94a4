//! Undoable commands and the session-wide command log.
//!
//! Commands address their task by id and carry whatever they need to
//! reverse themselves. The [`CommandInvoker`] log is independent of each
//! task's own [`crate::model::History`]: `undo_last` walks back across all
//! tasks in strict LIFO order.

use opentelemetry::KeyValue;
use tracing::{Span, debug, info, warn};

use crate::error::Result;
use crate::model::{Task, WorkId};
use crate::repository::Repository;
use crate::telemetry::metrics;
use crate::telemetry::workflow::{record_state_transition, start_command_span};

pub trait Command: Send {
    /// Short name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// The task this command acts on.
    fn target(&self) -> WorkId;

    fn execute(&mut self, repository: &mut dyn Repository) -> Result<()>;

    fn undo(&mut self, repository: &mut dyn Repository) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Move forward
// ---------------------------------------------------------------------------

/// Advance a task one step.
///
/// Undo defers to the task's own history. That is only correct if nothing
/// else transitioned the task between `execute` and `undo`.
#[derive(Debug, Clone)]
pub struct MoveForwardCommand {
    task: WorkId,
}

impl MoveForwardCommand {
    pub fn new(task: WorkId) -> Self {
        Self { task }
    }
}

impl Command for MoveForwardCommand {
    fn name(&self) -> &'static str {
        "move_forward"
    }

    fn target(&self) -> WorkId {
        self.task
    }

    /// A refused transition is reported to the task's observers, then
    /// returned so the invoker does not record it.
    fn execute(&mut self, repository: &mut dyn Repository) -> Result<()> {
        let task = repository.task_mut(self.task)?;
        let from = task.state();
        match task.advance() {
            Ok(to) => {
                record_state_transition(&Span::current(), from.name(), to.name());
                Ok(())
            }
            Err(e) => {
                task.report(&e);
                Err(e)
            }
        }
    }

    fn undo(&mut self, repository: &mut dyn Repository) -> Result<()> {
        repository.task_mut(self.task)?.undo();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Assign
// ---------------------------------------------------------------------------

/// Change a task's assignee. The previous assignee is captured when the
/// command is built.
#[derive(Debug, Clone)]
pub struct AssignCommand {
    task: WorkId,
    assignee: Option<String>,
    previous: Option<String>,
}

impl AssignCommand {
    pub fn new(task: &Task, assignee: Option<String>) -> Self {
        Self {
            task: task.id(),
            assignee,
            previous: task.assignee().map(str::to_string),
        }
    }
}

impl Command for AssignCommand {
    fn name(&self) -> &'static str {
        "assign"
    }

    fn target(&self) -> WorkId {
        self.task
    }

    fn execute(&mut self, repository: &mut dyn Repository) -> Result<()> {
        repository
            .task_mut(self.task)?
            .set_assignee(self.assignee.clone());
        Ok(())
    }

    fn undo(&mut self, repository: &mut dyn Repository) -> Result<()> {
        repository
            .task_mut(self.task)?
            .set_assignee(self.previous.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Describe
// ---------------------------------------------------------------------------

/// Replace a task's description. The previous text is captured when the
/// command is built.
#[derive(Debug, Clone)]
pub struct DescribeCommand {
    task: WorkId,
    description: String,
    previous: String,
}

impl DescribeCommand {
    pub fn new(task: &Task, description: impl Into<String>) -> Self {
        Self {
            task: task.id(),
            description: description.into(),
            previous: task.description().to_string(),
        }
    }
}

impl Command for DescribeCommand {
    fn name(&self) -> &'static str {
        "describe"
    }

    fn target(&self) -> WorkId {
        self.task
    }

    fn execute(&mut self, repository: &mut dyn Repository) -> Result<()> {
        repository
            .task_mut(self.task)?
            .set_description(self.description.clone());
        Ok(())
    }

    fn undo(&mut self, repository: &mut dyn Repository) -> Result<()> {
        repository
            .task_mut(self.task)?
            .set_description(self.previous.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Invoker
// ---------------------------------------------------------------------------

/// Executes commands and keeps the global undo log.
#[derive(Default)]
pub struct CommandInvoker {
    history: Vec<Box<dyn Command>>,
}

impl CommandInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute `command`; append it to the log only if it succeeded.
    pub fn execute_command(
        &mut self,
        mut command: Box<dyn Command>,
        repository: &mut dyn Repository,
    ) -> Result<()> {
        let span = start_command_span(command.name(), command.target());
        let _entered = span.enter();

        match command.execute(repository) {
            Ok(()) => {
                debug!(depth = self.history.len() + 1, "command recorded");
                metrics::commands().add(
                    1,
                    &[
                        KeyValue::new("command", command.name()),
                        KeyValue::new("result", "ok"),
                    ],
                );
                self.history.push(command);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "command failed, not recorded");
                metrics::commands().add(
                    1,
                    &[
                        KeyValue::new("command", command.name()),
                        KeyValue::new("result", "error"),
                    ],
                );
                Err(e)
            }
        }
    }

    /// Undo the most recent command, whichever task it targeted.
    ///
    /// Returns `Ok(false)` when the log is empty.
    pub fn undo_last(&mut self, repository: &mut dyn Repository) -> Result<bool> {
        let Some(mut command) = self.history.pop() else {
            return Ok(false);
        };

        let span = start_command_span(command.name(), command.target());
        let _entered = span.enter();

        command.undo(repository)?;
        info!("command undone");
        metrics::undos().add(1, &[KeyValue::new("scope", "command")]);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// `(name, target)` of each recorded command, oldest first.
    pub fn history(&self) -> Vec<(&'static str, WorkId)> {
        self.history
            .iter()
            .map(|command| (command.name(), command.target()))
            .collect()
    }
}
