//! Core engine. The public API for creating and advancing work.
//!
//! The engine owns the repository, the command log and the assignment
//! strategy for one session. Workflow changes issued through it go through
//! the command layer so they can be undone in global order.

use tracing::info;
use uuid::Uuid;

use crate::assignment::AssignmentStrategy;
use crate::board::Board;
use crate::command::{AssignCommand, Command, CommandInvoker, DescribeCommand, MoveForwardCommand};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::*;
use crate::observer::{Observers, SharedObserver};
use crate::repository::{InMemoryRepository, Repository};

/// The workflow engine for one session.
pub struct Engine {
    /// Distinguishes this session in exported telemetry.
    session: Uuid,
    repository: InMemoryRepository,
    invoker: CommandInvoker,
    strategy: Box<dyn AssignmentStrategy>,
    /// Review guard for tasks that don't pick one.
    guard: GuardPolicy,
    /// Attached to every task created after subscription; also receive
    /// engine messages.
    observers: Observers,
    last_id: u64,
}

impl Engine {
    pub fn new(guard: GuardPolicy, strategy: Box<dyn AssignmentStrategy>) -> Self {
        let session = Uuid::new_v4();
        info!(%session, %guard, policy = %strategy.policy(), "engine started");
        Self {
            session,
            repository: InMemoryRepository::new(),
            invoker: CommandInvoker::new(),
            strategy,
            guard,
            observers: Observers::new(),
            last_id: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.guard, config.assignment.build(&config.roster))
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn guard_policy(&self) -> GuardPolicy {
        self.guard
    }

    /// Subscribe to engine messages and to every task created from now on.
    pub fn subscribe(&mut self, observer: SharedObserver) {
        self.observers.add(observer);
    }

    /// Send an informational message to subscribers.
    pub fn broadcast(&self, message: &str) {
        self.observers.message(message);
    }

    fn next_id(&mut self) -> WorkId {
        self.last_id += 1;
        WorkId(self.last_id)
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Create an epic at the root, or nested under `parent`.
    pub fn create_epic(&mut self, title: impl Into<String>, parent: Option<WorkId>) -> Result<WorkId> {
        if let Some(parent_id) = parent {
            self.repository.epic_mut(parent_id)?;
        }

        let epic = Epic::new(self.next_id(), title);
        let id = epic.id();
        let message = format!("Created new Epic: {}", epic.title());

        match parent {
            Some(parent_id) => self.repository.epic_mut(parent_id)?.add_subtask(epic),
            None => self.repository.add_task(epic.into()),
        }

        info!(%id, parent = ?parent, "epic created");
        self.broadcast(&message);
        Ok(id)
    }

    /// Create a task, auto-assigning it when the builder named nobody.
    pub fn create_task(&mut self, new: NewTask) -> Result<WorkId> {
        let epic_id = new.epic;
        let epic_title = match epic_id {
            Some(epic_id) => Some(self.repository.epic_mut(epic_id)?.title().to_string()),
            None => None,
        };
        let explicit = new.assignee.is_some();

        let id = self.next_id();
        let mut task = new.build(id, self.guard);
        for observer in self.observers.iter() {
            task.add_observer(observer.clone());
        }

        if !explicit {
            let worker = self.strategy.find_assignee(&task, &self.repository);
            self.broadcast(&format!(
                "Auto-assigned {} to new {} task",
                worker.as_deref().unwrap_or("nobody"),
                task.priority()
            ));
            task.set_assignee(worker);
        }

        info!(
            %id,
            priority = %task.priority(),
            assignee = task.assignee().unwrap_or("-"),
            guard = %task.guard(),
            "task created"
        );

        match (epic_id, epic_title) {
            (Some(epic_id), Some(title)) => {
                self.repository.epic_mut(epic_id)?.add_subtask(task);
                self.broadcast(&format!("Added task to Epic: {title}"));
            }
            _ => self.repository.add_task(task.into()),
        }

        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Run `command` through the invoker.
    pub fn execute(&mut self, command: Box<dyn Command>) -> Result<()> {
        self.invoker.execute_command(command, &mut self.repository)
    }

    /// Advance a task one step.
    ///
    /// A refusal is reported to the task's observers and also returned; the
    /// command is not recorded.
    pub fn move_forward(&mut self, id: WorkId) -> Result<()> {
        self.execute(Box::new(MoveForwardCommand::new(id)))
    }

    pub fn assign(&mut self, id: WorkId, worker: Option<String>) -> Result<()> {
        let command = AssignCommand::new(self.repository.task(id)?, worker);
        self.execute(Box::new(command))
    }

    pub fn describe(&mut self, id: WorkId, description: impl Into<String>) -> Result<()> {
        let command = DescribeCommand::new(self.repository.task(id)?, description);
        self.execute(Box::new(command))
    }

    /// Undo the most recent command across all tasks.
    pub fn undo_last(&mut self) -> Result<bool> {
        self.invoker.undo_last(&mut self.repository)
    }

    /// Undo the last transition of one task, bypassing the command log.
    ///
    /// A later `undo_last` of a move on the same task will then walk one
    /// step further back than the command it reverses.
    pub fn undo_task(&mut self, id: WorkId) -> Result<bool> {
        Ok(self.repository.task_mut(id)?.undo())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn item(&self, id: WorkId) -> Result<&WorkItem> {
        self.repository.find(id).ok_or(Error::NotFound(id))
    }

    pub fn task(&self, id: WorkId) -> Result<&Task> {
        self.repository.task(id)
    }

    pub fn progress(&self, id: WorkId) -> Result<f64> {
        Ok(self.item(id)?.compute_progress())
    }

    pub fn board(&self) -> Board<'_, InMemoryRepository> {
        Board::new(&self.repository)
    }

    pub fn repository(&self) -> &InMemoryRepository {
        &self.repository
    }

    pub fn commands(&self) -> &CommandInvoker {
        &self.invoker
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
