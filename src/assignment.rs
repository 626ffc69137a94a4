//! Assignment policies for new tasks.
//!
//! Both policies recount load from the whole repository on every call:
//! O(workers × tasks), fine at board scale.

use std::str::FromStr;

use opentelemetry::KeyValue;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Task, TaskState};
use crate::repository::Repository;
use crate::telemetry::metrics;

/// Picks a worker for a new task, or `None` if nobody is eligible.
pub trait AssignmentStrategy: Send + Sync {
    fn find_assignee(&self, task: &Task, repository: &dyn Repository) -> Option<String>;

    fn policy(&self) -> AssignmentPolicy;
}

/// The people who can be assigned work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub seniors: Vec<String>,
    #[serde(default)]
    pub juniors: Vec<String>,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            seniors: vec!["Alice".to_string(), "Bob".to_string()],
            juniors: vec!["Charlie".to_string(), "Dave".to_string()],
        }
    }
}

impl Roster {
    /// Seniors then juniors.
    pub fn everyone(&self) -> Vec<String> {
        self.seniors.iter().chain(&self.juniors).cloned().collect()
    }
}

/// Number of unfinished tasks assigned to `worker`, anywhere in the tree.
pub fn open_load(worker: &str, repository: &dyn Repository) -> usize {
    repository
        .tasks()
        .into_iter()
        .filter(|task| task.assignee() == Some(worker) && task.state() != TaskState::Done)
        .count()
}

/// First candidate with the lowest open load. Ties go to the earlier
/// candidate.
fn least_loaded(candidates: &[String], repository: &dyn Repository) -> Option<String> {
    let mut best: Option<(&String, usize)> = None;
    for worker in candidates {
        let load = open_load(worker, repository);
        if best.is_none_or(|(_, min)| load < min) {
            best = Some((worker, load));
        }
    }
    best.map(|(worker, _)| worker.clone())
}

fn record(policy: AssignmentPolicy, task: &Task, chosen: &Option<String>) {
    debug!(
        policy = %policy,
        id = %task.id(),
        priority = %task.priority(),
        assignee = chosen.as_deref().unwrap_or("-"),
        "assignment chosen"
    );
    metrics::assignments().add(
        1,
        &[
            KeyValue::new("policy", policy.to_string()),
            KeyValue::new(
                "result",
                if chosen.is_some() { "assigned" } else { "none" },
            ),
        ],
    );
}

/// Whole roster, fewest open tasks wins.
#[derive(Debug, Clone)]
pub struct LeastLoaded {
    workers: Vec<String>,
}

impl LeastLoaded {
    pub fn new(workers: Vec<String>) -> Self {
        Self { workers }
    }

    pub fn from_roster(roster: &Roster) -> Self {
        Self::new(roster.everyone())
    }
}

impl AssignmentStrategy for LeastLoaded {
    fn find_assignee(&self, task: &Task, repository: &dyn Repository) -> Option<String> {
        let chosen = least_loaded(&self.workers, repository);
        record(self.policy(), task, &chosen);
        chosen
    }

    fn policy(&self) -> AssignmentPolicy {
        AssignmentPolicy::LeastLoaded
    }
}

/// HIGH/URGENT work goes to seniors only; everything else is open to
/// juniors first, then seniors.
#[derive(Debug, Clone)]
pub struct PriorityBased {
    roster: Roster,
}

impl PriorityBased {
    pub fn new(roster: Roster) -> Self {
        Self { roster }
    }

    fn candidates(&self, task: &Task) -> Vec<String> {
        if task.priority().is_high() {
            self.roster.seniors.clone()
        } else {
            self.roster
                .juniors
                .iter()
                .chain(&self.roster.seniors)
                .cloned()
                .collect()
        }
    }
}

impl AssignmentStrategy for PriorityBased {
    fn find_assignee(&self, task: &Task, repository: &dyn Repository) -> Option<String> {
        let chosen = least_loaded(&self.candidates(task), repository);
        record(self.policy(), task, &chosen);
        chosen
    }

    fn policy(&self) -> AssignmentPolicy {
        AssignmentPolicy::PriorityBased
    }
}

/// Which strategy the engine builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentPolicy {
    LeastLoaded,
    #[default]
    PriorityBased,
}

impl AssignmentPolicy {
    pub fn build(self, roster: &Roster) -> Box<dyn AssignmentStrategy> {
        match self {
            AssignmentPolicy::LeastLoaded => Box::new(LeastLoaded::from_roster(roster)),
            AssignmentPolicy::PriorityBased => Box::new(PriorityBased::new(roster.clone())),
        }
    }
}

impl std::fmt::Display for AssignmentPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AssignmentPolicy::LeastLoaded => "least-loaded",
            AssignmentPolicy::PriorityBased => "priority",
        };
        write!(f, "{s}")
    }
}

impl FromStr for AssignmentPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "least-loaded" | "least_loaded" => Ok(AssignmentPolicy::LeastLoaded),
            "priority" | "priority-based" | "priority_based" => {
                Ok(AssignmentPolicy::PriorityBased)
            }
            _ => Err(Error::Config(format!(
                "invalid assignment policy {s:?} (expected least-loaded or priority)"
            ))),
        }
    }
}
