//! Typed configuration from environment variables.
//!
//! Loads once at startup and fails fast on malformed values. Every
//! variable has a default, so an empty environment yields the strict,
//! priority-based setup with the stock four-person roster.

use std::path::Path;

use serde::Deserialize;

use crate::assignment::{AssignmentPolicy, Roster};
use crate::error::{Error, Result};
use crate::model::GuardPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub guard: GuardPolicy,
    pub assignment: AssignmentPolicy,
    pub roster: Roster,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            guard: GuardPolicy::default(),
            assignment: AssignmentPolicy::default(),
            roster: Roster::default(),
            otel_endpoint: None,
            log_level: "info".to_string(),
        }
    }
}

/// Top-level wrapper of a roster TOML file.
#[derive(Debug, Deserialize)]
struct RosterFile {
    roster: Roster,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Recognized variables: `TASKFLOW_GUARD`, `TASKFLOW_ASSIGNMENT`,
    /// `TASKFLOW_ROSTER_FILE`, `TASKFLOW_SENIORS`, `TASKFLOW_JUNIORS`,
    /// `OTEL_ENDPOINT`, `LOG_LEVEL`.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let guard = match lookup("TASKFLOW_GUARD") {
            Some(value) => value.parse()?,
            None => GuardPolicy::default(),
        };
        let assignment = match lookup("TASKFLOW_ASSIGNMENT") {
            Some(value) => value.parse()?,
            None => AssignmentPolicy::default(),
        };

        let roster = match lookup("TASKFLOW_ROSTER_FILE") {
            Some(path) => load_roster(Path::new(&path))?,
            None => {
                let defaults = Roster::default();
                Roster {
                    seniors: lookup("TASKFLOW_SENIORS")
                        .map(|v| split_names(&v))
                        .unwrap_or(defaults.seniors),
                    juniors: lookup("TASKFLOW_JUNIORS")
                        .map(|v| split_names(&v))
                        .unwrap_or(defaults.juniors),
                }
            }
        };

        Ok(Self {
            guard,
            assignment,
            roster,
            otel_endpoint: lookup("OTEL_ENDPOINT").filter(|v| !v.is_empty()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Read a `[roster]` table from a TOML file.
pub fn load_roster(path: &Path) -> Result<Roster> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read roster file {}: {e}", path.display())))?;
    let file: RosterFile = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("bad roster file {}: {e}", path.display())))?;
    Ok(file.roster)
}

fn split_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
