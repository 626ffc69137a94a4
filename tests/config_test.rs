use std::collections::HashMap;

use taskflow::assignment::{AssignmentPolicy, Roster};
use taskflow::config::{Config, load_roster};
use taskflow::error::Error;
use taskflow::model::GuardPolicy;
use uuid::Uuid;

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

#[test]
fn empty_environment_uses_defaults() {
    let config = Config::from_vars(vars(&[])).unwrap();
    assert_eq!(config.guard, GuardPolicy::Strict);
    assert_eq!(config.assignment, AssignmentPolicy::PriorityBased);
    assert_eq!(config.roster, Roster::default());
    assert_eq!(config.otel_endpoint, None);
    assert_eq!(config.log_level, "info");
}

#[test]
fn policies_and_lists_are_parsed() {
    let config = Config::from_vars(vars(&[
        ("TASKFLOW_GUARD", "lenient"),
        ("TASKFLOW_ASSIGNMENT", "least-loaded"),
        ("TASKFLOW_SENIORS", "Erin, Frank"),
        ("TASKFLOW_JUNIORS", "Gus,,"),
        ("OTEL_ENDPOINT", "http://localhost:4317"),
        ("LOG_LEVEL", "debug"),
    ]))
    .unwrap();

    assert_eq!(config.guard, GuardPolicy::Lenient);
    assert_eq!(config.assignment, AssignmentPolicy::LeastLoaded);
    assert_eq!(config.roster.seniors, vec!["Erin", "Frank"]);
    assert_eq!(config.roster.juniors, vec!["Gus"]);
    assert_eq!(config.otel_endpoint.as_deref(), Some("http://localhost:4317"));
    assert_eq!(config.log_level, "debug");
}

#[test]
fn only_one_list_overridden_keeps_the_other_default() {
    let config = Config::from_vars(vars(&[("TASKFLOW_JUNIORS", "Gus")])).unwrap();
    assert_eq!(config.roster.seniors, Roster::default().seniors);
    assert_eq!(config.roster.juniors, vec!["Gus"]);
}

#[test]
fn empty_endpoint_means_no_export() {
    let config = Config::from_vars(vars(&[("OTEL_ENDPOINT", "")])).unwrap();
    assert_eq!(config.otel_endpoint, None);
}

#[test]
fn malformed_values_fail_fast() {
    let guard = Config::from_vars(vars(&[("TASKFLOW_GUARD", "paranoid")]));
    assert!(matches!(guard, Err(Error::Config(_))));

    let assignment = Config::from_vars(vars(&[("TASKFLOW_ASSIGNMENT", "round-robin")]));
    assert!(matches!(assignment, Err(Error::Config(_))));
}

#[test]
fn roster_file_takes_precedence_over_lists() {
    let path = std::env::temp_dir().join(format!("taskflow-roster-{}.toml", Uuid::new_v4()));
    std::fs::write(
        &path,
        "[roster]\nseniors = [\"Hana\"]\njuniors = [\"Ivo\", \"Jo\"]\n",
    )
    .unwrap();

    let path_str = path.to_string_lossy().to_string();
    let config = Config::from_vars(vars(&[
        ("TASKFLOW_ROSTER_FILE", path_str.as_str()),
        ("TASKFLOW_SENIORS", "Ignored"),
    ]))
    .unwrap();
    assert_eq!(config.roster.seniors, vec!["Hana"]);
    assert_eq!(config.roster.juniors, vec!["Ivo", "Jo"]);

    std::fs::remove_file(&path).ok();
}

#[test]
fn bad_roster_files_are_config_errors() {
    let missing = std::env::temp_dir().join(format!("taskflow-missing-{}.toml", Uuid::new_v4()));
    assert!(matches!(load_roster(&missing), Err(Error::Config(_))));

    let garbled = std::env::temp_dir().join(format!("taskflow-garbled-{}.toml", Uuid::new_v4()));
    std::fs::write(&garbled, "roster = 3\n").unwrap();
    assert!(matches!(load_roster(&garbled), Err(Error::Config(_))));
    std::fs::remove_file(&garbled).ok();
}

#[test]
fn config_from_env_reads_process_environment() {
    unsafe {
        std::env::set_var("TASKFLOW_ASSIGNMENT", "least-loaded");
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.assignment, AssignmentPolicy::LeastLoaded);

    unsafe {
        std::env::remove_var("TASKFLOW_ASSIGNMENT");
    }
}
