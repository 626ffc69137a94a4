//! Assignment strategies.

use taskflow::assignment::*;
use taskflow::model::*;
use taskflow::repository::{InMemoryRepository, Repository};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Add `count` open tasks assigned to `worker` at the root.
fn give(repo: &mut InMemoryRepository, next_id: &mut u64, worker: &str, count: usize) {
    for _ in 0..count {
        *next_id += 1;
        let mut task = Task::new(WorkId(*next_id), "load", "", Priority::Low);
        task.set_assignee(Some(worker.to_string()));
        repo.add_task(task.into());
    }
}

fn incoming(priority: Priority) -> Task {
    Task::new(WorkId(1000), "new", "", priority)
}

#[test]
fn least_loaded_picks_first_minimum_in_roster_order() {
    let mut repo = InMemoryRepository::new();
    let mut id = 0;
    give(&mut repo, &mut id, "A", 2);
    give(&mut repo, &mut id, "C", 1);

    let strategy = LeastLoaded::new(names(&["A", "B", "C", "D"]));
    assert_eq!(
        strategy.find_assignee(&incoming(Priority::Low), &repo),
        Some("B".to_string())
    );
}

#[test]
fn done_tasks_do_not_count_as_load() {
    let mut repo = InMemoryRepository::new();
    let mut finished = Task::new(WorkId(1), "finished", "", Priority::Low);
    finished.set_assignee(Some("A".to_string()));
    finished.start().unwrap();
    finished.review().unwrap();
    finished.complete().unwrap();
    repo.add_task(finished.into());
    let mut id = 1;
    give(&mut repo, &mut id, "B", 1);

    assert_eq!(open_load("A", &repo), 0);
    let strategy = LeastLoaded::new(names(&["B", "A"]));
    assert_eq!(
        strategy.find_assignee(&incoming(Priority::Low), &repo),
        Some("A".to_string())
    );
}

#[test]
fn load_includes_tasks_inside_epics() {
    let mut epic = Epic::new(WorkId(1), "Epic");
    let mut nested = Task::new(WorkId(2), "nested", "", Priority::Low);
    nested.set_assignee(Some("A".to_string()));
    epic.add_subtask(nested);

    let mut repo = InMemoryRepository::new();
    repo.add_task(epic.into());

    assert_eq!(open_load("A", &repo), 1);
    let strategy = LeastLoaded::new(names(&["A", "B"]));
    assert_eq!(
        strategy.find_assignee(&incoming(Priority::Low), &repo),
        Some("B".to_string())
    );
}

#[test]
fn empty_roster_assigns_nobody() {
    let repo = InMemoryRepository::new();
    let strategy = LeastLoaded::new(Vec::new());
    assert_eq!(strategy.find_assignee(&incoming(Priority::Low), &repo), None);

    let strategy = PriorityBased::new(Roster {
        seniors: Vec::new(),
        juniors: names(&["Charlie"]),
    });
    assert_eq!(strategy.find_assignee(&incoming(Priority::Urgent), &repo), None);
    assert_eq!(
        strategy.find_assignee(&incoming(Priority::Low), &repo),
        Some("Charlie".to_string())
    );
}

#[test]
fn priority_based_sends_urgent_work_to_seniors() {
    let mut repo = InMemoryRepository::new();
    let mut id = 0;
    give(&mut repo, &mut id, "Alice", 3);

    let strategy = PriorityBased::new(Roster::default());
    for priority in [Priority::High, Priority::Urgent] {
        assert_eq!(
            strategy.find_assignee(&incoming(priority), &repo),
            Some("Bob".to_string())
        );
    }
}

#[test]
fn priority_based_prefers_juniors_for_routine_work() {
    let mut repo = InMemoryRepository::new();
    let strategy = PriorityBased::new(Roster::default());

    assert_eq!(
        strategy.find_assignee(&incoming(Priority::Low), &repo),
        Some("Charlie".to_string())
    );

    let mut id = 0;
    give(&mut repo, &mut id, "Charlie", 1);
    give(&mut repo, &mut id, "Dave", 1);
    // Juniors are busy; an idle senior is now the first minimum.
    assert_eq!(
        strategy.find_assignee(&incoming(Priority::Medium), &repo),
        Some("Alice".to_string())
    );
}

#[test]
fn policy_parse_and_build() {
    assert_eq!(
        "least-loaded".parse::<AssignmentPolicy>().unwrap(),
        AssignmentPolicy::LeastLoaded
    );
    assert_eq!(
        "priority".parse::<AssignmentPolicy>().unwrap(),
        AssignmentPolicy::PriorityBased
    );
    assert!("random".parse::<AssignmentPolicy>().is_err());

    let roster = Roster::default();
    assert_eq!(
        AssignmentPolicy::LeastLoaded.build(&roster).policy(),
        AssignmentPolicy::LeastLoaded
    );
    assert_eq!(roster.everyone(), names(&["Alice", "Bob", "Charlie", "Dave"]));
}
