//! Progress aggregation and derived epic state.

use taskflow::model::*;
use taskflow::progress::{ProgressVisitor, StateCounter};

fn done_task(id: u64) -> Task {
    let mut task = Task::new(WorkId(id), "done", "", Priority::Low);
    task.start().unwrap();
    task.review().unwrap();
    task.complete().unwrap();
    task
}

fn todo_task(id: u64) -> Task {
    Task::new(WorkId(id), "todo", "", Priority::Low)
}

#[test]
fn task_progress_is_binary() {
    let mut task = todo_task(1);
    assert_eq!(task.compute_progress(), 0.0);
    task.start().unwrap();
    task.review().unwrap();
    assert_eq!(task.compute_progress(), 0.0);
    task.complete().unwrap();
    assert_eq!(task.compute_progress(), 100.0);
}

#[test]
fn empty_epic_is_complete() {
    let epic = Epic::new(WorkId(1), "Empty");
    assert_eq!(epic.compute_progress(), 100.0);
    // ...but not DONE.
    assert_eq!(epic.state(), TaskState::InProgress);
}

#[test]
fn epic_averages_children() {
    let mut epic = Epic::new(WorkId(1), "Half");
    epic.add_subtask(done_task(2));
    epic.add_subtask(todo_task(3));
    assert_eq!(epic.compute_progress(), 50.0);
    assert_eq!(epic.state(), TaskState::InProgress);
}

#[test]
fn nested_epics_average_recursively() {
    let mut inner = Epic::new(WorkId(2), "Inner");
    inner.add_subtask(done_task(3));
    inner.add_subtask(done_task(4));

    let mut outer = Epic::new(WorkId(1), "Outer");
    outer.add_subtask(done_task(5));
    outer.add_subtask(inner);

    assert_eq!(outer.compute_progress(), 100.0);
    assert_eq!(outer.state(), TaskState::Done);
}

#[test]
fn nested_average_weights_direct_children_equally() {
    let mut inner = Epic::new(WorkId(2), "Inner");
    inner.add_subtask(done_task(3));
    inner.add_subtask(todo_task(4));
    inner.add_subtask(todo_task(5));
    inner.add_subtask(todo_task(6));

    let mut outer = Epic::new(WorkId(1), "Outer");
    outer.add_subtask(done_task(7));
    outer.add_subtask(inner);

    // (100 + 25) / 2
    assert_eq!(outer.compute_progress(), 62.5);
}

#[test]
fn thirds_are_not_rounded() {
    let mut epic = Epic::new(WorkId(1), "Thirds");
    epic.add_subtask(done_task(2));
    epic.add_subtask(todo_task(3));
    epic.add_subtask(todo_task(4));
    let progress = epic.compute_progress();
    assert!((progress - 100.0 / 3.0).abs() < 1e-9, "got {progress}");
}

#[test]
fn visitor_and_work_item_agree() {
    let mut epic = Epic::new(WorkId(1), "Agree");
    epic.add_subtask(done_task(2));
    epic.add_subtask(todo_task(3));
    let item = WorkItem::from(epic);

    assert_eq!(item.accept(&mut ProgressVisitor), item.compute_progress());
}

#[test]
fn state_counter_walks_the_tree() {
    let mut inner = Epic::new(WorkId(2), "Inner");
    inner.add_subtask(done_task(3));
    let mut started = todo_task(4);
    started.start().unwrap();
    inner.add_subtask(started);

    let mut outer = Epic::new(WorkId(1), "Outer");
    outer.add_subtask(todo_task(5));
    outer.add_subtask(inner);

    let mut counter = StateCounter::default();
    WorkItem::from(outer).accept(&mut counter);
    assert_eq!(counter.todo, 1);
    assert_eq!(counter.in_progress, 1);
    assert_eq!(counter.review, 0);
    assert_eq!(counter.done, 1);
    assert_eq!(counter.total(), 3);
}
