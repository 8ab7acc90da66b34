//! Unit tests for task domain types and the owner-scoped filter.

use crate::task::domain::{
    NewTaskParams, Priority, Task, TaskDomainError, TaskName, TaskOrigin, TaskStatus,
};
use crate::task::ports::TaskFilter;
use crate::user::domain::UserId;
use chrono::{Duration, Utc};
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn sample_task(clock: &impl Clock) -> Result<Task, TaskDomainError> {
    let params = NewTaskParams::new(UserId::new(), TaskName::new("Read chapter 4")?)
        .with_description("Sections 4.1 through 4.3")
        .with_deadline(Utc::now() + Duration::days(7))
        .with_priority(Priority::High);
    Ok(Task::new(params, TaskOrigin::Manual, clock))
}

#[rstest]
#[case("Write essay", true)]
#[case("  trimmed  ", true)]
#[case("", false)]
#[case("   ", false)]
fn task_name_validation(#[case] input: &str, #[case] expected_valid: bool) {
    assert_eq!(TaskName::new(input).is_ok(), expected_valid, "input: {input:?}");
}

#[rstest]
fn task_name_is_trimmed() -> eyre::Result<()> {
    let name = TaskName::new("  Plan sprint  ")?;
    assert_eq!(name.as_str(), "Plan sprint");
    Ok(())
}

#[rstest]
#[case("low", Some(Priority::Low))]
#[case("MEDIUM", Some(Priority::Medium))]
#[case(" High ", Some(Priority::High))]
#[case("urgent", None)]
#[case("", None)]
fn priority_parsing(#[case] input: &str, #[case] expected: Option<Priority>) {
    assert_eq!(Priority::try_from(input).ok(), expected);
}

#[rstest]
#[case("pending", Some(TaskStatus::Pending))]
#[case("IN_PROGRESS", Some(TaskStatus::InProgress))]
#[case("completed", Some(TaskStatus::Completed))]
#[case("done", None)]
fn status_parsing(#[case] input: &str, #[case] expected: Option<TaskStatus>) {
    assert_eq!(TaskStatus::try_from(input).ok(), expected);
}

#[rstest]
fn new_task_starts_pending_and_incomplete(clock: DefaultClock) -> eyre::Result<()> {
    let task = sample_task(&clock)?;
    assert_eq!(task.status(), TaskStatus::Pending);
    assert!(!task.is_completed());
    assert_eq!(task.origin(), &TaskOrigin::Manual);
    Ok(())
}

#[rstest]
fn completing_a_task_moves_status(clock: DefaultClock) -> eyre::Result<()> {
    let mut task = sample_task(&clock)?;
    task.set_status(TaskStatus::InProgress, &clock);

    task.set_completed(true, &clock);

    assert!(task.is_completed());
    assert_eq!(task.status(), TaskStatus::Completed);
    Ok(())
}

#[rstest]
fn clearing_completion_keeps_status(clock: DefaultClock) -> eyre::Result<()> {
    let mut task = sample_task(&clock)?;
    task.set_completed(true, &clock);

    task.set_completed(false, &clock);

    assert!(!task.is_completed());
    assert_eq!(task.status(), TaskStatus::Completed);
    Ok(())
}

#[rstest]
fn copy_to_owner_resets_lifecycle_and_keeps_details(clock: DefaultClock) -> eyre::Result<()> {
    let mut original = sample_task(&clock)?;
    original.set_status(TaskStatus::InProgress, &clock);
    original.set_completed(true, &clock);
    let receiver = UserId::new();
    let invite_id = crate::invite::domain::InviteId::new();

    let copy = original.copy_to_owner(receiver, TaskOrigin::Invite { invite_id }, &clock);

    assert_ne!(copy.id(), original.id());
    assert_eq!(copy.owner(), receiver);
    assert_eq!(copy.name(), original.name());
    assert_eq!(copy.description(), original.description());
    assert_eq!(copy.deadline(), original.deadline());
    assert_eq!(copy.priority(), original.priority());
    assert_eq!(copy.status(), TaskStatus::Pending);
    assert!(!copy.is_completed());
    assert_eq!(copy.origin().invite_id(), Some(invite_id));
    Ok(())
}

#[rstest]
fn empty_filter_matches_everything(clock: DefaultClock) -> eyre::Result<()> {
    let task = sample_task(&clock)?;
    assert!(TaskFilter::new().matches(&task));
    Ok(())
}

#[rstest]
fn filter_criteria_are_conjunctive(clock: DefaultClock) -> eyre::Result<()> {
    let task = sample_task(&clock)?;

    let matching = TaskFilter::new()
        .with_priority(Priority::High)
        .with_status(TaskStatus::Pending)
        .with_completed(false);
    assert!(matching.matches(&task));

    let wrong_priority = TaskFilter::new()
        .with_priority(Priority::Low)
        .with_status(TaskStatus::Pending);
    assert!(!wrong_priority.matches(&task));
    Ok(())
}

#[rstest]
fn date_filter_excludes_tasks_without_deadline(clock: DefaultClock) -> eyre::Result<()> {
    let params = NewTaskParams::new(UserId::new(), TaskName::new("No deadline")?);
    let task = Task::new(params, TaskOrigin::Manual, &clock);

    let filter =
        TaskFilter::new().with_due_between(Utc::now() - Duration::days(1), Utc::now() + Duration::days(30));
    assert!(!filter.matches(&task));
    Ok(())
}

#[rstest]
fn date_filter_bounds_are_half_open(clock: DefaultClock) -> eyre::Result<()> {
    let deadline = Utc::now() + Duration::days(7);
    let params = NewTaskParams::new(UserId::new(), TaskName::new("Bounded")?)
        .with_deadline(deadline);
    let task = Task::new(params, TaskOrigin::Manual, &clock);

    let inclusive_start = TaskFilter::new().with_due_between(deadline, deadline + Duration::hours(1));
    assert!(inclusive_start.matches(&task));

    let exclusive_end = TaskFilter::new().with_due_between(deadline - Duration::hours(1), deadline);
    assert!(!exclusive_end.matches(&task));
    Ok(())
}
