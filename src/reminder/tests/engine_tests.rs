//! Scheduling tests for the reminder engine.

use std::sync::Arc;

use crate::reminder::{
    adapters::memory::InMemoryReminderRepository,
    ports::ReminderRepository,
    services::ReminderEngine,
};
use crate::task::domain::{NewTaskParams, Task, TaskDomainError, TaskName, TaskOrigin};
use crate::user::domain::UserId;
use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestEngine = ReminderEngine<InMemoryReminderRepository, DefaultClock>;

struct Harness {
    engine: TestEngine,
    repository: Arc<InMemoryReminderRepository>,
}

#[fixture]
fn harness() -> Harness {
    let repository = Arc::new(InMemoryReminderRepository::new());
    let engine = ReminderEngine::new(Arc::clone(&repository), Arc::new(DefaultClock));
    Harness { engine, repository }
}

fn task_with_deadline(hours_ahead: i64) -> Result<Task, TaskDomainError> {
    let params = NewTaskParams::new(UserId::new(), TaskName::new("Revise notes")?)
        .with_deadline(Utc::now() + Duration::hours(hours_ahead));
    Ok(Task::new(params, TaskOrigin::Manual, &DefaultClock))
}

fn task_without_deadline() -> Result<Task, TaskDomainError> {
    let params = NewTaskParams::new(UserId::new(), TaskName::new("Open-ended")?);
    Ok(Task::new(params, TaskOrigin::Manual, &DefaultClock))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn schedules_one_day_before_deadline(harness: Harness) -> eyre::Result<()> {
    let task = task_with_deadline(72)?;

    let reminder = harness
        .engine
        .create_for_task(&task)
        .await?
        .ok_or_else(|| eyre::eyre!("reminder should be scheduled"))?;

    let deadline = task.deadline().ok_or_else(|| eyre::eyre!("deadline set"))?;
    assert_eq!(reminder.fire_at(), deadline - Duration::days(1));
    assert!(!reminder.is_sent());
    assert!(harness.repository.has_unsent_for_task(task.id()).await?);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn skips_task_without_deadline(harness: Harness) -> eyre::Result<()> {
    let task = task_without_deadline()?;

    let reminder = harness.engine.create_for_task(&task).await?;

    assert!(reminder.is_none());
    assert!(harness.repository.find_by_task(task.id()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn skips_deadline_less_than_advance_notice_away(harness: Harness) -> eyre::Result<()> {
    let task = task_with_deadline(2)?;

    let reminder = harness.engine.create_for_task(&task).await?;

    assert!(reminder.is_none());
    assert!(harness.repository.find_by_task(task.id()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_is_idempotent_per_task(harness: Harness) -> eyre::Result<()> {
    let task = task_with_deadline(72)?;

    let first = harness.engine.create_for_task(&task).await?;
    let second = harness.engine.create_for_task(&task).await?;

    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(harness.repository.find_by_task(task.id()).await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancel_removes_unsent_and_keeps_sent_history(harness: Harness) -> eyre::Result<()> {
    let task = task_with_deadline(72)?;
    let sent = harness
        .engine
        .create_for_task(&task)
        .await?
        .ok_or_else(|| eyre::eyre!("reminder should be scheduled"))?;
    harness.repository.mark_sent(sent.id(), Utc::now()).await?;

    // A new unsent reminder is allowed once the previous one was sent.
    let unsent = harness.engine.create_for_task(&task).await?;
    assert!(unsent.is_some());

    let cancelled = harness.engine.cancel_for_task(task.id()).await?;

    assert_eq!(cancelled, 1);
    let remaining = harness.repository.find_by_task(task.id()).await?;
    assert_eq!(remaining.len(), 1);
    assert!(remaining[0].is_sent());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancel_on_task_without_reminders_is_a_noop(harness: Harness) -> eyre::Result<()> {
    let task = task_without_deadline()?;
    let cancelled = harness.engine.cancel_for_task(task.id()).await?;
    assert_eq!(cancelled, 0);
    Ok(())
}
