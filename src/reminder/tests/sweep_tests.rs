//! Windowed dispatch tests for the reminder sweep.

use std::sync::Arc;

use crate::notify::adapters::memory::RecordingNotifier;
use crate::notify::ports::{MockNotifier, Notification, NotifyError};
use crate::reminder::{
    adapters::memory::InMemoryReminderRepository,
    domain::Reminder,
    ports::ReminderRepository,
    services::{ReminderSweep, SweepConfig, next_run_after},
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{NewTaskParams, Task, TaskName, TaskOrigin},
    ports::TaskRepository,
};
use crate::user::{
    adapters::memory::InMemoryUserRepository,
    domain::{EmailAddress, User, UserId},
    ports::UserRepository,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

struct Harness {
    reminders: Arc<InMemoryReminderRepository>,
    tasks: Arc<InMemoryTaskRepository>,
    users: Arc<InMemoryUserRepository>,
    notifier: Arc<RecordingNotifier>,
}

#[fixture]
fn harness() -> Harness {
    Harness {
        reminders: Arc::new(InMemoryReminderRepository::new()),
        tasks: Arc::new(InMemoryTaskRepository::new()),
        users: Arc::new(InMemoryUserRepository::new()),
        notifier: Arc::new(RecordingNotifier::new()),
    }
}

fn sweep_of(harness: &Harness) -> ReminderSweep<
    InMemoryReminderRepository,
    InMemoryTaskRepository,
    InMemoryUserRepository,
    RecordingNotifier,
> {
    ReminderSweep::new(
        Arc::clone(&harness.reminders),
        Arc::clone(&harness.tasks),
        Arc::clone(&harness.users),
        Arc::clone(&harness.notifier),
        SweepConfig::default(),
    )
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

async fn seed_task_with_reminder(
    harness: &Harness,
    email: &str,
    fire_at: DateTime<Utc>,
) -> eyre::Result<(Task, Reminder)> {
    let user = User::new(
        UserId::new(),
        EmailAddress::new(email).map_err(|err| eyre::eyre!(err))?,
        "Swept",
        "Owner",
    )
    .map_err(|err| eyre::eyre!(err))?;
    harness.users.store(&user).await?;

    let params = NewTaskParams::new(user.id(), TaskName::new("Submit report").map_err(|err| eyre::eyre!(err))?)
        .with_deadline(fire_at + Duration::days(1));
    let task = Task::new(params, TaskOrigin::Manual, &DefaultClock);
    harness.tasks.store(&task).await?;

    let reminder = Reminder::schedule(task.id(), fire_at, &DefaultClock);
    harness.reminders.store(&reminder).await?;
    Ok((task, reminder))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn adjacent_windows_dispatch_exactly_once(harness: Harness) -> eyre::Result<()> {
    // Reminder fires today at 09:00 for a deadline tomorrow 09:00.
    let (_, reminder) = seed_task_with_reminder(&harness, "owner@example.com", at(9, 0)).await?;
    let sweep = sweep_of(&harness);

    // 08:00 run covers [08:00, 09:00): not yet included.
    let early = sweep.run(at(8, 0)).await?;
    assert_eq!(early.dispatched, 0);
    assert!(harness.notifier.sent()?.is_empty());

    // 08:30 run covers [08:30, 09:30): dispatched and marked sent.
    let hit = sweep.run(at(8, 30)).await?;
    assert_eq!(hit.dispatched, 1);
    assert_eq!(harness.notifier.sent()?.len(), 1);
    let stored = harness
        .reminders
        .find_by_id(reminder.id())
        .await?
        .ok_or_else(|| eyre::eyre!("reminder should exist"))?;
    assert!(stored.is_sent());
    assert_eq!(stored.sent_at(), Some(at(8, 30)));

    // A later run never re-sends.
    let again = sweep.run(at(8, 45)).await?;
    assert_eq!(again.dispatched, 0);
    assert_eq!(harness.notifier.sent()?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reminder_notification_carries_task_details(harness: Harness) -> eyre::Result<()> {
    let (task, _) = seed_task_with_reminder(&harness, "owner@example.com", at(9, 0)).await?;
    let sweep = sweep_of(&harness);

    sweep.run(at(8, 30)).await?;

    let sent = harness.notifier.sent()?;
    let (recipient, notification) = sent
        .first()
        .ok_or_else(|| eyre::eyre!("one notification expected"))?;
    assert_eq!(recipient.as_str(), "owner@example.com");
    match notification {
        Notification::TaskReminder {
            task_name,
            deadline,
            ..
        } => {
            assert_eq!(task_name, task.name().as_str());
            assert_eq!(*deadline, task.deadline());
        }
        other => eyre::bail!("unexpected notification {other:?}"),
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_task_does_not_abort_the_batch(harness: Harness) -> eyre::Result<()> {
    let (stale_task, stale_reminder) =
        seed_task_with_reminder(&harness, "stale@example.com", at(9, 0)).await?;
    seed_task_with_reminder(&harness, "healthy@example.com", at(9, 5)).await?;
    harness.tasks.delete(stale_task.id()).await?;

    let report = sweep_of(&harness).run(at(8, 30)).await?;

    assert_eq!(report.examined, 2);
    assert_eq!(report.dispatched, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(harness.notifier.sent()?.len(), 1);

    // The stale reminder stays unsent and will be retried next run.
    let stored = harness
        .reminders
        .find_by_id(stale_reminder.id())
        .await?
        .ok_or_else(|| eyre::eyre!("reminder should exist"))?;
    assert!(!stored.is_sent());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn notification_failure_still_marks_sent(harness: Harness) -> eyre::Result<()> {
    let (_, reminder) = seed_task_with_reminder(&harness, "owner@example.com", at(9, 0)).await?;

    let mut failing = MockNotifier::new();
    failing
        .expect_send()
        .returning(|_, _| Err(NotifyError::Transport("smtp unreachable".to_owned())));
    let sweep = ReminderSweep::new(
        Arc::clone(&harness.reminders),
        Arc::clone(&harness.tasks),
        Arc::clone(&harness.users),
        Arc::new(failing),
        SweepConfig::default(),
    );

    let report = sweep.run(at(8, 30)).await?;

    assert_eq!(report.dispatched, 1);
    assert_eq!(report.failed, 0);
    let stored = harness
        .reminders
        .find_by_id(reminder.id())
        .await?
        .ok_or_else(|| eyre::eyre!("reminder should exist"))?;
    assert!(stored.is_sent());
    Ok(())
}

#[rstest]
#[case(7, 30, 8, 0)]
#[case(8, 0, 8, 0)]
#[case(8, 30, 8, 0)]
fn next_run_lands_on_configured_time(
    #[case] now_hour: u32,
    #[case] now_minute: u32,
    #[case] config_hour: u32,
    #[case] config_minute: u32,
) {
    let config = SweepConfig {
        hour: config_hour,
        minute: config_minute,
        ..SweepConfig::default()
    };
    let now = at(now_hour, now_minute);

    let next = next_run_after(now, config);

    assert!(next > now);
    assert_eq!(next.time().format("%H:%M").to_string(), "08:00");
    let gap = next - now;
    assert!(gap <= Duration::days(1));
}
