//! Windowed dispatch sweep for due reminders.
//!
//! The sweep itself is a pure function of the injected `now`: the daily
//! trigger is an external tick (see [`spawn_daily`]), never an ambient
//! global, so every windowing decision is reproducible in tests.

use crate::notify::ports::{Notification, Notifier};
use crate::reminder::{
    domain::Reminder,
    ports::{ReminderRepository, ReminderRepositoryError},
};
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::user::{
    domain::{User, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Wall-clock schedule and window length for the daily sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Hour of day (0–23) the sweep runs at.
    pub hour: u32,
    /// Minute of hour (0–59) the sweep runs at.
    pub minute: u32,
    /// Length of the dispatch window in minutes.
    ///
    /// The window keeps adjacent runs from re-triggering on the same
    /// reminder.
    pub window_minutes: i64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            hour: 8,
            minute: 0,
            window_minutes: 60,
        }
    }
}

/// Outcome counters for one sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Reminders found due within the window.
    pub examined: usize,
    /// Reminders dispatched and marked sent.
    pub dispatched: usize,
    /// Reminders skipped because of a per-item failure.
    pub failed: usize,
}

/// Errors that abort an entire sweep run.
///
/// Per-reminder failures never abort the run; they are logged and
/// counted in [`SweepReport::failed`].
#[derive(Debug, Error)]
pub enum SweepError {
    /// The due-reminder query failed.
    #[error(transparent)]
    Repository(#[from] ReminderRepositoryError),
}

/// Per-reminder failure, recovered locally by the sweep loop.
#[derive(Debug, Error)]
enum SweepItemError {
    #[error("task {0} no longer exists")]
    TaskMissing(TaskId),

    #[error("owner {0} no longer exists")]
    OwnerMissing(UserId),

    #[error(transparent)]
    TaskStore(#[from] TaskRepositoryError),

    #[error(transparent)]
    UserStore(#[from] UserRepositoryError),

    #[error(transparent)]
    Reminders(#[from] ReminderRepositoryError),
}

/// Periodic dispatcher for due reminders.
pub struct ReminderSweep<R, T, U, N>
where
    R: ReminderRepository,
    T: TaskRepository,
    U: UserRepository,
    N: Notifier,
{
    reminders: Arc<R>,
    tasks: Arc<T>,
    users: Arc<U>,
    notifier: Arc<N>,
    config: SweepConfig,
}

impl<R, T, U, N> ReminderSweep<R, T, U, N>
where
    R: ReminderRepository,
    T: TaskRepository,
    U: UserRepository,
    N: Notifier,
{
    /// Creates a new sweep over the given collaborators.
    #[must_use]
    pub const fn new(
        reminders: Arc<R>,
        tasks: Arc<T>,
        users: Arc<U>,
        notifier: Arc<N>,
        config: SweepConfig,
    ) -> Self {
        Self {
            reminders,
            tasks,
            users,
            notifier,
            config,
        }
    }

    /// Returns the sweep schedule configuration.
    #[must_use]
    pub const fn config(&self) -> SweepConfig {
        self.config
    }

    /// Runs one sweep over the window `[now, now + window)`.
    ///
    /// Each due reminder is dispatched and then marked sent. A
    /// notification failure is logged and does not block the sent flip;
    /// the sweep favours at-least-once delivery. A failure resolving the
    /// task or owner skips that reminder without aborting the batch.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError`] only when the due-reminder query itself
    /// fails; per-reminder failures are recovered locally.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<SweepReport, SweepError> {
        let window_end = now + Duration::minutes(self.config.window_minutes);
        let due = self.reminders.find_unsent_in_window(now, window_end).await?;

        if due.is_empty() {
            debug!(%now, %window_end, "no reminders due in window");
            return Ok(SweepReport::default());
        }

        let mut report = SweepReport {
            examined: due.len(),
            ..SweepReport::default()
        };
        for reminder in due {
            let reminder_id = reminder.id();
            match self.process(reminder, now).await {
                Ok(()) => report.dispatched += 1,
                Err(err) => {
                    error!(%reminder_id, error = %err, "failed to process reminder");
                    report.failed += 1;
                }
            }
        }

        info!(
            examined = report.examined,
            dispatched = report.dispatched,
            failed = report.failed,
            "sweep completed"
        );
        Ok(report)
    }

    async fn process(&self, reminder: Reminder, now: DateTime<Utc>) -> Result<(), SweepItemError> {
        let task = self
            .tasks
            .find_by_id(reminder.task_id())
            .await?
            .ok_or(SweepItemError::TaskMissing(reminder.task_id()))?;
        let owner = self
            .users
            .find_by_id(task.owner())
            .await?
            .ok_or(SweepItemError::OwnerMissing(task.owner()))?;

        let notification = build_reminder_notification(&task, &owner);
        if let Err(err) = self.notifier.send(owner.email(), &notification).await {
            warn!(
                reminder_id = %reminder.id(),
                recipient = %owner.email(),
                error = %err,
                "reminder notification failed; marking sent anyway"
            );
        }

        self.reminders.mark_sent(reminder.id(), now).await?;
        Ok(())
    }
}

fn build_reminder_notification(task: &Task, owner: &User) -> Notification {
    Notification::TaskReminder {
        recipient_name: owner.display_name(),
        task_name: task.name().as_str().to_owned(),
        description: task.description().to_owned(),
        priority: task.priority(),
        status: task.status(),
        deadline: task.deadline(),
    }
}

/// Returns the next instant matching the configured wall-clock time
/// strictly after `now`.
#[must_use]
pub fn next_run_after(now: DateTime<Utc>, config: SweepConfig) -> DateTime<Utc> {
    let candidate = now
        .date_naive()
        .and_hms_opt(config.hour.min(23), config.minute.min(59), 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(now);
    if candidate > now {
        candidate
    } else {
        candidate + Duration::days(1)
    }
}

/// Spawns the daily sweep driver.
///
/// The driver sleeps until the next configured wall-clock time, runs the
/// sweep with the wall clock as the injected `now`, and repeats. Run
/// failures are logged and do not stop the loop.
pub fn spawn_daily<R, T, U, N>(sweep: Arc<ReminderSweep<R, T, U, N>>) -> tokio::task::JoinHandle<()>
where
    R: ReminderRepository + 'static,
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
    N: Notifier + 'static,
{
    tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let next = next_run_after(now, sweep.config());
            let wait = (next - now).to_std().unwrap_or_default();
            debug!(%next, "sweep sleeping until next run");
            tokio::time::sleep(wait).await;

            if let Err(err) = sweep.run(Utc::now()).await {
                error!(error = %err, "sweep run failed");
            }
        }
    })
}
