//! Reminder creation and cancellation.

use crate::reminder::{
    domain::Reminder,
    ports::{ReminderRepository, ReminderRepositoryError},
};
use crate::task::domain::{Task, TaskId};
use chrono::Duration;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for reminder scheduling operations.
#[derive(Debug, Error)]
pub enum ReminderEngineError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ReminderRepositoryError),
}

/// Result type for reminder engine operations.
pub type ReminderEngineResult<T> = Result<T, ReminderEngineError>;

/// Reminder scheduling service.
///
/// Reminders fire one day ahead of the task deadline. Creation is
/// idempotent per task: a second call while an unsent reminder exists is
/// a no-op.
#[derive(Clone)]
pub struct ReminderEngine<R, C>
where
    R: ReminderRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ReminderEngine<R, C>
where
    R: ReminderRepository,
    C: Clock + Send + Sync,
{
    /// How far ahead of the deadline a reminder fires.
    #[must_use]
    pub fn advance_notice() -> Duration {
        Duration::days(1)
    }

    /// Creates a new reminder engine.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Schedules the deadline reminder for a task.
    ///
    /// Returns `Ok(None)` without scheduling when the task has no
    /// deadline, when an unsent reminder already exists, or when the
    /// computed fire time has already passed; advance notice in the past
    /// is useless.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderEngineError::Repository`] when persistence fails.
    pub async fn create_for_task(&self, task: &Task) -> ReminderEngineResult<Option<Reminder>> {
        let Some(deadline) = task.deadline() else {
            debug!(task_id = %task.id(), "task has no deadline; reminder skipped");
            return Ok(None);
        };

        if self.repository.has_unsent_for_task(task.id()).await? {
            debug!(task_id = %task.id(), "unsent reminder already exists; reminder skipped");
            return Ok(None);
        }

        let fire_at = deadline - Self::advance_notice();
        if fire_at <= self.clock.utc() {
            debug!(
                task_id = %task.id(),
                %fire_at,
                "computed reminder time is in the past; reminder skipped"
            );
            return Ok(None);
        }

        let reminder = Reminder::schedule(task.id(), fire_at, &*self.clock);
        self.repository.store(&reminder).await?;
        info!(task_id = %task.id(), reminder_id = %reminder.id(), %fire_at, "reminder scheduled");
        Ok(Some(reminder))
    }

    /// Deletes every unsent reminder for a task, returning the count.
    ///
    /// Sent reminders are retained as history.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderEngineError::Repository`] when persistence fails.
    pub async fn cancel_for_task(&self, task_id: TaskId) -> ReminderEngineResult<u64> {
        let cancelled = self.repository.delete_unsent_for_task(task_id).await?;
        if cancelled > 0 {
            info!(%task_id, cancelled, "unsent reminder(s) cancelled");
        }
        Ok(cancelled)
    }
}
