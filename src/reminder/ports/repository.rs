//! Repository port for reminder persistence and sweep queries.

use crate::reminder::domain::{Reminder, ReminderId};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for reminder repository operations.
pub type ReminderRepositoryResult<T> = Result<T, ReminderRepositoryError>;

/// Reminder persistence contract.
#[async_trait]
pub trait ReminderRepository: Send + Sync {
    /// Stores a new reminder.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderRepositoryError::DuplicateReminder`] when the id
    /// already exists.
    async fn store(&self, reminder: &Reminder) -> ReminderRepositoryResult<()>;

    /// Finds a reminder by identifier.
    ///
    /// Returns `None` when the reminder does not exist.
    async fn find_by_id(&self, id: ReminderId) -> ReminderRepositoryResult<Option<Reminder>>;

    /// Returns all reminders, sent or not, belonging to a task.
    async fn find_by_task(&self, task_id: TaskId) -> ReminderRepositoryResult<Vec<Reminder>>;

    /// Returns `true` when the task has an unsent reminder.
    async fn has_unsent_for_task(&self, task_id: TaskId) -> ReminderRepositoryResult<bool>;

    /// Deletes every unsent reminder for a task, returning the count.
    ///
    /// Sent reminders are retained as history.
    async fn delete_unsent_for_task(&self, task_id: TaskId) -> ReminderRepositoryResult<u64>;

    /// Returns the unsent reminders with fire time in `[start, end)`.
    async fn find_unsent_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ReminderRepositoryResult<Vec<Reminder>>;

    /// Flips a reminder to sent, exactly once.
    ///
    /// The flip is guarded against concurrent or repeated dispatch: it
    /// commits only when the stored record is still unsent.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderRepositoryError::NotFound`] when the reminder
    /// does not exist, or [`ReminderRepositoryError::AlreadySent`] when it
    /// was dispatched before.
    async fn mark_sent(
        &self,
        id: ReminderId,
        sent_at: DateTime<Utc>,
    ) -> ReminderRepositoryResult<()>;
}

/// Errors returned by reminder repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReminderRepositoryError {
    /// A reminder with the same identifier already exists.
    #[error("duplicate reminder identifier: {0}")]
    DuplicateReminder(ReminderId),

    /// The reminder was not found.
    #[error("reminder not found: {0}")]
    NotFound(ReminderId),

    /// The reminder was already dispatched.
    #[error("reminder {0} has already been sent")]
    AlreadySent(ReminderId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReminderRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
