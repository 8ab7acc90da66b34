//! In-memory reminder repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::reminder::{
    domain::{Reminder, ReminderId},
    ports::{ReminderRepository, ReminderRepositoryError, ReminderRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory reminder repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReminderRepository {
    state: Arc<RwLock<HashMap<ReminderId, Reminder>>>,
}

impl InMemoryReminderRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> ReminderRepositoryError {
    ReminderRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ReminderRepository for InMemoryReminderRepository {
    async fn store(&self, reminder: &Reminder) -> ReminderRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.contains_key(&reminder.id()) {
            return Err(ReminderRepositoryError::DuplicateReminder(reminder.id()));
        }
        state.insert(reminder.id(), reminder.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ReminderId) -> ReminderRepositoryResult<Option<Reminder>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn find_by_task(&self, task_id: TaskId) -> ReminderRepositoryResult<Vec<Reminder>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .values()
            .filter(|reminder| reminder.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn has_unsent_for_task(&self, task_id: TaskId) -> ReminderRepositoryResult<bool> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .values()
            .any(|reminder| reminder.task_id() == task_id && !reminder.is_sent()))
    }

    async fn delete_unsent_for_task(&self, task_id: TaskId) -> ReminderRepositoryResult<u64> {
        let mut state = self.state.write().map_err(lock_error)?;
        let before = state.len();
        state.retain(|_, reminder| reminder.task_id() != task_id || reminder.is_sent());
        Ok((before - state.len()) as u64)
    }

    async fn find_unsent_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ReminderRepositoryResult<Vec<Reminder>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut due: Vec<Reminder> = state
            .values()
            .filter(|reminder| {
                !reminder.is_sent() && reminder.fire_at() >= start && reminder.fire_at() < end
            })
            .cloned()
            .collect();
        due.sort_by_key(Reminder::fire_at);
        Ok(due)
    }

    async fn mark_sent(
        &self,
        id: ReminderId,
        sent_at: DateTime<Utc>,
    ) -> ReminderRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let reminder = state
            .get_mut(&id)
            .ok_or(ReminderRepositoryError::NotFound(id))?;
        reminder
            .mark_sent(sent_at)
            .map_err(|_| ReminderRepositoryError::AlreadySent(id))
    }
}
