//! Reminder aggregate root.

use super::{ReminderDomainError, ReminderId};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A scheduled deadline reminder for a single task.
///
/// At most one *unsent* reminder may exist per task at any time; the
/// repository enforces that before insert. Sent reminders are retained
/// as history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    id: ReminderId,
    task_id: TaskId,
    fire_at: DateTime<Utc>,
    sent: bool,
    sent_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReminderData {
    /// Persisted reminder identifier.
    pub id: ReminderId,
    /// Persisted owning task identifier.
    pub task_id: TaskId,
    /// Persisted scheduled fire time.
    pub fire_at: DateTime<Utc>,
    /// Persisted sent flag.
    pub sent: bool,
    /// Persisted dispatch timestamp, if any.
    pub sent_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Reminder {
    /// Schedules a new, unsent reminder.
    #[must_use]
    pub fn schedule(task_id: TaskId, fire_at: DateTime<Utc>, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ReminderId::new(),
            task_id,
            fire_at,
            sent: false,
            sent_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a reminder from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReminderData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            fire_at: data.fire_at,
            sent: data.sent,
            sent_at: data.sent_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the reminder identifier.
    #[must_use]
    pub const fn id(&self) -> ReminderId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the scheduled fire time.
    #[must_use]
    pub const fn fire_at(&self) -> DateTime<Utc> {
        self.fire_at
    }

    /// Returns `true` once the reminder has been dispatched.
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        self.sent
    }

    /// Returns the dispatch timestamp, if dispatched.
    #[must_use]
    pub const fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.sent_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Flips the reminder to sent, exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderDomainError::AlreadySent`] when the reminder was
    /// dispatched before.
    pub fn mark_sent(&mut self, at: DateTime<Utc>) -> Result<(), ReminderDomainError> {
        if self.sent {
            return Err(ReminderDomainError::AlreadySent(self.id));
        }
        self.sent = true;
        self.sent_at = Some(at);
        self.updated_at = at;
        Ok(())
    }
}
