//! Diesel row models for reminder persistence.

use super::schema::reminders;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for reminder records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reminders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReminderRow {
    /// Reminder identifier.
    pub id: uuid::Uuid,
    /// Owning task identifier.
    pub task_id: uuid::Uuid,
    /// Scheduled fire time.
    pub fire_at: DateTime<Utc>,
    /// Dispatch flag.
    pub sent: bool,
    /// Dispatch timestamp.
    pub sent_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for reminder records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reminders)]
pub struct NewReminderRow {
    /// Reminder identifier.
    pub id: uuid::Uuid,
    /// Owning task identifier.
    pub task_id: uuid::Uuid,
    /// Scheduled fire time.
    pub fire_at: DateTime<Utc>,
    /// Dispatch flag.
    pub sent: bool,
    /// Dispatch timestamp.
    pub sent_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
