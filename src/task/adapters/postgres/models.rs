//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub owner_id: uuid::Uuid,
    /// Task name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Optional absolute deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Task priority.
    pub priority: String,
    /// Lifecycle status.
    pub status: String,
    /// Completion flag.
    pub completed: bool,
    /// Provenance payload.
    pub origin: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub owner_id: uuid::Uuid,
    /// Task name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Optional absolute deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Task priority.
    pub priority: String,
    /// Lifecycle status.
    pub status: String,
    /// Completion flag.
    pub completed: bool,
    /// Provenance payload.
    pub origin: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied on task updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Optional absolute deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Task priority.
    pub priority: String,
    /// Lifecycle status.
    pub status: String,
    /// Completion flag.
    pub completed: bool,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
