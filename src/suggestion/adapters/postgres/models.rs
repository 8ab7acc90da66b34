//! Diesel row models for suggestion persistence.

use super::schema::suggestions;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for suggestion records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = suggestions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SuggestionRow {
    /// Suggestion identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub owner_id: uuid::Uuid,
    /// Candidate task name.
    pub name: String,
    /// Candidate description.
    pub description: String,
    /// Candidate deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Candidate priority.
    pub priority: String,
    /// Lifecycle status.
    pub lifecycle_status: String,
    /// Acceptance state.
    pub acceptance_status: String,
    /// Materialized task reference.
    pub accepted_task_id: Option<uuid::Uuid>,
    /// Raw generator response.
    pub raw_response: String,
    /// Generator identifier.
    pub generator: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Response timestamp.
    pub responded_at: Option<DateTime<Utc>>,
}

/// Insert model for suggestion records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = suggestions)]
pub struct NewSuggestionRow {
    /// Suggestion identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub owner_id: uuid::Uuid,
    /// Candidate task name.
    pub name: String,
    /// Candidate description.
    pub description: String,
    /// Candidate deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Candidate priority.
    pub priority: String,
    /// Lifecycle status.
    pub lifecycle_status: String,
    /// Acceptance state.
    pub acceptance_status: String,
    /// Materialized task reference.
    pub accepted_task_id: Option<uuid::Uuid>,
    /// Raw generator response.
    pub raw_response: String,
    /// Generator identifier.
    pub generator: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Response timestamp.
    pub responded_at: Option<DateTime<Utc>>,
}
