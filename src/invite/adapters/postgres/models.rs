//! Diesel row models for invite persistence.

use super::schema::task_share_invites;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for invite records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_share_invites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InviteRow {
    /// Invite identifier.
    pub id: uuid::Uuid,
    /// Sharing user identifier.
    pub sender_id: uuid::Uuid,
    /// Receiving user identifier.
    pub receiver_id: uuid::Uuid,
    /// Shared task identifier.
    pub task_id: uuid::Uuid,
    /// Invite status.
    pub status: String,
    /// Unique opaque token.
    pub token: String,
    /// Response timestamp.
    pub responded_at: Option<DateTime<Utc>>,
    /// Receiver-side task copy.
    pub shared_task_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for invite records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_share_invites)]
pub struct NewInviteRow {
    /// Invite identifier.
    pub id: uuid::Uuid,
    /// Sharing user identifier.
    pub sender_id: uuid::Uuid,
    /// Receiving user identifier.
    pub receiver_id: uuid::Uuid,
    /// Shared task identifier.
    pub task_id: uuid::Uuid,
    /// Invite status.
    pub status: String,
    /// Unique opaque token.
    pub token: String,
    /// Response timestamp.
    pub responded_at: Option<DateTime<Utc>>,
    /// Receiver-side task copy.
    pub shared_task_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
