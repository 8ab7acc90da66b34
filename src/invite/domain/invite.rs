//! Task-share invite aggregate root and status state machine.

use super::{InviteDomainError, InviteId, InviteToken, ParseInviteStatusError};
use crate::task::domain::TaskId;
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Invite state.
///
/// `Pending` transitions to exactly one of the terminal states; any
/// further transition attempt is a conflict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteStatus {
    /// Awaiting the receiver's decision.
    #[default]
    Pending,
    /// Accepted; the task was copied into the receiver's space. Terminal.
    Accepted,
    /// Declined by the receiver. Terminal.
    Declined,
}

impl InviteStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    /// Returns `true` for the terminal states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Declined)
    }
}

impl TryFrom<&str> for InviteStatus {
    type Error = ParseInviteStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            _ => Err(ParseInviteStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter object for issuing a new invite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInviteParams {
    /// User sharing the task.
    pub sender: UserId,
    /// User receiving the invite.
    pub receiver: UserId,
    /// The sender's original task being shared.
    pub task_id: TaskId,
    /// Freshly generated opaque token.
    pub token: InviteToken,
}

/// Task-share invite aggregate root.
///
/// The referenced task remains the sender's untouched original; an
/// accepted invite records the *copy* created in the receiver's space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskShareInvite {
    id: InviteId,
    sender: UserId,
    receiver: UserId,
    task_id: TaskId,
    status: InviteStatus,
    token: InviteToken,
    responded_at: Option<DateTime<Utc>>,
    shared_task: Option<TaskId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted invite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedInviteData {
    /// Persisted invite identifier.
    pub id: InviteId,
    /// Persisted sender.
    pub sender: UserId,
    /// Persisted receiver.
    pub receiver: UserId,
    /// Persisted shared-task reference.
    pub task_id: TaskId,
    /// Persisted status.
    pub status: InviteStatus,
    /// Persisted token.
    pub token: InviteToken,
    /// Persisted response timestamp, if resolved.
    pub responded_at: Option<DateTime<Utc>>,
    /// Persisted reference to the receiver-side copy, if accepted.
    pub shared_task: Option<TaskId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TaskShareInvite {
    /// Issues a new pending invite.
    #[must_use]
    pub fn new(params: NewInviteParams, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: InviteId::new(),
            sender: params.sender,
            receiver: params.receiver,
            task_id: params.task_id,
            status: InviteStatus::Pending,
            token: params.token,
            responded_at: None,
            shared_task: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an invite from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedInviteData) -> Self {
        Self {
            id: data.id,
            sender: data.sender,
            receiver: data.receiver,
            task_id: data.task_id,
            status: data.status,
            token: data.token,
            responded_at: data.responded_at,
            shared_task: data.shared_task,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the invite identifier.
    #[must_use]
    pub const fn id(&self) -> InviteId {
        self.id
    }

    /// Returns the sharing user.
    #[must_use]
    pub const fn sender(&self) -> UserId {
        self.sender
    }

    /// Returns the receiving user.
    #[must_use]
    pub const fn receiver(&self) -> UserId {
        self.receiver
    }

    /// Returns the sender's original task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the invite status.
    #[must_use]
    pub const fn status(&self) -> InviteStatus {
        self.status
    }

    /// Returns the opaque token.
    #[must_use]
    pub const fn token(&self) -> &InviteToken {
        &self.token
    }

    /// Returns the response timestamp, if resolved.
    #[must_use]
    pub const fn responded_at(&self) -> Option<DateTime<Utc>> {
        self.responded_at
    }

    /// Returns the receiver-side task copy, set only on acceptance.
    #[must_use]
    pub const fn shared_task(&self) -> Option<TaskId> {
        self.shared_task
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

    /// Returns `true` while the invite awaits a decision.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, InviteStatus::Pending)
    }

    /// Flips the invite to `Accepted`, recording the receiver-side copy
    /// and a response stamp.
    ///
    /// # Errors
    ///
    /// Returns [`InviteDomainError::AlreadyResolved`] when the invite
    /// already reached a terminal state.
    pub fn accept(
        &mut self,
        shared_task: TaskId,
        clock: &impl Clock,
    ) -> Result<(), InviteDomainError> {
        self.ensure_pending()?;
        let timestamp = clock.utc();
        self.status = InviteStatus::Accepted;
        self.shared_task = Some(shared_task);
        self.responded_at = Some(timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    /// Flips the invite to `Declined` with a response stamp.
    ///
    /// # Errors
    ///
    /// Returns [`InviteDomainError::AlreadyResolved`] when the invite
    /// already reached a terminal state.
    pub fn decline(&mut self, clock: &impl Clock) -> Result<(), InviteDomainError> {
        self.ensure_pending()?;
        let timestamp = clock.utc();
        self.status = InviteStatus::Declined;
        self.responded_at = Some(timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    const fn ensure_pending(&self) -> Result<(), InviteDomainError> {
        if self.status.is_terminal() {
            return Err(InviteDomainError::AlreadyResolved {
                id: self.id,
                current: self.status,
            });
        }
        Ok(())
    }
}
