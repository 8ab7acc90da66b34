//! Repository port for invite persistence and projections.

use crate::invite::domain::{InviteId, InviteStatus, InviteToken, TaskShareInvite};
use crate::task::domain::TaskId;
use crate::user::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for invite repository operations.
pub type InviteRepositoryResult<T> = Result<T, InviteRepositoryError>;

/// Invite persistence contract.
#[async_trait]
pub trait InviteRepository: Send + Sync {
    /// Stores a new invite.
    ///
    /// # Errors
    ///
    /// Returns [`InviteRepositoryError::DuplicateInvite`] when the id
    /// already exists, or [`InviteRepositoryError::DuplicateToken`] when
    /// the token is already in use.
    async fn store(&self, invite: &TaskShareInvite) -> InviteRepositoryResult<()>;

    /// Finds an invite by its opaque token.
    ///
    /// Returns `None` when no invite matches. Reads never consume the
    /// token; only the guarded resolution does.
    async fn find_by_token(
        &self,
        token: &InviteToken,
    ) -> InviteRepositoryResult<Option<TaskShareInvite>>;

    /// Returns `true` when a pending invite exists for the exact
    /// (receiver, task) pair.
    async fn has_pending_for(
        &self,
        receiver: UserId,
        task_id: TaskId,
    ) -> InviteRepositoryResult<bool>;

    /// Returns the receiver's pending invites.
    async fn find_pending_by_receiver(
        &self,
        receiver: UserId,
    ) -> InviteRepositoryResult<Vec<TaskShareInvite>>;

    /// Returns every invite ever received by the user.
    async fn find_by_receiver(
        &self,
        receiver: UserId,
    ) -> InviteRepositoryResult<Vec<TaskShareInvite>>;

    /// Returns every invite ever sent by the user.
    async fn find_by_sender(
        &self,
        sender: UserId,
    ) -> InviteRepositoryResult<Vec<TaskShareInvite>>;

    /// Counts the receiver's pending invites.
    async fn count_pending_by_receiver(&self, receiver: UserId) -> InviteRepositoryResult<u64>;

    /// Persists a terminal resolution, guarded against double-resolve.
    ///
    /// The write commits only when the stored record is still pending;
    /// the guard makes the invite token single-use for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`InviteRepositoryError::NotFound`] when the invite does
    /// not exist, or [`InviteRepositoryError::AlreadyResolved`] when a
    /// terminal transition already committed.
    async fn update_resolution(&self, invite: &TaskShareInvite) -> InviteRepositoryResult<()>;
}

/// Errors returned by invite repository implementations.
#[derive(Debug, Clone, Error)]
pub enum InviteRepositoryError {
    /// An invite with the same identifier already exists.
    #[error("duplicate invite identifier: {0}")]
    DuplicateInvite(InviteId),

    /// An invite with the same token already exists.
    #[error("duplicate invite token")]
    DuplicateToken,

    /// The invite was not found.
    #[error("invite not found: {0}")]
    NotFound(InviteId),

    /// A terminal transition already committed for the invite.
    #[error("invite {id} was already resolved as {current}")]
    AlreadyResolved {
        /// The invite identifier.
        id: InviteId,
        /// The committed terminal state.
        current: InviteStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl InviteRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
