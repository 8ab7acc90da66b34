//! Repository port for suggestion persistence and quota counting.

use crate::suggestion::domain::{AcceptanceStatus, Suggestion, SuggestionId};
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for suggestion repository operations.
pub type SuggestionRepositoryResult<T> = Result<T, SuggestionRepositoryError>;

/// Suggestion persistence contract.
#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    /// Stores a new suggestion.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionRepositoryError::DuplicateSuggestion`] when the
    /// id already exists.
    async fn store(&self, suggestion: &Suggestion) -> SuggestionRepositoryResult<()>;

    /// Stores a batch of suggestions as one atomic unit.
    ///
    /// Either every suggestion in the batch becomes visible or none does;
    /// callers never observe a half-written batch.
    async fn store_batch(&self, suggestions: &[Suggestion]) -> SuggestionRepositoryResult<()>;

    /// Finds a suggestion by identifier.
    ///
    /// Returns `None` when the suggestion does not exist.
    async fn find_by_id(&self, id: SuggestionId)
    -> SuggestionRepositoryResult<Option<Suggestion>>;

    /// Returns all suggestions owned by the user.
    async fn find_by_owner(&self, owner: UserId) -> SuggestionRepositoryResult<Vec<Suggestion>>;

    /// Returns the owner's suggestions still awaiting a decision.
    async fn find_pending_by_owner(
        &self,
        owner: UserId,
    ) -> SuggestionRepositoryResult<Vec<Suggestion>>;

    /// Counts the owner's suggestions created within `[start, end)`.
    async fn count_created_in(
        &self,
        owner: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SuggestionRepositoryResult<u64>;

    /// Counts the owner's suggestions whose deadline falls within
    /// `[start, end)`.
    ///
    /// Retained for the legacy quota counting basis; suggestions without
    /// a deadline are never counted here.
    async fn count_deadline_in(
        &self,
        owner: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SuggestionRepositoryResult<u64>;

    /// Persists a terminal resolution, guarded against double-resolve.
    ///
    /// The write commits only when the stored record is still pending;
    /// the guard makes concurrent accept/decline races lose cleanly.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionRepositoryError::NotFound`] when the
    /// suggestion does not exist, or
    /// [`SuggestionRepositoryError::AlreadyResolved`] when a terminal
    /// transition already committed.
    async fn update_resolution(&self, suggestion: &Suggestion) -> SuggestionRepositoryResult<()>;
}

/// Errors returned by suggestion repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SuggestionRepositoryError {
    /// A suggestion with the same identifier already exists.
    #[error("duplicate suggestion identifier: {0}")]
    DuplicateSuggestion(SuggestionId),

    /// The suggestion was not found.
    #[error("suggestion not found: {0}")]
    NotFound(SuggestionId),

    /// A terminal transition already committed for the suggestion.
    #[error("suggestion {id} was already resolved as {current}")]
    AlreadyResolved {
        /// The suggestion identifier.
        id: SuggestionId,
        /// The committed terminal state.
        current: AcceptanceStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SuggestionRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
