//! Error types for suggestion domain transitions and parsing.

use super::{AcceptanceStatus, SuggestionId};
use thiserror::Error;

/// Errors returned by suggestion domain transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SuggestionDomainError {
    /// The suggestion already reached a terminal acceptance state.
    #[error("suggestion {id} was already resolved as {current}")]
    AlreadyResolved {
        /// The suggestion identifier.
        id: SuggestionId,
        /// The terminal state recorded by the first resolution.
        current: AcceptanceStatus,
    },
}

/// Error returned while parsing acceptance statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown acceptance status: {0}")]
pub struct ParseAcceptanceStatusError(pub String);
