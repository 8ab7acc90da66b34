//! Error types for invite domain transitions and parsing.

use super::{InviteId, InviteStatus};
use thiserror::Error;

/// Errors returned by invite domain transitions and validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InviteDomainError {
    /// The invite already reached a terminal state.
    #[error("invite {id} was already resolved as {current}")]
    AlreadyResolved {
        /// The invite identifier.
        id: InviteId,
        /// The terminal state recorded by the first resolution.
        current: InviteStatus,
    },

    /// The token value is structurally invalid.
    #[error("invite token is empty or contains whitespace")]
    InvalidToken,
}

/// Error returned while parsing invite statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown invite status: {0}")]
pub struct ParseInviteStatusError(pub String);
