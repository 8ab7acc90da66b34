//! Error types for reminder domain transitions.

use super::ReminderId;
use thiserror::Error;

/// Errors returned by reminder domain transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReminderDomainError {
    /// The reminder was already dispatched.
    #[error("reminder {0} has already been sent")]
    AlreadySent(ReminderId),
}
