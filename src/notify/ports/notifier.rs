//! Notifier port and notification payloads.

use crate::task::domain::{Priority, TaskStatus};
use crate::user::domain::EmailAddress;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for notifier operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Template kind of an outbound notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Deadline reminder for the task owner.
    TaskReminder,
    /// Share invite carrying accept/decline action links.
    ShareInvite,
    /// Welcome message for a new user.
    Welcome,
}

/// Outbound notification payload, one variant per template kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Deadline reminder for the task owner.
    TaskReminder {
        /// Recipient display name.
        recipient_name: String,
        /// Name of the due task.
        task_name: String,
        /// Task description.
        description: String,
        /// Task priority.
        priority: Priority,
        /// Task lifecycle status.
        status: TaskStatus,
        /// Task deadline, if any.
        deadline: Option<DateTime<Utc>>,
    },
    /// Share invite with enough detail to judge it without logging in.
    ShareInvite {
        /// Recipient display name.
        recipient_name: String,
        /// Sender display name.
        sender_name: String,
        /// Sender email address.
        sender_email: String,
        /// Name of the shared task.
        task_name: String,
        /// Task description.
        description: String,
        /// Task deadline, if any.
        deadline: Option<DateTime<Utc>>,
        /// Unauthenticated accept link.
        accept_url: String,
        /// Unauthenticated decline link.
        decline_url: String,
    },
    /// Welcome message for a new user.
    Welcome {
        /// Recipient display name.
        recipient_name: String,
    },
}

impl Notification {
    /// Returns the template kind of this notification.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Self::TaskReminder { .. } => NotificationKind::TaskReminder,
            Self::ShareInvite { .. } => NotificationKind::ShareInvite,
            Self::Welcome { .. } => NotificationKind::Welcome,
        }
    }
}

/// Outbound notification contract.
///
/// Implementations deliver best-effort; callers log errors and move on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a notification to the recipient address.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when rendering or delivery fails.
    async fn send(
        &self,
        recipient: &EmailAddress,
        notification: &Notification,
    ) -> NotifyResult<()>;
}

/// Errors returned by notifier implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    /// Template rendering failed.
    #[error("template rendering failed: {0}")]
    Template(String),

    /// Delivery failed.
    #[error("notification delivery failed: {0}")]
    Transport(String),
}
