//! Recording notifier for tests and local inspection.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::notify::ports::{Notification, Notifier, NotifyError, NotifyResult};
use crate::user::domain::EmailAddress;

/// Notifier that records every send instead of delivering.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(EmailAddress, Notification)>>>,
}

impl RecordingNotifier {
    /// Creates an empty recording notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded send, in order.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Transport`] when the record lock is
    /// poisoned.
    pub fn sent(&self) -> NotifyResult<Vec<(EmailAddress, Notification)>> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .map_err(|err| NotifyError::Transport(err.to_string()))
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        recipient: &EmailAddress,
        notification: &Notification,
    ) -> NotifyResult<()> {
        self.sent
            .lock()
            .map_err(|err| NotifyError::Transport(err.to_string()))?
            .push((recipient.clone(), notification.clone()));
        Ok(())
    }
}
