//! Log-only notifier adapter.

use async_trait::async_trait;
use tracing::info;

use crate::notify::ports::{Notification, Notifier, NotifyResult};
use crate::notify::templates::MailTemplates;
use crate::user::domain::EmailAddress;

/// Notifier that renders messages and emits them to the log.
///
/// Stands in for a real mail transport in development and single-user
/// deployments; rendering errors surface exactly as they would with a
/// delivering adapter.
pub struct LogNotifier {
    templates: MailTemplates,
}

impl LogNotifier {
    /// Creates a log notifier over a compiled template set.
    #[must_use]
    pub const fn new(templates: MailTemplates) -> Self {
        Self { templates }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        recipient: &EmailAddress,
        notification: &Notification,
    ) -> NotifyResult<()> {
        let mail = self.templates.render(notification)?;
        info!(
            recipient = %recipient,
            kind = ?notification.kind(),
            subject = %mail.subject,
            body_bytes = mail.body_html.len(),
            "notification rendered"
        );
        Ok(())
    }
}
