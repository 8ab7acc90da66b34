//! Mail template rendering for outbound notifications.

use crate::notify::ports::{Notification, NotifyError};
use chrono::{DateTime, Utc};
use minijinja::{Environment, context};

const REMINDER_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family:Arial,sans-serif;background:#f4f4f4;margin:0;padding:0">
<div style="max-width:600px;margin:30px auto;background:#fff;border-radius:8px;overflow:hidden">
  <div style="background:#2c3e50;padding:24px 32px;color:#fff">
    <h1 style="margin:0;font-size:22px">Taskloom</h1>
    <p style="margin:6px 0 0;font-size:14px;color:#bdc3c7">Task Deadline Reminder</p>
  </div>
  <div style="padding:32px">
    <p style="font-size:16px;color:#2c3e50">Hi <strong>{{ recipient_name }}</strong>,</p>
    <p style="color:#555;font-size:15px">Your task is due <strong>tomorrow</strong>.</p>
    <div style="background:#f8f9fa;border-left:4px solid #2c3e50;border-radius:4px;padding:20px 24px">
      <p style="font-size:20px;font-weight:bold;color:#2c3e50;margin:0 0 12px">{{ task_name }}</p>
      <p style="font-size:14px;color:#555;margin:0 0 8px">{{ description }}</p>
      <p style="font-size:14px;color:#555;margin:0 0 8px">Priority: {{ priority }}</p>
      <p style="font-size:14px;color:#555;margin:0 0 8px">Status: {{ status }}</p>
      <p style="font-size:14px;color:#555;margin:0">Deadline: {{ deadline }}</p>
    </div>
  </div>
  <div style="background:#f8f9fa;padding:16px 32px;font-size:12px;color:#95a5a6;text-align:center">
    Automated reminder — please do not reply.
  </div>
</div>
</body>
</html>
"#;

const SHARE_INVITE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family:Arial,sans-serif;background:#f4f4f4;margin:0;padding:0">
<div style="max-width:600px;margin:30px auto;background:#fff;border-radius:8px;overflow:hidden">
  <div style="background:#2c3e50;padding:24px 32px;color:#fff">
    <h1 style="margin:0;font-size:22px">Taskloom</h1>
    <p style="margin:6px 0 0;font-size:14px;color:#bdc3c7">Task Share Invitation</p>
  </div>
  <div style="padding:32px">
    <p style="font-size:16px;color:#2c3e50">Hi <strong>{{ recipient_name }}</strong>,</p>
    <p style="font-size:15px;color:#555">{{ sender_name }} ({{ sender_email }}) wants to share a task with you:</p>
    <div style="background:#f8f9fa;border-left:4px solid #2c3e50;border-radius:4px;padding:20px 24px">
      <p style="font-size:18px;font-weight:bold;color:#2c3e50;margin:0 0 14px">{{ task_name }}</p>
      <p style="font-size:14px;color:#555;margin:0 0 10px">{{ description }}</p>
      <p style="font-size:14px;color:#555;margin:0">Deadline: {{ deadline }}</p>
    </div>
    <div style="text-align:center;margin:28px 0">
      <a href="{{ accept_url }}" style="display:inline-block;padding:14px 36px;border-radius:6px;font-size:15px;font-weight:bold;text-decoration:none;margin:0 8px;background:#27ae60;color:#fff">Accept</a>
      <a href="{{ decline_url }}" style="display:inline-block;padding:14px 36px;border-radius:6px;font-size:15px;font-weight:bold;text-decoration:none;margin:0 8px;background:#e74c3c;color:#fff">Decline</a>
    </div>
    <p style="font-size:12px;color:#95a5a6;text-align:center">
      These buttons work directly — no login required.<br>
      You can also respond from the Notifications section in Taskloom.
    </p>
  </div>
  <div style="background:#f8f9fa;padding:16px 32px;font-size:12px;color:#95a5a6;text-align:center">
    Automated message from Taskloom — please do not reply.
  </div>
</div>
</body>
</html>
"#;

const WELCOME_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family:Arial,sans-serif;background:#f4f4f4;margin:0;padding:0">
<div style="max-width:600px;margin:30px auto;background:#fff;border-radius:8px;overflow:hidden">
  <div style="background:#2c3e50;padding:32px;text-align:center;color:#fff">
    <h1 style="margin:0 0 8px">Taskloom</h1>
    <p style="margin:0;color:#bdc3c7">Plan it. Do it.</p>
  </div>
  <div style="padding:36px 32px">
    <p style="font-size:18px;color:#2c3e50">Welcome, <strong>{{ recipient_name }}</strong>!</p>
    <p style="font-size:15px;color:#555;line-height:1.7">
      Create and organize your tasks, set priorities, get deadline
      reminders before it's too late, and share tasks with friends.
    </p>
  </div>
  <div style="background:#f8f9fa;padding:16px 32px;font-size:12px;color:#95a5a6;text-align:center">
    Automated message — please do not reply.
  </div>
</div>
</body>
</html>
"#;

/// A rendered outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    /// Message subject line.
    pub subject: String,
    /// HTML message body.
    pub body_html: String,
}

/// Compiled mail template set.
pub struct MailTemplates {
    env: Environment<'static>,
}

impl MailTemplates {
    /// Compiles the built-in template set.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] when a template fails to compile;
    /// with the built-in sources this indicates a packaging defect.
    pub fn new() -> Result<Self, NotifyError> {
        let mut env = Environment::new();
        env.add_template("task_reminder", REMINDER_TEMPLATE)
            .map_err(template_error)?;
        env.add_template("share_invite", SHARE_INVITE_TEMPLATE)
            .map_err(template_error)?;
        env.add_template("welcome", WELCOME_TEMPLATE)
            .map_err(template_error)?;
        Ok(Self { env })
    }

    /// Renders the subject and HTML body for a notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] when rendering fails.
    pub fn render(&self, notification: &Notification) -> Result<RenderedMail, NotifyError> {
        match notification {
            Notification::TaskReminder {
                recipient_name,
                task_name,
                description,
                priority,
                status,
                deadline,
            } => {
                let body_html = self
                    .env
                    .get_template("task_reminder")
                    .map_err(template_error)?
                    .render(context! {
                        recipient_name,
                        task_name,
                        description,
                        priority => priority.to_string(),
                        status => status.to_string(),
                        deadline => format_deadline(*deadline),
                    })
                    .map_err(template_error)?;
                Ok(RenderedMail {
                    subject: format!("Reminder: \"{task_name}\" is due tomorrow!"),
                    body_html,
                })
            }
            Notification::ShareInvite {
                recipient_name,
                sender_name,
                sender_email,
                task_name,
                description,
                deadline,
                accept_url,
                decline_url,
            } => {
                let body_html = self
                    .env
                    .get_template("share_invite")
                    .map_err(template_error)?
                    .render(context! {
                        recipient_name,
                        sender_name,
                        sender_email,
                        task_name,
                        description,
                        deadline => format_deadline(*deadline),
                        accept_url,
                        decline_url,
                    })
                    .map_err(template_error)?;
                Ok(RenderedMail {
                    subject: format!("{sender_name} shared a task with you on Taskloom"),
                    body_html,
                })
            }
            Notification::Welcome { recipient_name } => {
                let body_html = self
                    .env
                    .get_template("welcome")
                    .map_err(template_error)?
                    .render(context! { recipient_name })
                    .map_err(template_error)?;
                Ok(RenderedMail {
                    subject: "Welcome to Taskloom".to_owned(),
                    body_html,
                })
            }
        }
    }
}

fn template_error(err: minijinja::Error) -> NotifyError {
    NotifyError::Template(err.to_string())
}

fn format_deadline(deadline: Option<DateTime<Utc>>) -> String {
    deadline.map_or_else(
        || "No deadline set".to_owned(),
        |value| value.format("%B %d, %Y at %I:%M %p").to_string(),
    )
}
