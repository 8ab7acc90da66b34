//! Domain model for deadline reminders.

mod error;
mod ids;
mod reminder;

pub use error::ReminderDomainError;
pub use ids::ReminderId;
pub use reminder::{PersistedReminderData, Reminder};
