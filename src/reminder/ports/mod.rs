//! Port contracts for reminder persistence.

pub mod repository;

pub use repository::{ReminderRepository, ReminderRepositoryError, ReminderRepositoryResult};
