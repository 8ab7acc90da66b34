//! `PostgreSQL` adapters for reminder persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresReminderRepository;
