//! `PostgreSQL` adapters for invite persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresInviteRepository;
