//! `PostgreSQL` adapters for suggestion persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresSuggestionRepository;
