//! Port contracts for user lookup.

pub mod repository;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
