//! Port contracts for invite persistence.

pub mod repository;

pub use repository::{InviteRepository, InviteRepositoryError, InviteRepositoryResult};
