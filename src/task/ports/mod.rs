//! Port contracts for the task store.
//!
//! Ports define infrastructure-agnostic interfaces used by the workflow
//! engines.

pub mod repository;

pub use repository::{TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
