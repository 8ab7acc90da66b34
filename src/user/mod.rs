//! User lookup collaborator.
//!
//! Authentication, registration, and profile management live outside this
//! crate; the workflow engines only need to resolve a user id to a
//! notification address and display name, and to verify that a referenced
//! user exists. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
