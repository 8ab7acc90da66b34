//! Canonical task store and owner-scoped task lifecycle.
//!
//! Tasks are owned exclusively by one user and mutated only through
//! owner-authorized operations. Materialization (copying an accepted
//! suggestion or share invite into a brand new task row) always creates
//! an independent record, never a shared reference, so cross-user
//! mutation hazards cannot arise. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
