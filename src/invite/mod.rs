//! Task-sharing invites with single-use opaque tokens.
//!
//! Sharing never shares the underlying row: an accepted invite copies
//! the task into the receiver's own space. Each invite carries a
//! globally unique, unguessable token that authorizes exactly one
//! accept/decline transition, reachable both from an unauthenticated
//! mailed link and from an authenticated in-app action, with identical
//! behaviour. The module follows hexagonal architecture:
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
