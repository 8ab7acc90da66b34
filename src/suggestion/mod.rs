//! Generator-backed suggestion engine, parser, and quota tracker.
//!
//! Suggestions are candidate tasks produced by an external text
//! generator from a user prompt. Generation is quota-gated per calendar
//! month, the generator's free-form reply goes through a pure,
//! fail-closed parser, and each persisted suggestion then awaits a
//! single accept or decline decision. Accepting materializes the
//! suggestion into a real task and schedules its reminder. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - The pure reply parser in [`parser`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod parser;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
