//! Reminder scheduling and the periodic dispatch sweep.
//!
//! A task with a qualifying deadline gets exactly one unsent reminder,
//! scheduled one day ahead of the deadline. A daily sweep collects the
//! reminders whose fire time falls inside a bounded window, dispatches a
//! notification for each, and flips them to sent. Dispatch is
//! at-least-once across crashes: delivered-but-unmarked reminders are
//! re-sent on the next run. The module follows hexagonal architecture:
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
