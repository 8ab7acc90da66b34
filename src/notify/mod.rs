//! Outbound notification port and mail templates.
//!
//! The workflow engines treat notification delivery as fire-and-forget:
//! a send failure is logged by the caller and never rolled back into a
//! state machine. The actual transport (SMTP, push, …) lives outside
//! this crate behind the [`ports::Notifier`] contract; this module ships
//! the template rendering and two in-process adapters.

pub mod adapters;
pub mod ports;
pub mod templates;

#[cfg(test)]
mod tests;
