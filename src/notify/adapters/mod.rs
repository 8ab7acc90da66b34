//! Adapter implementations for the notifier port.

pub mod log;
pub mod memory;

pub use log::LogNotifier;
pub use memory::RecordingNotifier;
