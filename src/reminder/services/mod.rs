//! Application services for reminder scheduling and dispatch.

mod engine;
mod sweep;

pub use engine::{ReminderEngine, ReminderEngineError, ReminderEngineResult};
pub use sweep::{ReminderSweep, SweepConfig, SweepError, SweepReport, next_run_after, spawn_daily};
