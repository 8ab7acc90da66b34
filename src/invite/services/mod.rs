//! Application services for the invite protocol.

mod engine;

pub use engine::{
    InviteEngine, InviteEngineError, InviteEngineResult, InviteLinkConfig, ShareOutcome,
    SkippedShare,
};
