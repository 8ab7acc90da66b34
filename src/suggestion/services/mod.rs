//! Application services for suggestion generation and resolution.

mod engine;
mod quota;

pub use engine::{
    AcceptedBatch, BatchFailure, GeneratedSuggestions, GenerationFailure, SuggestionAnalytics,
    SuggestionEngine, SuggestionEngineError, SuggestionEngineResult, build_prompt,
};
pub use quota::{QuotaBasis, QuotaConfig, QuotaStatus, QuotaTracker, month_window};
