//! Domain model for generator-backed suggestions.

mod error;
mod ids;
mod suggestion;

pub use error::{ParseAcceptanceStatusError, SuggestionDomainError};
pub use ids::SuggestionId;
pub use suggestion::{
    AcceptanceStatus, NewSuggestionParams, PersistedSuggestionData, Suggestion,
};
