//! Pure parser for the text generator's free-form reply.
//!
//! The generator is treated as an opaque, occasionally malformed text
//! function. Its reply may arrive wrapped in one or more transport
//! envelopes, fenced as a markdown code block, and surrounded by prose;
//! somewhere inside is a JSON array of candidate tasks. The parser peels
//! those layers deterministically, with no I/O, validates each candidate
//! individually, and fails closed only when *nothing* valid survives:
//! one malformed candidate never sinks the batch, and an empty batch is
//! never silently persisted.

mod candidates;
mod extract;

pub use candidates::{CandidateTask, RejectedCandidate};

use thiserror::Error;

/// Parse outcome: surviving candidates plus the rejects with reasons.
///
/// Rejects are returned rather than logged so the caller owns the
/// logging policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSuggestions {
    /// Candidates that passed validation, in reply order.
    pub candidates: Vec<CandidateTask>,
    /// Candidates dropped during validation, with reasons.
    pub rejected: Vec<RejectedCandidate>,
}

/// Errors that fail the entire parse.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SuggestionParseError {
    /// No candidate JSON array was found in the reply.
    #[error("generator reply contains no candidate payload")]
    MissingPayload,

    /// The candidate payload was found but is not a JSON array.
    #[error("candidate payload is not a JSON array: {0}")]
    MalformedPayload(String),

    /// Every candidate in the payload failed validation.
    #[error("no valid candidates in generator reply ({rejected} rejected)")]
    NoValidCandidates {
        /// How many candidates were rejected.
        rejected: usize,
    },
}

/// Parses a raw generator reply into validated candidate tasks.
///
/// # Errors
///
/// Returns [`SuggestionParseError`] when no candidate payload can be
/// located, the payload is not a JSON array, or zero candidates survive
/// validation.
pub fn parse(raw: &str) -> Result<ParsedSuggestions, SuggestionParseError> {
    let payload = extract::candidate_payload(raw).ok_or(SuggestionParseError::MissingPayload)?;

    let elements: Vec<serde_json::Value> = serde_json::from_str(&payload)
        .map_err(|err| SuggestionParseError::MalformedPayload(err.to_string()))?;

    let mut candidates = Vec::new();
    let mut rejected = Vec::new();
    for (index, element) in elements.into_iter().enumerate() {
        match candidates::validate(index, element) {
            Ok(candidate) => candidates.push(candidate),
            Err(reject) => rejected.push(reject),
        }
    }

    if candidates.is_empty() {
        return Err(SuggestionParseError::NoValidCandidates {
            rejected: rejected.len(),
        });
    }

    Ok(ParsedSuggestions {
        candidates,
        rejected,
    })
}
