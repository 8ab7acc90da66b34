//! Payload extraction: envelope unwrapping, fence stripping, and array
//! location.

use serde::Deserialize;

/// Transport envelopes keep nesting shallow in practice; the bound only
/// guards against a pathological self-referential reply.
const MAX_ENVELOPE_DEPTH: usize = 4;

/// Gemini-style completion envelope: `candidates[0].content.parts[*].text`.
#[derive(Debug, Deserialize)]
struct CompletionEnvelope {
    candidates: Vec<EnvelopeCandidate>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeCandidate {
    content: EnvelopeContent,
}

#[derive(Debug, Deserialize)]
struct EnvelopeContent {
    parts: Vec<EnvelopePart>,
}

#[derive(Debug, Deserialize)]
struct EnvelopePart {
    text: String,
}

/// Ollama-style envelope: `{"response": "..."}`.
#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    response: String,
}

/// Locates the candidate JSON array inside a raw generator reply.
///
/// Peels transport envelopes (possibly nested), strips a surrounding
/// markdown fence, and slices from the first `[` to the last `]` so
/// surrounding prose is tolerated. Returns `None` when no array-shaped
/// payload exists.
pub(super) fn candidate_payload(raw: &str) -> Option<String> {
    let unwrapped = unwrap_envelopes(raw);
    let stripped = strip_fence(unwrapped.trim());
    locate_array(stripped).map(str::to_owned)
}

fn unwrap_envelopes(raw: &str) -> String {
    let mut current = raw.trim().to_owned();
    for _ in 0..MAX_ENVELOPE_DEPTH {
        let Some(inner) = unwrap_one(&current) else {
            break;
        };
        current = inner;
    }
    current
}

fn unwrap_one(text: &str) -> Option<String> {
    if let Ok(envelope) = serde_json::from_str::<CompletionEnvelope>(text) {
        let joined: String = envelope
            .candidates
            .first()?
            .content
            .parts
            .iter()
            .map(|part| part.text.as_str())
            .collect();
        return Some(joined);
    }
    if let Ok(envelope) = serde_json::from_str::<ResponseEnvelope>(text) {
        return Some(envelope.response);
    }
    None
}

/// Strips a single surrounding markdown fence, tolerating a language tag
/// on the opening line.
fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag (e.g. ```json) up to the first newline.
    let body = match rest.find('\n') {
        Some(newline) => rest.get(newline + 1..).unwrap_or(""),
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn locate_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    text.get(start..=end)
}
