//! Per-candidate validation rules.

use crate::task::domain::{Priority, TaskName};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

/// A candidate task that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTask {
    /// Validated, non-empty name.
    pub name: TaskName,
    /// Description; empty when the generator gave none.
    pub description: String,
    /// Absolute deadline.
    pub deadline: DateTime<Utc>,
    /// Priority; defaults to medium when absent or unparseable.
    pub priority: Priority,
}

/// A candidate dropped during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedCandidate {
    /// Zero-based position in the reply array.
    pub index: usize,
    /// Human-readable rejection reason.
    pub reason: String,
}

/// Raw candidate as deserialized from the reply array, tolerant of the
/// field spellings generators actually produce.
#[derive(Debug, Deserialize)]
struct RawCandidate {
    #[serde(alias = "task_name", alias = "taskName", alias = "title")]
    name: Option<String>,
    #[serde(alias = "task_description", alias = "taskDescription", default)]
    description: Option<String>,
    #[serde(
        alias = "task_deadline",
        alias = "taskDeadline",
        alias = "due_date",
        alias = "dueDate"
    )]
    deadline: Option<String>,
    #[serde(default)]
    priority: Option<String>,
}

/// Validates one element of the reply array.
pub(super) fn validate(
    index: usize,
    element: serde_json::Value,
) -> Result<CandidateTask, RejectedCandidate> {
    let raw: RawCandidate = serde_json::from_value(element).map_err(|err| RejectedCandidate {
        index,
        reason: format!("not a candidate object: {err}"),
    })?;

    let name = raw
        .name
        .as_deref()
        .map(TaskName::new)
        .transpose()
        .ok()
        .flatten()
        .ok_or_else(|| RejectedCandidate {
            index,
            reason: "missing or empty name".to_owned(),
        })?;

    let deadline_text = raw.deadline.as_deref().ok_or_else(|| RejectedCandidate {
        index,
        reason: "missing deadline".to_owned(),
    })?;
    let deadline = parse_deadline(deadline_text).ok_or_else(|| RejectedCandidate {
        index,
        reason: format!("unparseable deadline '{deadline_text}'"),
    })?;

    let priority = raw
        .priority
        .as_deref()
        .and_then(|value| Priority::try_from(value).ok())
        .unwrap_or_default();

    Ok(CandidateTask {
        name,
        description: raw.description.unwrap_or_default(),
        deadline,
        priority,
    })
}

/// Parses the deadline spellings generators actually emit: RFC 3339,
/// naive date-times (taken as UTC), and bare dates (taken as end of
/// day).
fn parse_deadline(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed.and_utc());
        }
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return parsed.and_hms_opt(23, 59, 59).map(|dt| dt.and_utc());
    }
    None
}
