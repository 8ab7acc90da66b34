//! Suggestion aggregate root and acceptance state machine.

use super::{ParseAcceptanceStatusError, SuggestionDomainError, SuggestionId};
use crate::task::domain::{NewTaskParams, Priority, Task, TaskId, TaskName, TaskOrigin, TaskStatus};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Acceptance state of a suggestion.
///
/// `Pending` transitions to exactly one of the terminal states; any
/// further transition attempt is a conflict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptanceStatus {
    /// Awaiting the owner's decision.
    #[default]
    Pending,
    /// Accepted and materialized into a task. Terminal.
    Accepted,
    /// Declined by the owner. Terminal.
    Declined,
}

impl AcceptanceStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    /// Returns `true` for the terminal states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Declined)
    }
}

impl TryFrom<&str> for AcceptanceStatus {
    type Error = ParseAcceptanceStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            _ => Err(ParseAcceptanceStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for AcceptanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter object for persisting a freshly parsed candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSuggestionParams {
    /// Owning user.
    pub owner: UserId,
    /// Candidate task name.
    pub name: TaskName,
    /// Candidate description.
    pub description: String,
    /// Candidate deadline, if any.
    pub deadline: Option<DateTime<Utc>>,
    /// Candidate priority.
    pub priority: Priority,
    /// Raw generator response, retained verbatim for audit.
    pub raw_response: String,
    /// Identifier of the generator that produced the response.
    pub generator: String,
}

/// Suggestion aggregate root.
///
/// Invariants: an `Accepted` suggestion always references the
/// materialized task; a `Declined` one never does. Both invariants are
/// upheld by construction; the only mutators are [`Suggestion::accept`]
/// and [`Suggestion::decline`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    id: SuggestionId,
    owner: UserId,
    name: TaskName,
    description: String,
    deadline: Option<DateTime<Utc>>,
    priority: Priority,
    lifecycle: TaskStatus,
    acceptance: AcceptanceStatus,
    accepted_task: Option<TaskId>,
    raw_response: String,
    generator: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    responded_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSuggestionData {
    /// Persisted suggestion identifier.
    pub id: SuggestionId,
    /// Persisted owner.
    pub owner: UserId,
    /// Persisted name.
    pub name: TaskName,
    /// Persisted description.
    pub description: String,
    /// Persisted deadline, if any.
    pub deadline: Option<DateTime<Utc>>,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted lifecycle status.
    pub lifecycle: TaskStatus,
    /// Persisted acceptance state.
    pub acceptance: AcceptanceStatus,
    /// Persisted materialized-task reference, if any.
    pub accepted_task: Option<TaskId>,
    /// Persisted raw generator response.
    pub raw_response: String,
    /// Persisted generator identifier.
    pub generator: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted response timestamp, if resolved.
    pub responded_at: Option<DateTime<Utc>>,
}

impl Suggestion {
    /// Creates a new pending suggestion.
    #[must_use]
    pub fn new(params: NewSuggestionParams, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: SuggestionId::new(),
            owner: params.owner,
            name: params.name,
            description: params.description,
            deadline: params.deadline,
            priority: params.priority,
            lifecycle: TaskStatus::Pending,
            acceptance: AcceptanceStatus::Pending,
            accepted_task: None,
            raw_response: params.raw_response,
            generator: params.generator,
            created_at: timestamp,
            updated_at: timestamp,
            responded_at: None,
        }
    }

    /// Reconstructs a suggestion from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSuggestionData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            name: data.name,
            description: data.description,
            deadline: data.deadline,
            priority: data.priority,
            lifecycle: data.lifecycle,
            acceptance: data.acceptance,
            accepted_task: data.accepted_task,
            raw_response: data.raw_response,
            generator: data.generator,
            created_at: data.created_at,
            updated_at: data.updated_at,
            responded_at: data.responded_at,
        }
    }

    /// Returns the suggestion identifier.
    #[must_use]
    pub const fn id(&self) -> SuggestionId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the candidate task name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the candidate description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the candidate deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the candidate priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the lifecycle status, independent of acceptance.
    #[must_use]
    pub const fn lifecycle(&self) -> TaskStatus {
        self.lifecycle
    }

    /// Returns the acceptance state.
    #[must_use]
    pub const fn acceptance(&self) -> AcceptanceStatus {
        self.acceptance
    }

    /// Returns the materialized-task reference, set only on acceptance.
    #[must_use]
    pub const fn accepted_task(&self) -> Option<TaskId> {
        self.accepted_task
    }

    /// Returns the raw generator response retained for audit.
    #[must_use]
    pub fn raw_response(&self) -> &str {
        &self.raw_response
    }

    /// Returns the generator identifier.
    #[must_use]
    pub fn generator(&self) -> &str {
        &self.generator
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the response timestamp, if resolved.
    #[must_use]
    pub const fn responded_at(&self) -> Option<DateTime<Utc>> {
        self.responded_at
    }

    /// Returns `true` while the suggestion awaits a decision.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.acceptance, AcceptanceStatus::Pending)
    }

    /// Builds the task this suggestion materializes into.
    ///
    /// The task carries the suggestion's fields with status `Pending` and
    /// `completed = false`, and records this suggestion as provenance.
    #[must_use]
    pub fn materialize(&self, clock: &impl Clock) -> Task {
        let params = NewTaskParams {
            owner: self.owner,
            name: self.name.clone(),
            description: self.description.clone(),
            deadline: self.deadline,
            priority: self.priority,
        };
        Task::new(
            params,
            TaskOrigin::Suggestion {
                suggestion_id: self.id,
            },
            clock,
        )
    }

    /// Flips the suggestion to `Accepted`, recording the materialized
    /// task and a response stamp.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionDomainError::AlreadyResolved`] when the
    /// suggestion already reached a terminal state.
    pub fn accept(&mut self, task: TaskId, clock: &impl Clock) -> Result<(), SuggestionDomainError> {
        self.ensure_pending()?;
        let timestamp = clock.utc();
        self.acceptance = AcceptanceStatus::Accepted;
        self.accepted_task = Some(task);
        self.responded_at = Some(timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    /// Flips the suggestion to `Declined` with a response stamp.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionDomainError::AlreadyResolved`] when the
    /// suggestion already reached a terminal state.
    pub fn decline(&mut self, clock: &impl Clock) -> Result<(), SuggestionDomainError> {
        self.ensure_pending()?;
        let timestamp = clock.utc();
        self.acceptance = AcceptanceStatus::Declined;
        self.responded_at = Some(timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    const fn ensure_pending(&self) -> Result<(), SuggestionDomainError> {
        if self.acceptance.is_terminal() {
            return Err(SuggestionDomainError::AlreadyResolved {
                id: self.id,
                current: self.acceptance,
            });
        }
        Ok(())
    }
}
