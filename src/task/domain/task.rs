//! Task aggregate root and related lifecycle types.

use super::{ParsePriorityError, ParseTaskStatusError, TaskId, TaskName};
use crate::invite::domain::InviteId;
use crate::suggestion::domain::SuggestionId;
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Can slip without consequence.
    Low,
    /// Ordinary priority; the default when none is given.
    #[default]
    Medium,
    /// Needs attention ahead of everything else.
    High,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    #[default]
    Pending,
    /// Work is under way.
    InProgress,
    /// Work is finished.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance persisted with each task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskOrigin {
    /// Created directly by its owner.
    Manual,
    /// Materialized from an accepted suggestion.
    Suggestion {
        /// Identifier of the originating suggestion.
        suggestion_id: SuggestionId,
    },
    /// Copied from another user's task through an accepted share invite.
    Invite {
        /// Identifier of the originating invite.
        invite_id: InviteId,
    },
}

impl TaskOrigin {
    /// Returns the originating suggestion id for suggestion-born tasks.
    #[must_use]
    pub const fn suggestion_id(&self) -> Option<SuggestionId> {
        match self {
            Self::Suggestion { suggestion_id } => Some(*suggestion_id),
            Self::Manual | Self::Invite { .. } => None,
        }
    }

    /// Returns the originating invite id for invite-born tasks.
    #[must_use]
    pub const fn invite_id(&self) -> Option<InviteId> {
        match self {
            Self::Invite { invite_id } => Some(*invite_id),
            Self::Manual | Self::Suggestion { .. } => None,
        }
    }
}

/// Parameter object for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskParams {
    /// Owning user.
    pub owner: UserId,
    /// Validated task name.
    pub name: TaskName,
    /// Free-text description; may be empty.
    pub description: String,
    /// Optional absolute deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Task priority.
    pub priority: Priority,
}

impl NewTaskParams {
    /// Creates parameters with required fields and defaults elsewhere.
    #[must_use]
    pub fn new(owner: UserId, name: TaskName) -> Self {
        Self {
            owner,
            name,
            description: String::new(),
            deadline: None,
            priority: Priority::default(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: UserId,
    name: TaskName,
    description: String,
    deadline: Option<DateTime<Utc>>,
    priority: Priority,
    status: TaskStatus,
    completed: bool,
    origin: TaskOrigin,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
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
    pub status: TaskStatus,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted provenance.
    pub origin: TaskOrigin,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task with status `Pending` and `completed = false`.
    #[must_use]
    pub fn new(params: NewTaskParams, origin: TaskOrigin, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            owner: params.owner,
            name: params.name,
            description: params.description,
            deadline: params.deadline,
            priority: params.priority,
            status: TaskStatus::Pending,
            completed: false,
            origin,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            name: data.name,
            description: data.description,
            deadline: data.deadline,
            priority: data.priority,
            status: data.status,
            completed: data.completed,
            origin: data.origin,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the task name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the completion flag.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the provenance.
    #[must_use]
    pub const fn origin(&self) -> &TaskOrigin {
        &self.origin
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

    /// Replaces the editable details wholesale.
    pub fn update_details(
        &mut self,
        name: TaskName,
        description: String,
        deadline: Option<DateTime<Utc>>,
        priority: Priority,
        clock: &impl Clock,
    ) {
        self.name = name;
        self.description = description;
        self.deadline = deadline;
        self.priority = priority;
        self.touch(clock);
    }

    /// Sets the lifecycle status.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Sets the priority.
    pub fn set_priority(&mut self, priority: Priority, clock: &impl Clock) {
        self.priority = priority;
        self.touch(clock);
    }

    /// Sets the completion flag.
    ///
    /// Marking a task complete also moves its status to
    /// [`TaskStatus::Completed`]; clearing the flag leaves the status
    /// untouched.
    pub fn set_completed(&mut self, completed: bool, clock: &impl Clock) {
        self.completed = completed;
        if completed {
            self.status = TaskStatus::Completed;
        }
        self.touch(clock);
    }

    /// Copies this task into a brand new record owned by `new_owner`.
    ///
    /// Name, description, deadline, and priority carry over; status resets
    /// to `Pending`, the completion flag clears, and the copy gets a fresh
    /// identifier and timestamps. The source record is untouched.
    #[must_use]
    pub fn copy_to_owner(
        &self,
        new_owner: UserId,
        origin: TaskOrigin,
        clock: &impl Clock,
    ) -> Self {
        let params = NewTaskParams {
            owner: new_owner,
            name: self.name.clone(),
            description: self.description.clone(),
            deadline: self.deadline,
            priority: self.priority,
        };
        Self::new(params, origin, clock)
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
