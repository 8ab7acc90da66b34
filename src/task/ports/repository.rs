//! Repository port for task persistence and owner-scoped queries.

use crate::task::domain::{Priority, Task, TaskId, TaskStatus};
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Owner-scoped secondary-index filter.
///
/// All criteria are conjunctive; an empty filter matches every task of
/// the owner. The deadline bounds form the half-open range
/// `[due_after, due_before)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Match tasks with this priority.
    pub priority: Option<Priority>,
    /// Match tasks with this lifecycle status.
    pub status: Option<TaskStatus>,
    /// Match tasks with this completion flag.
    pub completed: Option<bool>,
    /// Match tasks whose deadline is at or after this instant.
    pub due_after: Option<DateTime<Utc>>,
    /// Match tasks whose deadline is before this instant.
    pub due_before: Option<DateTime<Utc>>,
}

impl TaskFilter {
    /// Creates an empty filter matching all of an owner's tasks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to a priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts to a lifecycle status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to a completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Restricts to deadlines within `[start, end)`.
    ///
    /// Tasks without a deadline never match a date-bounded filter.
    #[must_use]
    pub const fn with_due_between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.due_after = Some(start);
        self.due_before = Some(end);
        self
    }

    /// Returns `true` when the task satisfies every criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if self.priority.is_some_and(|p| task.priority() != p) {
            return false;
        }
        if self.status.is_some_and(|s| task.status() != s) {
            return false;
        }
        if self.completed.is_some_and(|c| task.is_completed() != c) {
            return false;
        }
        if let Some(start) = self.due_after {
            match task.deadline() {
                Some(deadline) if deadline >= start => {}
                _ => return false,
            }
        }
        if let Some(end) = self.due_before {
            match task.deadline() {
                Some(deadline) if deadline < end => {}
                _ => return false,
            }
        }
        true
    }
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns all tasks owned by the given user.
    async fn find_by_owner(&self, owner: UserId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the owner's tasks matching the given filter.
    async fn find_by_owner_filtered(
        &self,
        owner: UserId,
        filter: &TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
