//! Service layer for owner-scoped task CRUD with reminder lifecycle hooks.

use crate::reminder::services::ReminderEngine;
use crate::task::{
    domain::{NewTaskParams, Priority, Task, TaskDomainError, TaskId, TaskName, TaskOrigin,
        TaskStatus},
    ports::{TaskFilter, TaskRepository, TaskRepositoryError},
};
use crate::user::{
    domain::UserId,
    ports::{UserRepository, UserRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    owner: UserId,
    name: String,
    description: String,
    deadline: Option<DateTime<Utc>>,
    priority: Priority,
}

impl CreateTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(owner: UserId, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
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

/// Request payload replacing a task's editable details wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    /// New task name.
    pub name: String,
    /// New description.
    pub description: String,
    /// New deadline; `None` clears any existing deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// New priority.
    pub priority: Priority,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// The acting or owning user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The acting user does not own the referenced task.
    #[error("user {user} does not own task {task}")]
    Unauthorized {
        /// The referenced task.
        task: TaskId,
        /// The acting user.
        user: UserId,
    },

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// User repository operation failed.
    #[error(transparent)]
    UserStore(#[from] UserRepositoryError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Every mutating operation keeps the reminder schedule consistent with
/// the task: creation schedules a reminder when the deadline qualifies,
/// deadline changes reschedule, and completion or deletion cancel.
/// Reminder upkeep is best-effort: a reminder failure is logged, never
/// surfaced, because the task mutation has already committed.
#[derive(Clone)]
pub struct TaskLifecycleService<T, U, R, C>
where
    T: TaskRepository,
    U: UserRepository,
    R: crate::reminder::ports::ReminderRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    users: Arc<U>,
    reminders: ReminderEngine<R, C>,
    clock: Arc<C>,
}

impl<T, U, R, C> TaskLifecycleService<T, U, R, C>
where
    T: TaskRepository,
    U: UserRepository,
    R: crate::reminder::ports::ReminderRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(
        tasks: Arc<T>,
        users: Arc<U>,
        reminders: ReminderEngine<R, C>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            users,
            reminders,
            clock,
        }
    }

    /// Creates a task and schedules its deadline reminder.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the owner does not exist, the
    /// name fails validation, or persistence rejects the record.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        self.ensure_user(request.owner).await?;
        let name = TaskName::new(request.name)?;
        let params = NewTaskParams {
            owner: request.owner,
            name,
            description: request.description,
            deadline: request.deadline,
            priority: request.priority,
        };
        let task = Task::new(params, TaskOrigin::Manual, &*self.clock);
        self.tasks.store(&task).await?;
        self.schedule_reminder(&task).await;
        Ok(task)
    }

    /// Retrieves a task, verifying ownership.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] or
    /// [`TaskLifecycleError::Unauthorized`].
    pub async fn get(&self, task_id: TaskId, user: UserId) -> TaskLifecycleResult<Task> {
        self.load_owned(task_id, user).await
    }

    /// Returns all tasks owned by the user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::UserNotFound`] when the user does not
    /// exist, or a repository error.
    pub async fn list(&self, user: UserId) -> TaskLifecycleResult<Vec<Task>> {
        self.ensure_user(user).await?;
        Ok(self.tasks.find_by_owner(user).await?)
    }

    /// Returns the user's tasks matching the filter.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::UserNotFound`] when the user does not
    /// exist, or a repository error.
    pub async fn list_filtered(
        &self,
        user: UserId,
        filter: &TaskFilter,
    ) -> TaskLifecycleResult<Vec<Task>> {
        self.ensure_user(user).await?;
        Ok(self.tasks.find_by_owner_filtered(user, filter).await?)
    }

    /// Replaces a task's editable details, rescheduling its reminder when
    /// the deadline changed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] on missing task, foreign ownership,
    /// name validation failure, or repository failure.
    pub async fn update(
        &self,
        task_id: TaskId,
        user: UserId,
        request: UpdateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load_owned(task_id, user).await?;
        let old_deadline = task.deadline();
        let name = TaskName::new(request.name)?;
        task.update_details(
            name,
            request.description,
            request.deadline,
            request.priority,
            &*self.clock,
        );
        self.tasks.update(&task).await?;

        if old_deadline != task.deadline() {
            self.cancel_reminders(task_id).await;
            self.schedule_reminder(&task).await;
        }
        Ok(task)
    }

    /// Sets the completion flag; completing a task cancels its reminders.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] on missing task, foreign ownership,
    /// or repository failure.
    pub async fn set_completed(
        &self,
        task_id: TaskId,
        user: UserId,
        completed: bool,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load_owned(task_id, user).await?;
        task.set_completed(completed, &*self.clock);
        self.tasks.update(&task).await?;
        if completed {
            self.cancel_reminders(task_id).await;
        }
        Ok(task)
    }

    /// Sets the lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] on missing task, foreign ownership,
    /// or repository failure.
    pub async fn set_status(
        &self,
        task_id: TaskId,
        user: UserId,
        status: TaskStatus,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load_owned(task_id, user).await?;
        task.set_status(status, &*self.clock);
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Sets the priority.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] on missing task, foreign ownership,
    /// or repository failure.
    pub async fn set_priority(
        &self,
        task_id: TaskId,
        user: UserId,
        priority: Priority,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load_owned(task_id, user).await?;
        task.set_priority(priority, &*self.clock);
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Deletes a task after cancelling its reminders.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] on missing task, foreign ownership,
    /// or repository failure.
    pub async fn delete(&self, task_id: TaskId, user: UserId) -> TaskLifecycleResult<()> {
        self.load_owned(task_id, user).await?;
        self.cancel_reminders(task_id).await;
        Ok(self.tasks.delete(task_id).await?)
    }

    async fn ensure_user(&self, user: UserId) -> TaskLifecycleResult<()> {
        self.users
            .find_by_id(user)
            .await?
            .map(|_| ())
            .ok_or(TaskLifecycleError::UserNotFound(user))
    }

    async fn load_owned(&self, task_id: TaskId, user: UserId) -> TaskLifecycleResult<Task> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))?;
        if task.owner() != user {
            return Err(TaskLifecycleError::Unauthorized {
                task: task_id,
                user,
            });
        }
        Ok(task)
    }

    async fn schedule_reminder(&self, task: &Task) {
        if let Err(err) = self.reminders.create_for_task(task).await {
            warn!(task_id = %task.id(), error = %err, "reminder scheduling failed");
        }
    }

    async fn cancel_reminders(&self, task_id: TaskId) {
        if let Err(err) = self.reminders.cancel_for_task(task_id).await {
            warn!(task_id = %task_id, error = %err, "reminder cancellation failed");
        }
    }
}
