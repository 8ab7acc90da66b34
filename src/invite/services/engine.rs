//! Share, accept, and decline orchestration for task invites.

use crate::invite::{
    domain::{
        InviteDomainError, InviteId, InviteStatus, InviteToken, NewInviteParams, TaskShareInvite,
    },
    ports::{InviteRepository, InviteRepositoryError},
};
use crate::notify::ports::{Notification, Notifier};
use crate::reminder::services::ReminderEngine;
use crate::task::{
    domain::{Task, TaskId, TaskOrigin},
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::user::{
    domain::{User, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Public base URL used to build the unauthenticated action links.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InviteLinkConfig {
    /// Base URL of the deployment, without a trailing slash.
    pub base_url: String,
}

impl Default for InviteLinkConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_owned(),
        }
    }
}

impl InviteLinkConfig {
    /// Builds the unauthenticated accept link for a token.
    #[must_use]
    pub fn accept_url(&self, token: &InviteToken) -> String {
        format!("{}/api/v1/invites/accept?token={}", self.base_url, token)
    }

    /// Builds the unauthenticated decline link for a token.
    #[must_use]
    pub fn decline_url(&self, token: &InviteToken) -> String {
        format!("{}/api/v1/invites/decline?token={}", self.base_url, token)
    }
}

/// Result of a share call: explicit partial success.
#[derive(Debug, Clone, Default)]
pub struct ShareOutcome {
    /// Invites persisted and dispatched, in (task × receiver) order.
    pub invites: Vec<TaskShareInvite>,
    /// Pairs skipped without an invite, with reasons.
    pub skipped: Vec<SkippedShare>,
}

/// One (receiver, task) pair skipped during a share call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedShare {
    /// The intended receiver.
    pub receiver: UserId,
    /// The task that was being shared.
    pub task: TaskId,
    /// Why no invite was created.
    pub reason: String,
}

/// Service-level errors for invite operations.
#[derive(Debug, Error)]
pub enum InviteEngineError {
    /// The share request is malformed (self-share, empty batch).
    #[error("invalid share request: {0}")]
    Validation(String),

    /// A referenced user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// A referenced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The sender does not own the task being shared.
    #[error("user {user} does not own task {task}")]
    Unauthorized {
        /// The referenced task.
        task: TaskId,
        /// The acting user.
        user: UserId,
    },

    /// No invite matches the supplied token.
    #[error("no invite matches the supplied token")]
    TokenNotFound,

    /// The invite already reached a terminal state.
    #[error("invite {id} was already resolved as {current}")]
    AlreadyResolved {
        /// The invite identifier.
        id: InviteId,
        /// The committed terminal state.
        current: InviteStatus,
    },

    /// Invite repository operation failed.
    #[error(transparent)]
    Repository(#[from] InviteRepositoryError),

    /// Task repository operation failed.
    #[error(transparent)]
    TaskStore(#[from] TaskRepositoryError),

    /// User repository operation failed.
    #[error(transparent)]
    UserStore(#[from] UserRepositoryError),
}

/// Result type for invite engine operations.
pub type InviteEngineResult<T> = Result<T, InviteEngineError>;

/// Invite workflow orchestration service.
pub struct InviteEngine<I, T, U, R, N, C>
where
    I: InviteRepository,
    T: TaskRepository,
    U: UserRepository,
    R: crate::reminder::ports::ReminderRepository,
    N: Notifier,
    C: Clock + Send + Sync,
{
    invites: Arc<I>,
    tasks: Arc<T>,
    users: Arc<U>,
    reminders: ReminderEngine<R, C>,
    notifier: Arc<N>,
    clock: Arc<C>,
    links: InviteLinkConfig,
}

impl<I, T, U, R, N, C> InviteEngine<I, T, U, R, N, C>
where
    I: InviteRepository,
    T: TaskRepository,
    U: UserRepository,
    R: crate::reminder::ports::ReminderRepository,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates a new invite engine.
    #[must_use]
    pub const fn new(
        invites: Arc<I>,
        tasks: Arc<T>,
        users: Arc<U>,
        reminders: ReminderEngine<R, C>,
        notifier: Arc<N>,
        clock: Arc<C>,
        links: InviteLinkConfig,
    ) -> Self {
        Self {
            invites,
            tasks,
            users,
            reminders,
            notifier,
            clock,
            links,
        }
    }

    /// Shares the sender's tasks with the given receivers.
    ///
    /// Every (receiver × task) pair gets its own invite with a fresh
    /// token. A pair with an invite still pending is skipped; re-sharing
    /// is idempotent, not an error. Per-receiver failures are recovered
    /// locally and reported in [`ShareOutcome::skipped`]; notification
    /// failures are logged and never block the invite.
    ///
    /// # Errors
    ///
    /// Returns [`InviteEngineError::Validation`] on a self-share or an
    /// empty batch, [`InviteEngineError::Unauthorized`] when any task is
    /// not the sender's, or a repository error on the upfront lookups.
    pub async fn share(
        &self,
        sender_id: UserId,
        receiver_ids: &[UserId],
        task_ids: &[TaskId],
    ) -> InviteEngineResult<ShareOutcome> {
        if receiver_ids.is_empty() || task_ids.is_empty() {
            return Err(InviteEngineError::Validation(
                "at least one receiver and one task are required".to_owned(),
            ));
        }
        if receiver_ids.contains(&sender_id) {
            return Err(InviteEngineError::Validation(
                "cannot share a task with yourself".to_owned(),
            ));
        }

        let sender = self
            .users
            .find_by_id(sender_id)
            .await?
            .ok_or(InviteEngineError::UserNotFound(sender_id))?;

        // Ownership is validated for the whole batch before any invite is
        // written, so an unauthorized task cannot partially share.
        let mut shared_tasks = Vec::with_capacity(task_ids.len());
        for &task_id in task_ids {
            let task = self
                .tasks
                .find_by_id(task_id)
                .await?
                .ok_or(InviteEngineError::TaskNotFound(task_id))?;
            if task.owner() != sender_id {
                return Err(InviteEngineError::Unauthorized {
                    task: task_id,
                    user: sender_id,
                });
            }
            shared_tasks.push(task);
        }

        let mut outcome = ShareOutcome::default();
        for task in &shared_tasks {
            for &receiver_id in receiver_ids {
                match self.share_one(&sender, receiver_id, task).await {
                    Ok(Some(invite)) => outcome.invites.push(invite),
                    Ok(None) => outcome.skipped.push(SkippedShare {
                        receiver: receiver_id,
                        task: task.id(),
                        reason: "pending invite already exists".to_owned(),
                    }),
                    Err(err) => {
                        warn!(
                            receiver = %receiver_id,
                            task_id = %task.id(),
                            error = %err,
                            "share pair skipped"
                        );
                        outcome.skipped.push(SkippedShare {
                            receiver: receiver_id,
                            task: task.id(),
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            sender = %sender_id,
            created = outcome.invites.len(),
            skipped = outcome.skipped.len(),
            "share completed"
        );
        Ok(outcome)
    }

    /// Accepts an invite by token, copying the task into the receiver's
    /// space and scheduling its reminder.
    ///
    /// Safe to call twice: the terminal flip is guarded at the
    /// repository, so the second call observes
    /// [`InviteEngineError::AlreadyResolved`] and no second copy is
    /// created. Both the mailed link and the in-app action resolve
    /// through this same path.
    ///
    /// # Errors
    ///
    /// Returns [`InviteEngineError::TokenNotFound`] for an unknown token,
    /// [`InviteEngineError::AlreadyResolved`] for a resolved invite, or a
    /// repository error.
    pub async fn accept(&self, token: &InviteToken) -> InviteEngineResult<TaskShareInvite> {
        let mut invite = self.load_by_token(token).await?;

        let receiver = invite.receiver();
        self.users
            .find_by_id(receiver)
            .await?
            .ok_or(InviteEngineError::UserNotFound(receiver))?;
        let original = self
            .tasks
            .find_by_id(invite.task_id())
            .await?
            .ok_or(InviteEngineError::TaskNotFound(invite.task_id()))?;

        let copy = original.copy_to_owner(
            receiver,
            TaskOrigin::Invite {
                invite_id: invite.id(),
            },
            &*self.clock,
        );
        invite
            .accept(copy.id(), &*self.clock)
            .map_err(map_domain_error)?;

        self.tasks.store(&copy).await?;
        if let Err(err) = self.invites.update_resolution(&invite).await {
            // Lost the resolution race (or the write failed) after the
            // copy landed; remove the orphan before surfacing the error.
            self.discard_task(copy.id()).await;
            return Err(map_resolution_error(err));
        }

        if let Err(err) = self.reminders.create_for_task(&copy).await {
            warn!(task_id = %copy.id(), error = %err, "reminder scheduling failed");
        }

        info!(invite_id = %invite.id(), task_id = %copy.id(), "invite accepted");
        Ok(invite)
    }

    /// Declines an invite by token. No task is copied.
    ///
    /// # Errors
    ///
    /// Returns [`InviteEngineError::TokenNotFound`] for an unknown token,
    /// [`InviteEngineError::AlreadyResolved`] for a resolved invite, or a
    /// repository error.
    pub async fn decline(&self, token: &InviteToken) -> InviteEngineResult<TaskShareInvite> {
        let mut invite = self.load_by_token(token).await?;
        invite.decline(&*self.clock).map_err(map_domain_error)?;
        self.invites
            .update_resolution(&invite)
            .await
            .map_err(map_resolution_error)?;

        info!(invite_id = %invite.id(), "invite declined");
        Ok(invite)
    }

    /// Returns the user's pending invites, for notification surfaces.
    ///
    /// # Errors
    ///
    /// Returns [`InviteEngineError::Repository`] when the query fails.
    pub async fn pending_for(&self, user: UserId) -> InviteEngineResult<Vec<TaskShareInvite>> {
        Ok(self.invites.find_pending_by_receiver(user).await?)
    }

    /// Returns every invite the user has received.
    ///
    /// # Errors
    ///
    /// Returns [`InviteEngineError::Repository`] when the query fails.
    pub async fn all_received_by(
        &self,
        user: UserId,
    ) -> InviteEngineResult<Vec<TaskShareInvite>> {
        Ok(self.invites.find_by_receiver(user).await?)
    }

    /// Returns every invite the user has sent.
    ///
    /// # Errors
    ///
    /// Returns [`InviteEngineError::Repository`] when the query fails.
    pub async fn all_sent_by(&self, user: UserId) -> InviteEngineResult<Vec<TaskShareInvite>> {
        Ok(self.invites.find_by_sender(user).await?)
    }

    /// Counts the user's pending invites, for a notification badge.
    ///
    /// # Errors
    ///
    /// Returns [`InviteEngineError::Repository`] when the query fails.
    pub async fn count_pending_for(&self, user: UserId) -> InviteEngineResult<u64> {
        Ok(self.invites.count_pending_by_receiver(user).await?)
    }

    /// Creates and dispatches one invite; `Ok(None)` means duplicate
    /// suppression.
    async fn share_one(
        &self,
        sender: &User,
        receiver_id: UserId,
        task: &Task,
    ) -> InviteEngineResult<Option<TaskShareInvite>> {
        let receiver = self
            .users
            .find_by_id(receiver_id)
            .await?
            .ok_or(InviteEngineError::UserNotFound(receiver_id))?;

        if self.invites.has_pending_for(receiver_id, task.id()).await? {
            info!(
                receiver = %receiver_id,
                task_id = %task.id(),
                "pending invite already exists; share suppressed"
            );
            return Ok(None);
        }

        let invite = TaskShareInvite::new(
            NewInviteParams {
                sender: sender.id(),
                receiver: receiver_id,
                task_id: task.id(),
                token: InviteToken::generate(),
            },
            &*self.clock,
        );
        self.invites.store(&invite).await?;

        let notification = self.build_invite_notification(sender, &receiver, task, &invite);
        if let Err(err) = self.notifier.send(receiver.email(), &notification).await {
            warn!(
                invite_id = %invite.id(),
                recipient = %receiver.email(),
                error = %err,
                "invite notification failed"
            );
        }

        Ok(Some(invite))
    }

    fn build_invite_notification(
        &self,
        sender: &User,
        receiver: &User,
        task: &Task,
        invite: &TaskShareInvite,
    ) -> Notification {
        Notification::ShareInvite {
            recipient_name: receiver.display_name(),
            sender_name: sender.display_name(),
            sender_email: sender.email().as_str().to_owned(),
            task_name: task.name().as_str().to_owned(),
            description: task.description().to_owned(),
            deadline: task.deadline(),
            accept_url: self.links.accept_url(invite.token()),
            decline_url: self.links.decline_url(invite.token()),
        }
    }

    async fn load_by_token(&self, token: &InviteToken) -> InviteEngineResult<TaskShareInvite> {
        self.invites
            .find_by_token(token)
            .await?
            .ok_or(InviteEngineError::TokenNotFound)
    }

    async fn discard_task(&self, task_id: TaskId) {
        if let Err(err) = self.tasks.delete(task_id).await {
            warn!(%task_id, error = %err, "failed to discard task after lost resolution race");
        }
    }
}

fn map_domain_error(err: InviteDomainError) -> InviteEngineError {
    match err {
        InviteDomainError::AlreadyResolved { id, current } => {
            InviteEngineError::AlreadyResolved { id, current }
        }
        InviteDomainError::InvalidToken => {
            InviteEngineError::Validation("invalid invite token".to_owned())
        }
    }
}

fn map_resolution_error(err: InviteRepositoryError) -> InviteEngineError {
    match err {
        InviteRepositoryError::AlreadyResolved { id, current } => {
            InviteEngineError::AlreadyResolved { id, current }
        }
        other => InviteEngineError::Repository(other),
    }
}
