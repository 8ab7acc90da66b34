//! In-memory invite repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::invite::{
    domain::{InviteId, InviteToken, TaskShareInvite},
    ports::{InviteRepository, InviteRepositoryError, InviteRepositoryResult},
};
use crate::task::domain::TaskId;
use crate::user::domain::UserId;

/// Thread-safe in-memory invite repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInviteRepository {
    state: Arc<RwLock<InMemoryInviteState>>,
}

#[derive(Debug, Default)]
struct InMemoryInviteState {
    invites: HashMap<InviteId, TaskShareInvite>,
    token_index: HashMap<InviteToken, InviteId>,
}

impl InMemoryInviteRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> InviteRepositoryError {
    InviteRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn received_by(state: &InMemoryInviteState, receiver: UserId) -> Vec<TaskShareInvite> {
    let mut invites: Vec<TaskShareInvite> = state
        .invites
        .values()
        .filter(|invite| invite.receiver() == receiver)
        .cloned()
        .collect();
    invites.sort_by_key(TaskShareInvite::created_at);
    invites
}

#[async_trait]
impl InviteRepository for InMemoryInviteRepository {
    async fn store(&self, invite: &TaskShareInvite) -> InviteRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.invites.contains_key(&invite.id()) {
            return Err(InviteRepositoryError::DuplicateInvite(invite.id()));
        }
        if state.token_index.contains_key(invite.token()) {
            return Err(InviteRepositoryError::DuplicateToken);
        }
        state.token_index.insert(invite.token().clone(), invite.id());
        state.invites.insert(invite.id(), invite.clone());
        Ok(())
    }

    async fn find_by_token(
        &self,
        token: &InviteToken,
    ) -> InviteRepositoryResult<Option<TaskShareInvite>> {
        let state = self.state.read().map_err(lock_error)?;
        let invite = state
            .token_index
            .get(token)
            .and_then(|id| state.invites.get(id))
            .cloned();
        Ok(invite)
    }

    async fn has_pending_for(
        &self,
        receiver: UserId,
        task_id: TaskId,
    ) -> InviteRepositoryResult<bool> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.invites.values().any(|invite| {
            invite.receiver() == receiver && invite.task_id() == task_id && invite.is_pending()
        }))
    }

    async fn find_pending_by_receiver(
        &self,
        receiver: UserId,
    ) -> InviteRepositoryResult<Vec<TaskShareInvite>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(received_by(&state, receiver)
            .into_iter()
            .filter(TaskShareInvite::is_pending)
            .collect())
    }

    async fn find_by_receiver(
        &self,
        receiver: UserId,
    ) -> InviteRepositoryResult<Vec<TaskShareInvite>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(received_by(&state, receiver))
    }

    async fn find_by_sender(
        &self,
        sender: UserId,
    ) -> InviteRepositoryResult<Vec<TaskShareInvite>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut invites: Vec<TaskShareInvite> = state
            .invites
            .values()
            .filter(|invite| invite.sender() == sender)
            .cloned()
            .collect();
        invites.sort_by_key(TaskShareInvite::created_at);
        Ok(invites)
    }

    async fn count_pending_by_receiver(&self, receiver: UserId) -> InviteRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        let count = state
            .invites
            .values()
            .filter(|invite| invite.receiver() == receiver && invite.is_pending())
            .count();
        Ok(count as u64)
    }

    async fn update_resolution(&self, invite: &TaskShareInvite) -> InviteRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .invites
            .get(&invite.id())
            .ok_or(InviteRepositoryError::NotFound(invite.id()))?;
        if !stored.is_pending() {
            return Err(InviteRepositoryError::AlreadyResolved {
                id: invite.id(),
                current: stored.status(),
            });
        }
        state.invites.insert(invite.id(), invite.clone());
        Ok(())
    }
}
