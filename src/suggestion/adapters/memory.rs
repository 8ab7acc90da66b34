//! In-memory suggestion repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::suggestion::{
    domain::{Suggestion, SuggestionId},
    ports::{SuggestionRepository, SuggestionRepositoryError, SuggestionRepositoryResult},
};
use crate::user::domain::UserId;

/// Thread-safe in-memory suggestion repository.
#[derive(Debug, Clone, Default)]
pub struct InMemorySuggestionRepository {
    state: Arc<RwLock<InMemorySuggestionState>>,
}

#[derive(Debug, Default)]
struct InMemorySuggestionState {
    suggestions: HashMap<SuggestionId, Suggestion>,
    owner_index: HashMap<UserId, Vec<SuggestionId>>,
}

impl InMemorySuggestionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> SuggestionRepositoryError {
    SuggestionRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn insert(
    state: &mut InMemorySuggestionState,
    suggestion: &Suggestion,
) -> SuggestionRepositoryResult<()> {
    if state.suggestions.contains_key(&suggestion.id()) {
        return Err(SuggestionRepositoryError::DuplicateSuggestion(
            suggestion.id(),
        ));
    }
    state
        .owner_index
        .entry(suggestion.owner())
        .or_default()
        .push(suggestion.id());
    state.suggestions.insert(suggestion.id(), suggestion.clone());
    Ok(())
}

fn owner_suggestions(state: &InMemorySuggestionState, owner: UserId) -> Vec<Suggestion> {
    state
        .owner_index
        .get(&owner)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| state.suggestions.get(id).cloned())
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl SuggestionRepository for InMemorySuggestionRepository {
    async fn store(&self, suggestion: &Suggestion) -> SuggestionRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        insert(&mut state, suggestion)
    }

    async fn store_batch(&self, suggestions: &[Suggestion]) -> SuggestionRepositoryResult<()> {
        // The write lock is held across the whole batch, so either every
        // insert lands or the duplicate check fails before any readers
        // observe a partial batch.
        let mut state = self.state.write().map_err(lock_error)?;
        for suggestion in suggestions {
            if state.suggestions.contains_key(&suggestion.id()) {
                return Err(SuggestionRepositoryError::DuplicateSuggestion(
                    suggestion.id(),
                ));
            }
        }
        for suggestion in suggestions {
            insert(&mut state, suggestion)?;
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: SuggestionId,
    ) -> SuggestionRepositoryResult<Option<Suggestion>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.suggestions.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner: UserId) -> SuggestionRepositoryResult<Vec<Suggestion>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(owner_suggestions(&state, owner))
    }

    async fn find_pending_by_owner(
        &self,
        owner: UserId,
    ) -> SuggestionRepositoryResult<Vec<Suggestion>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(owner_suggestions(&state, owner)
            .into_iter()
            .filter(Suggestion::is_pending)
            .collect())
    }

    async fn count_created_in(
        &self,
        owner: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SuggestionRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        let count = owner_suggestions(&state, owner)
            .iter()
            .filter(|s| s.created_at() >= start && s.created_at() < end)
            .count();
        Ok(count as u64)
    }

    async fn count_deadline_in(
        &self,
        owner: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SuggestionRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        let count = owner_suggestions(&state, owner)
            .iter()
            .filter(|s| {
                s.deadline()
                    .is_some_and(|deadline| deadline >= start && deadline < end)
            })
            .count();
        Ok(count as u64)
    }

    async fn update_resolution(&self, suggestion: &Suggestion) -> SuggestionRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .suggestions
            .get(&suggestion.id())
            .ok_or(SuggestionRepositoryError::NotFound(suggestion.id()))?;
        if !stored.is_pending() {
            return Err(SuggestionRepositoryError::AlreadyResolved {
                id: suggestion.id(),
                current: stored.acceptance(),
            });
        }
        state.suggestions.insert(suggestion.id(), suggestion.clone());
        Ok(())
    }
}
