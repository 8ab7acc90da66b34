//! Suggestion generation and resolution orchestration.

use crate::reminder::services::ReminderEngine;
use crate::suggestion::{
    domain::{
        AcceptanceStatus, NewSuggestionParams, Suggestion, SuggestionDomainError, SuggestionId,
    },
    parser::{self, SuggestionParseError},
    ports::{
        GeneratorError, SuggestionRepository, SuggestionRepositoryError, TextGenerator,
    },
    services::quota::{QuotaStatus, QuotaTracker},
};
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::user::domain::UserId;
use chrono::Duration;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Deterministic instruction preamble sent ahead of the user prompt.
const PROMPT_PREAMBLE: &str = "\
You are a task-planning assistant. Break the request below into concrete, \
actionable tasks. Respond with ONLY a JSON array, no prose and no markdown \
fence. Each element must be an object with exactly these fields: \
\"name\" (short task title), \"description\" (one or two sentences), \
\"deadline\" (absolute ISO 8601 timestamp, UTC, in the future), and \
\"priority\" (one of \"low\", \"medium\", \"high\"). Produce between 1 and \
10 tasks.";

/// Result of a successful generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSuggestions {
    /// The persisted pending suggestions, in reply order.
    pub suggestions: Vec<Suggestion>,
    /// Convenience count of `suggestions`.
    pub count: usize,
    /// Human-readable summary line.
    pub message: String,
}

/// Result of a batch accept: explicit partial success.
#[derive(Debug, Clone, Default)]
pub struct AcceptedBatch {
    /// Tasks materialized from the suggestions that accepted cleanly.
    pub accepted: Vec<Task>,
    /// Per-id failures, in input order.
    pub failed: Vec<BatchFailure>,
}

/// One failed entry of a batch operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// The suggestion that failed.
    pub suggestion_id: SuggestionId,
    /// Why it failed.
    pub reason: String,
}

/// Aggregated acceptance statistics for one user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuggestionAnalytics {
    /// All suggestions ever generated for the user.
    pub total: usize,
    /// Suggestions accepted.
    pub accepted: usize,
    /// Suggestions declined.
    pub declined: usize,
    /// Suggestions still awaiting a decision.
    pub pending: usize,
    /// Accepted share of resolved suggestions, in percent.
    pub acceptance_rate: f64,
    /// Suggestions generated in the last 30 days.
    pub recent_30d: usize,
}

/// Why a generation call produced nothing usable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationFailure {
    /// The generator call itself failed.
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// The reply contained nothing parseable.
    #[error(transparent)]
    Parse(#[from] SuggestionParseError),
}

/// Service-level errors for suggestion operations.
#[derive(Debug, Error)]
pub enum SuggestionEngineError {
    /// The monthly suggestion ceiling is exhausted.
    #[error("monthly suggestion quota exhausted (limit {limit})")]
    QuotaExceeded {
        /// The configured monthly ceiling.
        limit: u32,
    },

    /// The generator returned nothing parseable; nothing was persisted
    /// and the caller may retry.
    #[error("suggestion generation failed: {0}")]
    GenerationFailed(#[from] GenerationFailure),

    /// The referenced suggestion does not exist.
    #[error("suggestion not found: {0}")]
    NotFound(SuggestionId),

    /// The acting user does not own the referenced suggestion.
    #[error("user {user} does not own suggestion {suggestion}")]
    Unauthorized {
        /// The referenced suggestion.
        suggestion: SuggestionId,
        /// The acting user.
        user: UserId,
    },

    /// The suggestion already reached a terminal acceptance state.
    #[error("suggestion {id} was already resolved as {current}")]
    AlreadyResolved {
        /// The suggestion identifier.
        id: SuggestionId,
        /// The committed terminal state.
        current: AcceptanceStatus,
    },

    /// Suggestion repository operation failed.
    #[error(transparent)]
    Repository(#[from] SuggestionRepositoryError),

    /// Task repository operation failed.
    #[error(transparent)]
    TaskStore(#[from] TaskRepositoryError),
}

/// Result type for suggestion engine operations.
pub type SuggestionEngineResult<T> = Result<T, SuggestionEngineError>;

/// Builds the full generator prompt from the user prompt and optional
/// context. Deterministic: identical inputs produce identical prompts.
#[must_use]
pub fn build_prompt(prompt: &str, context: Option<&str>) -> String {
    match context {
        Some(context) if !context.trim().is_empty() => {
            format!("{PROMPT_PREAMBLE}\n\nContext: {context}\n\nRequest: {prompt}")
        }
        _ => format!("{PROMPT_PREAMBLE}\n\nRequest: {prompt}"),
    }
}

/// Suggestion workflow orchestration service.
pub struct SuggestionEngine<S, T, R, G, C>
where
    S: SuggestionRepository,
    T: TaskRepository,
    R: crate::reminder::ports::ReminderRepository,
    G: TextGenerator,
    C: Clock + Send + Sync,
{
    suggestions: Arc<S>,
    tasks: Arc<T>,
    reminders: ReminderEngine<R, C>,
    generator: Arc<G>,
    quota: QuotaTracker<S, C>,
    clock: Arc<C>,
}

impl<S, T, R, G, C> SuggestionEngine<S, T, R, G, C>
where
    S: SuggestionRepository,
    T: TaskRepository,
    R: crate::reminder::ports::ReminderRepository,
    G: TextGenerator,
    C: Clock + Send + Sync,
{
    /// Creates a new suggestion engine.
    #[must_use]
    pub const fn new(
        suggestions: Arc<S>,
        tasks: Arc<T>,
        reminders: ReminderEngine<R, C>,
        generator: Arc<G>,
        quota: QuotaTracker<S, C>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            suggestions,
            tasks,
            reminders,
            generator,
            quota,
            clock,
        }
    }

    /// Generates suggestions from a user prompt.
    ///
    /// Checks the monthly quota, invokes the generator with a
    /// deterministic instruction preamble, parses the reply, and persists
    /// every surviving candidate as one atomic batch of pending
    /// suggestions.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionEngineError::QuotaExceeded`] when the ceiling
    /// is reached, [`SuggestionEngineError::GenerationFailed`] when the
    /// generator call fails or nothing parseable comes back (nothing is
    /// persisted in either case), or a repository error.
    pub async fn generate(
        &self,
        user: UserId,
        prompt: &str,
        context: Option<&str>,
    ) -> SuggestionEngineResult<GeneratedSuggestions> {
        if !self.quota.can_request(user).await {
            return Err(SuggestionEngineError::QuotaExceeded {
                limit: self.quota.monthly_limit(),
            });
        }

        let full_prompt = build_prompt(prompt, context);
        let raw = self
            .generator
            .complete(&full_prompt)
            .await
            .map_err(GenerationFailure::from)?;

        let parsed = parser::parse(&raw).map_err(GenerationFailure::from)?;
        for reject in &parsed.rejected {
            warn!(
                %user,
                index = reject.index,
                reason = %reject.reason,
                "generator candidate dropped"
            );
        }

        let generator_id = self.generator.model_id().to_owned();
        let batch: Vec<Suggestion> = parsed
            .candidates
            .into_iter()
            .map(|candidate| {
                Suggestion::new(
                    NewSuggestionParams {
                        owner: user,
                        name: candidate.name,
                        description: candidate.description,
                        deadline: Some(candidate.deadline),
                        priority: candidate.priority,
                        raw_response: raw.clone(),
                        generator: generator_id.clone(),
                    },
                    &*self.clock,
                )
            })
            .collect();

        self.suggestions.store_batch(&batch).await?;

        let count = batch.len();
        info!(%user, count, "suggestions generated");
        Ok(GeneratedSuggestions {
            message: format!("{count} suggestion(s) generated"),
            count,
            suggestions: batch,
        })
    }

    /// Accepts a suggestion, materializing it into a task with a
    /// scheduled reminder.
    ///
    /// The terminal flip is guarded at the repository: of two concurrent
    /// accept calls, exactly one commits and the loser observes
    /// [`SuggestionEngineError::AlreadyResolved`]. Reminder scheduling is
    /// best-effort and never rolls back the accepted task.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionEngineError`] on missing suggestion, foreign
    /// ownership, a committed terminal state, or repository failure.
    pub async fn accept(
        &self,
        id: SuggestionId,
        user: UserId,
    ) -> SuggestionEngineResult<Task> {
        let mut suggestion = self.load_owned(id, user).await?;

        let task = suggestion.materialize(&*self.clock);
        suggestion
            .accept(task.id(), &*self.clock)
            .map_err(map_domain_error)?;

        self.tasks.store(&task).await?;
        if let Err(err) = self.suggestions.update_resolution(&suggestion).await {
            // Lost the resolution race (or the write failed) after the
            // task landed; remove the orphan before surfacing the error.
            self.discard_task(task.id()).await;
            return Err(map_resolution_error(err));
        }

        if let Err(err) = self.reminders.create_for_task(&task).await {
            warn!(task_id = %task.id(), error = %err, "reminder scheduling failed");
        }

        info!(suggestion_id = %id, task_id = %task.id(), "suggestion accepted");
        Ok(task)
    }

    /// Declines a suggestion.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionEngineError`] on missing suggestion, foreign
    /// ownership, a committed terminal state, or repository failure.
    pub async fn decline(
        &self,
        id: SuggestionId,
        user: UserId,
    ) -> SuggestionEngineResult<Suggestion> {
        let mut suggestion = self.load_owned(id, user).await?;
        suggestion.decline(&*self.clock).map_err(map_domain_error)?;
        self.suggestions
            .update_resolution(&suggestion)
            .await
            .map_err(map_resolution_error)?;

        info!(suggestion_id = %id, "suggestion declined");
        Ok(suggestion)
    }

    /// Accepts a batch of suggestions with partial-success semantics.
    ///
    /// A failure on one id is logged and reported in the result; it never
    /// aborts the remaining ids.
    pub async fn accept_batch(&self, ids: &[SuggestionId], user: UserId) -> AcceptedBatch {
        let mut batch = AcceptedBatch::default();
        for &id in ids {
            match self.accept(id, user).await {
                Ok(task) => batch.accepted.push(task),
                Err(err) => {
                    warn!(suggestion_id = %id, error = %err, "batch accept entry failed");
                    batch.failed.push(BatchFailure {
                        suggestion_id: id,
                        reason: err.to_string(),
                    });
                }
            }
        }
        batch
    }

    /// Returns the user's suggestions still awaiting a decision.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionEngineError::Repository`] when the query fails.
    pub async fn pending_for(&self, user: UserId) -> SuggestionEngineResult<Vec<Suggestion>> {
        Ok(self.suggestions.find_pending_by_owner(user).await?)
    }

    /// Returns all of the user's suggestions regardless of state.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionEngineError::Repository`] when the query fails.
    pub async fn all_for(&self, user: UserId) -> SuggestionEngineResult<Vec<Suggestion>> {
        Ok(self.suggestions.find_by_owner(user).await?)
    }

    /// Computes acceptance statistics for the user. Pure aggregation, no
    /// mutation.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionEngineError::Repository`] when the query fails.
    pub async fn analytics(&self, user: UserId) -> SuggestionEngineResult<SuggestionAnalytics> {
        let all = self.suggestions.find_by_owner(user).await?;
        let total = all.len();
        let accepted = all
            .iter()
            .filter(|s| s.acceptance() == AcceptanceStatus::Accepted)
            .count();
        let declined = all
            .iter()
            .filter(|s| s.acceptance() == AcceptanceStatus::Declined)
            .count();
        let pending = total - accepted - declined;

        let resolved = accepted + declined;
        let acceptance_rate = if resolved == 0 {
            0.0
        } else {
            accepted as f64 / resolved as f64 * 100.0
        };

        let cutoff = self.clock.utc() - Duration::days(30);
        let recent_30d = all.iter().filter(|s| s.created_at() >= cutoff).count();

        Ok(SuggestionAnalytics {
            total,
            accepted,
            declined,
            pending,
            acceptance_rate,
            recent_30d,
        })
    }

    /// Returns the user's remaining monthly allowance and request gate.
    pub async fn quota_status(&self, user: UserId) -> QuotaStatus {
        self.quota.status(user).await
    }

    async fn load_owned(
        &self,
        id: SuggestionId,
        user: UserId,
    ) -> SuggestionEngineResult<Suggestion> {
        let suggestion = self
            .suggestions
            .find_by_id(id)
            .await?
            .ok_or(SuggestionEngineError::NotFound(id))?;
        if suggestion.owner() != user {
            return Err(SuggestionEngineError::Unauthorized {
                suggestion: id,
                user,
            });
        }
        Ok(suggestion)
    }

    async fn discard_task(&self, task_id: TaskId) {
        if let Err(err) = self.tasks.delete(task_id).await {
            warn!(%task_id, error = %err, "failed to discard task after lost resolution race");
        }
    }
}

fn map_domain_error(err: SuggestionDomainError) -> SuggestionEngineError {
    match err {
        SuggestionDomainError::AlreadyResolved { id, current } => {
            SuggestionEngineError::AlreadyResolved { id, current }
        }
    }
}

fn map_resolution_error(err: SuggestionRepositoryError) -> SuggestionEngineError {
    match err {
        SuggestionRepositoryError::AlreadyResolved { id, current } => {
            SuggestionEngineError::AlreadyResolved { id, current }
        }
        other => SuggestionEngineError::Repository(other),
    }
}
