//! `PostgreSQL` repository implementation for suggestion storage.

use super::{
    models::{NewSuggestionRow, SuggestionRow},
    schema::suggestions,
};
use crate::suggestion::{
    domain::{
        AcceptanceStatus, PersistedSuggestionData, Suggestion, SuggestionId,
    },
    ports::{SuggestionRepository, SuggestionRepositoryError, SuggestionRepositoryResult},
};
use crate::task::adapters::postgres::PgPool;
use crate::task::domain::{Priority, TaskId, TaskName, TaskStatus};
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed suggestion repository.
#[derive(Debug, Clone)]
pub struct PostgresSuggestionRepository {
    pool: PgPool,
}

impl PostgresSuggestionRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> SuggestionRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> SuggestionRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(SuggestionRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(SuggestionRepositoryError::persistence)?
    }
}

#[async_trait]
impl SuggestionRepository for PostgresSuggestionRepository {
    async fn store(&self, suggestion: &Suggestion) -> SuggestionRepositoryResult<()> {
        let suggestion_id = suggestion.id();
        let new_row = to_new_row(suggestion);

        self.run_blocking(move |connection| {
            diesel::insert_into(suggestions::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        SuggestionRepositoryError::DuplicateSuggestion(suggestion_id)
                    }
                    _ => SuggestionRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn store_batch(&self, batch: &[Suggestion]) -> SuggestionRepositoryResult<()> {
        let rows: Vec<NewSuggestionRow> = batch.iter().map(to_new_row).collect();

        self.run_blocking(move |connection| {
            // A single multi-row insert is atomic; either the whole batch
            // lands or none of it does.
            diesel::insert_into(suggestions::table)
                .values(&rows)
                .execute(connection)
                .map_err(SuggestionRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: SuggestionId,
    ) -> SuggestionRepositoryResult<Option<Suggestion>> {
        self.run_blocking(move |connection| {
            let row = suggestions::table
                .filter(suggestions::id.eq(id.into_inner()))
                .select(SuggestionRow::as_select())
                .first::<SuggestionRow>(connection)
                .optional()
                .map_err(SuggestionRepositoryError::persistence)?;
            row.map(row_to_suggestion).transpose()
        })
        .await
    }

    async fn find_by_owner(&self, owner: UserId) -> SuggestionRepositoryResult<Vec<Suggestion>> {
        self.run_blocking(move |connection| {
            let rows = suggestions::table
                .filter(suggestions::owner_id.eq(owner.into_inner()))
                .order(suggestions::created_at.asc())
                .select(SuggestionRow::as_select())
                .load::<SuggestionRow>(connection)
                .map_err(SuggestionRepositoryError::persistence)?;
            rows.into_iter().map(row_to_suggestion).collect()
        })
        .await
    }

    async fn find_pending_by_owner(
        &self,
        owner: UserId,
    ) -> SuggestionRepositoryResult<Vec<Suggestion>> {
        self.run_blocking(move |connection| {
            let rows = suggestions::table
                .filter(suggestions::owner_id.eq(owner.into_inner()))
                .filter(suggestions::acceptance_status.eq(AcceptanceStatus::Pending.as_str()))
                .order(suggestions::created_at.asc())
                .select(SuggestionRow::as_select())
                .load::<SuggestionRow>(connection)
                .map_err(SuggestionRepositoryError::persistence)?;
            rows.into_iter().map(row_to_suggestion).collect()
        })
        .await
    }

    async fn count_created_in(
        &self,
        owner: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SuggestionRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count: i64 = suggestions::table
                .filter(suggestions::owner_id.eq(owner.into_inner()))
                .filter(suggestions::created_at.ge(start))
                .filter(suggestions::created_at.lt(end))
                .count()
                .get_result(connection)
                .map_err(SuggestionRepositoryError::persistence)?;
            Ok(count.unsigned_abs())
        })
        .await
    }

    async fn count_deadline_in(
        &self,
        owner: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SuggestionRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count: i64 = suggestions::table
                .filter(suggestions::owner_id.eq(owner.into_inner()))
                .filter(suggestions::deadline.ge(start))
                .filter(suggestions::deadline.lt(end))
                .count()
                .get_result(connection)
                .map_err(SuggestionRepositoryError::persistence)?;
            Ok(count.unsigned_abs())
        })
        .await
    }

    async fn update_resolution(&self, suggestion: &Suggestion) -> SuggestionRepositoryResult<()> {
        let suggestion_id = suggestion.id();
        let acceptance = suggestion.acceptance().as_str().to_owned();
        let accepted_task = suggestion.accepted_task().map(TaskId::into_inner);
        let responded_at = suggestion.responded_at();
        let updated_at = suggestion.updated_at();

        self.run_blocking(move |connection| {
            // Guarded flip: only a still-pending row is updated, so the
            // loser of a concurrent resolution race observes zero
            // affected rows and reports the committed state.
            let updated = diesel::update(
                suggestions::table
                    .filter(suggestions::id.eq(suggestion_id.into_inner()))
                    .filter(
                        suggestions::acceptance_status.eq(AcceptanceStatus::Pending.as_str()),
                    ),
            )
            .set((
                suggestions::acceptance_status.eq(acceptance),
                suggestions::accepted_task_id.eq(accepted_task),
                suggestions::responded_at.eq(responded_at),
                suggestions::updated_at.eq(updated_at),
            ))
            .execute(connection)
            .map_err(SuggestionRepositoryError::persistence)?;

            if updated == 0 {
                let current: Option<String> = suggestions::table
                    .filter(suggestions::id.eq(suggestion_id.into_inner()))
                    .select(suggestions::acceptance_status)
                    .first(connection)
                    .optional()
                    .map_err(SuggestionRepositoryError::persistence)?;
                let Some(current) = current else {
                    return Err(SuggestionRepositoryError::NotFound(suggestion_id));
                };
                let current = AcceptanceStatus::try_from(current.as_str())
                    .map_err(SuggestionRepositoryError::persistence)?;
                return Err(SuggestionRepositoryError::AlreadyResolved {
                    id: suggestion_id,
                    current,
                });
            }
            Ok(())
        })
        .await
    }
}

fn to_new_row(suggestion: &Suggestion) -> NewSuggestionRow {
    NewSuggestionRow {
        id: suggestion.id().into_inner(),
        owner_id: suggestion.owner().into_inner(),
        name: suggestion.name().as_str().to_owned(),
        description: suggestion.description().to_owned(),
        deadline: suggestion.deadline(),
        priority: suggestion.priority().as_str().to_owned(),
        lifecycle_status: suggestion.lifecycle().as_str().to_owned(),
        acceptance_status: suggestion.acceptance().as_str().to_owned(),
        accepted_task_id: suggestion.accepted_task().map(TaskId::into_inner),
        raw_response: suggestion.raw_response().to_owned(),
        generator: suggestion.generator().to_owned(),
        created_at: suggestion.created_at(),
        updated_at: suggestion.updated_at(),
        responded_at: suggestion.responded_at(),
    }
}

fn row_to_suggestion(row: SuggestionRow) -> SuggestionRepositoryResult<Suggestion> {
    let name = TaskName::new(row.name).map_err(SuggestionRepositoryError::persistence)?;
    let priority = Priority::try_from(row.priority.as_str())
        .map_err(SuggestionRepositoryError::persistence)?;
    let lifecycle = TaskStatus::try_from(row.lifecycle_status.as_str())
        .map_err(SuggestionRepositoryError::persistence)?;
    let acceptance = AcceptanceStatus::try_from(row.acceptance_status.as_str())
        .map_err(SuggestionRepositoryError::persistence)?;

    let data = PersistedSuggestionData {
        id: SuggestionId::from_uuid(row.id),
        owner: UserId::from_uuid(row.owner_id),
        name,
        description: row.description,
        deadline: row.deadline,
        priority,
        lifecycle,
        acceptance,
        accepted_task: row.accepted_task_id.map(TaskId::from_uuid),
        raw_response: row.raw_response,
        generator: row.generator,
        created_at: row.created_at,
        updated_at: row.updated_at,
        responded_at: row.responded_at,
    };
    Ok(Suggestion::from_persisted(data))
}
