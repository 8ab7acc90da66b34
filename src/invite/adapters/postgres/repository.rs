//! `PostgreSQL` repository implementation for invite storage.

use super::{
    models::{InviteRow, NewInviteRow},
    schema::task_share_invites as invites,
};
use crate::invite::{
    domain::{
        InviteId, InviteStatus, InviteToken, PersistedInviteData, TaskShareInvite,
    },
    ports::{InviteRepository, InviteRepositoryError, InviteRepositoryResult},
};
use crate::task::adapters::postgres::PgPool;
use crate::task::domain::TaskId;
use crate::user::domain::UserId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed invite repository.
#[derive(Debug, Clone)]
pub struct PostgresInviteRepository {
    pool: PgPool,
}

impl PostgresInviteRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> InviteRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> InviteRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(InviteRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(InviteRepositoryError::persistence)?
    }
}

#[async_trait]
impl InviteRepository for PostgresInviteRepository {
    async fn store(&self, invite: &TaskShareInvite) -> InviteRepositoryResult<()> {
        let invite_id = invite.id();
        let new_row = to_new_row(invite);

        self.run_blocking(move |connection| {
            diesel::insert_into(invites::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_token_unique_violation(info.as_ref()) =>
                    {
                        InviteRepositoryError::DuplicateToken
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        InviteRepositoryError::DuplicateInvite(invite_id)
                    }
                    _ => InviteRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_token(
        &self,
        token: &InviteToken,
    ) -> InviteRepositoryResult<Option<TaskShareInvite>> {
        let token = token.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = invites::table
                .filter(invites::token.eq(&token))
                .select(InviteRow::as_select())
                .first::<InviteRow>(connection)
                .optional()
                .map_err(InviteRepositoryError::persistence)?;
            row.map(row_to_invite).transpose()
        })
        .await
    }

    async fn has_pending_for(
        &self,
        receiver: UserId,
        task_id: TaskId,
    ) -> InviteRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let count: i64 = invites::table
                .filter(invites::receiver_id.eq(receiver.into_inner()))
                .filter(invites::task_id.eq(task_id.into_inner()))
                .filter(invites::status.eq(InviteStatus::Pending.as_str()))
                .count()
                .get_result(connection)
                .map_err(InviteRepositoryError::persistence)?;
            Ok(count > 0)
        })
        .await
    }

    async fn find_pending_by_receiver(
        &self,
        receiver: UserId,
    ) -> InviteRepositoryResult<Vec<TaskShareInvite>> {
        self.run_blocking(move |connection| {
            let rows = invites::table
                .filter(invites::receiver_id.eq(receiver.into_inner()))
                .filter(invites::status.eq(InviteStatus::Pending.as_str()))
                .order(invites::created_at.asc())
                .select(InviteRow::as_select())
                .load::<InviteRow>(connection)
                .map_err(InviteRepositoryError::persistence)?;
            rows.into_iter().map(row_to_invite).collect()
        })
        .await
    }

    async fn find_by_receiver(
        &self,
        receiver: UserId,
    ) -> InviteRepositoryResult<Vec<TaskShareInvite>> {
        self.run_blocking(move |connection| {
            let rows = invites::table
                .filter(invites::receiver_id.eq(receiver.into_inner()))
                .order(invites::created_at.asc())
                .select(InviteRow::as_select())
                .load::<InviteRow>(connection)
                .map_err(InviteRepositoryError::persistence)?;
            rows.into_iter().map(row_to_invite).collect()
        })
        .await
    }

    async fn find_by_sender(
        &self,
        sender: UserId,
    ) -> InviteRepositoryResult<Vec<TaskShareInvite>> {
        self.run_blocking(move |connection| {
            let rows = invites::table
                .filter(invites::sender_id.eq(sender.into_inner()))
                .order(invites::created_at.asc())
                .select(InviteRow::as_select())
                .load::<InviteRow>(connection)
                .map_err(InviteRepositoryError::persistence)?;
            rows.into_iter().map(row_to_invite).collect()
        })
        .await
    }

    async fn count_pending_by_receiver(&self, receiver: UserId) -> InviteRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count: i64 = invites::table
                .filter(invites::receiver_id.eq(receiver.into_inner()))
                .filter(invites::status.eq(InviteStatus::Pending.as_str()))
                .count()
                .get_result(connection)
                .map_err(InviteRepositoryError::persistence)?;
            Ok(count.unsigned_abs())
        })
        .await
    }

    async fn update_resolution(&self, invite: &TaskShareInvite) -> InviteRepositoryResult<()> {
        let invite_id = invite.id();
        let status = invite.status().as_str().to_owned();
        let shared_task = invite.shared_task().map(TaskId::into_inner);
        let responded_at = invite.responded_at();
        let updated_at = invite.updated_at();

        self.run_blocking(move |connection| {
            // Guarded flip: only a still-pending row is updated, which is
            // what makes the token single-use for mutation.
            let updated = diesel::update(
                invites::table
                    .filter(invites::id.eq(invite_id.into_inner()))
                    .filter(invites::status.eq(InviteStatus::Pending.as_str())),
            )
            .set((
                invites::status.eq(status),
                invites::shared_task_id.eq(shared_task),
                invites::responded_at.eq(responded_at),
                invites::updated_at.eq(updated_at),
            ))
            .execute(connection)
            .map_err(InviteRepositoryError::persistence)?;

            if updated == 0 {
                let current: Option<String> = invites::table
                    .filter(invites::id.eq(invite_id.into_inner()))
                    .select(invites::status)
                    .first(connection)
                    .optional()
                    .map_err(InviteRepositoryError::persistence)?;
                let Some(current) = current else {
                    return Err(InviteRepositoryError::NotFound(invite_id));
                };
                let current = InviteStatus::try_from(current.as_str())
                    .map_err(InviteRepositoryError::persistence)?;
                return Err(InviteRepositoryError::AlreadyResolved {
                    id: invite_id,
                    current,
                });
            }
            Ok(())
        })
        .await
    }
}

fn is_token_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name.contains("token"))
}

fn to_new_row(invite: &TaskShareInvite) -> NewInviteRow {
    NewInviteRow {
        id: invite.id().into_inner(),
        sender_id: invite.sender().into_inner(),
        receiver_id: invite.receiver().into_inner(),
        task_id: invite.task_id().into_inner(),
        status: invite.status().as_str().to_owned(),
        token: invite.token().as_str().to_owned(),
        responded_at: invite.responded_at(),
        shared_task_id: invite.shared_task().map(TaskId::into_inner),
        created_at: invite.created_at(),
        updated_at: invite.updated_at(),
    }
}

fn row_to_invite(row: InviteRow) -> InviteRepositoryResult<TaskShareInvite> {
    let status =
        InviteStatus::try_from(row.status.as_str()).map_err(InviteRepositoryError::persistence)?;
    let token = InviteToken::new(row.token).map_err(InviteRepositoryError::persistence)?;

    let data = PersistedInviteData {
        id: InviteId::from_uuid(row.id),
        sender: UserId::from_uuid(row.sender_id),
        receiver: UserId::from_uuid(row.receiver_id),
        task_id: TaskId::from_uuid(row.task_id),
        status,
        token,
        responded_at: row.responded_at,
        shared_task: row.shared_task_id.map(TaskId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    Ok(TaskShareInvite::from_persisted(data))
}
