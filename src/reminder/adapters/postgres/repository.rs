//! `PostgreSQL` repository implementation for reminder storage.

use super::{
    models::{NewReminderRow, ReminderRow},
    schema::reminders,
};
use crate::reminder::{
    domain::{PersistedReminderData, Reminder, ReminderId},
    ports::{ReminderRepository, ReminderRepositoryError, ReminderRepositoryResult},
};
use crate::task::adapters::postgres::PgPool;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed reminder repository.
#[derive(Debug, Clone)]
pub struct PostgresReminderRepository {
    pool: PgPool,
}

impl PostgresReminderRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ReminderRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ReminderRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ReminderRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ReminderRepositoryError::persistence)?
    }
}

#[async_trait]
impl ReminderRepository for PostgresReminderRepository {
    async fn store(&self, reminder: &Reminder) -> ReminderRepositoryResult<()> {
        let reminder_id = reminder.id();
        let new_row = to_new_row(reminder);

        self.run_blocking(move |connection| {
            diesel::insert_into(reminders::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ReminderRepositoryError::DuplicateReminder(reminder_id)
                    }
                    _ => ReminderRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ReminderId) -> ReminderRepositoryResult<Option<Reminder>> {
        self.run_blocking(move |connection| {
            let row = reminders::table
                .filter(reminders::id.eq(id.into_inner()))
                .select(ReminderRow::as_select())
                .first::<ReminderRow>(connection)
                .optional()
                .map_err(ReminderRepositoryError::persistence)?;
            Ok(row.map(row_to_reminder))
        })
        .await
    }

    async fn find_by_task(&self, task_id: TaskId) -> ReminderRepositoryResult<Vec<Reminder>> {
        self.run_blocking(move |connection| {
            let rows = reminders::table
                .filter(reminders::task_id.eq(task_id.into_inner()))
                .order(reminders::fire_at.asc())
                .select(ReminderRow::as_select())
                .load::<ReminderRow>(connection)
                .map_err(ReminderRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_reminder).collect())
        })
        .await
    }

    async fn has_unsent_for_task(&self, task_id: TaskId) -> ReminderRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let count: i64 = reminders::table
                .filter(reminders::task_id.eq(task_id.into_inner()))
                .filter(reminders::sent.eq(false))
                .count()
                .get_result(connection)
                .map_err(ReminderRepositoryError::persistence)?;
            Ok(count > 0)
        })
        .await
    }

    async fn delete_unsent_for_task(&self, task_id: TaskId) -> ReminderRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                reminders::table
                    .filter(reminders::task_id.eq(task_id.into_inner()))
                    .filter(reminders::sent.eq(false)),
            )
            .execute(connection)
            .map_err(ReminderRepositoryError::persistence)?;
            Ok(deleted as u64)
        })
        .await
    }

    async fn find_unsent_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ReminderRepositoryResult<Vec<Reminder>> {
        self.run_blocking(move |connection| {
            let rows = reminders::table
                .filter(reminders::sent.eq(false))
                .filter(reminders::fire_at.ge(start))
                .filter(reminders::fire_at.lt(end))
                .order(reminders::fire_at.asc())
                .select(ReminderRow::as_select())
                .load::<ReminderRow>(connection)
                .map_err(ReminderRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_reminder).collect())
        })
        .await
    }

    async fn mark_sent(
        &self,
        id: ReminderId,
        sent_at: DateTime<Utc>,
    ) -> ReminderRepositoryResult<()> {
        self.run_blocking(move |connection| {
            // Guarded flip: only an unsent row is updated, so a second
            // dispatch attempt observes zero affected rows.
            let updated = diesel::update(
                reminders::table
                    .filter(reminders::id.eq(id.into_inner()))
                    .filter(reminders::sent.eq(false)),
            )
            .set((
                reminders::sent.eq(true),
                reminders::sent_at.eq(Some(sent_at)),
                reminders::updated_at.eq(sent_at),
            ))
            .execute(connection)
            .map_err(ReminderRepositoryError::persistence)?;

            if updated == 0 {
                let exists: i64 = reminders::table
                    .filter(reminders::id.eq(id.into_inner()))
                    .count()
                    .get_result(connection)
                    .map_err(ReminderRepositoryError::persistence)?;
                if exists == 0 {
                    return Err(ReminderRepositoryError::NotFound(id));
                }
                return Err(ReminderRepositoryError::AlreadySent(id));
            }
            Ok(())
        })
        .await
    }
}

fn to_new_row(reminder: &Reminder) -> NewReminderRow {
    NewReminderRow {
        id: reminder.id().into_inner(),
        task_id: reminder.task_id().into_inner(),
        fire_at: reminder.fire_at(),
        sent: reminder.is_sent(),
        sent_at: reminder.sent_at(),
        created_at: reminder.created_at(),
        updated_at: reminder.updated_at(),
    }
}

fn row_to_reminder(row: ReminderRow) -> Reminder {
    Reminder::from_persisted(PersistedReminderData {
        id: ReminderId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        fire_at: row.fire_at,
        sent: row.sent,
        sent_at: row.sent_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
