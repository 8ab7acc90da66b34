//! Service orchestration tests for task CRUD and reminder upkeep.

use std::sync::Arc;

use crate::reminder::adapters::memory::InMemoryReminderRepository;
use crate::reminder::ports::ReminderRepository;
use crate::reminder::services::ReminderEngine;
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Priority, Task, TaskStatus},
    ports::TaskFilter,
    services::{CreateTaskRequest, TaskLifecycleError, TaskLifecycleService, UpdateTaskRequest},
};
use crate::user::{
    adapters::memory::InMemoryUserRepository,
    domain::{EmailAddress, User, UserId},
    ports::UserRepository,
};
use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryUserRepository,
    InMemoryReminderRepository,
    DefaultClock,
>;

struct Harness {
    service: TestService,
    reminders: Arc<InMemoryReminderRepository>,
    users: Arc<InMemoryUserRepository>,
}

#[fixture]
fn harness() -> Harness {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let reminders = Arc::new(InMemoryReminderRepository::new());
    let clock = Arc::new(DefaultClock);
    let engine = ReminderEngine::new(Arc::clone(&reminders), Arc::clone(&clock));
    let service = TaskLifecycleService::new(
        tasks,
        Arc::clone(&users),
        engine,
        clock,
    );
    Harness {
        service,
        reminders,
        users,
    }
}

async fn register_user(users: &InMemoryUserRepository, email: &str) -> eyre::Result<UserId> {
    let user = User::new(
        UserId::new(),
        EmailAddress::new(email).map_err(|err| eyre::eyre!(err))?,
        "Test",
        "User",
    )
    .map_err(|err| eyre::eyre!(err))?;
    users
        .store(&user)
        .await
        .map_err(|err| eyre::eyre!(err.to_string()))?;
    Ok(user.id())
}

async fn create_task_with_deadline(
    harness: &Harness,
    owner: UserId,
    days_ahead: i64,
) -> eyre::Result<Task> {
    let request = CreateTaskRequest::new(owner, "Prepare presentation")
        .with_description("Slides and speaker notes")
        .with_deadline(Utc::now() + Duration::days(days_ahead))
        .with_priority(Priority::High);
    Ok(harness.service.create(request).await?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_persists_task_and_schedules_reminder(harness: Harness) -> eyre::Result<()> {
    let owner = register_user(&harness.users, "owner@example.com").await?;

    let task = create_task_with_deadline(&harness, owner, 7).await?;

    let fetched = harness.service.get(task.id(), owner).await?;
    assert_eq!(fetched, task);

    let reminders = harness.reminders.find_by_task(task.id()).await?;
    assert_eq!(reminders.len(), 1);
    let deadline = task.deadline().ok_or_else(|| eyre::eyre!("deadline set"))?;
    assert_eq!(reminders[0].fire_at(), deadline - Duration::days(1));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_without_deadline_schedules_nothing(harness: Harness) -> eyre::Result<()> {
    let owner = register_user(&harness.users, "owner@example.com").await?;

    let task = harness
        .service
        .create(CreateTaskRequest::new(owner, "Untimed"))
        .await?;

    assert!(harness.reminders.find_by_task(task.id()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_rejects_unknown_owner(harness: Harness) {
    let result = harness
        .service
        .create(CreateTaskRequest::new(UserId::new(), "Orphan"))
        .await;
    assert!(matches!(result, Err(TaskLifecycleError::UserNotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn get_rejects_foreign_owner(harness: Harness) -> eyre::Result<()> {
    let owner = register_user(&harness.users, "owner@example.com").await?;
    let stranger = register_user(&harness.users, "stranger@example.com").await?;
    let task = create_task_with_deadline(&harness, owner, 7).await?;

    let result = harness.service.get(task.id(), stranger).await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Unauthorized { .. })
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deadline_change_reschedules_reminder(harness: Harness) -> eyre::Result<()> {
    let owner = register_user(&harness.users, "owner@example.com").await?;
    let task = create_task_with_deadline(&harness, owner, 7).await?;
    let original_reminder = harness.reminders.find_by_task(task.id()).await?[0].clone();

    let new_deadline = Utc::now() + Duration::days(14);
    let updated = harness
        .service
        .update(
            task.id(),
            owner,
            UpdateTaskRequest {
                name: "Prepare presentation".to_owned(),
                description: "Slides and speaker notes".to_owned(),
                deadline: Some(new_deadline),
                priority: Priority::High,
            },
        )
        .await?;

    assert_eq!(updated.deadline(), Some(new_deadline));
    let reminders = harness.reminders.find_by_task(task.id()).await?;
    assert_eq!(reminders.len(), 1);
    assert_ne!(reminders[0].id(), original_reminder.id());
    assert_eq!(reminders[0].fire_at(), new_deadline - Duration::days(1));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_without_deadline_change_keeps_reminder(harness: Harness) -> eyre::Result<()> {
    let owner = register_user(&harness.users, "owner@example.com").await?;
    let task = create_task_with_deadline(&harness, owner, 7).await?;
    let original_reminder = harness.reminders.find_by_task(task.id()).await?[0].clone();
    let deadline = task.deadline();

    harness
        .service
        .update(
            task.id(),
            owner,
            UpdateTaskRequest {
                name: "Prepare presentation v2".to_owned(),
                description: "New outline".to_owned(),
                deadline,
                priority: Priority::Medium,
            },
        )
        .await?;

    let reminders = harness.reminders.find_by_task(task.id()).await?;
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].id(), original_reminder.id());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_task_cancels_reminder(harness: Harness) -> eyre::Result<()> {
    let owner = register_user(&harness.users, "owner@example.com").await?;
    let task = create_task_with_deadline(&harness, owner, 7).await?;

    let completed = harness.service.set_completed(task.id(), owner, true).await?;

    assert!(completed.is_completed());
    assert_eq!(completed.status(), TaskStatus::Completed);
    assert!(harness.reminders.find_by_task(task.id()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_task_and_reminder(harness: Harness) -> eyre::Result<()> {
    let owner = register_user(&harness.users, "owner@example.com").await?;
    let task = create_task_with_deadline(&harness, owner, 7).await?;

    harness.service.delete(task.id(), owner).await?;

    let result = harness.service.get(task.id(), owner).await;
    assert!(matches!(result, Err(TaskLifecycleError::NotFound(_))));
    assert!(harness.reminders.find_by_task(task.id()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filtered_listing_applies_criteria(harness: Harness) -> eyre::Result<()> {
    let owner = register_user(&harness.users, "owner@example.com").await?;
    let urgent = create_task_with_deadline(&harness, owner, 3).await?;
    harness
        .service
        .create(
            CreateTaskRequest::new(owner, "Background reading").with_priority(Priority::Low),
        )
        .await?;

    let high_priority = harness
        .service
        .list_filtered(owner, &TaskFilter::new().with_priority(Priority::High))
        .await?;
    assert_eq!(high_priority.len(), 1);
    assert_eq!(high_priority[0].id(), urgent.id());

    let due_soon = harness
        .service
        .list_filtered(
            owner,
            &TaskFilter::new().with_due_between(Utc::now(), Utc::now() + Duration::days(5)),
        )
        .await?;
    assert_eq!(due_soon.len(), 1);

    let all = harness.service.list(owner).await?;
    assert_eq!(all.len(), 2);
    Ok(())
}
