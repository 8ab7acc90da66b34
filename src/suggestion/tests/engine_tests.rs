//! Orchestration tests for the suggestion engine.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::reminder::adapters::memory::InMemoryReminderRepository;
use crate::reminder::ports::ReminderRepository;
use crate::reminder::services::ReminderEngine;
use crate::suggestion::{
    adapters::memory::InMemorySuggestionRepository,
    domain::{AcceptanceStatus, Suggestion},
    ports::{
        GeneratorError, GeneratorResult, SuggestionRepository, TextGenerator,
    },
    services::{
        QuotaBasis, QuotaConfig, QuotaTracker, SuggestionEngine, SuggestionEngineError,
        build_prompt,
    },
};
use crate::task::{adapters::memory::InMemoryTaskRepository, ports::TaskRepository};
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::rstest;

const DOCKER_BATCH: &str = r#"[
  {"name": "Install Docker Desktop", "description": "Download and install Docker", "deadline": "2030-01-02T09:00:00Z", "priority": "high"},
  {"name": "Learn images and containers", "description": "Work through the getting-started guide", "deadline": "2030-01-04T09:00:00Z", "priority": "medium"},
  {"name": "Write a Dockerfile", "description": "Containerize a small web app", "deadline": "2030-01-07T09:00:00Z", "priority": "high"},
  {"name": "Use docker compose", "description": "Multi-service local setup", "deadline": "2030-01-10T09:00:00Z", "priority": "medium"},
  {"name": "Push an image to a registry", "description": "Tag and publish", "deadline": "2030-01-13T09:00:00Z", "priority": "low"}
]"#;

/// Generator fake replaying scripted replies in order.
struct ScriptedGenerator {
    replies: Mutex<VecDeque<GeneratorResult<String>>>,
}

impl ScriptedGenerator {
    fn with_replies(replies: Vec<GeneratorResult<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn model_id(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, _prompt: &str) -> GeneratorResult<String> {
        self.replies
            .lock()
            .map_err(|err| GeneratorError::Transport(err.to_string()))?
            .pop_front()
            .unwrap_or_else(|| Err(GeneratorError::Transport("script exhausted".to_owned())))
    }
}

type TestEngine = SuggestionEngine<
    InMemorySuggestionRepository,
    InMemoryTaskRepository,
    InMemoryReminderRepository,
    ScriptedGenerator,
    DefaultClock,
>;

struct Harness {
    engine: TestEngine,
    suggestions: Arc<InMemorySuggestionRepository>,
    tasks: Arc<InMemoryTaskRepository>,
    reminders: Arc<InMemoryReminderRepository>,
}

fn harness_with(replies: Vec<GeneratorResult<String>>, monthly_limit: u32) -> Harness {
    let suggestions = Arc::new(InMemorySuggestionRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let reminders = Arc::new(InMemoryReminderRepository::new());
    let clock = Arc::new(DefaultClock);
    let quota = QuotaTracker::new(
        Arc::clone(&suggestions),
        Arc::clone(&clock),
        QuotaConfig {
            monthly_limit,
            basis: QuotaBasis::CreatedAt,
        },
    );
    let engine = SuggestionEngine::new(
        Arc::clone(&suggestions),
        Arc::clone(&tasks),
        ReminderEngine::new(Arc::clone(&reminders), Arc::clone(&clock)),
        Arc::new(ScriptedGenerator::with_replies(replies)),
        quota,
        clock,
    );
    Harness {
        engine,
        suggestions,
        tasks,
        reminders,
    }
}

fn docker_harness() -> Harness {
    harness_with(vec![Ok(DOCKER_BATCH.to_owned())], 50)
}

async fn generate_docker_batch(harness: &Harness, user: UserId) -> eyre::Result<Vec<Suggestion>> {
    Ok(harness
        .engine
        .generate(user, "learn Docker in 2 weeks", None)
        .await?
        .suggestions)
}

#[rstest]
fn prompt_is_deterministic_and_carries_inputs() {
    let first = build_prompt("learn Docker", Some("evenings only"));
    let second = build_prompt("learn Docker", Some("evenings only"));

    assert_eq!(first, second);
    assert!(first.contains("Request: learn Docker"));
    assert!(first.contains("Context: evenings only"));
    assert!(build_prompt("learn Docker", None).contains("Request: learn Docker"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn generate_persists_pending_batch_and_decrements_quota() -> eyre::Result<()> {
    let harness = docker_harness();
    let user = UserId::new();

    let generated = harness
        .engine
        .generate(user, "learn Docker in 2 weeks", None)
        .await?;

    assert_eq!(generated.count, 5);
    assert_eq!(generated.message, "5 suggestion(s) generated");

    let stored = harness.suggestions.find_by_owner(user).await?;
    assert_eq!(stored.len(), 5);
    for suggestion in &stored {
        assert_eq!(suggestion.acceptance(), AcceptanceStatus::Pending);
        assert_eq!(suggestion.owner(), user);
        assert_eq!(suggestion.generator(), "scripted-model");
        assert_eq!(suggestion.raw_response(), DOCKER_BATCH);
    }

    let quota = harness.engine.quota_status(user).await;
    assert_eq!(quota.remaining, 45);
    assert!(quota.can_request);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accept_materializes_task_with_reminder() -> eyre::Result<()> {
    let harness = docker_harness();
    let user = UserId::new();
    let generated = generate_docker_batch(&harness, user).await?;
    let third = &generated[2];

    let task = harness.engine.accept(third.id(), user).await?;

    assert_eq!(task.owner(), user);
    assert_eq!(task.name(), third.name());
    assert_eq!(task.description(), third.description());
    assert_eq!(task.deadline(), third.deadline());
    assert_eq!(task.priority(), third.priority());
    assert!(!task.is_completed());

    // Bidirectional provenance link.
    assert_eq!(task.origin().suggestion_id(), Some(third.id()));
    let resolved = harness
        .suggestions
        .find_by_id(third.id())
        .await?
        .ok_or_else(|| eyre::eyre!("suggestion should exist"))?;
    assert_eq!(resolved.acceptance(), AcceptanceStatus::Accepted);
    assert_eq!(resolved.accepted_task(), Some(task.id()));
    assert!(resolved.responded_at().is_some());

    // Reminder scheduled one day ahead of the deadline.
    let reminders = harness.reminders.find_by_task(task.id()).await?;
    assert_eq!(reminders.len(), 1);
    assert_eq!(
        Some(reminders[0].fire_at()),
        Utc.with_ymd_and_hms(2030, 1, 6, 9, 0, 0).single()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn terminal_transitions_commit_at_most_once() -> eyre::Result<()> {
    let harness = docker_harness();
    let user = UserId::new();
    let generated = generate_docker_batch(&harness, user).await?;
    let target = generated[0].id();

    let task = harness.engine.accept(target, user).await?;

    let second_accept = harness.engine.accept(target, user).await;
    assert!(matches!(
        second_accept,
        Err(SuggestionEngineError::AlreadyResolved {
            current: AcceptanceStatus::Accepted,
            ..
        })
    ));

    let late_decline = harness.engine.decline(target, user).await;
    assert!(matches!(
        late_decline,
        Err(SuggestionEngineError::AlreadyResolved {
            current: AcceptanceStatus::Accepted,
            ..
        })
    ));

    // Persisted state still matches the first successful call.
    let resolved = harness
        .suggestions
        .find_by_id(target)
        .await?
        .ok_or_else(|| eyre::eyre!("suggestion should exist"))?;
    assert_eq!(resolved.acceptance(), AcceptanceStatus::Accepted);
    assert_eq!(resolved.accepted_task(), Some(task.id()));
    assert_eq!(harness.tasks.find_by_owner(user).await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn decline_records_response_without_side_effects() -> eyre::Result<()> {
    let harness = docker_harness();
    let user = UserId::new();
    let generated = generate_docker_batch(&harness, user).await?;
    let target = generated[1].id();

    let declined = harness.engine.decline(target, user).await?;

    assert_eq!(declined.acceptance(), AcceptanceStatus::Declined);
    assert!(declined.accepted_task().is_none());
    assert!(declined.responded_at().is_some());
    assert!(harness.tasks.find_by_owner(user).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accept_rejects_foreign_owner() -> eyre::Result<()> {
    let harness = docker_harness();
    let owner = UserId::new();
    let stranger = UserId::new();
    let generated = generate_docker_batch(&harness, owner).await?;

    let result = harness.engine.accept(generated[0].id(), stranger).await;

    assert!(matches!(
        result,
        Err(SuggestionEngineError::Unauthorized { .. })
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accept_unknown_suggestion_is_not_found() {
    let harness = docker_harness();
    let result = harness
        .engine
        .accept(crate::suggestion::domain::SuggestionId::new(), UserId::new())
        .await;
    assert!(matches!(result, Err(SuggestionEngineError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn batch_accept_reports_partial_success() -> eyre::Result<()> {
    let harness = docker_harness();
    let user = UserId::new();
    let generated = generate_docker_batch(&harness, user).await?;
    let unknown = crate::suggestion::domain::SuggestionId::new();
    let ids = vec![generated[0].id(), unknown, generated[1].id()];

    let batch = harness.engine.accept_batch(&ids, user).await;

    assert_eq!(batch.accepted.len(), 2);
    assert_eq!(batch.failed.len(), 1);
    assert_eq!(batch.failed[0].suggestion_id, unknown);
    assert!(batch.failed[0].reason.contains("not found"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn quota_exhaustion_denies_generation() -> eyre::Result<()> {
    let harness = harness_with(
        vec![Ok(DOCKER_BATCH.to_owned()), Ok(DOCKER_BATCH.to_owned())],
        3,
    );
    let user = UserId::new();

    generate_docker_batch(&harness, user).await?;

    let denied = harness
        .engine
        .generate(user, "more tasks please", None)
        .await;
    assert!(matches!(
        denied,
        Err(SuggestionEngineError::QuotaExceeded { limit: 3 })
    ));

    let quota = harness.engine.quota_status(user).await;
    assert_eq!(quota.remaining, 0);
    assert!(!quota.can_request);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn generator_failure_persists_nothing() -> eyre::Result<()> {
    let harness = harness_with(
        vec![Err(GeneratorError::Status {
            code: 503,
            body: "overloaded".to_owned(),
        })],
        50,
    );
    let user = UserId::new();

    let result = harness.engine.generate(user, "learn Docker", None).await;

    assert!(matches!(
        result,
        Err(SuggestionEngineError::GenerationFailed(_))
    ));
    assert!(harness.suggestions.find_by_owner(user).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unparseable_reply_persists_nothing() -> eyre::Result<()> {
    let harness = harness_with(vec![Ok("I cannot help with that.".to_owned())], 50);
    let user = UserId::new();

    let result = harness.engine.generate(user, "learn Docker", None).await;

    assert!(matches!(
        result,
        Err(SuggestionEngineError::GenerationFailed(_))
    ));
    assert!(harness.suggestions.find_by_owner(user).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn analytics_aggregates_without_mutating() -> eyre::Result<()> {
    let harness = docker_harness();
    let user = UserId::new();
    let generated = generate_docker_batch(&harness, user).await?;
    harness.engine.accept(generated[0].id(), user).await?;
    harness.engine.decline(generated[1].id(), user).await?;

    let analytics = harness.engine.analytics(user).await?;

    assert_eq!(analytics.total, 5);
    assert_eq!(analytics.accepted, 1);
    assert_eq!(analytics.declined, 1);
    assert_eq!(analytics.pending, 3);
    assert!((analytics.acceptance_rate - 50.0).abs() < f64::EPSILON);
    assert_eq!(analytics.recent_30d, 5);

    assert_eq!(harness.engine.pending_for(user).await?.len(), 3);
    assert_eq!(harness.engine.all_for(user).await?.len(), 5);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reminder_too_close_to_deadline_is_skipped_on_accept() -> eyre::Result<()> {
    let soon = (Utc::now() + Duration::hours(6)).to_rfc3339();
    let batch = format!(
        r#"[{{"name": "Last minute", "description": "due soon", "deadline": "{soon}", "priority": "high"}}]"#
    );
    let harness = harness_with(vec![Ok(batch)], 50);
    let user = UserId::new();
    let generated = generate_docker_batch(&harness, user).await?;

    let task = harness.engine.accept(generated[0].id(), user).await?;

    assert!(harness.reminders.find_by_task(task.id()).await?.is_empty());
    Ok(())
}
