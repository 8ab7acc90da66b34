//! Unit tests for the monthly quota tracker.

use std::sync::Arc;

use crate::suggestion::{
    adapters::memory::InMemorySuggestionRepository,
    domain::{NewSuggestionParams, Suggestion, SuggestionId},
    ports::{
        SuggestionRepository, SuggestionRepositoryError, SuggestionRepositoryResult,
    },
    services::{QuotaBasis, QuotaConfig, QuotaTracker, month_window},
};
use crate::task::domain::{Priority, TaskName};
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::rstest;

fn tracker_with(
    repository: Arc<InMemorySuggestionRepository>,
    config: QuotaConfig,
) -> QuotaTracker<InMemorySuggestionRepository, DefaultClock> {
    QuotaTracker::new(repository, Arc::new(DefaultClock), config)
}

fn suggestion_for(owner: UserId, deadline: Option<DateTime<Utc>>) -> eyre::Result<Suggestion> {
    let params = NewSuggestionParams {
        owner,
        name: TaskName::new("Quota probe").map_err(|err| eyre::eyre!(err))?,
        description: String::new(),
        deadline,
        priority: Priority::Medium,
        raw_response: "[]".to_owned(),
        generator: "test-model".to_owned(),
    };
    Ok(Suggestion::new(params, &DefaultClock))
}

#[rstest]
#[case(2025, 3, 15, 2025, 3, 1, 2025, 4, 1)]
#[case(2025, 12, 31, 2025, 12, 1, 2026, 1, 1)]
#[case(2025, 1, 1, 2025, 1, 1, 2025, 2, 1)]
fn month_window_covers_the_calendar_month(
    #[case] year: i32,
    #[case] month: u32,
    #[case] day: u32,
    #[case] start_year: i32,
    #[case] start_month: u32,
    #[case] start_day: u32,
    #[case] end_year: i32,
    #[case] end_month: u32,
    #[case] end_day: u32,
) {
    let now = Utc
        .with_ymd_and_hms(year, month, day, 13, 45, 0)
        .single()
        .unwrap_or_default();

    let (start, end) = month_window(now);

    assert_eq!(
        Some(start),
        Utc.with_ymd_and_hms(start_year, start_month, start_day, 0, 0, 0)
            .single()
    );
    assert_eq!(
        Some(end),
        Utc.with_ymd_and_hms(end_year, end_month, end_day, 0, 0, 0)
            .single()
    );
    assert!(start <= now && now < end);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remaining_decreases_with_usage_and_never_goes_negative() -> eyre::Result<()> {
    let repository = Arc::new(InMemorySuggestionRepository::new());
    let owner = UserId::new();
    let tracker = tracker_with(
        Arc::clone(&repository),
        QuotaConfig {
            monthly_limit: 3,
            basis: QuotaBasis::CreatedAt,
        },
    );

    assert_eq!(tracker.remaining(owner).await, 3);

    for _ in 0..2 {
        repository.store(&suggestion_for(owner, None)?).await?;
    }
    assert_eq!(tracker.remaining(owner).await, 1);
    assert!(tracker.can_request(owner).await);

    for _ in 0..2 {
        repository.store(&suggestion_for(owner, None)?).await?;
    }
    assert_eq!(tracker.remaining(owner).await, 0);
    assert!(!tracker.can_request(owner).await);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn usage_is_scoped_per_user() -> eyre::Result<()> {
    let repository = Arc::new(InMemorySuggestionRepository::new());
    let heavy_user = UserId::new();
    let light_user = UserId::new();
    let tracker = tracker_with(
        Arc::clone(&repository),
        QuotaConfig {
            monthly_limit: 2,
            basis: QuotaBasis::CreatedAt,
        },
    );

    repository.store(&suggestion_for(heavy_user, None)?).await?;
    repository.store(&suggestion_for(heavy_user, None)?).await?;

    assert_eq!(tracker.remaining(heavy_user).await, 0);
    assert_eq!(tracker.remaining(light_user).await, 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deadline_basis_ignores_suggestions_without_deadline() -> eyre::Result<()> {
    let repository = Arc::new(InMemorySuggestionRepository::new());
    let owner = UserId::new();
    let tracker = tracker_with(
        Arc::clone(&repository),
        QuotaConfig {
            monthly_limit: 5,
            basis: QuotaBasis::Deadline,
        },
    );

    let (window_start, _) = month_window(Utc::now());
    let in_window = window_start + Duration::hours(1);
    repository
        .store(&suggestion_for(owner, Some(in_window))?)
        .await?;
    repository.store(&suggestion_for(owner, None)?).await?;

    assert_eq!(tracker.remaining(owner).await, 4);
    Ok(())
}

/// Repository whose every operation fails, for deny-on-error coverage.
#[derive(Debug, Default)]
struct FailingSuggestionRepository;

impl FailingSuggestionRepository {
    fn outage<T>() -> SuggestionRepositoryResult<T> {
        Err(SuggestionRepositoryError::persistence(std::io::Error::other(
            "storage offline",
        )))
    }
}

#[async_trait]
impl SuggestionRepository for FailingSuggestionRepository {
    async fn store(&self, _suggestion: &Suggestion) -> SuggestionRepositoryResult<()> {
        Self::outage()
    }

    async fn store_batch(&self, _suggestions: &[Suggestion]) -> SuggestionRepositoryResult<()> {
        Self::outage()
    }

    async fn find_by_id(
        &self,
        _id: SuggestionId,
    ) -> SuggestionRepositoryResult<Option<Suggestion>> {
        Self::outage()
    }

    async fn find_by_owner(&self, _owner: UserId) -> SuggestionRepositoryResult<Vec<Suggestion>> {
        Self::outage()
    }

    async fn find_pending_by_owner(
        &self,
        _owner: UserId,
    ) -> SuggestionRepositoryResult<Vec<Suggestion>> {
        Self::outage()
    }

    async fn count_created_in(
        &self,
        _owner: UserId,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> SuggestionRepositoryResult<u64> {
        Self::outage()
    }

    async fn count_deadline_in(
        &self,
        _owner: UserId,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> SuggestionRepositoryResult<u64> {
        Self::outage()
    }

    async fn update_resolution(
        &self,
        _suggestion: &Suggestion,
    ) -> SuggestionRepositoryResult<()> {
        Self::outage()
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn count_failure_reads_as_deny() {
    let tracker = QuotaTracker::new(
        Arc::new(FailingSuggestionRepository),
        Arc::new(DefaultClock),
        QuotaConfig::default(),
    );
    let user = UserId::new();

    assert_eq!(tracker.remaining(user).await, 0);
    assert!(!tracker.can_request(user).await);
}
