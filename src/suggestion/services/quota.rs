//! Monthly suggestion quota tracking.

use crate::suggestion::ports::SuggestionRepository;
use crate::user::domain::UserId;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use mockable::Clock;
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

/// Which timestamp anchors a suggestion inside the quota window.
///
/// The legacy system counted by each suggestion's *deadline*, which
/// conflates "when was it requested" with "when is it due" and skips
/// suggestions without a deadline entirely. Creation time is the
/// default here; the deadline basis stays available until stakeholders
/// confirm the legacy behaviour was unintended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaBasis {
    /// Count suggestions by creation timestamp.
    #[default]
    CreatedAt,
    /// Count suggestions by deadline (legacy behaviour).
    Deadline,
}

/// Quota ceiling and counting basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuotaConfig {
    /// Maximum suggestions per user per calendar month.
    pub monthly_limit: u32,
    /// Which timestamp anchors a suggestion inside the window.
    pub basis: QuotaBasis,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            monthly_limit: 50,
            basis: QuotaBasis::default(),
        }
    }
}

/// Point-in-time quota snapshot for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaStatus {
    /// Suggestions still available this month.
    pub remaining: u32,
    /// Whether another generation request is allowed.
    pub can_request: bool,
}

/// Returns the calendar-month window `[start, next_month_start)`
/// containing `now`.
#[must_use]
pub fn month_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let date = now.date_naive();
    let start = date
        .with_day(1)
        .unwrap_or(date)
        .and_time(NaiveTime::MIN)
        .and_utc();
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .unwrap_or(start);
    (start, end)
}

/// Read-only gate over a user's monthly suggestion allowance.
///
/// The tracker never signals failure: when the count query errors it
/// reports zero remaining, so "cannot verify" reads as "deny" and a
/// storage outage cannot open unbounded generator spend.
#[derive(Clone)]
pub struct QuotaTracker<S, C>
where
    S: SuggestionRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<S>,
    clock: Arc<C>,
    config: QuotaConfig,
}

impl<S, C> QuotaTracker<S, C>
where
    S: SuggestionRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new quota tracker.
    #[must_use]
    pub const fn new(repository: Arc<S>, clock: Arc<C>, config: QuotaConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Returns the configured monthly ceiling.
    #[must_use]
    pub const fn monthly_limit(&self) -> u32 {
        self.config.monthly_limit
    }

    /// Returns how many suggestions the user may still generate this
    /// month. Never goes below zero; reports zero when the count cannot
    /// be verified.
    pub async fn remaining(&self, user: UserId) -> u32 {
        let (start, end) = month_window(self.clock.utc());
        let counted = match self.config.basis {
            QuotaBasis::CreatedAt => self.repository.count_created_in(user, start, end).await,
            QuotaBasis::Deadline => self.repository.count_deadline_in(user, start, end).await,
        };
        match counted {
            Ok(count) => {
                let count = u32::try_from(count).unwrap_or(u32::MAX);
                self.config.monthly_limit.saturating_sub(count)
            }
            Err(err) => {
                warn!(%user, error = %err, "quota count failed; denying generation");
                0
            }
        }
    }

    /// Returns `true` while the user has allowance left this month.
    pub async fn can_request(&self, user: UserId) -> bool {
        self.remaining(user).await > 0
    }

    /// Returns the remaining allowance and request gate together.
    pub async fn status(&self, user: UserId) -> QuotaStatus {
        let remaining = self.remaining(user).await;
        QuotaStatus {
            remaining,
            can_request: remaining > 0,
        }
    }
}
