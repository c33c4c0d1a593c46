use study_core::Clock;
use study_core::stats::{self, DayBucket};
use storage::session_store::SessionStore;

use crate::error::SessionServiceError;

/// Largest week offset the chart can navigate back to.
pub const MAX_WEEK_OFFSET: u32 = 10;

/// Headline numbers for the statistics screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub total_hours: f64,
    pub average_daily_hours: f64,
    pub session_count: usize,
    pub today_secs: u64,
}

/// Computes derived statistics from a fresh store snapshot on every call.
#[derive(Clone)]
pub struct StatsService {
    clock: Clock,
    store: SessionStore,
}

impl StatsService {
    #[must_use]
    pub fn new(clock: Clock, store: SessionStore) -> Self {
        Self { clock, store }
    }

    /// Totals across all history plus today's progress seconds.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Storage` on storage failures.
    #[allow(clippy::cast_precision_loss)]
    pub async fn overview(&self) -> Result<Overview, SessionServiceError> {
        let sessions = self.store.load_all().await?;
        Ok(Overview {
            total_hours: stats::total_duration(&sessions) as f64 / 3600.0,
            average_daily_hours: stats::average_daily_hours(&sessions),
            session_count: sessions.len(),
            today_secs: stats::total_duration_on(&sessions, self.clock.today()),
        })
    }

    /// Seven Sunday-to-Saturday buckets for the selected week.
    ///
    /// The offset is clamped to `[0, MAX_WEEK_OFFSET]` here so the pure
    /// aggregator never sees an out-of-range window.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Storage` on storage failures.
    pub async fn weekly_chart(
        &self,
        week_offset: u32,
    ) -> Result<Vec<DayBucket>, SessionServiceError> {
        let offset = week_offset.min(MAX_WEEK_OFFSET);
        let sessions = self.store.load_all().await?;
        Ok(stats::weekly_buckets(&sessions, offset, self.clock.today()))
    }
}
