//! Driving port for dashboard statistics and history.

use async_trait::async_trait;

use crate::domain::{DashboardStats, Error, Period, ScanRecord, UserId, compute_stats};

/// Domain use-case port for windowed scan analytics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Aggregate statistics over the user's scans in `period`.
    async fn stats(&self, user_id: &UserId, period: Period) -> Result<DashboardStats, Error>;

    /// The user's scans in `period`, newest first.
    async fn history(&self, user_id: &UserId, period: Period) -> Result<Vec<ScanRecord>, Error>;
}

/// Fixture query over an empty history.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDashboardQuery;

#[async_trait]
impl DashboardQuery for FixtureDashboardQuery {
    async fn stats(&self, _user_id: &UserId, period: Period) -> Result<DashboardStats, Error> {
        Ok(compute_stats(period, &[]))
    }

    async fn history(&self, _user_id: &UserId, _period: Period) -> Result<Vec<ScanRecord>, Error> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_stats_are_empty() {
        let stats = FixtureDashboardQuery
            .stats(&UserId::random(), Period::Month)
            .await
            .expect("fixture stats");

        assert_eq!(stats.period, Period::Month);
        assert_eq!(stats.scan_count, 0);
        assert_eq!(stats.avg_nutrition.calories, "0.0");
    }
}
