//! Dashboard aggregation service.
//!
//! Statistics are computed per request over the windowed history; records
//! are immutable, so there is nothing to keep in sync between requests.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    DashboardQuery, ScanHistoryRepository, ScanHistoryRepositoryError, UserProfileRepository,
};
use crate::domain::profile_service::resolve_user_key;
use crate::domain::{DashboardStats, Error, Period, ScanRecord, UserId, compute_stats};

/// Dashboard service implementing [`DashboardQuery`].
#[derive(Clone)]
pub struct DashboardService<U, S> {
    users: Arc<U>,
    scans: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<U, S> DashboardService<U, S> {
    /// Create a new service.
    pub fn new(users: Arc<U>, scans: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            scans,
            clock,
        }
    }
}

/// Map scan history failures onto domain errors.
pub(crate) fn map_scan_history_error(error: ScanHistoryRepositoryError) -> Error {
    match error {
        ScanHistoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("scan history unavailable: {message}"))
        }
        ScanHistoryRepositoryError::Query { message } => {
            Error::internal(format!("scan history error: {message}"))
        }
        ScanHistoryRepositoryError::Encoding { message } => {
            Error::internal(format!("scan history encoding failed: {message}"))
        }
    }
}

impl<U, S> DashboardService<U, S>
where
    U: UserProfileRepository,
    S: ScanHistoryRepository,
{
    async fn windowed_records(
        &self,
        user_id: &UserId,
        period: Period,
    ) -> Result<Vec<ScanRecord>, Error> {
        let key = resolve_user_key(self.users.as_ref(), user_id).await?;
        let since = period.window_start(self.clock.utc());
        let records = self
            .scans
            .list_since(key, since)
            .await
            .map_err(map_scan_history_error)?;
        debug!(%user_id, %period, count = records.len(), "loaded scan window");
        Ok(records)
    }
}

#[async_trait]
impl<U, S> DashboardQuery for DashboardService<U, S>
where
    U: UserProfileRepository,
    S: ScanHistoryRepository,
{
    async fn stats(&self, user_id: &UserId, period: Period) -> Result<DashboardStats, Error> {
        let records = self.windowed_records(user_id, period).await?;
        Ok(compute_stats(period, &records))
    }

    async fn history(&self, user_id: &UserId, period: Period) -> Result<Vec<ScanRecord>, Error> {
        self.windowed_records(user_id, period).await
    }
}

#[cfg(test)]
#[path = "dashboard_service_tests.rs"]
mod tests;
