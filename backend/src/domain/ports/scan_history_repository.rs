//! Driven port for the append-only scan history log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewScanRecord, ScanId, ScanRecord, UserKey};

use super::define_port_error;

define_port_error! {
    /// Errors raised by scan history repository adapters.
    pub enum ScanHistoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "scan history connection failed: {message}",
        /// Query or insert failed during execution.
        Query { message: String } =>
            "scan history query failed: {message}",
        /// A record could not be encoded for storage.
        Encoding { message: String } =>
            "scan history encoding failed: {message}",
    }
}

/// Port for appending and reading scan records.
///
/// There is intentionally no update or delete: a record is a historical fact.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanHistoryRepository: Send + Sync {
    /// Persist one record and return its generated id.
    async fn append(
        &self,
        key: UserKey,
        record: &NewScanRecord,
    ) -> Result<ScanId, ScanHistoryRepositoryError>;

    /// Records scanned at or after `since` (all records when `None`),
    /// newest first. List fields that fail to decode are returned empty.
    async fn list_since(
        &self,
        key: UserKey,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ScanRecord>, ScanHistoryRepositoryError>;
}
