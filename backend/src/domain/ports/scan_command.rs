//! Driving ports for label analysis and scan recording.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Error, NewScanRecord, ScanId, ScanImage, UserId, UserKey};

/// Outcome of one analysis submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSubmission {
    /// Raw collaborator response, returned to the caller unchanged.
    pub report: Value,
    /// Identifier of the recorded scan; `None` when the analysis did not
    /// succeed or could not be mapped to a record.
    pub scan_id: Option<ScanId>,
}

/// Domain use-case port for submitting a label image.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanCommand: Send + Sync {
    /// Analyse the image against the caller's profile and record the result.
    async fn submit_scan(&self, user_id: &UserId, image: ScanImage)
    -> Result<ScanSubmission, Error>;

    /// Whether the analysis collaborator currently answers its health probe.
    async fn analysis_available(&self) -> bool;
}

/// Append-only recorder of completed analyses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanRecorder: Send + Sync {
    /// Persist one record for the user and return its id.
    async fn record(&self, key: UserKey, record: NewScanRecord) -> Result<ScanId, Error>;
}

/// Fixture command returning the canned report without recording it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureScanCommand;

#[async_trait]
impl ScanCommand for FixtureScanCommand {
    async fn submit_scan(
        &self,
        user_id: &UserId,
        image: ScanImage,
    ) -> Result<ScanSubmission, Error> {
        use super::{AnalysisGateway, FixtureAnalysisGateway, FixtureProfileQuery, ProfileQuery};
        use crate::domain::AnalysisProfile;

        let profile = FixtureProfileQuery.full_profile(user_id).await?;
        let profile = AnalysisProfile::from(&profile);
        let report = FixtureAnalysisGateway
            .analyse(&image, &profile)
            .await
            .map_err(|err| Error::internal(err.to_string()))?;
        Ok(ScanSubmission {
            report,
            scan_id: None,
        })
    }

    async fn analysis_available(&self) -> bool {
        true
    }
}
