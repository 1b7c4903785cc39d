//! Scan recording and analysis submission services.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::dashboard_service::map_scan_history_error;
use crate::domain::ports::{
    AnalysisGateway, AnalysisGatewayError, ScanCommand, ScanHistoryRepository, ScanRecorder,
    ScanSubmission, UserProfileRepository,
};
use crate::domain::profile_service::{map_profile_repository_error, resolve_user_key};
use crate::domain::{
    AnalysisProfile, Error, NewScanRecord, ScanId, ScanImage, UserId, UserKey,
    report_succeeded, scan_record_from_report,
};

/// Append-only writer of scan history records.
#[derive(Clone)]
pub struct ScanHistoryRecorder<S> {
    scans: Arc<S>,
}

impl<S> ScanHistoryRecorder<S> {
    /// Create a recorder backed by `scans`.
    pub fn new(scans: Arc<S>) -> Self {
        Self { scans }
    }
}

#[async_trait]
impl<S> ScanRecorder for ScanHistoryRecorder<S>
where
    S: ScanHistoryRepository,
{
    async fn record(&self, key: UserKey, record: NewScanRecord) -> Result<ScanId, Error> {
        let id = self
            .scans
            .append(key, &record)
            .await
            .map_err(map_scan_history_error)?;
        info!(
            scan_id = id.get(),
            risk_level = %record.risk_level,
            "scan recorded"
        );
        Ok(id)
    }
}

fn map_gateway_error(error: AnalysisGatewayError) -> Error {
    match error {
        AnalysisGatewayError::Transport { message } => {
            Error::service_unavailable(format!("analysis service unavailable: {message}"))
        }
        AnalysisGatewayError::Status { status, message } => {
            Error::service_unavailable(format!("analysis service rejected the image: {message}"))
                .with_details(json!({ "upstreamStatus": status }))
        }
        AnalysisGatewayError::Decode { message } => {
            Error::internal(format!("analysis response unreadable: {message}"))
        }
    }
}

/// Orchestrates one analysis: profile summary, collaborator call, recording.
#[derive(Clone)]
pub struct ScanSubmissionService<U, G: ?Sized, R> {
    users: Arc<U>,
    gateway: Arc<G>,
    recorder: Arc<R>,
}

impl<U, G: ?Sized, R> ScanSubmissionService<U, G, R> {
    /// Create a new submission service.
    pub fn new(users: Arc<U>, gateway: Arc<G>, recorder: Arc<R>) -> Self {
        Self {
            users,
            gateway,
            recorder,
        }
    }
}

#[async_trait]
impl<U, G, R> ScanCommand for ScanSubmissionService<U, G, R>
where
    U: UserProfileRepository,
    G: AnalysisGateway + ?Sized,
    R: ScanRecorder,
{
    async fn submit_scan(
        &self,
        user_id: &UserId,
        image: ScanImage,
    ) -> Result<ScanSubmission, Error> {
        let key = resolve_user_key(self.users.as_ref(), user_id).await?;
        let profile = self
            .users
            .full_profile(key)
            .await
            .map_err(map_profile_repository_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;
        let summary = AnalysisProfile::from(&profile);

        let report = self
            .gateway
            .analyse(&image, &summary)
            .await
            .map_err(map_gateway_error)?;

        if !report_succeeded(&report) {
            info!(%user_id, "analysis did not succeed; nothing recorded");
            return Ok(ScanSubmission {
                report,
                scan_id: None,
            });
        }

        let scan_id = match scan_record_from_report(&report) {
            Ok(record) => Some(self.recorder.record(key, record).await?),
            Err(err) => {
                warn!(%user_id, error = %err, "analysis report could not be recorded");
                None
            }
        };
        Ok(ScanSubmission { report, scan_id })
    }

    async fn analysis_available(&self) -> bool {
        self.gateway.is_healthy().await
    }
}

#[cfg(test)]
#[path = "scan_service_tests.rs"]
mod tests;
