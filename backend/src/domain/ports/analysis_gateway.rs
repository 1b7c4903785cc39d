//! Driven port for the external label-analysis service.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::domain::{AnalysisProfile, ScanImage};

use super::define_port_error;

define_port_error! {
    /// Errors raised by analysis gateway adapters.
    pub enum AnalysisGatewayError {
        /// The service could not be reached or timed out.
        Transport { message: String } =>
            "analysis service unreachable: {message}",
        /// The service answered with a non-success status.
        Status { status: u16, message: String } =>
            "analysis service returned {status}: {message}",
        /// The response body was not valid JSON.
        Decode { message: String } =>
            "analysis response could not be decoded: {message}",
    }
}

/// Port for submitting label images for analysis.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    /// Submit an image with the user's profile summary and return the raw
    /// JSON report.
    async fn analyse(
        &self,
        image: &ScanImage,
        profile: &AnalysisProfile,
    ) -> Result<Value, AnalysisGatewayError>;

    /// Probe the service health endpoint.
    async fn is_healthy(&self) -> bool;
}

/// Gateway returning a canned green report; used without a configured service.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAnalysisGateway;

#[async_trait]
impl AnalysisGateway for FixtureAnalysisGateway {
    async fn analyse(
        &self,
        image: &ScanImage,
        _profile: &AnalysisProfile,
    ) -> Result<Value, AnalysisGatewayError> {
        Ok(json!({
            "status": "success",
            "product_name": image.filename,
            "risk_level": "green",
            "risk_score": 0,
            "risk_reason": "fixture analysis",
            "analysis": {
                "nutrition": {},
                "detected_ingredients": [],
                "allergen_warnings": [],
                "diet_warnings": []
            }
        }))
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}
