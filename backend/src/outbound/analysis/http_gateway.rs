//! Reqwest-backed analysis gateway.
//!
//! This adapter owns transport details only: multipart encoding, timeout and
//! HTTP error mapping, and JSON decoding of the report. Interpreting the
//! report is left to the domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::ports::{AnalysisGateway, AnalysisGatewayError};
use crate::domain::{AnalysisProfile, ScanImage};

const UPLOAD_PATH: &str = "api/upload";
const HEALTH_PATH: &str = "health";

/// Analysis gateway posting images to one service base URL.
pub struct HttpAnalysisGateway {
    client: Client,
    upload_url: Url,
    health_url: Url,
}

impl HttpAnalysisGateway {
    /// Build a gateway for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns a message when the base URL cannot be joined with the service
    /// paths or the reqwest client cannot be constructed.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, String> {
        let base = with_trailing_slash(base_url);
        let upload_url = base
            .join(UPLOAD_PATH)
            .map_err(|err| format!("invalid analysis upload URL: {err}"))?;
        let health_url = base
            .join(HEALTH_PATH)
            .map_err(|err| format!("invalid analysis health URL: {err}"))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| format!("failed to build analysis client: {err}"))?;
        Ok(Self {
            client,
            upload_url,
            health_url,
        })
    }
}

fn with_trailing_slash(url: &Url) -> Url {
    let mut base = url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn build_form(image: &ScanImage, profile: &AnalysisProfile) -> Result<Form, AnalysisGatewayError> {
    let user_info = serde_json::to_string(profile).map_err(|err| {
        AnalysisGatewayError::transport(format!("failed to encode profile summary: {err}"))
    })?;
    let file = Part::bytes(image.bytes.clone())
        .file_name(image.filename.clone())
        .mime_str(&image.content_type)
        .map_err(|err| {
            AnalysisGatewayError::transport(format!("invalid image content type: {err}"))
        })?;
    Ok(Form::new().part("file", file).text("user_info", user_info))
}

#[async_trait]
impl AnalysisGateway for HttpAnalysisGateway {
    async fn analyse(
        &self,
        image: &ScanImage,
        profile: &AnalysisProfile,
    ) -> Result<Value, AnalysisGatewayError> {
        let form = build_form(image, profile)?;
        debug!(url = %self.upload_url, bytes = image.bytes.len(), "submitting image for analysis");

        let response = self
            .client
            .post(self.upload_url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_report(body.as_ref())
    }

    async fn is_healthy(&self) -> bool {
        match self.client.get(self.health_url.clone()).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                warn!(error = %err, "analysis health probe failed");
                false
            }
        }
    }
}

fn parse_report(body: &[u8]) -> Result<Value, AnalysisGatewayError> {
    serde_json::from_slice(body).map_err(|err| {
        AnalysisGatewayError::decode(format!("invalid analysis JSON payload: {err}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> AnalysisGatewayError {
    if error.is_timeout() {
        AnalysisGatewayError::transport(format!("request timed out: {error}"))
    } else {
        AnalysisGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AnalysisGatewayError {
    AnalysisGatewayError::status(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://analysis:8000", "http://analysis:8000/api/upload")]
    #[case("http://analysis:8000/", "http://analysis:8000/api/upload")]
    #[case("http://proxy/rag", "http://proxy/rag/api/upload")]
    fn upload_url_is_joined_under_the_base(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("valid base URL");
        let gateway =
            HttpAnalysisGateway::new(&base, Duration::from_secs(5)).expect("gateway builds");

        assert_eq!(gateway.upload_url.as_str(), expected);
        assert!(gateway.health_url.as_str().ends_with("/health"));
    }

    #[rstest]
    fn status_errors_carry_code_and_preview() {
        let error = map_status_error(StatusCode::BAD_GATEWAY, b"upstream   \n down");

        assert_eq!(
            error,
            AnalysisGatewayError::status(502_u16, "upstream down")
        );
    }

    #[rstest]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());

        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[rstest]
    fn invalid_json_is_a_decode_error() {
        let error = parse_report(b"<html>").expect_err("decode fails");

        assert!(matches!(error, AnalysisGatewayError::Decode { .. }));
    }

    #[rstest]
    fn form_rejects_malformed_content_type() {
        let image = ScanImage {
            bytes: vec![1, 2, 3],
            filename: "label.png".to_owned(),
            content_type: "not a mime".to_owned(),
        };
        let profile = AnalysisProfile {
            user_id: crate::domain::UserId::random(),
            diet_type: None,
            allergies: Vec::new(),
            height: None,
            weight: None,
            age_range: None,
            gender: None,
            diseases: Vec::new(),
            special_conditions: Vec::new(),
        };

        assert!(build_form(&image, &profile).is_err());
    }
}
