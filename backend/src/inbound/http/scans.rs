//! Label scan handlers.
//!
//! ```text
//! POST /api/v1/scans                      (multipart/form-data, part `image`)
//! GET  /api/v1/scans/analysis-health
//! ```

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, get, http::header, post, web};
use futures_util::StreamExt;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::domain::{Error, MAX_IMAGE_BYTES, ScanImage};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const IMAGE_FIELD: &str = "image";
const DEFAULT_FILENAME: &str = "label";

/// Multipart form accepted by [`submit_scan`].
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ScanUploadForm {
    /// Label photo; the part must declare an `image/*` content type.
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}

/// Result of a scan submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanSubmissionResponse {
    pub filename: String,
    /// Id of the stored history record; absent when the analysis failed or
    /// its report could not be recorded.
    pub scan_id: Option<i64>,
    /// The analysis service's report, unchanged.
    #[schema(value_type = Object)]
    pub analysis: Value,
}

fn invalid_upload(message: &str, err: &dyn std::fmt::Display) -> Error {
    debug!(error = %err, "{message}");
    Error::invalid_request(message).with_details(json!({
        "field": IMAGE_FIELD,
        "code": "invalid_multipart",
    }))
}

fn missing_image() -> Error {
    Error::invalid_request("no image uploaded").with_details(json!({
        "field": IMAGE_FIELD,
        "code": "missing_image",
    }))
}

fn image_too_large() -> Error {
    Error::invalid_request(format!("image exceeds {MAX_IMAGE_BYTES} bytes")).with_details(json!({
        "field": IMAGE_FIELD,
        "code": "image_too_large",
    }))
}

fn image_content_type(field: &Field) -> Result<String, Error> {
    let content_type = field
        .content_type()
        .map(ToString::to_string)
        .unwrap_or_default();
    if content_type.to_ascii_lowercase().starts_with("image/") {
        Ok(content_type)
    } else {
        Err(Error::invalid_request("only image uploads are accepted").with_details(json!({
            "field": IMAGE_FIELD,
            "value": content_type,
            "code": "unsupported_media_type",
        })))
    }
}

fn is_image_field(field: &Field) -> bool {
    field
        .content_disposition()
        .is_some_and(|disposition| disposition.get_name() == Some(IMAGE_FIELD))
}

fn upload_filename(field: &Field) -> String {
    field
        .content_disposition()
        .and_then(|disposition| disposition.get_filename())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_FILENAME)
        .to_owned()
}

/// Read the first `image` part; other parts are skipped.
async fn read_image(mut payload: Multipart) -> Result<ScanImage, Error> {
    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|err| invalid_upload("failed to read upload form", &err))?;
        if !is_image_field(&field) {
            continue;
        }

        let content_type = image_content_type(&field)?;
        let filename = upload_filename(&field);
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|err| invalid_upload("failed to read image part", &err))?;
            if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(image_too_large());
            }
            bytes.extend_from_slice(&chunk);
        }
        if bytes.is_empty() {
            return Err(missing_image());
        }
        return Ok(ScanImage {
            bytes,
            filename,
            content_type,
        });
    }
    Err(missing_image())
}

/// Submit a label image for analysis and record the outcome.
#[utoipa::path(
    post,
    path = "/api/v1/scans",
    request_body(
        content = ScanUploadForm,
        content_type = "multipart/form-data",
        description = "Label photo in the `image` part"
    ),
    responses(
        (status = 200, description = "Analysis report", body = ScanSubmissionResponse),
        (status = 400, description = "Missing, oversized, or non-image upload", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 503, description = "Analysis service unavailable", body = ErrorSchema)
    ),
    tags = ["scans"],
    operation_id = "submitScan"
)]
#[post("/scans")]
pub async fn submit_scan(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Multipart,
) -> ApiResult<web::Json<ScanSubmissionResponse>> {
    let user_id = session.require_user_id()?;
    let image = read_image(payload).await?;
    let filename = image.filename.clone();

    let submission = state.scans.submit_scan(&user_id, image).await?;
    info!(%user_id, recorded = submission.scan_id.is_some(), "scan analysed");
    Ok(web::Json(ScanSubmissionResponse {
        filename,
        scan_id: submission.scan_id.map(|id| id.get()),
        analysis: submission.report,
    }))
}

/// Report whether the external analysis service is reachable.
#[utoipa::path(
    get,
    path = "/api/v1/scans/analysis-health",
    responses(
        (status = 200, description = "Analysis service reachable"),
        (status = 503, description = "Analysis service unavailable", body = ErrorSchema)
    ),
    tags = ["scans"],
    operation_id = "analysisHealth"
)]
#[get("/scans/analysis-health")]
pub async fn analysis_health(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    if state.scans.analysis_available().await {
        Ok(HttpResponse::Ok()
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(json!({"status": "healthy"})))
    } else {
        Err(Error::service_unavailable("analysis service is unavailable"))
    }
}
