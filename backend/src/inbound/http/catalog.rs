//! Catalog listing handlers.
//!
//! ```text
//! GET /api/v1/allergies
//! GET /api/v1/diseases
//! GET /api/v1/special-conditions
//! ```
//!
//! Catalogs are public reference data, so these routes do not require a
//! session.

use actix_web::{HttpResponse, get, web};

use crate::domain::CatalogKind;
use crate::inbound::http::ApiResult;
use crate::inbound::http::profile_dto::{CatalogEntryResponse, entry_responses};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

async fn list(state: &HttpState, kind: CatalogKind) -> ApiResult<HttpResponse> {
    let entries = state.catalog.list_catalog(kind).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "public, max-age=300"))
        .json(entry_responses(entries)))
}

/// Every allergy, ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/allergies",
    responses(
        (status = 200, description = "Allergy catalog", body = [CatalogEntryResponse]),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "listAllergies"
)]
#[get("/allergies")]
pub async fn list_allergies(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    list(&state, CatalogKind::Allergy).await
}

/// Every disease, ordered by display name.
#[utoipa::path(
    get,
    path = "/api/v1/diseases",
    responses(
        (status = 200, description = "Disease catalog", body = [CatalogEntryResponse]),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "listDiseases"
)]
#[get("/diseases")]
pub async fn list_diseases(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    list(&state, CatalogKind::Disease).await
}

/// Every special condition, ordered by display name.
#[utoipa::path(
    get,
    path = "/api/v1/special-conditions",
    responses(
        (status = 200, description = "Special-condition catalog", body = [CatalogEntryResponse]),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "listSpecialConditions"
)]
#[get("/special-conditions")]
pub async fn list_special_conditions(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    list(&state, CatalogKind::SpecialCondition).await
}
