//! Profile HTTP handlers.
//!
//! ```text
//! GET   /api/v1/profile
//! PATCH /api/v1/profile
//! GET   /api/v1/profile/full
//! PATCH /api/v1/profile/health
//! GET   /api/v1/profile/diseases
//! PUT   /api/v1/profile/diseases
//! GET   /api/v1/profile/special-conditions
//! PUT   /api/v1/profile/special-conditions
//! ```

use actix_web::{HttpResponse, get, patch, put, web};
use tracing::info;

use crate::domain::{CatalogKind, HealthMetricsUpdate, ProfileUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::profile_dto::{
    CatalogEntryResponse, ConditionIdsRequest, DiseaseIdsRequest, FullProfileResponse,
    HealthMetricsRequest, ProfileResponse, ProfileUpdateRequest, entry_responses,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, required_catalog_ids};

const PRIVATE_NO_CACHE: (&str, &str) = ("Cache-Control", "private, must-revalidate, no-cache");

/// Fetch the caller's profile with editable allergy rows.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "getProfile"
)]
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let profile = state.profile.profile_with_allergies(&user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(PRIVATE_NO_CACHE)
        .json(ProfileResponse::from(profile)))
}

/// Update name, diet type, and optionally the whole allergy set.
#[utoipa::path(
    patch,
    path = "/api/v1/profile",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Update rolled back", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "updateProfile"
)]
#[patch("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileUpdateRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user_id = session.require_user_id()?;
    let update = ProfileUpdate::try_from(payload.into_inner())?;
    let profile = state
        .profile_command
        .update_profile(&user_id, update)
        .await?;
    info!(%user_id, "profile updated");
    Ok(web::Json(ProfileResponse::from(profile)))
}

/// Fetch the complete health profile.
#[utoipa::path(
    get,
    path = "/api/v1/profile/full",
    responses(
        (status = 200, description = "Full profile", body = FullProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "getFullProfile"
)]
#[get("/profile/full")]
pub async fn get_full_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let profile = state.profile.full_profile(&user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(PRIVATE_NO_CACHE)
        .json(FullProfileResponse::from(profile)))
}

/// Update body metrics.
#[utoipa::path(
    patch,
    path = "/api/v1/profile/health",
    request_body = HealthMetricsRequest,
    responses(
        (status = 200, description = "Refreshed full profile", body = FullProfileResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "updateHealthMetrics"
)]
#[patch("/profile/health")]
pub async fn update_health_metrics(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<HealthMetricsRequest>,
) -> ApiResult<web::Json<FullProfileResponse>> {
    let user_id = session.require_user_id()?;
    let update = HealthMetricsUpdate::try_from(payload.into_inner())?;
    let profile = state
        .profile_command
        .update_health_metrics(&user_id, update)
        .await?;
    Ok(web::Json(FullProfileResponse::from(profile)))
}

async fn list_associated(
    state: &HttpState,
    session: &SessionContext,
    kind: CatalogKind,
) -> ApiResult<web::Json<Vec<CatalogEntryResponse>>> {
    let user_id = session.require_user_id()?;
    let entries = state.profile.associated_entries(&user_id, kind).await?;
    Ok(web::Json(entry_responses(entries)))
}

/// The caller's diseases.
#[utoipa::path(
    get,
    path = "/api/v1/profile/diseases",
    responses(
        (status = 200, description = "Associated diseases", body = [CatalogEntryResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "listProfileDiseases"
)]
#[get("/profile/diseases")]
pub async fn list_diseases(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CatalogEntryResponse>>> {
    list_associated(&state, &session, CatalogKind::Disease).await
}

/// Replace the caller's disease set.
#[utoipa::path(
    put,
    path = "/api/v1/profile/diseases",
    request_body = DiseaseIdsRequest,
    responses(
        (status = 200, description = "New disease set", body = [CatalogEntryResponse]),
        (status = 400, description = "Invalid or unknown ids", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "replaceProfileDiseases"
)]
#[put("/profile/diseases")]
pub async fn replace_diseases(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DiseaseIdsRequest>,
) -> ApiResult<web::Json<Vec<CatalogEntryResponse>>> {
    let user_id = session.require_user_id()?;
    let selection =
        required_catalog_ids(payload.into_inner().disease_ids, FieldName::new("disease_ids"))?;
    let entries = state
        .profile_command
        .replace_associations(&user_id, CatalogKind::Disease, selection)
        .await?;
    Ok(web::Json(entry_responses(entries)))
}

/// The caller's special conditions.
#[utoipa::path(
    get,
    path = "/api/v1/profile/special-conditions",
    responses(
        (status = 200, description = "Associated conditions", body = [CatalogEntryResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "listProfileSpecialConditions"
)]
#[get("/profile/special-conditions")]
pub async fn list_special_conditions(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CatalogEntryResponse>>> {
    list_associated(&state, &session, CatalogKind::SpecialCondition).await
}

/// Replace the caller's special-condition set.
#[utoipa::path(
    put,
    path = "/api/v1/profile/special-conditions",
    request_body = ConditionIdsRequest,
    responses(
        (status = 200, description = "New condition set", body = [CatalogEntryResponse]),
        (status = 400, description = "Invalid or unknown ids", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "replaceProfileSpecialConditions"
)]
#[put("/profile/special-conditions")]
pub async fn replace_special_conditions(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ConditionIdsRequest>,
) -> ApiResult<web::Json<Vec<CatalogEntryResponse>>> {
    let user_id = session.require_user_id()?;
    let selection = required_catalog_ids(
        payload.into_inner().condition_ids,
        FieldName::new("condition_ids"),
    )?;
    let entries = state
        .profile_command
        .replace_associations(&user_id, CatalogKind::SpecialCondition, selection)
        .await?;
    Ok(web::Json(entry_responses(entries)))
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
