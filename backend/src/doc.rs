//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint, the response DTOs, and the
//! session cookie scheme. Swagger UI serves it in debug builds and the
//! `openapi_dump` binary prints it for external tooling.

use crate::inbound::http::dashboard::{
    AverageNutritionResponse, DashboardStatsResponse, RiskDistributionResponse,
    ScanHistoryItemResponse,
};
use crate::inbound::http::profile_dto::{
    CatalogEntryResponse, ConditionIdsRequest, DiseaseIdsRequest, FullProfileResponse,
    HealthMetricsRequest, ProfileResponse, ProfileUpdateRequest,
};
use crate::inbound::http::scans::{ScanSubmissionResponse, ScanUploadForm};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie carrying the signed-in user id.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Allergy scan backend API",
        description = "Health profiles, label scans, and dashboard summaries for signed-in users."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::profile::get_profile,
        crate::inbound::http::profile::update_profile,
        crate::inbound::http::profile::get_full_profile,
        crate::inbound::http::profile::update_health_metrics,
        crate::inbound::http::profile::list_diseases,
        crate::inbound::http::profile::replace_diseases,
        crate::inbound::http::profile::list_special_conditions,
        crate::inbound::http::profile::replace_special_conditions,
        crate::inbound::http::catalog::list_allergies,
        crate::inbound::http::catalog::list_diseases,
        crate::inbound::http::catalog::list_special_conditions,
        crate::inbound::http::dashboard::stats,
        crate::inbound::http::dashboard::history,
        crate::inbound::http::scans::submit_scan,
        crate::inbound::http::scans::analysis_health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CatalogEntryResponse,
        ProfileResponse,
        FullProfileResponse,
        ProfileUpdateRequest,
        HealthMetricsRequest,
        DiseaseIdsRequest,
        ConditionIdsRequest,
        RiskDistributionResponse,
        AverageNutritionResponse,
        DashboardStatsResponse,
        ScanHistoryItemResponse,
        ScanSubmissionResponse,
        ScanUploadForm,
    )),
    tags(
        (name = "profile", description = "Health profile of the signed-in user"),
        (name = "catalog", description = "Allergy, disease, and condition catalogs"),
        (name = "dashboard", description = "Scan history and aggregate statistics"),
        (name = "scans", description = "Label scans forwarded to the analysis service"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names.
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[rstest]
    #[case("DashboardStatsResponse", "allergen_frequency")]
    #[case("FullProfileResponse", "special_conditions")]
    #[case("ScanSubmissionResponse", "scan_id")]
    #[case("ScanUploadForm", "image")]
    fn response_schemas_expose_snake_case_fields(#[case] name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");

        assert_object_schema_has_field(schema, field);
    }

    #[rstest]
    #[case("/api/v1/profile")]
    #[case("/api/v1/profile/special-conditions")]
    #[case("/api/v1/allergies")]
    #[case("/api/v1/dashboard/stats")]
    #[case("/api/v1/scans")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn scan_upload_is_documented_as_a_multipart_form() {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get("/api/v1/scans").expect("scan path");
        let body = item
            .post
            .as_ref()
            .and_then(|operation| operation.request_body.as_ref())
            .expect("request body");

        assert!(body.content.contains_key("multipart/form-data"));
    }

    #[test]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");

        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
