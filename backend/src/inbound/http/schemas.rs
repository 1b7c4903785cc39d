//! OpenAPI schemas for domain types that stay free of `utoipa` derives.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No signed-in user.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Signed in but not permitted.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The user or resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with stored state.
    #[schema(rename = "conflict")]
    Conflict,
    /// The database or analysis service is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected server-side failure.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "period must be one of week, month, all")]
    message: String,
    /// Request correlation identifier.
    #[schema(example = "6e3f5c1a-0d3b-4b7e-8f4e-2d9c1a7b5e10")]
    trace_id: Option<String>,
    /// Field-level context such as `{field, value, code}`.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_schema_registers_under_the_domain_name() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        let json = schema_json::<ErrorSchema>();
        assert!(json.contains("message"));
        assert!(json.contains("details"));
    }

    #[test]
    fn error_code_schema_lists_dependency_failures() {
        let json = schema_json::<ErrorCodeSchema>();
        for code in ["invalid_request", "not_found", "service_unavailable", "internal_error"] {
            assert!(json.contains(code), "missing {code}");
        }
    }
}
