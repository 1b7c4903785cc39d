//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed health-profile and scan-history model
//! used by the HTTP and persistence adapters, plus the services that
//! implement the driving ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - UserId / UserKey: external identifier and internal storage key.
//! - FullProfile, ProfileWithAllergies, ProfileUpdate, HealthMetricsUpdate.
//! - NewScanRecord / ScanRecord and the dashboard aggregates.

pub mod analysis;
pub mod catalog;
pub mod catalog_service;
pub mod dashboard;
pub mod dashboard_service;
pub mod error;
pub mod ports;
pub mod profile;
pub mod profile_service;
pub mod scan;
pub mod scan_service;
pub mod trace_id;
pub mod user;

pub use self::analysis::{
    AnalysisProfile, AnalysisReportError, MAX_IMAGE_BYTES, ScanImage, UNKNOWN_PRODUCT_NAME,
    report_succeeded, scan_record_from_report,
};
pub use self::catalog::{CatalogEntry, CatalogId, CatalogIdError, CatalogKind, CatalogSelection};
pub use self::catalog_service::CatalogService;
pub use self::dashboard::{
    AverageNutrition, DashboardStats, ParsePeriodError, Period, RiskDistribution, compute_stats,
};
pub use self::dashboard_service::DashboardService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::profile::{
    BodyMetrics, FieldUpdate, FullProfile, HealthMetricsUpdate, MEASUREMENT_MAX,
    ProfileIdentity, ProfileUpdate, ProfileWithAllergies, checked_measurement,
};
pub use self::profile_service::ProfileService;
pub use self::scan::{
    NewScanRecord, NutritionFacts, RiskLevel, RiskLevelParseError, ScanId, ScanRecord,
};
pub use self::scan_service::{ScanHistoryRecorder, ScanSubmissionService};
pub use self::trace_id::TraceId;
pub use self::user::{
    AGE_RANGE_MAX, AgeRange, DietType, Gender, PROFILE_NAME_MAX, ProfileName, UserId, UserKey,
    UserValidationError,
};

/// HTTP header carrying the per-request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use allergy_scan_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
