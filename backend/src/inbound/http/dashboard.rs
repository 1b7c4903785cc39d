//! Dashboard handlers.
//!
//! ```text
//! GET /api/v1/dashboard/stats?period=week|month|all
//! GET /api/v1/dashboard/history?period=week|month|all
//! ```
//!
//! `period` defaults to `week`; any other value is rejected before the
//! dashboard port runs.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{DashboardStats, ScanRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_period;

/// Dashboard query string.
#[derive(Debug, Deserialize, IntoParams)]
pub struct PeriodQuery {
    /// One of `week`, `month`, `all`.
    #[param(example = "month")]
    pub period: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RiskDistributionResponse {
    pub green: u64,
    pub yellow: u64,
    pub red: u64,
}

/// Averages rendered with one decimal place.
#[derive(Debug, Serialize, ToSchema)]
pub struct AverageNutritionResponse {
    #[schema(example = "200.0")]
    pub calories: String,
    pub carbs: String,
    pub protein: String,
    pub fat: String,
}

/// Statistics over the selected window.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStatsResponse {
    #[schema(example = "week")]
    pub period: String,
    pub scan_count: u64,
    pub risk_distribution: RiskDistributionResponse,
    pub avg_nutrition: AverageNutritionResponse,
    /// Allergen name to number of scans that detected it.
    pub allergen_frequency: BTreeMap<String, u64>,
    /// Scans with at least one diet warning.
    pub diet_violation_count: u64,
}

impl From<DashboardStats> for DashboardStatsResponse {
    fn from(summary: DashboardStats) -> Self {
        Self {
            period: summary.period.as_str().to_owned(),
            scan_count: summary.scan_count,
            risk_distribution: RiskDistributionResponse {
                green: summary.risk_distribution.green,
                yellow: summary.risk_distribution.yellow,
                red: summary.risk_distribution.red,
            },
            avg_nutrition: AverageNutritionResponse {
                calories: summary.avg_nutrition.calories,
                carbs: summary.avg_nutrition.carbs,
                protein: summary.avg_nutrition.protein,
                fat: summary.avg_nutrition.fat,
            },
            allergen_frequency: summary.allergen_frequency,
            diet_violation_count: summary.diet_violation_count,
        }
    }
}

/// One stored scan with every list decoded.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanHistoryItemResponse {
    pub id: i64,
    pub product_name: String,
    #[schema(example = "yellow")]
    pub risk_level: String,
    pub risk_score: i32,
    pub risk_reason: String,
    pub calories: Option<f64>,
    pub carbs: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub detected_ingredients: Vec<String>,
    pub detected_allergens: Vec<String>,
    pub diet_warnings: Vec<String>,
    /// Raw analysis report kept for audit.
    #[schema(value_type = Object)]
    pub analysis_payload: Value,
    pub scanned_at: DateTime<Utc>,
}

impl From<ScanRecord> for ScanHistoryItemResponse {
    fn from(record: ScanRecord) -> Self {
        Self {
            id: record.id.get(),
            product_name: record.product_name,
            risk_level: record.risk_level.as_str().to_owned(),
            risk_score: record.risk_score,
            risk_reason: record.risk_reason,
            calories: record.nutrition.calories,
            carbs: record.nutrition.carbs,
            protein: record.nutrition.protein,
            fat: record.nutrition.fat,
            detected_ingredients: record.detected_ingredients,
            detected_allergens: record.detected_allergens,
            diet_warnings: record.diet_warnings,
            analysis_payload: record.analysis_payload,
            scanned_at: record.scanned_at,
        }
    }
}

/// Windowed scan statistics for the caller.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Statistics", body = DashboardStatsResponse),
        (status = 400, description = "Invalid period", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "getDashboardStats"
)]
#[get("/dashboard/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PeriodQuery>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let period = parse_period(query.period.as_deref())?;
    let summary = state.dashboard.stats(&user_id, period).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "private, no-store"))
        .json(DashboardStatsResponse::from(summary)))
}

/// Windowed scan history for the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/history",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Scan history", body = [ScanHistoryItemResponse]),
        (status = 400, description = "Invalid period", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "getDashboardHistory"
)]
#[get("/dashboard/history")]
pub async fn history(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PeriodQuery>,
) -> ApiResult<web::Json<Vec<ScanHistoryItemResponse>>> {
    let user_id = session.require_user_id()?;
    let period = parse_period(query.period.as_deref())?;
    let records = state.dashboard.history(&user_id, period).await?;
    Ok(web::Json(
        records
            .into_iter()
            .map(ScanHistoryItemResponse::from)
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ports::MockDashboardQuery;
    use crate::domain::{
        NutritionFacts, Period, RiskLevel, ScanId, UserId, compute_stats,
    };
    use crate::inbound::http::test_utils::{signed_in_cookie, test_app};

    fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(stats).service(history);
    }

    fn record(id: i64, risk_level: RiskLevel, calories: Option<f64>) -> ScanRecord {
        ScanRecord {
            id: ScanId::new(id),
            product_name: format!("Product {id}"),
            risk_level,
            risk_score: 40,
            risk_reason: "contains milk".to_owned(),
            nutrition: NutritionFacts {
                calories,
                ..NutritionFacts::default()
            },
            detected_ingredients: vec!["milk".to_owned()],
            detected_allergens: vec!["milk".to_owned()],
            diet_warnings: Vec::new(),
            analysis_payload: json!({"status": "success"}),
            scanned_at: Utc
                .with_ymd_and_hms(2026, 3, 12, 8, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    fn state_with(dashboard: MockDashboardQuery) -> HttpState {
        HttpState {
            dashboard: Arc::new(dashboard),
            ..HttpState::default()
        }
    }

    #[test]
    fn stats_response_carries_every_aggregate() {
        let mut flagged = record(2, RiskLevel::Red, Some(300.0));
        flagged.diet_warnings = vec!["vegan".to_owned()];
        let summary = compute_stats(
            Period::Month,
            &[record(1, RiskLevel::Yellow, Some(100.0)), flagged],
        );

        let response = DashboardStatsResponse::from(summary);

        assert_eq!(response.period, "month");
        assert_eq!(response.scan_count, 2);
        assert_eq!(response.risk_distribution.yellow, 1);
        assert_eq!(response.risk_distribution.red, 1);
        assert_eq!(response.avg_nutrition.calories, "200.0");
        assert_eq!(response.avg_nutrition.fat, "0.0");
        assert_eq!(response.allergen_frequency.get("milk"), Some(&2));
        assert_eq!(response.diet_violation_count, 1);
    }

    #[rstest]
    #[case("/api/v1/dashboard/stats", Period::Week)]
    #[case("/api/v1/dashboard/stats?period=month", Period::Month)]
    #[case("/api/v1/dashboard/stats?period=all", Period::All)]
    #[actix_web::test]
    async fn stats_forward_the_requested_period(#[case] uri: &str, #[case] expected: Period) {
        let mut dashboard = MockDashboardQuery::new();
        dashboard
            .expect_stats()
            .withf(move |_, period| *period == expected)
            .times(1)
            .returning(|_, period| {
                let records = [
                    record(1, RiskLevel::Green, Some(100.0)),
                    record(2, RiskLevel::Green, None),
                    record(3, RiskLevel::Red, Some(300.0)),
                ];
                Ok(compute_stats(period, &records))
            });
        let app = actix_test::init_service(test_app(state_with(dashboard), configure)).await;
        let cookie = signed_in_cookie(&app, &UserId::random()).await;

        let request = actix_test::TestRequest::get()
            .uri(uri)
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["period"], expected.as_str());
        assert_eq!(body["scan_count"], 3);
        assert_eq!(
            body["risk_distribution"],
            json!({"green": 2, "yellow": 0, "red": 1})
        );
        assert_eq!(body["avg_nutrition"]["calories"], "200.0");
        assert_eq!(body["allergen_frequency"], json!({"milk": 3}));
    }

    #[rstest]
    #[case("/api/v1/dashboard/stats?period=year")]
    #[case("/api/v1/dashboard/history?period=WEEK")]
    #[case("/api/v1/dashboard/history?period=")]
    #[actix_web::test]
    async fn invalid_period_is_rejected_before_the_port(#[case] uri: &str) {
        let mut dashboard = MockDashboardQuery::new();
        dashboard.expect_stats().times(0);
        dashboard.expect_history().times(0);
        let app = actix_test::init_service(test_app(state_with(dashboard), configure)).await;
        let cookie = signed_in_cookie(&app, &UserId::random()).await;

        let request = actix_test::TestRequest::get()
            .uri(uri)
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["code"], "invalid_period");
    }

    #[actix_web::test]
    async fn history_returns_decoded_records_in_port_order() {
        let mut dashboard = MockDashboardQuery::new();
        dashboard.expect_history().times(1).returning(|_, _| {
            Ok(vec![
                record(9, RiskLevel::Yellow, None),
                record(4, RiskLevel::Green, Some(120.0)),
            ])
        });
        let app = actix_test::init_service(test_app(state_with(dashboard), configure)).await;
        let cookie = signed_in_cookie(&app, &UserId::random()).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/dashboard/history?period=all")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body[0]["id"], 9);
        assert_eq!(body[0]["risk_level"], "yellow");
        assert_eq!(body[0]["calories"], Value::Null);
        assert_eq!(body[0]["detected_allergens"], json!(["milk"]));
        assert_eq!(body[1]["calories"], 120.0);
    }

    #[actix_web::test]
    async fn anonymous_dashboard_request_is_unauthorised() {
        let app = actix_test::init_service(test_app(HttpState::default(), configure)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/dashboard/stats")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
