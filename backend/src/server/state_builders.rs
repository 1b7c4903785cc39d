//! Builds the HTTP state from configuration.
//!
//! With a database pool every port is served by the domain services over
//! Diesel adapters; without one the fixtures answer. The analysis gateway is
//! the HTTP adapter when a base URL is configured and the fixture otherwise.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::{info, warn};

use allergy_scan_backend::domain::ports::{AnalysisGateway, FixtureAnalysisGateway};
use allergy_scan_backend::domain::{
    CatalogService, DashboardService, ProfileService, ScanHistoryRecorder, ScanSubmissionService,
};
use allergy_scan_backend::inbound::http::state::HttpState;
use allergy_scan_backend::outbound::analysis::HttpAnalysisGateway;
use allergy_scan_backend::outbound::persistence::{
    DbPool, DieselCatalogRepository, DieselScanHistoryRepository, DieselUserProfileRepository,
};

use super::config::{AnalysisSettings, ServerConfig};

fn build_gateway(analysis: Option<&AnalysisSettings>) -> std::io::Result<Arc<dyn AnalysisGateway>> {
    match analysis {
        Some(settings) => {
            let gateway = HttpAnalysisGateway::new(&settings.base_url, settings.timeout)
                .map_err(std::io::Error::other)?;
            info!(base_url = %settings.base_url, "using HTTP analysis gateway");
            Ok(Arc::new(gateway))
        }
        None => {
            warn!("no analysis service configured; using fixture reports");
            Ok(Arc::new(FixtureAnalysisGateway))
        }
    }
}

fn database_state(pool: &DbPool, gateway: Arc<dyn AnalysisGateway>) -> HttpState {
    let users = Arc::new(DieselUserProfileRepository::new(pool.clone()));
    let scans = Arc::new(DieselScanHistoryRepository::new(pool.clone()));
    let catalogs = Arc::new(DieselCatalogRepository::new(pool.clone()));
    let profile = Arc::new(ProfileService::new(users.clone()));
    let recorder = Arc::new(ScanHistoryRecorder::new(scans.clone()));

    HttpState {
        profile: profile.clone(),
        profile_command: profile,
        catalog: Arc::new(CatalogService::new(catalogs)),
        dashboard: Arc::new(DashboardService::new(
            users.clone(),
            scans,
            Arc::new(DefaultClock),
        )),
        scans: Arc::new(ScanSubmissionService::new(users, gateway, recorder)),
    }
}

/// Assemble handler state for `config`.
///
/// # Errors
/// Returns an error when the analysis gateway cannot be built.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let state = match &config.db_pool {
        Some(pool) => database_state(pool, build_gateway(config.analysis.as_ref())?),
        None => {
            if config.analysis.is_some() {
                warn!("analysis service ignored without a database; using fixture ports");
            }
            HttpState::default()
        }
    };
    Ok(web::Data::new(state))
}
