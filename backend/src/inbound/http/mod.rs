//! HTTP inbound adapter exposing the REST API under `/api/v1`.

pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod profile;
pub mod profile_dto;
pub mod scans;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` handler on a scope or app.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use allergy_scan_backend::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(profile::get_profile)
        .service(profile::update_profile)
        .service(profile::get_full_profile)
        .service(profile::update_health_metrics)
        .service(profile::list_diseases)
        .service(profile::replace_diseases)
        .service(profile::list_special_conditions)
        .service(profile::replace_special_conditions)
        .service(catalog::list_allergies)
        .service(catalog::list_diseases)
        .service(catalog::list_special_conditions)
        .service(dashboard::stats)
        .service(dashboard::history)
        .service(scans::submit_scan)
        .service(scans::analysis_health);
}
