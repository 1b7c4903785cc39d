//! Backend entry-point: loads settings, connects adapters, and serves the
//! REST API.

mod server;

use actix_web::cookie::SameSite;
use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use allergy_scan_backend::inbound::http::health::HealthState;
use allergy_scan_backend::outbound::persistence::{DbPool, PoolConfig};
use server::{AnalysisSettings, AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;

    let key = settings.session_key()?;
    let same_site = if cfg!(debug_assertions) {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let bind_addr = settings.bind_addr()?;
    let analysis = settings
        .analysis_base_url()?
        .map(|base_url| AnalysisSettings {
            base_url,
            timeout: settings.analysis_timeout(),
        });

    let mut config =
        ServerConfig::new(key, settings.cookie_secure(), same_site, bind_addr).with_analysis(analysis);

    if let Some(database_url) = settings.database_url.as_deref() {
        let pool_config = PoolConfig::new(database_url).with_max_size(settings.db_max_connections());
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?;
        config = config.with_db_pool(pool);
    } else {
        warn!("no database URL configured; serving fixture data");
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "allergy scan backend listening");
    server.await
}
