//! Process configuration loaded through OrthoConfig and the server settings
//! derived from it.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use tracing::warn;

use allergy_scan_backend::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 30;

/// Settings layered from CLI flags, `ALLERGY_SCAN_*` variables, and config
/// files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ALLERGY_SCAN")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; without it every port runs on fixtures.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Accept a generated session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`; unset means `true`.
    pub cookie_secure: Option<bool>,
    /// Base URL of the label-analysis service.
    pub analysis_base_url: Option<String>,
    /// Per-request timeout for the analysis service.
    pub analysis_timeout_secs: Option<u64>,
}

impl AppSettings {
    /// Listen address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns an error when the configured value is not a socket address.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::other(format!("invalid bind address {raw:?}: {err}"))
        })
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(
            self.analysis_timeout_secs
                .unwrap_or(DEFAULT_ANALYSIS_TIMEOUT_SECS),
        )
    }

    /// Parsed analysis base URL, if one is configured.
    ///
    /// # Errors
    /// Returns an error when the configured value is not an absolute URL.
    pub fn analysis_base_url(&self) -> std::io::Result<Option<Url>> {
        self.analysis_base_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|err| {
                    std::io::Error::other(format!("invalid analysis base URL {raw:?}: {err}"))
                })
            })
            .transpose()
    }

    /// Load the session key, or generate one when that is allowed.
    ///
    /// # Errors
    /// Returns an error when the key file is unreadable and ephemeral keys are
    /// not permitted.
    pub fn session_key(&self) -> std::io::Result<Key> {
        let path = self.session_key_file();
        load_session_key(&path, cfg!(debug_assertions) || self.session_allow_ephemeral)
    }
}

fn load_session_key(path: &Path, allow_ephemeral: bool) -> std::io::Result<Key> {
    match std::fs::read(path) {
        Ok(bytes) => Key::try_from(bytes.as_slice()).map_err(|err| {
            std::io::Error::other(format!(
                "session key at {} is too short: {err}",
                path.display()
            ))
        }),
        Err(err) if allow_ephemeral => {
            warn!(path = %path.display(), error = %err, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(err) => Err(std::io::Error::other(format!(
            "failed to read session key at {}: {err}",
            path.display()
        ))),
    }
}

/// Everything the server needs once settings are resolved.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) analysis: Option<AnalysisSettings>,
}

/// Connection settings for the external analysis service.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub base_url: Url,
    pub timeout: Duration,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            analysis: None,
        }
    }

    /// Use database-backed adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Call a real analysis service instead of the fixture gateway.
    #[must_use]
    pub fn with_analysis(mut self, analysis: Option<AnalysisSettings>) -> Self {
        self.analysis = analysis;
        self
    }
}
