//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised with fixtures or mocks and no I/O.

use std::sync::Arc;

use crate::domain::CatalogService;
use crate::domain::ports::{
    CatalogQuery, DashboardQuery, FixtureCatalogRepository, FixtureDashboardQuery,
    FixtureProfileCommand, FixtureProfileQuery, FixtureScanCommand, ProfileCommand, ProfileQuery,
    ScanCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub profile: Arc<dyn ProfileQuery>,
    pub profile_command: Arc<dyn ProfileCommand>,
    pub catalog: Arc<dyn CatalogQuery>,
    pub dashboard: Arc<dyn DashboardQuery>,
    pub scans: Arc<dyn ScanCommand>,
}

impl Default for HttpState {
    /// State backed entirely by in-memory fixtures.
    fn default() -> Self {
        Self {
            profile: Arc::new(FixtureProfileQuery),
            profile_command: Arc::new(FixtureProfileCommand),
            catalog: Arc::new(CatalogService::new(Arc::new(FixtureCatalogRepository))),
            dashboard: Arc::new(FixtureDashboardQuery),
            scans: Arc::new(FixtureScanCommand),
        }
    }
}
