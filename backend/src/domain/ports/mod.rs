//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Query`, `*Command`) are called by inbound adapters;
//! driven ports (`*Repository`, `*Gateway`) are implemented by outbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod analysis_gateway;
mod catalog_query;
mod catalog_repository;
mod dashboard_query;
mod profile_command;
mod profile_query;
mod scan_command;
mod scan_history_repository;
mod user_profile_repository;

#[cfg(test)]
pub use analysis_gateway::MockAnalysisGateway;
pub use analysis_gateway::{AnalysisGateway, AnalysisGatewayError, FixtureAnalysisGateway};
#[cfg(test)]
pub use catalog_query::MockCatalogQuery;
pub use catalog_query::CatalogQuery;
#[cfg(test)]
pub use catalog_repository::MockCatalogRepository;
pub use catalog_repository::{
    CatalogRepository, CatalogRepositoryError, FixtureCatalogRepository,
};
#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use dashboard_query::{DashboardQuery, FixtureDashboardQuery};
#[cfg(test)]
pub use profile_command::MockProfileCommand;
pub use profile_command::{FixtureProfileCommand, ProfileCommand};
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::{FixtureProfileQuery, ProfileQuery};
#[cfg(test)]
pub use scan_command::{MockScanCommand, MockScanRecorder};
pub use scan_command::{FixtureScanCommand, ScanCommand, ScanRecorder, ScanSubmission};
#[cfg(test)]
pub use scan_history_repository::MockScanHistoryRepository;
pub use scan_history_repository::{ScanHistoryRepository, ScanHistoryRepositoryError};
#[cfg(test)]
pub use user_profile_repository::MockUserProfileRepository;
pub use user_profile_repository::{UserProfileRepository, UserProfileRepositoryError};
