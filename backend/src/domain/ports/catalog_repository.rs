//! Driven port for the read-only health catalogs.

use async_trait::async_trait;

use crate::domain::{CatalogEntry, CatalogId, CatalogKind};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalog repository adapters.
    pub enum CatalogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "catalog repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "catalog repository query failed: {message}",
    }
}

/// Port for listing catalog rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Every row of one catalog. Allergies are ordered by id; diseases and
    /// special conditions by display name.
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, CatalogRepositoryError>;
}

/// In-memory catalog used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogRepository;

fn entry(id: i32, name: &str, display_name: &str) -> CatalogEntry {
    CatalogEntry {
        id: CatalogId::from_db(id),
        name: name.to_owned(),
        display_name: display_name.to_owned(),
    }
}

#[async_trait]
impl CatalogRepository for FixtureCatalogRepository {
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, CatalogRepositoryError> {
        Ok(match kind {
            CatalogKind::Allergy => vec![
                entry(1, "egg", "Egg"),
                entry(2, "milk", "Milk"),
                entry(3, "peanut", "Peanut"),
            ],
            CatalogKind::Disease => vec![
                entry(2, "diabetes", "Diabetes"),
                entry(1, "hypertension", "Hypertension"),
            ],
            CatalogKind::SpecialCondition => vec![entry(1, "pregnancy", "Pregnancy")],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_lists_every_kind() {
        for kind in CatalogKind::ALL {
            let rows = FixtureCatalogRepository
                .list(kind)
                .await
                .expect("fixture list succeeds");
            assert!(!rows.is_empty(), "{kind} fixture should not be empty");
        }
    }
}
