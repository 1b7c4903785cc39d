//! Driving port for catalog listings.

use async_trait::async_trait;

use crate::domain::{CatalogEntry, CatalogKind, Error};

/// Domain use-case port for listing a catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// Every row of the requested catalog.
    async fn list_catalog(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, Error>;
}
