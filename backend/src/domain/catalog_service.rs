//! Catalog listing service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CatalogQuery, CatalogRepository, CatalogRepositoryError};
use crate::domain::{CatalogEntry, CatalogKind, Error};

/// Read-only service over the health catalogs.
#[derive(Clone)]
pub struct CatalogService<R> {
    repo: Arc<R>,
}

impl<R> CatalogService<R> {
    /// Create a new service backed by `repo`.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn map_catalog_error(error: CatalogRepositoryError) -> Error {
    match error {
        CatalogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("catalog repository unavailable: {message}"))
        }
        CatalogRepositoryError::Query { message } => {
            Error::internal(format!("catalog repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> CatalogQuery for CatalogService<R>
where
    R: CatalogRepository,
{
    async fn list_catalog(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, Error> {
        self.repo.list(kind).await.map_err(map_catalog_error)
    }
}
