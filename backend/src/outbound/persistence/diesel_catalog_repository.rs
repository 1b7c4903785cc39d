//! PostgreSQL-backed `CatalogRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogRepository, CatalogRepositoryError};
use crate::domain::{CatalogEntry, CatalogId, CatalogKind};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::CatalogRow;
use super::pool::{DbPool, PoolError};
use super::schema::{allergies, diseases, special_conditions};

/// Diesel-backed implementation of the `CatalogRepository` port.
#[derive(Clone)]
pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogRepositoryError {
    map_basic_pool_error(error, |message| CatalogRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogRepositoryError {
    map_basic_diesel_error(
        error,
        |message| CatalogRepositoryError::query(message),
        |message| CatalogRepositoryError::connection(message),
    )
}

#[async_trait]
impl CatalogRepository for DieselCatalogRepository {
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CatalogRow> = match kind {
            CatalogKind::Allergy => {
                allergies::table
                    .select((allergies::id, allergies::name, allergies::display_name))
                    .order_by(allergies::id.asc())
                    .load(&mut conn)
                    .await
            }
            CatalogKind::Disease => {
                diseases::table
                    .select((diseases::id, diseases::name, diseases::display_name))
                    .order_by(diseases::display_name.asc())
                    .load(&mut conn)
                    .await
            }
            CatalogKind::SpecialCondition => {
                special_conditions::table
                    .select((
                        special_conditions::id,
                        special_conditions::name,
                        special_conditions::display_name,
                    ))
                    .order_by(special_conditions::display_name.asc())
                    .load(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| CatalogEntry {
                id: CatalogId::from_db(row.id),
                name: row.name,
                display_name: row.display_name,
            })
            .collect())
    }
}
