//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel row structs and domain types and
//! hold no business rules. Row structs (`models.rs`) and table definitions
//! (`schema.rs`) stay private to this module. Connections come from a `bb8`
//! pool through `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use allergy_scan_backend::outbound::persistence::{
//!     DbPool, DieselUserProfileRepository, PoolConfig,
//! };
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/allergy_scan")).await?;
//! let profiles = DieselUserProfileRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_catalog_repository;
mod diesel_scan_history_repository;
mod diesel_user_profile_repository;
mod json_fields;
mod models;
mod pool;
mod schema;

pub use diesel_catalog_repository::DieselCatalogRepository;
pub use diesel_scan_history_repository::DieselScanHistoryRepository;
pub use diesel_user_profile_repository::DieselUserProfileRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
