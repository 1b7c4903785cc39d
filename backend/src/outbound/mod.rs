//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **analysis**: reqwest client for the external label-analysis service
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod analysis;
pub mod persistence;
