//! Backend for the food-allergy label scanner.
//!
//! The crate follows a hexagonal layout: [`domain`] owns the profile, scan
//! history, and dashboard rules; [`inbound`] exposes them over HTTP; and
//! [`outbound`] implements the driven ports against PostgreSQL and the
//! external analysis service.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
