//! Driving port for profile reads.
//!
//! Inbound adapters fetch the aggregated health profile through this port
//! without importing persistence concerns.

use async_trait::async_trait;

use crate::domain::{
    BodyMetrics, CatalogEntry, CatalogKind, Error, FullProfile, ProfileIdentity,
    ProfileWithAllergies, UserId,
};

/// Domain use-case port for reading a user's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Identity, body metrics, and display names for all three relations.
    async fn full_profile(&self, user_id: &UserId) -> Result<FullProfile, Error>;

    /// Identity plus full allergy rows.
    async fn profile_with_allergies(&self, user_id: &UserId)
    -> Result<ProfileWithAllergies, Error>;

    /// Catalog rows the user holds for one relation.
    async fn associated_entries(
        &self,
        user_id: &UserId,
        kind: CatalogKind,
    ) -> Result<Vec<CatalogEntry>, Error>;
}

/// Fixture query returning an empty profile for any caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileQuery;

pub(crate) fn fixture_identity(user_id: &UserId) -> ProfileIdentity {
    ProfileIdentity {
        user_id: *user_id,
        email: "ada@example.com".to_owned(),
        name: "Ada Lovelace".to_owned(),
        diet_type: None,
    }
}

#[async_trait]
impl ProfileQuery for FixtureProfileQuery {
    async fn full_profile(&self, user_id: &UserId) -> Result<FullProfile, Error> {
        Ok(FullProfile {
            identity: fixture_identity(user_id),
            metrics: BodyMetrics::default(),
            allergies: Vec::new(),
            diseases: Vec::new(),
            special_conditions: Vec::new(),
        })
    }

    async fn profile_with_allergies(
        &self,
        user_id: &UserId,
    ) -> Result<ProfileWithAllergies, Error> {
        let now = chrono::DateTime::<chrono::Utc>::UNIX_EPOCH;
        Ok(ProfileWithAllergies {
            identity: fixture_identity(user_id),
            created_at: now,
            updated_at: now,
            allergies: Vec::new(),
        })
    }

    async fn associated_entries(
        &self,
        _user_id: &UserId,
        _kind: CatalogKind,
    ) -> Result<Vec<CatalogEntry>, Error> {
        Ok(Vec::new())
    }
}
