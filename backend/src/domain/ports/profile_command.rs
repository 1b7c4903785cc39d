//! Driving port for profile mutations.

use async_trait::async_trait;

use crate::domain::{
    CatalogEntry, CatalogKind, CatalogSelection, Error, FullProfile, HealthMetricsUpdate,
    ProfileUpdate, ProfileWithAllergies, UserId,
};

use super::profile_query::{FixtureProfileQuery, ProfileQuery};

/// Domain use-case port for updating a user's profile.
///
/// Every operation re-reads the affected data after the write; a failing
/// read-back is reported as an error rather than hidden.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Apply name, diet type, and the optional allergy replacement together.
    async fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<ProfileWithAllergies, Error>;

    /// Apply the provided body metrics.
    async fn update_health_metrics(
        &self,
        user_id: &UserId,
        update: HealthMetricsUpdate,
    ) -> Result<FullProfile, Error>;

    /// Replace one association set and return the new rows.
    async fn replace_associations(
        &self,
        user_id: &UserId,
        kind: CatalogKind,
        selection: CatalogSelection,
    ) -> Result<Vec<CatalogEntry>, Error>;
}

/// Fixture command that accepts every write and echoes the fixture profile.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileCommand;

#[async_trait]
impl ProfileCommand for FixtureProfileCommand {
    async fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<ProfileWithAllergies, Error> {
        let mut profile = FixtureProfileQuery.profile_with_allergies(user_id).await?;
        if let Some(name) = update.name {
            profile.identity.name = name.into();
        }
        if let Some(diet_type) = update.diet_type.into_change() {
            profile.identity.diet_type = diet_type;
        }
        Ok(profile)
    }

    async fn update_health_metrics(
        &self,
        user_id: &UserId,
        _update: HealthMetricsUpdate,
    ) -> Result<FullProfile, Error> {
        FixtureProfileQuery.full_profile(user_id).await
    }

    async fn replace_associations(
        &self,
        _user_id: &UserId,
        _kind: CatalogKind,
        _selection: CatalogSelection,
    ) -> Result<Vec<CatalogEntry>, Error> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DietType, FieldUpdate, ProfileName};

    #[tokio::test]
    async fn fixture_update_reflects_scalar_changes() {
        let update = ProfileUpdate {
            name: Some(ProfileName::new("Grace").expect("valid name")),
            diet_type: FieldUpdate::Set(DietType::Vegan),
            allergies: None,
        };

        let profile = FixtureProfileCommand
            .update_profile(&UserId::random(), update)
            .await
            .expect("fixture update");

        assert_eq!(profile.identity.name, "Grace");
        assert_eq!(profile.identity.diet_type, Some(DietType::Vegan));
    }
}
