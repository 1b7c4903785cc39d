//! Profile aggregation services.
//!
//! Resolves the external identifier once per call, delegates the storage
//! work to the repository, and re-reads the affected data after each write.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{
    ProfileCommand, ProfileQuery, UserProfileRepository, UserProfileRepositoryError,
};
use crate::domain::{
    CatalogEntry, CatalogKind, CatalogSelection, Error, FullProfile, HealthMetricsUpdate,
    ProfileUpdate, ProfileWithAllergies, UserId, UserKey,
};

/// Profile service implementing the profile driving ports.
#[derive(Clone)]
pub struct ProfileService<R> {
    repo: Arc<R>,
}

impl<R> ProfileService<R> {
    /// Create a new service backed by `repo`.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

/// Map profile repository failures onto domain errors.
pub(crate) fn map_profile_repository_error(error: UserProfileRepositoryError) -> Error {
    match error {
        UserProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("profile repository unavailable: {message}"))
        }
        UserProfileRepositoryError::Query { message } => {
            Error::internal(format!("profile repository error: {message}"))
        }
        UserProfileRepositoryError::Transaction { message } => {
            Error::internal(format!("profile update failed: {message}"))
        }
        UserProfileRepositoryError::UnknownCatalogEntry { kind } => {
            Error::invalid_request(format!("unknown {kind} id in selection")).with_details(json!({
                "relation": kind,
                "code": "unknown_catalog_entry",
            }))
        }
    }
}

/// Resolve an external identifier, reporting `not_found` for unknown users.
pub(crate) async fn resolve_user_key<R>(repo: &R, user_id: &UserId) -> Result<UserKey, Error>
where
    R: UserProfileRepository + ?Sized,
{
    repo.resolve_key(user_id)
        .await
        .map_err(map_profile_repository_error)?
        .ok_or_else(|| Error::not_found("user not found"))
}

impl<R> ProfileService<R>
where
    R: UserProfileRepository,
{
    async fn load_full_profile(&self, key: UserKey) -> Result<FullProfile, Error> {
        self.repo
            .full_profile(key)
            .await
            .map_err(map_profile_repository_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn load_profile_with_allergies(
        &self,
        key: UserKey,
    ) -> Result<ProfileWithAllergies, Error> {
        self.repo
            .profile_with_allergies(key)
            .await
            .map_err(map_profile_repository_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn load_entries(
        &self,
        key: UserKey,
        kind: CatalogKind,
    ) -> Result<Vec<CatalogEntry>, Error> {
        self.repo
            .associated_entries(key, kind)
            .await
            .map_err(map_profile_repository_error)
    }
}

#[async_trait]
impl<R> ProfileQuery for ProfileService<R>
where
    R: UserProfileRepository,
{
    async fn full_profile(&self, user_id: &UserId) -> Result<FullProfile, Error> {
        let key = resolve_user_key(self.repo.as_ref(), user_id).await?;
        self.load_full_profile(key).await
    }

    async fn profile_with_allergies(
        &self,
        user_id: &UserId,
    ) -> Result<ProfileWithAllergies, Error> {
        let key = resolve_user_key(self.repo.as_ref(), user_id).await?;
        self.load_profile_with_allergies(key).await
    }

    async fn associated_entries(
        &self,
        user_id: &UserId,
        kind: CatalogKind,
    ) -> Result<Vec<CatalogEntry>, Error> {
        let key = resolve_user_key(self.repo.as_ref(), user_id).await?;
        self.load_entries(key, kind).await
    }
}

#[async_trait]
impl<R> ProfileCommand for ProfileService<R>
where
    R: UserProfileRepository,
{
    async fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<ProfileWithAllergies, Error> {
        let key = resolve_user_key(self.repo.as_ref(), user_id).await?;
        if update.is_empty() {
            debug!(%user_id, "profile update carried no changes");
        } else {
            self.repo
                .update_profile(key, &update)
                .await
                .map_err(map_profile_repository_error)?;
        }
        self.load_profile_with_allergies(key).await
    }

    async fn update_health_metrics(
        &self,
        user_id: &UserId,
        update: HealthMetricsUpdate,
    ) -> Result<FullProfile, Error> {
        let key = resolve_user_key(self.repo.as_ref(), user_id).await?;
        if !update.is_empty() {
            self.repo
                .update_health_metrics(key, &update)
                .await
                .map_err(map_profile_repository_error)?;
        }
        self.load_full_profile(key).await
    }

    async fn replace_associations(
        &self,
        user_id: &UserId,
        kind: CatalogKind,
        selection: CatalogSelection,
    ) -> Result<Vec<CatalogEntry>, Error> {
        let key = resolve_user_key(self.repo.as_ref(), user_id).await?;
        self.repo
            .replace_associations(key, kind, &selection)
            .await
            .map_err(map_profile_repository_error)?;
        self.load_entries(key, kind).await
    }
}

#[cfg(test)]
#[path = "profile_service_tests.rs"]
mod tests;
