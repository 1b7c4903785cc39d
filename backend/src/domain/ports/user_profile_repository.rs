//! Driven port for user rows and the three catalog association tables.
//!
//! Every multi-step write runs inside one storage transaction: a failure
//! part-way leaves the previous state intact.

use async_trait::async_trait;

use crate::domain::{
    CatalogEntry, CatalogKind, CatalogSelection, FullProfile, HealthMetricsUpdate,
    ProfileUpdate, ProfileWithAllergies, UserId, UserKey,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user profile repository adapters.
    pub enum UserProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "profile repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "profile repository query failed: {message}",
        /// A multi-step write failed and was rolled back.
        Transaction { message: String } =>
            "profile update rolled back: {message}",
        /// A submitted catalog id does not exist.
        UnknownCatalogEntry { kind: String } =>
            "unknown {kind} id in selection",
    }
}

/// Port for reading and mutating a user's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// Map an external identifier to the internal key, if the user exists.
    async fn resolve_key(&self, user_id: &UserId)
    -> Result<Option<UserKey>, UserProfileRepositoryError>;

    /// Identity, metrics, and display names for all three relations.
    async fn full_profile(
        &self,
        key: UserKey,
    ) -> Result<Option<FullProfile>, UserProfileRepositoryError>;

    /// Identity plus full allergy rows.
    async fn profile_with_allergies(
        &self,
        key: UserKey,
    ) -> Result<Option<ProfileWithAllergies>, UserProfileRepositoryError>;

    /// Catalog rows currently associated with the user for one relation.
    async fn associated_entries(
        &self,
        key: UserKey,
        kind: CatalogKind,
    ) -> Result<Vec<CatalogEntry>, UserProfileRepositoryError>;

    /// Replace one relation: delete every association, then insert the
    /// selection (nothing is inserted for an empty selection).
    async fn replace_associations(
        &self,
        key: UserKey,
        kind: CatalogKind,
        selection: &CatalogSelection,
    ) -> Result<(), UserProfileRepositoryError>;

    /// Apply name/diet changes and the optional allergy replacement in one
    /// transaction.
    async fn update_profile(
        &self,
        key: UserKey,
        update: &ProfileUpdate,
    ) -> Result<(), UserProfileRepositoryError>;

    /// Write every provided body metric in a single statement.
    async fn update_health_metrics(
        &self,
        key: UserKey,
        update: &HealthMetricsUpdate,
    ) -> Result<(), UserProfileRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unknown_catalog_entry_names_the_relation() {
        let err = UserProfileRepositoryError::unknown_catalog_entry(CatalogKind::Disease.label());
        assert_eq!(err.to_string(), "unknown disease id in selection");
    }

    #[rstest]
    fn transaction_error_formats_message() {
        let err = UserProfileRepositoryError::transaction("insert failed");
        assert!(err.to_string().contains("rolled back"));
        assert!(err.to_string().contains("insert failed"));
    }
}
