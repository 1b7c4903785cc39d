//! PostgreSQL-backed `UserProfileRepository` implementation using Diesel ORM.
//!
//! Association replacement deletes every row of one relation for the user
//! and inserts the new selection inside a single transaction. The combined
//! profile update shares that transaction with the users-row changeset.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::{debug, warn};

use crate::domain::ports::{UserProfileRepository, UserProfileRepositoryError};
use crate::domain::{
    AgeRange, BodyMetrics, CatalogEntry, CatalogId, CatalogKind, CatalogSelection, DietType,
    FullProfile, Gender, HealthMetricsUpdate, ProfileIdentity, ProfileUpdate,
    ProfileWithAllergies, UserId, UserKey,
};

use super::diesel_basic_error_mapping::{
    is_foreign_key_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{CatalogRow, HealthMetricsChangeset, ProfileChangeset, UserProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Run `$body` with the association table (and optionally the catalog table
/// and the association's catalog column) of one relation in scope.
macro_rules! with_relation_tables {
    (
        $kind:expr,
        assoc = $assoc:ident
        $(, catalog = $catalog:ident)?
        $(, fk = $fk:ident)?
        => $body:block
    ) => {
        match $kind {
            CatalogKind::Allergy => {
                use super::schema::user_allergies as $assoc;
                $( use super::schema::allergies as $catalog; )?
                $( let $fk = super::schema::user_allergies::allergy_id; )?
                $body
            }
            CatalogKind::Disease => {
                use super::schema::user_diseases as $assoc;
                $( use super::schema::diseases as $catalog; )?
                $( let $fk = super::schema::user_diseases::disease_id; )?
                $body
            }
            CatalogKind::SpecialCondition => {
                use super::schema::user_special_conditions as $assoc;
                $( use super::schema::special_conditions as $catalog; )?
                $( let $fk = super::schema::user_special_conditions::condition_id; )?
                $body
            }
        }
    };
}

/// Diesel-backed implementation of the `UserProfileRepository` port.
#[derive(Clone)]
pub struct DieselUserProfileRepository {
    pool: DbPool,
}

impl DieselUserProfileRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserProfileRepositoryError {
    map_basic_pool_error(error, |message| {
        UserProfileRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: DieselError) -> UserProfileRepositoryError {
    map_basic_diesel_error(
        error,
        |message| UserProfileRepositoryError::query(message),
        |message| UserProfileRepositoryError::connection(message),
    )
}

/// Map a failure inside a write transaction. The transaction has already
/// been rolled back when this runs.
fn map_transaction_error(error: DieselError, kind: Option<CatalogKind>) -> UserProfileRepositoryError {
    if let Some(relation) = kind.filter(|_| is_foreign_key_violation(&error)) {
        debug!(%relation, "association insert referenced an unknown catalog row");
        return UserProfileRepositoryError::unknown_catalog_entry(relation.label());
    }
    match map_diesel_error(error) {
        UserProfileRepositoryError::Query { message } => {
            UserProfileRepositoryError::transaction(message)
        }
        other => other,
    }
}

fn parse_column<T, E>(raw: Option<String>, field: &'static str, user_key: i64) -> Option<T>
where
    T: std::str::FromStr<Err = E>,
    E: std::fmt::Display,
{
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(user_key, field, value = %raw, error = %err, "ignoring unreadable profile column");
            None
        }
    }
}

fn row_to_identity(row: &UserProfileRow, key: UserKey) -> ProfileIdentity {
    ProfileIdentity {
        user_id: UserId::from_uuid(row.uuid),
        email: row.email.clone(),
        name: row.name.clone(),
        diet_type: parse_column::<DietType, _>(row.diet_type.clone(), "diet_type", key.get()),
    }
}

fn row_to_metrics(row: &UserProfileRow, key: UserKey) -> BodyMetrics {
    BodyMetrics {
        height: row.height,
        weight: row.weight,
        age_range: row
            .age_range
            .as_deref()
            .and_then(|raw| AgeRange::new(raw).ok()),
        gender: parse_column::<Gender, _>(row.gender.clone(), "gender", key.get()),
    }
}

fn row_to_entry(row: CatalogRow) -> CatalogEntry {
    CatalogEntry {
        id: CatalogId::from_db(row.id),
        name: row.name,
        display_name: row.display_name,
    }
}

async fn load_user_row(
    conn: &mut AsyncPgConnection,
    key: UserKey,
) -> Result<Option<UserProfileRow>, DieselError> {
    users::table
        .filter(users::id.eq(key.get()))
        .select(UserProfileRow::as_select())
        .first(conn)
        .await
        .optional()
}

/// Display names for one relation, from a left join rooted at the user.
///
/// A user with no associations yields a single `None` placeholder.
async fn load_display_names(
    conn: &mut AsyncPgConnection,
    key: UserKey,
    kind: CatalogKind,
) -> Result<Vec<Option<String>>, DieselError> {
    with_relation_tables!(kind, assoc = assoc, catalog = catalog => {
        users::table
            .left_join(assoc::table.left_join(catalog::table))
            .filter(users::id.eq(key.get()))
            .select(catalog::display_name.nullable())
            .load::<Option<String>>(conn)
            .await
    })
}

async fn load_entries(
    conn: &mut AsyncPgConnection,
    key: UserKey,
    kind: CatalogKind,
) -> Result<Vec<CatalogEntry>, DieselError> {
    let rows = with_relation_tables!(kind, assoc = assoc, catalog = catalog => {
        assoc::table
            .inner_join(catalog::table)
            .filter(assoc::user_id.eq(key.get()))
            .select((catalog::id, catalog::name, catalog::display_name))
            .order_by(catalog::display_name.asc())
            .load::<CatalogRow>(conn)
            .await
    })?;
    Ok(rows.into_iter().map(row_to_entry).collect())
}

/// Delete-then-insert for one relation. Callers provide the transaction.
async fn replace_in_transaction(
    conn: &mut AsyncPgConnection,
    key: UserKey,
    kind: CatalogKind,
    selection: &CatalogSelection,
) -> Result<(), DieselError> {
    with_relation_tables!(kind, assoc = assoc, fk = fk => {
        let removed = diesel::delete(assoc::table.filter(assoc::user_id.eq(key.get())))
            .execute(&mut *conn)
            .await?;
        debug!(%kind, removed, inserted = selection.ids().len(), "replacing associations");

        if selection.is_empty() {
            return Ok(());
        }

        let rows: Vec<_> = selection
            .ids()
            .iter()
            .map(|id| (assoc::user_id.eq(key.get()), fk.eq(id.get())))
            .collect();
        diesel::insert_into(assoc::table)
            .values(&rows)
            .execute(&mut *conn)
            .await?;
        Ok(())
    })
}

fn profile_changeset(update: &ProfileUpdate) -> ProfileChangeset<'_> {
    ProfileChangeset {
        name: update.name.as_ref().map(|name| name.as_str()),
        diet_type: update
            .diet_type
            .as_ref()
            .map(|diet| diet.as_str())
            .into_change(),
    }
}

fn health_changeset(update: &HealthMetricsUpdate) -> HealthMetricsChangeset<'_> {
    HealthMetricsChangeset {
        height: update.height.clone().into_change(),
        weight: update.weight.clone().into_change(),
        age_range: update
            .age_range
            .as_ref()
            .map(|range| range.as_str())
            .into_change(),
        gender: update
            .gender
            .as_ref()
            .map(|gender| gender.as_str())
            .into_change(),
    }
}

#[async_trait]
impl UserProfileRepository for DieselUserProfileRepository {
    async fn resolve_key(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserKey>, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let key: Option<i64> = users::table
            .filter(users::uuid.eq(user_id.as_uuid()))
            .select(users::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(key.map(UserKey::new))
    }

    async fn full_profile(
        &self,
        key: UserKey,
    ) -> Result<Option<FullProfile>, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let Some(row) = load_user_row(&mut conn, key)
            .await
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };

        let allergies = load_display_names(&mut conn, key, CatalogKind::Allergy)
            .await
            .map_err(map_diesel_error)?;
        let diseases = load_display_names(&mut conn, key, CatalogKind::Disease)
            .await
            .map_err(map_diesel_error)?;
        let special_conditions = load_display_names(&mut conn, key, CatalogKind::SpecialCondition)
            .await
            .map_err(map_diesel_error)?;

        Ok(Some(FullProfile::assemble(
            row_to_identity(&row, key),
            row_to_metrics(&row, key),
            allergies,
            diseases,
            special_conditions,
        )))
    }

    async fn profile_with_allergies(
        &self,
        key: UserKey,
    ) -> Result<Option<ProfileWithAllergies>, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let Some(row) = load_user_row(&mut conn, key)
            .await
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };
        let allergies = load_entries(&mut conn, key, CatalogKind::Allergy)
            .await
            .map_err(map_diesel_error)?;

        Ok(Some(ProfileWithAllergies {
            identity: row_to_identity(&row, key),
            created_at: row.created_at,
            updated_at: row.updated_at,
            allergies,
        }))
    }

    async fn associated_entries(
        &self,
        key: UserKey,
        kind: CatalogKind,
    ) -> Result<Vec<CatalogEntry>, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_entries(&mut conn, key, kind)
            .await
            .map_err(map_diesel_error)
    }

    async fn replace_associations(
        &self,
        key: UserKey,
        kind: CatalogKind,
        selection: &CatalogSelection,
    ) -> Result<(), UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move { replace_in_transaction(conn, key, kind, selection).await }.scope_boxed()
        })
        .await
        .map_err(|err| map_transaction_error(err, Some(kind)))
    }

    async fn update_profile(
        &self,
        key: UserKey,
        update: &ProfileUpdate,
    ) -> Result<(), UserProfileRepositoryError> {
        let changeset = profile_changeset(update);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                if !changeset.is_empty() {
                    diesel::update(users::table.filter(users::id.eq(key.get())))
                        .set(&changeset)
                        .execute(&mut *conn)
                        .await?;
                }
                if let Some(selection) = update.allergies.as_ref() {
                    replace_in_transaction(conn, key, CatalogKind::Allergy, selection).await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_transaction_error(err, Some(CatalogKind::Allergy)))
    }

    async fn update_health_metrics(
        &self,
        key: UserKey,
        update: &HealthMetricsUpdate,
    ) -> Result<(), UserProfileRepositoryError> {
        let changeset = health_changeset(update);
        if changeset.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::update(users::table.filter(users::id.eq(key.get())))
                    .set(&changeset)
                    .execute(conn)
                    .await
                    .map(|_| ())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_transaction_error(err, None))
    }
}
