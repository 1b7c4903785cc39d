//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{scan_history, users};

/// Profile columns of the users table (credentials are never selected).
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserProfileRow {
    pub uuid: Uuid,
    pub email: String,
    pub name: String,
    pub diet_type: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub age_range: Option<String>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for name and diet type.
///
/// The outer `Option` skips the column; `Some(None)` writes null.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct ProfileChangeset<'a> {
    pub name: Option<&'a str>,
    pub diet_type: Option<Option<&'a str>>,
}

/// Changeset for body metrics, written in one statement.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct HealthMetricsChangeset<'a> {
    pub height: Option<Option<f64>>,
    pub weight: Option<Option<f64>>,
    pub age_range: Option<Option<&'a str>>,
    pub gender: Option<Option<&'a str>>,
}

impl ProfileChangeset<'_> {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.diet_type.is_none()
    }
}

impl HealthMetricsChangeset<'_> {
    pub fn is_empty(&self) -> bool {
        self.height.is_none()
            && self.weight.is_none()
            && self.age_range.is_none()
            && self.gender.is_none()
    }
}

/// Row shape shared by the three catalog tables.
///
/// Loaded from an explicit `(id, name, display_name)` tuple select, so one
/// struct serves every catalog.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct CatalogRow {
    pub id: i32,
    pub name: String,
    pub display_name: String,
}

/// Row struct for reading from the scan_history table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = scan_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ScanHistoryRow {
    pub id: i64,
    pub product_name: String,
    pub risk_level: String,
    pub risk_score: i32,
    pub risk_reason: String,
    pub calories: Option<f64>,
    pub carbs: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub detected_ingredients: String,
    pub detected_allergens: String,
    pub diet_warnings: String,
    pub analysis_payload: String,
    pub scanned_at: DateTime<Utc>,
}

/// Insertable struct for appending a scan record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = scan_history)]
pub(crate) struct NewScanHistoryRow<'a> {
    pub user_id: i64,
    pub product_name: &'a str,
    pub risk_level: &'a str,
    pub risk_score: i32,
    pub risk_reason: &'a str,
    pub calories: Option<f64>,
    pub carbs: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub detected_ingredients: String,
    pub detected_allergens: String,
    pub diet_warnings: String,
    pub analysis_payload: String,
}
