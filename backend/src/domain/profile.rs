//! Aggregated user health profile and partial-update commands.
//!
//! Read models assemble identity, body metrics, and the three catalog
//! relations. Update commands use [`FieldUpdate`] so "leave alone" and
//! "clear" are distinct states rather than an accident of optional fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::catalog::{CatalogEntry, CatalogSelection};
use super::user::{AgeRange, DietType, Gender, ProfileName, UserId};

/// Tri-state partial update for a single field.
///
/// When deserialised, an explicit JSON `null` becomes [`FieldUpdate::Clear`]
/// and any other value becomes [`FieldUpdate::Set`]. Pair the field with
/// `#[serde(default)]` so an omitted key stays [`FieldUpdate::Unchanged`].
///
/// # Examples
/// ```
/// use allergy_scan_backend::domain::FieldUpdate;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Patch {
///     #[serde(default)]
///     height: FieldUpdate<f64>,
/// }
///
/// let omitted: Patch = serde_json::from_str("{}").expect("json");
/// let cleared: Patch = serde_json::from_str(r#"{"height":null}"#).expect("json");
/// let set: Patch = serde_json::from_str(r#"{"height":171.5}"#).expect("json");
/// assert_eq!(omitted.height, FieldUpdate::Unchanged);
/// assert_eq!(cleared.height, FieldUpdate::Clear);
/// assert_eq!(set.height, FieldUpdate::Set(171.5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate<T> {
    /// Leave the stored value untouched.
    Unchanged,
    /// Overwrite the stored value.
    Set(T),
    /// Reset the stored value to null.
    Clear,
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        Self::Unchanged
    }
}

impl<T> FieldUpdate<T> {
    /// True when the field was omitted.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// Borrow the payload.
    pub fn as_ref(&self) -> FieldUpdate<&T> {
        match self {
            Self::Unchanged => FieldUpdate::Unchanged,
            Self::Set(value) => FieldUpdate::Set(value),
            Self::Clear => FieldUpdate::Clear,
        }
    }

    /// Convert the payload, keeping the state.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldUpdate<U> {
        match self {
            Self::Unchanged => FieldUpdate::Unchanged,
            Self::Set(value) => FieldUpdate::Set(f(value)),
            Self::Clear => FieldUpdate::Clear,
        }
    }

    /// Fallible [`FieldUpdate::map`], used when validating raw input.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<FieldUpdate<U>, E> {
        Ok(match self {
            Self::Unchanged => FieldUpdate::Unchanged,
            Self::Set(value) => FieldUpdate::Set(f(value)?),
            Self::Clear => FieldUpdate::Clear,
        })
    }

    /// Changeset form: outer `None` skips the column, `Some(None)` writes null.
    pub fn into_change(self) -> Option<Option<T>> {
        match self {
            Self::Unchanged => None,
            Self::Set(value) => Some(Some(value)),
            Self::Clear => Some(None),
        }
    }
}

impl<'de, T> Deserialize<'de> for FieldUpdate<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Self::Set(value),
            None => Self::Clear,
        })
    }
}

/// Optional body measurements and demographic buckets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyMetrics {
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub age_range: Option<AgeRange>,
    pub gender: Option<Gender>,
}

/// Largest accepted height (cm) or weight (kg).
pub const MEASUREMENT_MAX: f64 = 500.0;

/// Accept a height or weight only when it is finite, positive, and plausible.
pub fn checked_measurement(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0 && value <= MEASUREMENT_MAX).then_some(value)
}

/// Identity columns shared by every profile read model.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileIdentity {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub diet_type: Option<DietType>,
}

/// Complete profile: identity, metrics, and display names per relation.
///
/// ## Invariants
/// - The three name lists never contain blank entries.
#[derive(Debug, Clone, PartialEq)]
pub struct FullProfile {
    pub identity: ProfileIdentity,
    pub metrics: BodyMetrics,
    pub allergies: Vec<String>,
    pub diseases: Vec<String>,
    pub special_conditions: Vec<String>,
}

impl FullProfile {
    /// Assemble a profile from raw join output.
    ///
    /// Outer joins over an empty relation yield a single `None` placeholder;
    /// placeholders and blank names are dropped here.
    ///
    /// # Examples
    /// ```
    /// use allergy_scan_backend::domain::{BodyMetrics, FullProfile, ProfileIdentity, UserId};
    ///
    /// let identity = ProfileIdentity {
    ///     user_id: UserId::random(),
    ///     email: "a@example.com".into(),
    ///     name: "A".into(),
    ///     diet_type: None,
    /// };
    /// let profile = FullProfile::assemble(
    ///     identity,
    ///     BodyMetrics::default(),
    ///     vec![Some("Peanut".into()), None],
    ///     vec![None],
    ///     vec![],
    /// );
    /// assert_eq!(profile.allergies, vec!["Peanut".to_owned()]);
    /// assert!(profile.diseases.is_empty());
    /// ```
    pub fn assemble(
        identity: ProfileIdentity,
        metrics: BodyMetrics,
        allergies: Vec<Option<String>>,
        diseases: Vec<Option<String>>,
        special_conditions: Vec<Option<String>>,
    ) -> Self {
        Self {
            identity,
            metrics,
            allergies: present_names(allergies),
            diseases: present_names(diseases),
            special_conditions: present_names(special_conditions),
        }
    }
}

fn present_names(raw: Vec<Option<String>>) -> Vec<String> {
    raw.into_iter()
        .flatten()
        .filter(|name| !name.trim().is_empty())
        .collect()
}

/// Profile variant exposing full allergy rows so clients can edit them.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileWithAllergies {
    pub identity: ProfileIdentity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub allergies: Vec<CatalogEntry>,
}

/// Combined update of name, diet type, and the allergy set.
///
/// Name may be replaced but not cleared; `allergies: None` leaves the
/// relation alone while `Some(empty)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<ProfileName>,
    pub diet_type: FieldUpdate<DietType>,
    pub allergies: Option<CatalogSelection>,
}

impl ProfileUpdate {
    /// True when a users-row column must be written.
    pub fn has_scalar_changes(&self) -> bool {
        self.name.is_some() || !self.diet_type.is_unchanged()
    }

    /// True when nothing would be written.
    pub fn is_empty(&self) -> bool {
        !self.has_scalar_changes() && self.allergies.is_none()
    }
}

/// Partial update of body metrics; all provided fields go in one statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthMetricsUpdate {
    pub height: FieldUpdate<f64>,
    pub weight: FieldUpdate<f64>,
    pub age_range: FieldUpdate<AgeRange>,
    pub gender: FieldUpdate<Gender>,
}

impl HealthMetricsUpdate {
    /// True when no column would be written.
    pub fn is_empty(&self) -> bool {
        self.height.is_unchanged()
            && self.weight.is_unchanged()
            && self.age_range.is_unchanged()
            && self.gender.is_unchanged()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CatalogId;
    use rstest::rstest;

    fn identity() -> ProfileIdentity {
        ProfileIdentity {
            user_id: UserId::random(),
            email: "kim@example.com".to_owned(),
            name: "Kim".to_owned(),
            diet_type: Some(DietType::Vegan),
        }
    }

    #[rstest]
    fn assemble_filters_placeholders_and_blank_names() {
        let profile = FullProfile::assemble(
            identity(),
            BodyMetrics::default(),
            vec![Some("Egg".to_owned()), None, Some("  ".to_owned())],
            vec![None],
            vec![Some("Pregnancy".to_owned())],
        );

        assert_eq!(profile.allergies, vec!["Egg".to_owned()]);
        assert!(profile.diseases.is_empty());
        assert_eq!(profile.special_conditions, vec!["Pregnancy".to_owned()]);
    }

    #[rstest]
    fn field_update_change_form_distinguishes_clear_from_unchanged() {
        assert_eq!(FieldUpdate::<i32>::Unchanged.into_change(), None);
        assert_eq!(FieldUpdate::<i32>::Clear.into_change(), Some(None));
        assert_eq!(FieldUpdate::Set(3).into_change(), Some(Some(3)));
    }

    #[rstest]
    fn field_update_try_map_propagates_errors() {
        let result: Result<FieldUpdate<u8>, &str> = FieldUpdate::Set(300_i32)
            .try_map(|value| u8::try_from(value).map_err(|_| "too big"));
        assert_eq!(result, Err("too big"));

        let cleared: Result<FieldUpdate<u8>, &str> =
            FieldUpdate::<i32>::Clear.try_map(|_| Err("not called"));
        assert_eq!(cleared, Ok(FieldUpdate::Clear));
    }

    #[rstest]
    fn profile_update_reports_scalar_changes() {
        let name_only = ProfileUpdate {
            name: Some(ProfileName::new("Lee").expect("valid name")),
            ..ProfileUpdate::default()
        };
        assert!(name_only.has_scalar_changes());

        let allergies_only = ProfileUpdate {
            allergies: Some(CatalogSelection::new([CatalogId::from_db(1)])),
            ..ProfileUpdate::default()
        };
        assert!(!allergies_only.has_scalar_changes());
        assert!(!allergies_only.is_empty());
        assert!(ProfileUpdate::default().is_empty());
    }

    #[rstest]
    #[case(170.0, Some(170.0))]
    #[case(0.0, None)]
    #[case(-1.0, None)]
    #[case(f64::NAN, None)]
    #[case(MEASUREMENT_MAX + 1.0, None)]
    fn checked_measurement_bounds(#[case] raw: f64, #[case] expected: Option<f64>) {
        assert_eq!(checked_measurement(raw), expected);
    }

    #[rstest]
    fn health_update_is_empty_only_when_all_unchanged() {
        assert!(HealthMetricsUpdate::default().is_empty());
        let cleared = HealthMetricsUpdate {
            gender: FieldUpdate::Clear,
            ..HealthMetricsUpdate::default()
        };
        assert!(!cleared.is_empty());
    }
}
