//! Request and response payloads for the profile endpoints.
//!
//! Partial-update bodies keep every field as raw JSON wrapped in
//! [`FieldUpdate`] so omitted, `null`, and malformed values are told apart
//! before anything reaches a port.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{
    CatalogEntry, Error, FieldUpdate, FullProfile, HealthMetricsUpdate, ProfileIdentity,
    ProfileUpdate, ProfileWithAllergies,
};
use crate::inbound::http::validation::{
    FieldName, optional_catalog_ids, parse_age_range, parse_diet_type, parse_gender,
    parse_measurement, parse_name,
};

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CatalogEntryResponse {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "peanut")]
    pub name: String,
    #[schema(example = "Peanut")]
    pub display_name: String,
}

impl From<CatalogEntry> for CatalogEntryResponse {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            id: entry.id.get(),
            name: entry.name,
            display_name: entry.display_name,
        }
    }
}

pub(crate) fn entry_responses(entries: Vec<CatalogEntry>) -> Vec<CatalogEntryResponse> {
    entries.into_iter().map(CatalogEntryResponse::from).collect()
}

/// Identity fields plus editable allergy rows.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    #[schema(example = "6f1d2a4e-8c1b-4b6e-9a55-1f6f6b8f0c21")]
    pub user_id: String,
    pub email: String,
    pub name: String,
    #[schema(example = "vegan")]
    pub diet_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub allergies: Vec<CatalogEntryResponse>,
}

fn diet_label(identity: &ProfileIdentity) -> Option<String> {
    identity.diet_type.map(|diet| diet.as_str().to_owned())
}

impl From<ProfileWithAllergies> for ProfileResponse {
    fn from(profile: ProfileWithAllergies) -> Self {
        Self {
            user_id: profile.identity.user_id.to_string(),
            diet_type: diet_label(&profile.identity),
            email: profile.identity.email,
            name: profile.identity.name,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
            allergies: entry_responses(profile.allergies),
        }
    }
}

/// Complete health profile with display names per relation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FullProfileResponse {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub diet_type: Option<String>,
    #[schema(example = 171.5)]
    pub height: Option<f64>,
    pub weight: Option<f64>,
    #[schema(example = "30-39")]
    pub age_range: Option<String>,
    #[schema(example = "female")]
    pub gender: Option<String>,
    pub allergies: Vec<String>,
    pub diseases: Vec<String>,
    pub special_conditions: Vec<String>,
}

impl From<FullProfile> for FullProfileResponse {
    fn from(profile: FullProfile) -> Self {
        let FullProfile {
            identity,
            metrics,
            allergies,
            diseases,
            special_conditions,
        } = profile;
        Self {
            user_id: identity.user_id.to_string(),
            diet_type: diet_label(&identity),
            email: identity.email,
            name: identity.name,
            height: metrics.height,
            weight: metrics.weight,
            age_range: metrics.age_range.map(String::from),
            gender: metrics.gender.map(|gender| gender.as_str().to_owned()),
            allergies,
            diseases,
            special_conditions,
        }
    }
}

/// `PATCH /profile` body. Omitted fields are left alone.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProfileUpdateRequest {
    /// New display name; `null` is rejected.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Ada")]
    pub name: FieldUpdate<Value>,
    /// Diet type, or `null` to clear it.
    #[serde(default)]
    #[schema(value_type = Option<String>, nullable, example = "vegetarian")]
    pub diet_type: FieldUpdate<Value>,
    /// Complete allergy set; `[]` clears it.
    #[serde(default)]
    #[schema(value_type = Option<Vec<i32>>, example = json!([1, 3]))]
    pub allergy_ids: FieldUpdate<Value>,
}

impl TryFrom<ProfileUpdateRequest> for ProfileUpdate {
    type Error = Error;

    fn try_from(request: ProfileUpdateRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: parse_name(request.name)?,
            diet_type: parse_diet_type(request.diet_type)?,
            allergies: optional_catalog_ids(request.allergy_ids, FieldName::new("allergy_ids"))?,
        })
    }
}

/// `PATCH /profile/health` body. Each field may be omitted, set, or `null`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct HealthMetricsRequest {
    #[serde(default)]
    #[schema(value_type = Option<f64>, nullable, example = 171.5)]
    pub height: FieldUpdate<Value>,
    #[serde(default)]
    #[schema(value_type = Option<f64>, nullable, example = 62.0)]
    pub weight: FieldUpdate<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>, nullable, example = "30-39")]
    pub age_range: FieldUpdate<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>, nullable, example = "female")]
    pub gender: FieldUpdate<Value>,
}

impl TryFrom<HealthMetricsRequest> for HealthMetricsUpdate {
    type Error = Error;

    fn try_from(request: HealthMetricsRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            height: parse_measurement(request.height, FieldName::new("height"))?,
            weight: parse_measurement(request.weight, FieldName::new("weight"))?,
            age_range: parse_age_range(request.age_range)?,
            gender: parse_gender(request.gender)?,
        })
    }
}

/// `PUT /profile/diseases` body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DiseaseIdsRequest {
    #[serde(default)]
    #[schema(value_type = Vec<i32>, example = json!([2]))]
    pub disease_ids: FieldUpdate<Value>,
}

/// `PUT /profile/special-conditions` body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConditionIdsRequest {
    #[serde(default)]
    #[schema(value_type = Vec<i32>, example = json!([1]))]
    pub condition_ids: FieldUpdate<Value>,
}
