//! Contract types for the external label-analysis service.
//!
//! The service receives the label image plus an [`AnalysisProfile`] and
//! answers with a loosely typed JSON report. Only the fields needed to build
//! a [`NewScanRecord`] are interpreted; the full report is kept verbatim as
//! the record's audit payload.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::profile::FullProfile;
use super::scan::{NewScanRecord, NutritionFacts, RiskLevel};
use super::user::UserId;

/// Product name recorded when the report does not carry one.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown product";

/// Maximum accepted label image size in bytes.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Profile summary sent alongside an image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisProfile {
    pub user_id: UserId,
    pub diet_type: Option<String>,
    pub allergies: Vec<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub age_range: Option<String>,
    pub gender: Option<String>,
    pub diseases: Vec<String>,
    pub special_conditions: Vec<String>,
}

impl From<&FullProfile> for AnalysisProfile {
    fn from(profile: &FullProfile) -> Self {
        Self {
            user_id: profile.identity.user_id,
            diet_type: profile.identity.diet_type.map(|diet| diet.as_str().to_owned()),
            allergies: profile.allergies.clone(),
            height: profile.metrics.height,
            weight: profile.metrics.weight,
            age_range: profile
                .metrics
                .age_range
                .as_ref()
                .map(|range| range.as_str().to_owned()),
            gender: profile.metrics.gender.map(|gender| gender.as_str().to_owned()),
            diseases: profile.diseases.clone(),
            special_conditions: profile.special_conditions.clone(),
        }
    }
}

/// Label image uploaded by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanImage {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

/// Reasons a report cannot become a scan record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisReportError {
    /// The report status is anything other than `success`.
    #[error("analysis did not succeed (status: {status})")]
    NotSuccessful { status: String },
    /// The report does not match the expected shape.
    #[error("analysis report is malformed: {message}")]
    Malformed { message: String },
    /// The risk level is missing or unknown.
    #[error("analysis report has no usable risk level")]
    MissingRiskLevel,
}

#[derive(Debug, Default, Deserialize)]
struct AnalysisReport {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    risk_level: Option<String>,
    #[serde(default)]
    risk_score: Option<Value>,
    #[serde(default)]
    risk_reason: Option<String>,
    #[serde(default)]
    analysis: Option<AnalysisDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalysisDetail {
    #[serde(default)]
    nutrition: Option<NutritionReport>,
    #[serde(default, deserialize_with = "lenient_list")]
    detected_ingredients: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    allergen_warnings: Vec<AllergenWarning>,
    #[serde(default, deserialize_with = "lenient_list")]
    diet_warnings: Vec<DietWarning>,
}

#[derive(Debug, Default, Deserialize)]
struct NutritionReport {
    #[serde(default)]
    calories: Option<Value>,
    #[serde(default)]
    carbs: Option<Value>,
    #[serde(default)]
    protein: Option<Value>,
    #[serde(default)]
    fat: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct AllergenWarning {
    allergen: String,
}

#[derive(Debug, Deserialize)]
struct DietWarning {
    ingredient: String,
}

/// Read a report list, keeping only the entries that fit `T`.
///
/// `null` or a non-list reads as empty, and entries of the wrong shape (a
/// `null` item, a warning without its name) are skipped rather than failing
/// the whole report.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// True when the report says the analysis completed.
pub fn report_succeeded(report: &Value) -> bool {
    report.get("status").and_then(Value::as_str) == Some("success")
}

/// Translate a successful analysis report into a history record.
///
/// Nutrition values may arrive as numbers or as strings such as `"250kcal"`;
/// anything without a leading number is treated as absent. Allergen names
/// come from `allergen_warnings[].allergen` and diet warnings from
/// `diet_warnings[].ingredient`. Null lists read as empty and list entries of
/// the wrong shape are dropped. The whole report becomes the payload.
///
/// # Examples
/// ```
/// use allergy_scan_backend::domain::{RiskLevel, scan_record_from_report};
/// use serde_json::json;
///
/// let report = json!({
///     "status": "success",
///     "product_name": "Choco bar",
///     "risk_level": "red",
///     "risk_score": 85,
///     "risk_reason": "contains peanut",
///     "analysis": {
///         "nutrition": { "calories": "250kcal", "fat": 12.5 },
///         "detected_ingredients": ["sugar", "peanut"],
///         "allergen_warnings": [{ "allergen": "peanut", "severity": "high", "message": "!" }],
///         "diet_warnings": []
///     }
/// });
/// let record = scan_record_from_report(&report).expect("valid report");
/// assert_eq!(record.risk_level, RiskLevel::Red);
/// assert_eq!(record.nutrition.calories, Some(250.0));
/// assert_eq!(record.nutrition.carbs, None);
/// assert_eq!(record.detected_allergens(), ["peanut"]);
/// ```
pub fn scan_record_from_report(report: &Value) -> Result<NewScanRecord, AnalysisReportError> {
    let parsed: AnalysisReport =
        serde_json::from_value(report.clone()).map_err(|err| AnalysisReportError::Malformed {
            message: err.to_string(),
        })?;

    let status = parsed.status.unwrap_or_default();
    if status != "success" {
        return Err(AnalysisReportError::NotSuccessful { status });
    }

    let risk_level = parsed
        .risk_level
        .as_deref()
        .and_then(|raw| raw.trim().to_lowercase().parse::<RiskLevel>().ok())
        .ok_or(AnalysisReportError::MissingRiskLevel)?;

    let product_name = parsed
        .product_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_owned());

    let detail = parsed.analysis.unwrap_or_default();
    let nutrition = detail.nutrition.unwrap_or_default();

    let mut record = NewScanRecord::new(
        product_name,
        risk_level,
        parsed.risk_score.as_ref().and_then(score_from_value).unwrap_or(0),
        parsed.risk_reason.unwrap_or_default(),
    )
    .with_detected_allergens(detail.allergen_warnings.into_iter().map(|w| w.allergen));

    record.nutrition = NutritionFacts {
        calories: nutrition.calories.as_ref().and_then(number_from_value),
        carbs: nutrition.carbs.as_ref().and_then(number_from_value),
        protein: nutrition.protein.as_ref().and_then(number_from_value),
        fat: nutrition.fat.as_ref().and_then(number_from_value),
    };
    record.detected_ingredients = detail.detected_ingredients;
    record.diet_warnings = detail
        .diet_warnings
        .into_iter()
        .map(|warning| warning.ingredient)
        .collect();
    record.analysis_payload = report.clone();
    Ok(record)
}

/// Read a number from a JSON number or a string with a numeric prefix.
fn number_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => leading_number(text),
        _ => None,
    };
    number.filter(|number| number.is_finite())
}

fn leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let end = trimmed
        .char_indices()
        .find(|(index, ch)| {
            !(ch.is_ascii_digit() || *ch == '.' || (*index == 0 && matches!(ch, '-' | '+')))
        })
        .map_or(trimmed.len(), |(index, _)| index);
    trimmed.get(..end)?.parse().ok()
}

fn score_from_value(value: &Value) -> Option<i32> {
    let number = number_from_value(value)?.round();
    if number < f64::from(i32::MIN) || number > f64::from(i32::MAX) {
        return None;
    }
    Some(number as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BodyMetrics, DietType, Gender, ProfileIdentity};
    use rstest::rstest;
    use serde_json::json;

    fn success_report() -> Value {
        json!({
            "status": "success",
            "product_name": "Milk tea",
            "risk_level": "yellow",
            "risk_score": 55.4,
            "risk_reason": "contains milk",
            "analysis": {
                "nutrition": { "calories": 120, "carbs": "20.5 g", "protein": null },
                "detected_ingredients": ["milk", "tea"],
                "allergen_warnings": [
                    { "allergen": "milk", "severity": "medium", "message": "dairy" },
                    { "allergen": "milk", "severity": "low", "message": "again" }
                ],
                "diet_warnings": [
                    { "ingredient": "milk", "reason": "not vegan" },
                    { "ingredient": "gelatin", "reason": "not vegan" }
                ]
            }
        })
    }

    #[rstest]
    fn maps_success_report_fields() {
        let report = success_report();
        let record = scan_record_from_report(&report).expect("maps");

        assert_eq!(record.product_name, "Milk tea");
        assert_eq!(record.risk_level, RiskLevel::Yellow);
        assert_eq!(record.risk_score, 55);
        assert_eq!(record.nutrition.calories, Some(120.0));
        assert_eq!(record.nutrition.carbs, Some(20.5));
        assert_eq!(record.nutrition.protein, None);
        assert_eq!(record.nutrition.fat, None);
        assert_eq!(record.detected_ingredients, vec!["milk", "tea"]);
        assert_eq!(record.detected_allergens(), ["milk"]);
        assert_eq!(record.diet_warnings, vec!["milk", "gelatin"]);
        assert_eq!(record.analysis_payload, report);
    }

    #[rstest]
    #[case(json!({ "status": "error", "risk_level": "red" }))]
    #[case(json!({ "risk_level": "red" }))]
    fn rejects_unsuccessful_reports(#[case] report: Value) {
        assert!(matches!(
            scan_record_from_report(&report),
            Err(AnalysisReportError::NotSuccessful { .. })
        ));
        assert!(!report_succeeded(&report));
    }

    #[rstest]
    fn rejects_unknown_risk_level() {
        let report = json!({ "status": "success", "risk_level": "purple" });
        assert_eq!(
            scan_record_from_report(&report),
            Err(AnalysisReportError::MissingRiskLevel)
        );
    }

    #[rstest]
    fn missing_optional_sections_default_sensibly() {
        let report = json!({ "status": "success", "risk_level": "GREEN" });
        let record = scan_record_from_report(&report).expect("maps");
        assert_eq!(record.product_name, UNKNOWN_PRODUCT_NAME);
        assert_eq!(record.risk_level, RiskLevel::Green);
        assert_eq!(record.risk_score, 0);
        assert!(record.detected_ingredients.is_empty());
        assert_eq!(record.nutrition, NutritionFacts::default());
    }

    #[rstest]
    #[case(json!(null), json!(null), json!(null))]
    #[case(json!("milk"), json!({}), json!(7))]
    fn null_or_odd_lists_read_as_empty(
        #[case] ingredients: Value,
        #[case] allergens: Value,
        #[case] diet: Value,
    ) {
        let report = json!({
            "status": "success",
            "risk_level": "green",
            "analysis": {
                "nutrition": null,
                "detected_ingredients": ingredients,
                "allergen_warnings": allergens,
                "diet_warnings": diet
            }
        });

        let record = scan_record_from_report(&report).expect("maps");

        assert!(record.detected_ingredients.is_empty());
        assert!(record.detected_allergens().is_empty());
        assert!(record.diet_warnings.is_empty());
        assert_eq!(record.nutrition, NutritionFacts::default());
    }

    #[rstest]
    fn misshapen_list_entries_are_skipped() {
        let report = json!({
            "status": "success",
            "risk_level": "red",
            "analysis": {
                "detected_ingredients": ["peanut", null, 3, "salt"],
                "allergen_warnings": [
                    null,
                    { "severity": "high", "message": "unnamed" },
                    { "allergen": null },
                    { "allergen": "peanut", "severity": "high" }
                ],
                "diet_warnings": [{ "reason": "no ingredient" }, { "ingredient": "lard" }]
            }
        });

        let record = scan_record_from_report(&report).expect("maps");

        assert_eq!(record.detected_ingredients, vec!["peanut", "salt"]);
        assert_eq!(record.detected_allergens(), ["peanut"]);
        assert_eq!(record.diet_warnings, vec!["lard"]);
        assert_eq!(record.analysis_payload, report);
    }

    #[rstest]
    fn non_object_analysis_section_is_malformed() {
        let report = json!({ "status": "success", "risk_level": "red", "analysis": "oops" });
        assert!(matches!(
            scan_record_from_report(&report),
            Err(AnalysisReportError::Malformed { .. })
        ));
    }

    #[rstest]
    #[case("250kcal", Some(250.0))]
    #[case(" 12.5 g", Some(12.5))]
    #[case("-3", Some(-3.0))]
    #[case("kcal", None)]
    #[case("", None)]
    fn leading_number_extracts_prefix(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(leading_number(raw), expected);
    }

    #[rstest]
    fn analysis_profile_copies_profile_fields() {
        let user_id = UserId::random();
        let profile = FullProfile::assemble(
            ProfileIdentity {
                user_id,
                email: "park@example.com".to_owned(),
                name: "Park".to_owned(),
                diet_type: Some(DietType::Halal),
            },
            BodyMetrics {
                height: Some(180.0),
                weight: None,
                age_range: None,
                gender: Some(Gender::Female),
            },
            vec![Some("Shrimp".to_owned())],
            vec![],
            vec![None],
        );

        let summary = AnalysisProfile::from(&profile);
        let value = serde_json::to_value(&summary).expect("serialise");
        assert_eq!(
            value,
            json!({
                "user_id": user_id.to_string(),
                "diet_type": "halal",
                "allergies": ["Shrimp"],
                "height": 180.0,
                "weight": null,
                "age_range": null,
                "gender": "female",
                "diseases": [],
                "special_conditions": []
            })
        );
    }
}
