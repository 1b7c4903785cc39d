//! Scan history records.
//!
//! A record is written once per successful analysis and never changed. The
//! list fields are plain string lists here; their textual storage encoding
//! is an adapter concern.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Traffic-light risk classification produced by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Green,
    Yellow,
    Red,
}

impl RiskLevel {
    /// Stable storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

/// Error returned when parsing an unknown risk level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("risk level must be green, yellow, or red (got {value})")]
pub struct RiskLevelParseError {
    value: String,
}

impl FromStr for RiskLevel {
    type Err = RiskLevelParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "red" => Ok(Self::Red),
            other => Err(RiskLevelParseError {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nutrition figures; each one is absent unless the analysis reported it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutritionFacts {
    pub calories: Option<f64>,
    pub carbs: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
}

/// Generated identifier of a stored scan record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ScanId(i64);

impl ScanId {
    /// Wrap a key read from storage.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw key.
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// A completed analysis ready to be appended to a user's history.
#[derive(Debug, Clone, PartialEq)]
pub struct NewScanRecord {
    pub product_name: String,
    pub risk_level: RiskLevel,
    pub risk_score: i32,
    pub risk_reason: String,
    pub nutrition: NutritionFacts,
    pub detected_ingredients: Vec<String>,
    detected_allergens: Vec<String>,
    pub diet_warnings: Vec<String>,
    pub analysis_payload: Value,
}

impl NewScanRecord {
    /// Build a record with empty lists and an empty payload.
    pub fn new(
        product_name: impl Into<String>,
        risk_level: RiskLevel,
        risk_score: i32,
        risk_reason: impl Into<String>,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            risk_level,
            risk_score,
            risk_reason: risk_reason.into(),
            nutrition: NutritionFacts::default(),
            detected_ingredients: Vec::new(),
            detected_allergens: Vec::new(),
            diet_warnings: Vec::new(),
            analysis_payload: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set detected allergens, dropping blanks and repeated names.
    ///
    /// Dashboard frequencies count records per allergen, so a name must
    /// appear at most once per record.
    ///
    /// # Examples
    /// ```
    /// use allergy_scan_backend::domain::{NewScanRecord, RiskLevel};
    ///
    /// let record = NewScanRecord::new("Cookies", RiskLevel::Red, 80, "contains egg")
    ///     .with_detected_allergens(["egg", "milk", "egg", " "]);
    /// assert_eq!(record.detected_allergens(), ["egg", "milk"]);
    /// ```
    #[must_use]
    pub fn with_detected_allergens<I, S>(mut self, allergens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        self.detected_allergens = allergens
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| !name.trim().is_empty())
            .filter(|name| seen.insert(name.clone()))
            .collect();
        self
    }

    /// Detected allergen names, unique within the record.
    pub fn detected_allergens(&self) -> &[String] {
        &self.detected_allergens
    }
}

/// A stored scan record with every list decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRecord {
    pub id: ScanId,
    pub product_name: String,
    pub risk_level: RiskLevel,
    pub risk_score: i32,
    pub risk_reason: String,
    pub nutrition: NutritionFacts,
    pub detected_ingredients: Vec<String>,
    pub detected_allergens: Vec<String>,
    pub diet_warnings: Vec<String>,
    pub analysis_payload: Value,
    pub scanned_at: DateTime<Utc>,
}
