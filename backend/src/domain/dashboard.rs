//! Dashboard periods and scan-history statistics.
//!
//! Statistics are recomputed from the windowed record set on every request.
//! History is append-only and per-user volumes are small, so there is no
//! running aggregate to invalidate.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

use super::scan::{RiskLevel, ScanRecord};

/// Reporting window selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Period {
    /// The last 7 days.
    #[default]
    Week,
    /// The last 30 days.
    Month,
    /// No lower bound.
    All,
}

/// Error returned when parsing a period from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsePeriodError;

impl fmt::Display for ParsePeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("period must be one of week, month, all")
    }
}

impl std::error::Error for ParsePeriodError {}

impl Period {
    /// Stable wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::All => "all",
        }
    }

    /// Inclusive lower bound of the window ending at `now`.
    ///
    /// # Examples
    /// ```
    /// use allergy_scan_backend::domain::Period;
    /// use chrono::{Duration, TimeZone, Utc};
    ///
    /// let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap();
    /// assert_eq!(Period::Week.window_start(now), Some(now - Duration::days(7)));
    /// assert_eq!(Period::All.window_start(now), None);
    /// ```
    pub fn window_start(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Week => Some(now - Duration::days(7)),
            Self::Month => Some(now - Duration::days(30)),
            Self::All => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "all" => Ok(Self::All),
            _ => Err(ParsePeriodError),
        }
    }
}

/// Record counts per risk level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskDistribution {
    pub green: u64,
    pub yellow: u64,
    pub red: u64,
}

/// Mean nutrition figures formatted with one decimal place.
///
/// A field with no reported values renders as `"0.0"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AverageNutrition {
    pub calories: String,
    pub carbs: String,
    pub protein: String,
    pub fat: String,
}

/// Aggregate view over a user's windowed scan history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub period: Period,
    pub scan_count: u64,
    pub risk_distribution: RiskDistribution,
    pub avg_nutrition: AverageNutrition,
    pub allergen_frequency: BTreeMap<String, u64>,
    pub diet_violation_count: u64,
}

#[derive(Debug, Default)]
struct RunningMean {
    sum: f64,
    count: u32,
}

impl RunningMean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    fn formatted(&self) -> String {
        let mean = if self.count == 0 {
            0.0
        } else {
            self.sum / f64::from(self.count)
        };
        // Ties round away from zero: 0.25 renders as "0.3".
        let rounded = (mean * 10.0).round() / 10.0;
        format!("{rounded:.1}")
    }
}

/// Compute dashboard statistics over `records`.
///
/// Nulls are excluded per nutrition field. Allergen frequency counts records,
/// so a name repeated within one record still contributes once. A record
/// counts as a diet violation when its warning list is non-empty.
pub fn compute_stats(period: Period, records: &[ScanRecord]) -> DashboardStats {
    let mut risk_distribution = RiskDistribution::default();
    let mut calories = RunningMean::default();
    let mut carbs = RunningMean::default();
    let mut protein = RunningMean::default();
    let mut fat = RunningMean::default();
    let mut allergen_frequency = BTreeMap::new();
    let mut diet_violation_count = 0;

    for record in records {
        match record.risk_level {
            RiskLevel::Green => risk_distribution.green += 1,
            RiskLevel::Yellow => risk_distribution.yellow += 1,
            RiskLevel::Red => risk_distribution.red += 1,
        }

        calories.push(record.nutrition.calories);
        carbs.push(record.nutrition.carbs);
        protein.push(record.nutrition.protein);
        fat.push(record.nutrition.fat);

        let unique: HashSet<&str> = record
            .detected_allergens
            .iter()
            .map(String::as_str)
            .filter(|name| !name.trim().is_empty())
            .collect();
        for name in unique {
            *allergen_frequency.entry(name.to_owned()).or_insert(0) += 1;
        }

        if !record.diet_warnings.is_empty() {
            diet_violation_count += 1;
        }
    }

    DashboardStats {
        period,
        scan_count: records.len() as u64,
        risk_distribution,
        avg_nutrition: AverageNutrition {
            calories: calories.formatted(),
            carbs: carbs.formatted(),
            protein: protein.formatted(),
            fat: fat.formatted(),
        },
        allergen_frequency,
        diet_violation_count,
    }
}
