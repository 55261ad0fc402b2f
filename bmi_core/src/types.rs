//! Core domain types for the BMI calculator.
//!
//! This module defines the fundamental types used throughout the system:
//! - Canonical (metric) body measurements and their bounds
//! - Demographics (gender, activity level)
//! - BMI results, ideal-weight and calorie estimates
//! - History records

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Measurements
// ============================================================================

/// Smallest accepted height in centimeters
pub const MIN_HEIGHT_CM: f64 = 50.0;

/// Largest accepted height in centimeters
pub const MAX_HEIGHT_CM: f64 = 300.0;

/// Smallest accepted weight in kilograms
pub const MIN_WEIGHT_KG: f64 = 9.0;

/// Largest accepted weight in kilograms
pub const MAX_WEIGHT_KG: f64 = 227.0;

pub const MIN_AGE: u32 = 15;
pub const MAX_AGE: u32 = 120;

/// Height and weight in centimeters and kilograms.
///
/// Only produced by the normalizer, which guarantees
/// `50 <= height_cm <= 300` and `9 <= weight_kg <= 227`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMetrics {
    pub height_cm: f64,
    pub weight_kg: f64,
}

// ============================================================================
// Demographics
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(Error::InvalidInput(format!("unrecognized gender {:?}", other))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Daily activity level used to scale BMR into TDEE
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Lightly,
    Moderately,
    Very,
    Extremely,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Lightly => 1.375,
            ActivityLevel::Moderately => 1.55,
            ActivityLevel::Very => 1.725,
            ActivityLevel::Extremely => 1.9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Lightly => "lightly",
            ActivityLevel::Moderately => "moderately",
            ActivityLevel::Very => "very",
            ActivityLevel::Extremely => "extremely",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "lightly" | "light" => Ok(ActivityLevel::Lightly),
            "moderately" | "moderate" => Ok(ActivityLevel::Moderately),
            "very" => Ok(ActivityLevel::Very),
            "extremely" | "extra" => Ok(ActivityLevel::Extremely),
            other => Err(Error::InvalidInput(format!(
                "unrecognized activity level {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully validated calculator input
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub metrics: CanonicalMetrics,
    pub age: u32,
    pub gender: Gender,
    pub activity: ActivityLevel,
}

// ============================================================================
// Results
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl Category {
    /// Human-readable label, also used in history records
    pub fn label(self) -> &'static str {
        match self {
            Category::Underweight => "Underweight",
            Category::Normal => "Normal Weight",
            Category::Overweight => "Overweight",
            Category::Obese => "Obese",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    Blue,
    Green,
    Yellow,
    Red,
}

impl ColorTag {
    /// Display color for the tag
    pub fn hex(self) -> &'static str {
        match self {
            ColorTag::Blue => "#3b82f6",
            ColorTag::Green => "#10b981",
            ColorTag::Yellow => "#f59e0b",
            ColorTag::Red => "#ef4444",
        }
    }
}

/// Outcome of one BMI calculation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// BMI rounded to one decimal place
    pub bmi: f64,
    pub category: Category,
    pub color_tag: ColorTag,
    /// Position on the category scale, within `[0, 100]`
    pub progress_width_percent: f64,
    pub tips: String,
    pub age: u32,
    pub gender: Gender,
}

/// Ideal weight estimates in kilograms, each rounded to one decimal
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IdealWeight {
    /// Weights giving a BMI of 18.5 and 24.9
    pub bmi_range_kg: [f64; 2],
    pub robinson: f64,
    pub devine: f64,
    pub miller: f64,
    pub hamwi: f64,
}

/// Daily calorie figures, rounded to whole kilocalories
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalorieNeeds {
    pub bmr: i64,
    pub tdee: i64,
    pub weight_loss_target: i64,
    pub weight_gain_target: i64,
}

/// Everything derived from one validated profile
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub metrics: CanonicalMetrics,
    pub activity: ActivityLevel,
    pub result: BmiResult,
    pub ideal_weight: IdealWeight,
    pub calories: CalorieNeeds,
}

// ============================================================================
// History
// ============================================================================

/// A saved BMI result.
///
/// Serialized with the field names `bmi`, `category`, `date` and `timestamp`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub bmi: f64,
    pub category: String,
    /// UTC calendar date, `YYYY-MM-DD`
    #[serde(rename = "date")]
    pub iso_date: String,
    /// Milliseconds since the Unix epoch
    #[serde(rename = "timestamp")]
    pub timestamp_millis: i64,
}

impl HistoryRecord {
    pub fn from_result(result: &BmiResult, at: DateTime<Utc>) -> Self {
        Self {
            bmi: result.bmi,
            category: result.category.label().to_string(),
            iso_date: at.format("%Y-%m-%d").to_string(),
            timestamp_millis: at.timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_activity_levels() {
        assert_eq!(
            "moderately".parse::<ActivityLevel>().unwrap(),
            ActivityLevel::Moderately
        );
        assert_eq!(
            "SEDENTARY".parse::<ActivityLevel>().unwrap(),
            ActivityLevel::Sedentary
        );
        assert!(matches!(
            "couch".parse::<ActivityLevel>(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_gender() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("m".parse::<Gender>().unwrap(), Gender::Male);
        assert!("other".parse::<Gender>().is_err());
    }

    #[test]
    fn test_history_record_from_result() {
        let result = BmiResult {
            bmi: 22.9,
            category: Category::Normal,
            color_tag: ColorTag::Green,
            progress_width_percent: 42.0,
            tips: String::new(),
            age: 30,
            gender: Gender::Male,
        };
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 23, 30, 0).unwrap();

        let record = HistoryRecord::from_result(&result, at);
        assert_eq!(record.bmi, 22.9);
        assert_eq!(record.category, "Normal Weight");
        assert_eq!(record.iso_date, "2024-03-09");
        assert_eq!(record.timestamp_millis, at.timestamp_millis());
    }

    #[test]
    fn test_history_record_json_field_names() {
        let json = r#"{"bmi":24.1,"category":"Normal Weight","date":"2024-01-15","timestamp":1705312800000}"#;
        let record: HistoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.iso_date, "2024-01-15");
        assert_eq!(record.timestamp_millis, 1_705_312_800_000);

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("date").is_some());
        assert!(value.get("timestamp").is_some());
    }
}
