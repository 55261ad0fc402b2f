//! Raw form input to canonical metrics.
//!
//! Every field arrives as an optional string, exactly as typed. Validation
//! happens once, here: a missing, non-numeric, non-positive or out-of-range
//! value is reported as a field-tagged [`ValidationError`] and never replaced
//! by a default.

use crate::units::{self, LengthUnit, MassUnit};
use crate::{
    ActivityLevel, CanonicalMetrics, Field, Gender, Profile, ValidationError, MAX_AGE,
    MAX_HEIGHT_CM, MAX_WEIGHT_KG, MIN_AGE, MIN_HEIGHT_CM, MIN_WEIGHT_KG,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

type Validated<T> = std::result::Result<T, ValidationError>;

/// Height and weight fields as entered.
///
/// When `height_unit` is `ft`, height comes from `feet` and `inches`
/// instead of `height`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMeasurements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inches: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_unit: Option<String>,
}

/// The whole calculator form: measurements plus demographics.
///
/// This is also the shape persisted for session restore.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    #[serde(flatten)]
    pub measurements: RawMeasurements,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
}

/// Normalize raw height and weight into centimeters and kilograms
pub fn normalize(raw: &RawMeasurements) -> Validated<CanonicalMetrics> {
    let height_cm = normalize_height(raw)?;
    let weight_kg = normalize_weight(raw)?;
    tracing::debug!("Normalized input to {:.2} cm, {:.2} kg", height_cm, weight_kg);
    Ok(CanonicalMetrics {
        height_cm,
        weight_kg,
    })
}

/// Normalize the whole form into a validated [`Profile`]
pub fn normalize_profile(form: &FormData) -> Validated<Profile> {
    let metrics = normalize(&form.measurements)?;
    let age = parse_age(form.age.as_deref())?;
    let gender = parse_choice::<Gender>(form.gender.as_deref(), Field::Gender)?;
    let activity =
        parse_choice::<ActivityLevel>(form.activity_level.as_deref(), Field::ActivityLevel)?;

    Ok(Profile {
        metrics,
        age,
        gender,
        activity,
    })
}

fn normalize_height(raw: &RawMeasurements) -> Validated<f64> {
    let unit = parse_choice::<LengthUnit>(raw.height_unit.as_deref(), Field::HeightUnit)?;

    let cm = if unit == LengthUnit::Foot {
        let feet = parse_number(raw.feet.as_deref(), Field::Feet)?;
        let inches = parse_number(raw.inches.as_deref(), Field::Inches)?;
        if feet.is_none() && inches.is_none() {
            return Err(ValidationError::Missing { field: Field::Height });
        }
        let feet = non_negative(feet.unwrap_or(0.0), Field::Feet)?;
        let inches = non_negative(inches.unwrap_or(0.0), Field::Inches)?;

        let cm = units::feet_inches_to_cm(feet, inches);
        if cm <= 0.0 {
            return Err(ValidationError::NotPositive {
                field: Field::Height,
                value: cm,
            });
        }
        cm
    } else {
        let value = require_positive(raw.height.as_deref(), Field::Height)?;
        units::length_to_cm(value, unit).map_err(|_| ValidationError::NotPositive {
            field: Field::Height,
            value,
        })?
    };

    within_bounds(cm, Field::Height, MIN_HEIGHT_CM, MAX_HEIGHT_CM, "cm")
}

fn normalize_weight(raw: &RawMeasurements) -> Validated<f64> {
    let unit = parse_choice::<MassUnit>(raw.weight_unit.as_deref(), Field::WeightUnit)?;
    let value = require_positive(raw.weight.as_deref(), Field::Weight)?;
    let kg = units::mass_to_kg(value, unit).map_err(|_| ValidationError::NotPositive {
        field: Field::Weight,
        value,
    })?;

    within_bounds(kg, Field::Weight, MIN_WEIGHT_KG, MAX_WEIGHT_KG, "kg")
}

/// Parse an optional numeric field; blank counts as absent
fn parse_number(raw: Option<&str>, field: Field) -> Validated<Option<f64>> {
    let Some(text) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let value: f64 = text.parse().map_err(|_| ValidationError::NonNumeric {
        field,
        raw: text.to_string(),
    })?;

    if !value.is_finite() {
        return Err(ValidationError::NonFinite { field });
    }
    Ok(Some(value))
}

fn require_positive(raw: Option<&str>, field: Field) -> Validated<f64> {
    let value = parse_number(raw, field)?.ok_or(ValidationError::Missing { field })?;
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(value)
}

fn non_negative(value: f64, field: Field) -> Validated<f64> {
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

fn within_bounds(
    value: f64,
    field: Field,
    min: f64,
    max: f64,
    unit: &'static str,
) -> Validated<f64> {
    if !(min..=max).contains(&value) {
        return Err(ValidationError::OutOfBounds {
            field,
            value,
            min,
            max,
            unit,
        });
    }
    Ok(value)
}

/// Parse a whole-number age; any fractional part is dropped
fn parse_age(raw: Option<&str>) -> Validated<u32> {
    let value = require_positive(raw, Field::Age)?.trunc();
    if value < MIN_AGE as f64 || value > MAX_AGE as f64 {
        return Err(ValidationError::OutOfBounds {
            field: Field::Age,
            value,
            min: MIN_AGE as f64,
            max: MAX_AGE as f64,
            unit: "years",
        });
    }
    Ok(value as u32)
}

fn parse_choice<T: FromStr>(raw: Option<&str>, field: Field) -> Validated<T> {
    let text = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::Missing { field })?;

    text.parse().map_err(|_| ValidationError::Unrecognized {
        field,
        value: text.to_string(),
    })
}
