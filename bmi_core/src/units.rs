//! Length and mass unit conversion.
//!
//! All conversions go through a canonical unit (centimeters for length,
//! kilograms for mass) using fixed multiplication factors. Nothing is rounded
//! here except the composite feet+inches / stones+pounds remainders and the
//! display formatting in [`Converted`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const CM_PER_INCH: f64 = 2.54;
const INCHES_PER_FOOT: f64 = 12.0;
const KG_PER_POUND: f64 = 0.453592;
const POUNDS_PER_STONE: f64 = 14.0;

// ============================================================================
// Units
// ============================================================================

/// Length units accepted for height input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    Centimeter,
    Meter,
    Millimeter,
    Foot,
    Inch,
}

impl LengthUnit {
    /// Centimeters per one of this unit
    pub fn cm_factor(self) -> f64 {
        match self {
            LengthUnit::Centimeter => 1.0,
            LengthUnit::Meter => 100.0,
            LengthUnit::Millimeter => 0.1,
            LengthUnit::Foot => 30.48,
            LengthUnit::Inch => CM_PER_INCH,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Centimeter => "cm",
            LengthUnit::Meter => "m",
            LengthUnit::Millimeter => "mm",
            LengthUnit::Foot => "ft",
            LengthUnit::Inch => "in",
        }
    }
}

impl FromStr for LengthUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cm" | "centimeter" | "centimeters" => Ok(LengthUnit::Centimeter),
            "m" | "meter" | "meters" => Ok(LengthUnit::Meter),
            "mm" | "millimeter" | "millimeters" => Ok(LengthUnit::Millimeter),
            "ft" | "foot" | "feet" => Ok(LengthUnit::Foot),
            "in" | "inch" | "inches" => Ok(LengthUnit::Inch),
            other => Err(Error::InvalidInput(format!(
                "unrecognized length unit {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Mass units accepted for weight input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MassUnit {
    Kilogram,
    Gram,
    Pound,
    Ounce,
    Stone,
}

impl MassUnit {
    /// Kilograms per one of this unit
    pub fn kg_factor(self) -> f64 {
        match self {
            MassUnit::Kilogram => 1.0,
            MassUnit::Gram => 0.001,
            MassUnit::Pound => KG_PER_POUND,
            MassUnit::Ounce => 0.0283495,
            MassUnit::Stone => 6.35029,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            MassUnit::Kilogram => "kg",
            MassUnit::Gram => "g",
            MassUnit::Pound => "lbs",
            MassUnit::Ounce => "oz",
            MassUnit::Stone => "st",
        }
    }
}

impl FromStr for MassUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kilogram" | "kilograms" => Ok(MassUnit::Kilogram),
            "g" | "gram" | "grams" => Ok(MassUnit::Gram),
            "lb" | "lbs" | "pound" | "pounds" => Ok(MassUnit::Pound),
            "oz" | "ounce" | "ounces" => Ok(MassUnit::Ounce),
            "st" | "stone" | "stones" => Ok(MassUnit::Stone),
            other => Err(Error::InvalidInput(format!(
                "unrecognized mass unit {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for MassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Composite values
// ============================================================================

/// Height expressed as whole feet plus remaining inches (1 decimal)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeetInches {
    pub feet: u32,
    pub inches: f64,
}

/// Weight expressed as whole stones plus remaining pounds (1 decimal)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StonesPounds {
    pub stones: u32,
    pub pounds: f64,
}

/// Split `total` into whole groups of `per` and a 1-decimal remainder.
///
/// A remainder that rounds up to a full group carries into the whole part,
/// so 71.97 inches is 6' 0" rather than 5' 12". Totals whose whole part
/// does not fit a `u32` are rejected.
fn split_composite(total: f64, per: f64) -> Result<(u32, f64)> {
    let mut whole = (total / per).floor();
    let mut rest = round_to(total % per, 1);
    if rest >= per {
        whole += 1.0;
        rest = 0.0;
    }
    if !(0.0..=u32::MAX as f64).contains(&whole) {
        return Err(Error::InvalidInput(format!(
            "{} is too large to split into whole groups of {}",
            total, per
        )));
    }
    Ok((whole as u32, rest))
}

// ============================================================================
// Conversions
// ============================================================================

fn ensure_positive(value: f64, what: &str) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::InvalidInput(format!("{} must be finite", what)));
    }
    if value <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "{} must be greater than zero, got {}",
            what, value
        )));
    }
    Ok(value)
}

/// Convert a length in `from` units to centimeters
pub fn length_to_cm(value: f64, from: LengthUnit) -> Result<f64> {
    Ok(ensure_positive(value, "length")? * from.cm_factor())
}

/// Convert centimeters to a length in `to` units
pub fn cm_to_length(cm: f64, to: LengthUnit) -> Result<f64> {
    Ok(ensure_positive(cm, "length")? / to.cm_factor())
}

/// Decompose centimeters into feet and inches
pub fn cm_to_feet_inches(cm: f64) -> Result<FeetInches> {
    let total_inches = ensure_positive(cm, "length")? / CM_PER_INCH;
    let (feet, inches) = split_composite(total_inches, INCHES_PER_FOOT)?;
    Ok(FeetInches { feet, inches })
}

/// Exact conversion of a feet+inches pair to centimeters.
///
/// Callers validate the parts; the formula applies to any input.
pub fn feet_inches_to_cm(feet: f64, inches: f64) -> f64 {
    (feet * INCHES_PER_FOOT + inches) * CM_PER_INCH
}

/// Convert a mass in `from` units to kilograms
pub fn mass_to_kg(value: f64, from: MassUnit) -> Result<f64> {
    Ok(ensure_positive(value, "mass")? * from.kg_factor())
}

/// Convert kilograms to a mass in `to` units
pub fn kg_to_mass(kg: f64, to: MassUnit) -> Result<f64> {
    Ok(ensure_positive(kg, "mass")? / to.kg_factor())
}

/// Decompose kilograms into stones and pounds
pub fn kg_to_stones_pounds(kg: f64) -> Result<StonesPounds> {
    let total_pounds = ensure_positive(kg, "mass")? / KG_PER_POUND;
    let (stones, pounds) = split_composite(total_pounds, POUNDS_PER_STONE)?;
    Ok(StonesPounds { stones, pounds })
}

// ============================================================================
// Display conversions
// ============================================================================

/// Target of a length conversion: a plain unit or feet+inches
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthTarget {
    Unit(LengthUnit),
    FeetInches,
}

impl FromStr for LengthTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ftin" | "ft+in" | "ft-in" => Ok(LengthTarget::FeetInches),
            other => other.parse().map(LengthTarget::Unit),
        }
    }
}

/// Target of a mass conversion: a plain unit or stones+pounds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MassTarget {
    Unit(MassUnit),
    StonesPounds,
}

impl FromStr for MassTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "stlb" | "st+lb" | "st-lb" => Ok(MassTarget::StonesPounds),
            other => other.parse().map(MassTarget::Unit),
        }
    }
}

/// Result of a display conversion.
///
/// The `Display` impl applies magnitude-tiered precision; the numeric fields
/// keep full precision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Converted {
    Length { value: f64, unit: LengthUnit },
    FeetInches(FeetInches),
    Mass { value: f64, unit: MassUnit },
    StonesPounds(StonesPounds),
}

/// Convert a length between any two display targets
pub fn convert_length(value: f64, from: LengthUnit, to: LengthTarget) -> Result<Converted> {
    let cm = length_to_cm(value, from)?;
    match to {
        LengthTarget::Unit(unit) => Ok(Converted::Length {
            value: cm_to_length(cm, unit)?,
            unit,
        }),
        LengthTarget::FeetInches => cm_to_feet_inches(cm).map(Converted::FeetInches),
    }
}

/// Convert a mass between any two display targets
pub fn convert_weight(value: f64, from: MassUnit, to: MassTarget) -> Result<Converted> {
    let kg = mass_to_kg(value, from)?;
    match to {
        MassTarget::Unit(unit) => Ok(Converted::Mass {
            value: kg_to_mass(kg, unit)?,
            unit,
        }),
        MassTarget::StonesPounds => kg_to_stones_pounds(kg).map(Converted::StonesPounds),
    }
}

fn length_precision(value: f64, unit: LengthUnit) -> usize {
    match unit {
        LengthUnit::Centimeter => tiered(value, &[(10.0, 2), (100.0, 1)]),
        LengthUnit::Meter => 3,
        LengthUnit::Millimeter => 0,
        LengthUnit::Foot => 2,
        LengthUnit::Inch => 1,
    }
}

fn mass_precision(value: f64, unit: MassUnit) -> usize {
    match unit {
        MassUnit::Kilogram => tiered(value, &[(1.0, 3), (10.0, 2), (100.0, 1)]),
        MassUnit::Gram | MassUnit::Pound => tiered(value, &[(10.0, 2), (100.0, 1)]),
        MassUnit::Ounce => 1,
        MassUnit::Stone => 2,
    }
}

/// Decimals for the first tier whose upper bound exceeds `value`, else 0
fn tiered(value: f64, tiers: &[(f64, usize)]) -> usize {
    tiers
        .iter()
        .find(|(bound, _)| value < *bound)
        .map(|(_, decimals)| *decimals)
        .unwrap_or(0)
}

fn format_fixed(value: f64, decimals: usize) -> String {
    if decimals == 0 {
        format!("{:.0}", value.round())
    } else {
        format!("{:.*}", decimals, value)
    }
}

impl fmt::Display for Converted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Converted::Length { value, unit } => write!(
                f,
                "{} {}",
                format_fixed(*value, length_precision(*value, *unit)),
                unit
            ),
            Converted::FeetInches(FeetInches { feet, inches }) => {
                write!(f, "{}' {}\"", feet, inches)
            }
            Converted::Mass { value, unit } => write!(
                f,
                "{} {}",
                format_fixed(*value, mass_precision(*value, *unit)),
                unit
            ),
            Converted::StonesPounds(StonesPounds { stones, pounds }) => {
                write!(f, "{} st {} lb", stones, pounds)
            }
        }
    }
}

/// Round to a fixed number of decimal places, halves away from zero
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
