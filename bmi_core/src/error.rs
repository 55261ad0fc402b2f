//! Error types for the bmi_core library.

use std::fmt;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for bmi_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A value or unit that cannot be converted or computed with
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A user-entered field failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An internal invariant was broken by the caller
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),
}

/// Form field a validation failure refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Height,
    HeightUnit,
    Feet,
    Inches,
    Weight,
    WeightUnit,
    Age,
    Gender,
    ActivityLevel,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Height => "height",
            Field::HeightUnit => "height unit",
            Field::Feet => "feet",
            Field::Inches => "inches",
            Field::Weight => "weight",
            Field::WeightUnit => "weight unit",
            Field::Age => "age",
            Field::Gender => "gender",
            Field::ActivityLevel => "activity level",
        };
        f.write_str(name)
    }
}

/// Broad class of a validation failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Missing, non-numeric, non-positive or unrecognized value
    InvalidInput,
    /// Parsed value lies outside the accepted human range
    OutOfBounds,
}

/// Field-tagged validation failure, suitable for a per-field message
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter your {field}")]
    Missing { field: Field },

    #[error("The {field} must be a number (got {raw:?})")]
    NonNumeric { field: Field, raw: String },

    #[error("The {field} must be a finite number")]
    NonFinite { field: Field },

    #[error("The {field} must be greater than zero (got {value})")]
    NotPositive { field: Field, value: f64 },

    #[error("The {field} cannot be negative (got {value})")]
    Negative { field: Field, value: f64 },

    #[error("Unrecognized {field} {value:?}")]
    Unrecognized { field: Field, value: String },

    #[error("Please enter a valid {field} (between {min} and {max} {unit}, got {value:.1})")]
    OutOfBounds {
        field: Field,
        value: f64,
        min: f64,
        max: f64,
        unit: &'static str,
    },
}

impl ValidationError {
    /// The field this failure refers to
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Missing { field }
            | ValidationError::NonNumeric { field, .. }
            | ValidationError::NonFinite { field }
            | ValidationError::NotPositive { field, .. }
            | ValidationError::Negative { field, .. }
            | ValidationError::Unrecognized { field, .. }
            | ValidationError::OutOfBounds { field, .. } => *field,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            ValidationError::OutOfBounds { .. } => ErrorClass::OutOfBounds,
            _ => ErrorClass::InvalidInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_name_the_field() {
        let err = ValidationError::Missing {
            field: Field::Weight,
        };
        assert_eq!(err.to_string(), "Please enter your weight");

        let err = ValidationError::OutOfBounds {
            field: Field::Height,
            value: 412.0,
            min: 50.0,
            max: 300.0,
            unit: "cm",
        };
        assert!(err.to_string().contains("height"));
        assert!(err.to_string().contains("between 50 and 300 cm"));
    }

    #[test]
    fn test_validation_class() {
        let missing = ValidationError::Missing { field: Field::Age };
        assert_eq!(missing.class(), ErrorClass::InvalidInput);
        assert_eq!(missing.field(), Field::Age);

        let bounds = ValidationError::OutOfBounds {
            field: Field::Weight,
            value: 500.0,
            min: 9.0,
            max: 227.0,
            unit: "kg",
        };
        assert_eq!(bounds.class(), ErrorClass::OutOfBounds);
    }

    #[test]
    fn test_validation_converts_into_error() {
        let err: Error = ValidationError::NonFinite {
            field: Field::Height,
        }
        .into();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.to_string(), "The height must be a finite number");
    }
}
