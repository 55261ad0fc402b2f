#![forbid(unsafe_code)]

//! Core domain model and computations for the BMI calculator.
//!
//! This crate provides:
//! - Unit conversion (length, mass, composite feet+inches / stones+pounds)
//! - Input normalization with field-tagged validation
//! - BMI classification, ideal weight and calorie estimates
//! - Persistence (bounded history, form restore, theme preference)
//! - Configuration and logging setup

pub mod types;
pub mod error;
pub mod units;
pub mod normalize;
pub mod engine;
pub mod storage;
pub mod history;
pub mod prefs;
pub mod calculator;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, ErrorClass, Field, Result, ValidationError};
pub use types::*;
pub use normalize::{normalize, normalize_profile, FormData, RawMeasurements};
pub use engine::{assess, calorie_needs, classify, compute_bmi, ideal_weight, Classification};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use history::{HistoryStore, HISTORY_CAPACITY};
pub use prefs::Theme;
pub use calculator::Calculator;
pub use config::Config;
