//! BMI, ideal weight and calorie computations.
//!
//! Every function here is pure. Inputs are expected to come from the
//! normalizer; [`compute_bmi`] still refuses non-positive or non-finite values
//! so a caller bug can never surface as `Infinity` or `NaN`.

use crate::units::round_to;
use crate::{
    ActivityLevel, Assessment, BmiResult, CalorieNeeds, Category, ColorTag, Error, Gender,
    IdealWeight, Profile, Result,
};

const CM_PER_INCH: f64 = 2.54;

/// Height in inches that the ideal-weight formulas are anchored at (5 ft)
const FORMULA_BASE_INCHES: f64 = 60.0;

const UNDERWEIGHT_TIPS: &str = "Consider consulting a healthcare provider about healthy weight gain strategies. Focus on nutrient-dense foods, strength training, and regular meals.";
const NORMAL_TIPS: &str = "Great job maintaining a healthy weight! Continue with regular exercise, balanced nutrition, and stay hydrated for optimal health.";
const OVERWEIGHT_TIPS: &str = "Consider gradual lifestyle changes including portion control, regular physical activity, and consulting a nutritionist for personalized advice.";
const OBESE_TIPS: &str = "Consult with a healthcare provider for a comprehensive weight management plan. Focus on sustainable lifestyle changes and professional guidance.";

/// Category, color and scale position for a BMI value
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub category: Category,
    pub color_tag: ColorTag,
    /// Unclamped position on a four-band 0..100 scale
    pub progress_width_percent: f64,
    pub tips: &'static str,
}

/// Body mass index: `weight_kg / (height_cm / 100)^2`.
///
/// Both inputs must be finite and positive, and so must the result; anything
/// else is a [`Error::PreconditionViolation`].
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> Result<f64> {
    if !(height_cm.is_finite() && height_cm > 0.0) {
        return Err(Error::PreconditionViolation(format!(
            "height must be positive and finite, got {}",
            height_cm
        )));
    }
    if !(weight_kg.is_finite() && weight_kg > 0.0) {
        return Err(Error::PreconditionViolation(format!(
            "weight must be positive and finite, got {}",
            weight_kg
        )));
    }

    let meters = height_cm / 100.0;
    let bmi = weight_kg / (meters * meters);
    if !bmi.is_finite() {
        return Err(Error::PreconditionViolation(format!(
            "BMI is not finite for {} cm / {} kg",
            height_cm, weight_kg
        )));
    }
    Ok(bmi)
}

/// Classify a BMI value.
///
/// Bands are half-open: 18.5 is Normal, 25 is Overweight, 30 is Obese.
pub fn classify(bmi: f64) -> Classification {
    if bmi < 18.5 {
        Classification {
            category: Category::Underweight,
            color_tag: ColorTag::Blue,
            progress_width_percent: (bmi / 18.5) * 25.0,
            tips: UNDERWEIGHT_TIPS,
        }
    } else if bmi < 25.0 {
        Classification {
            category: Category::Normal,
            color_tag: ColorTag::Green,
            progress_width_percent: 25.0 + ((bmi - 18.5) / 6.5) * 25.0,
            tips: NORMAL_TIPS,
        }
    } else if bmi < 30.0 {
        Classification {
            category: Category::Overweight,
            color_tag: ColorTag::Yellow,
            progress_width_percent: 50.0 + ((bmi - 25.0) / 5.0) * 25.0,
            tips: OVERWEIGHT_TIPS,
        }
    } else {
        Classification {
            category: Category::Obese,
            color_tag: ColorTag::Red,
            progress_width_percent: 75.0 + (((bmi - 30.0) / 10.0) * 25.0).min(25.0),
            tips: OBESE_TIPS,
        }
    }
}

/// Ideal weight estimates for a height and gender
pub fn ideal_weight(height_cm: f64, gender: Gender) -> IdealWeight {
    let meters = height_cm / 100.0;
    let over_five_feet = height_cm / CM_PER_INCH - FORMULA_BASE_INCHES;

    // (base kg, kg per inch over five feet)
    let (robinson, devine, miller, hamwi) = match gender {
        Gender::Male => ((52.0, 1.9), (50.0, 2.3), (56.2, 1.41), (48.0, 2.7)),
        Gender::Female => ((49.0, 1.7), (45.5, 2.3), (53.1, 1.36), (45.5, 2.2)),
    };
    let formula = |(base, per_inch): (f64, f64)| round_to(base + per_inch * over_five_feet, 1);

    IdealWeight {
        bmi_range_kg: [
            round_to(18.5 * meters * meters, 1),
            round_to(24.9 * meters * meters, 1),
        ],
        robinson: formula(robinson),
        devine: formula(devine),
        miller: formula(miller),
        hamwi: formula(hamwi),
    }
}

/// Daily calorie needs via the Mifflin-St Jeor equation
pub fn calorie_needs(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: Gender,
    activity: ActivityLevel,
) -> CalorieNeeds {
    let offset = match gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    };
    let bmr = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age) + offset;
    let tdee = (bmr * activity.multiplier()).round() as i64;

    CalorieNeeds {
        bmr: bmr.round() as i64,
        tdee,
        weight_loss_target: tdee - 500,
        weight_gain_target: tdee + 500,
    }
}

/// Run every computation for a validated profile
pub fn assess(profile: &Profile) -> Result<Assessment> {
    let metrics = profile.metrics;
    let bmi = compute_bmi(metrics.height_cm, metrics.weight_kg)?;
    let class = classify(bmi);

    tracing::info!(
        "BMI {:.1} ({}) for {:.1} cm / {:.1} kg",
        bmi,
        class.category,
        metrics.height_cm,
        metrics.weight_kg
    );

    let result = BmiResult {
        bmi: round_to(bmi, 1),
        category: class.category,
        color_tag: class.color_tag,
        progress_width_percent: class.progress_width_percent.clamp(0.0, 100.0),
        tips: class.tips.to_string(),
        age: profile.age,
        gender: profile.gender,
    };

    Ok(Assessment {
        metrics,
        activity: profile.activity,
        result,
        ideal_weight: ideal_weight(metrics.height_cm, profile.gender),
        calories: calorie_needs(
            metrics.weight_kg,
            metrics.height_cm,
            profile.age,
            profile.gender,
            profile.activity,
        ),
    })
}
