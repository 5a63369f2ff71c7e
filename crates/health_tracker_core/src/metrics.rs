//! crates/health_tracker_core/src/metrics.rs
//!
//! Derived health metrics (BMI, BMR, TDEE) computed from a user's `PersonalInfo`.
//!
//! Every function here is total: missing inputs produce `0` (or `"0"` for the
//! formatted BMI) instead of an error. Callers treat a zero as "not enough data
//! to display", not as a real measurement.

use crate::domain::{ActivityLevel, Gender, PersonalInfo};
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// BMI band used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        };
        f.write_str(label)
    }
}

/// All derived metrics for one profile, as served to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    /// BMI rounded to one decimal place, `"0"` when height or weight is missing.
    pub bmi: String,
    pub bmi_category: BmiCategory,
    /// Basal metabolic rate in kcal/day.
    pub bmr: i64,
    /// Total daily energy expenditure in kcal/day.
    pub tdee: i64,
}

impl ActivityLevel {
    /// Fixed TDEE multiplier for this activity level.
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

/// Rounds to the nearest integer with halves going up, so `-2.5` becomes `-2`.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

// Zero and NaN both count as "not filled in".
fn is_missing(value: f64) -> bool {
    value == 0.0 || value.is_nan()
}

/// Body mass index, `weight / (height/100)^2`, formatted to one decimal place.
pub fn bmi(info: &PersonalInfo) -> String {
    if is_missing(info.height) || is_missing(info.weight) {
        return "0".to_string();
    }
    let height_m = info.height / 100.0;
    format!("{:.1}", info.weight / (height_m * height_m))
}

pub fn bmi_category(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Basal metabolic rate using the Mifflin-St Jeor equation.
///
/// Returns `0` unless age, height and weight are all non-zero. Only `Male`
/// takes the `+5` offset; every other value (including an unset gender) takes
/// `-161`.
pub fn bmr(info: &PersonalInfo) -> i64 {
    if info.age == 0 || is_missing(info.height) || is_missing(info.weight) {
        return 0;
    }
    let base = 10.0 * info.weight + 6.25 * info.height - 5.0 * f64::from(info.age);
    let adjusted = match info.gender {
        Some(Gender::Male) => base + 5.0,
        _ => base - 161.0,
    };
    round_half_up(adjusted) as i64
}

/// Scales an already computed BMR by the activity multiplier.
pub fn tdee_from_bmr(bmr: i64, activity_level: ActivityLevel) -> i64 {
    if bmr == 0 {
        return 0;
    }
    round_half_up(bmr as f64 * activity_level.multiplier()) as i64
}

pub fn tdee(info: &PersonalInfo) -> i64 {
    tdee_from_bmr(bmr(info), info.activity_level)
}

/// Computes every metric for a profile in one pass.
pub fn health_metrics(info: &PersonalInfo) -> HealthMetrics {
    let bmi = bmi(info);
    // The category is derived from the displayed value, so a missing BMI
    // ("0") reads as Underweight.
    let bmi_category = bmi_category(bmi.parse::<f64>().unwrap_or(0.0));
    let bmr = bmr(info);
    HealthMetrics {
        bmi,
        bmi_category,
        bmr,
        tdee: tdee_from_bmr(bmr, info.activity_level),
    }
}
