use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::nutrition::{
    basal_metabolic_rate, daily_energy_target, ActivityLevel, Goal, Sex,
};

pub const AGE_YEARS: RangeInclusive<u32> = 10..=100;
pub const WEIGHT_KG: RangeInclusive<f64> = 30.0..=250.0;
pub const HEIGHT_CM: RangeInclusive<f64> = 120.0..=250.0;

/// The in-memory user profile. Lives for the session only and is
/// replaced wholesale on save; meal rows are the only durable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub sex: Sex,
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

impl Profile {
    /// Range checks at the input boundary; the calculator assumes
    /// these have passed.
    pub fn validate(&self) -> Result<(), AppError> {
        if !AGE_YEARS.contains(&self.age) {
            return Err(AppError::validation(format!(
                "age must be between {} and {} years",
                AGE_YEARS.start(),
                AGE_YEARS.end()
            )));
        }
        if !WEIGHT_KG.contains(&self.weight_kg) {
            return Err(AppError::validation(format!(
                "weight must be between {} and {} kg",
                WEIGHT_KG.start(),
                WEIGHT_KG.end()
            )));
        }
        if !HEIGHT_CM.contains(&self.height_cm) {
            return Err(AppError::validation(format!(
                "height must be between {} and {} cm",
                HEIGHT_CM.start(),
                HEIGHT_CM.end()
            )));
        }
        Ok(())
    }

    pub fn daily_target_kcal(&self) -> f64 {
        let bmr = basal_metabolic_rate(self.sex, self.weight_kg, self.height_cm, self.age);
        daily_energy_target(bmr, self.activity_level, self.goal)
    }
}
