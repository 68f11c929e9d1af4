//! Energy and macro arithmetic. Pure functions over validated inputs;
//! range checks live at the input boundary, not here.

use serde::{Deserialize, Serialize};

// Fixed policy: how the daily calorie budget splits across macros, and
// the energy density used to convert each share into grams.
pub const PROTEIN_KCAL_SHARE: f64 = 0.25;
pub const CARBS_KCAL_SHARE: f64 = 0.50;
pub const FAT_KCAL_SHARE: f64 = 0.25;
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Heavy,
    Athlete,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Heavy => 1.725,
            Self::Athlete => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    Maintain,
    GainMuscle,
}

impl Goal {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::LoseWeight => 0.8,
            Self::Maintain => 1.0,
            Self::GainMuscle => 1.15,
        }
    }
}

/// Mifflin-St Jeor resting energy expenditure in kcal/day.
pub fn basal_metabolic_rate(sex: Sex, weight_kg: f64, height_cm: f64, age: u32) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

pub fn daily_energy_target(bmr: f64, activity: ActivityLevel, goal: Goal) -> f64 {
    bmr * activity.multiplier() * goal.multiplier()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroTargets {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Split a daily kcal budget into gram targets per macro.
pub fn macro_targets(daily_kcal: f64) -> MacroTargets {
    MacroTargets {
        protein_g: PROTEIN_KCAL_SHARE * daily_kcal / KCAL_PER_G_PROTEIN,
        carbs_g: CARBS_KCAL_SHARE * daily_kcal / KCAL_PER_G_CARBS,
        fat_g: FAT_KCAL_SHARE * daily_kcal / KCAL_PER_G_FAT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmr_reference_case() {
        // Male, 30y, 70kg, 175cm: 700 + 1093.75 - 150 + 5.
        let bmr = basal_metabolic_rate(Sex::Male, 70.0, 175.0, 30);
        assert!((bmr - 1648.75).abs() < 1e-9);
    }

    #[test]
    fn tdee_reference_case() {
        let bmr = basal_metabolic_rate(Sex::Male, 70.0, 175.0, 30);
        let tdee = daily_energy_target(bmr, ActivityLevel::Sedentary, Goal::Maintain);
        assert!((tdee - 1978.5).abs() < 1e-9);
    }

    #[test]
    fn female_offset_differs_by_166() {
        let male = basal_metabolic_rate(Sex::Male, 60.0, 165.0, 40);
        let female = basal_metabolic_rate(Sex::Female, 60.0, 165.0, 40);
        assert!((male - female - 166.0).abs() < 1e-9);
    }

    #[test]
    fn target_is_positive_and_monotone() {
        let base = basal_metabolic_rate(Sex::Female, 55.0, 160.0, 25);
        let target = daily_energy_target(base, ActivityLevel::Light, Goal::LoseWeight);
        assert!(target > 0.0);

        // Heavier, taller, more active, or bulking all raise the target.
        let heavier = basal_metabolic_rate(Sex::Female, 56.0, 160.0, 25);
        assert!(heavier > base);

        let taller = basal_metabolic_rate(Sex::Female, 55.0, 161.0, 25);
        assert!(taller > base);

        let more_active = daily_energy_target(base, ActivityLevel::Moderate, Goal::LoseWeight);
        assert!(more_active > target);

        let bulking = daily_energy_target(base, ActivityLevel::Light, Goal::GainMuscle);
        assert!(bulking > target);
    }

    #[test]
    fn macro_split_reassembles_the_budget() {
        for kcal in [1200.0, 1978.5, 2500.0, 3200.0] {
            let m = macro_targets(kcal);
            let reassembled = m.protein_g * KCAL_PER_G_PROTEIN
                + m.carbs_g * KCAL_PER_G_CARBS
                + m.fat_g * KCAL_PER_G_FAT;
            assert!((reassembled - kcal).abs() < 1e-6, "kcal={kcal}");
        }
    }

    #[test]
    fn activity_multipliers_are_ordered() {
        let levels = [
            ActivityLevel::Sedentary,
            ActivityLevel::Light,
            ActivityLevel::Moderate,
            ActivityLevel::Heavy,
            ActivityLevel::Athlete,
        ];
        for pair in levels.windows(2) {
            assert!(pair[0].multiplier() < pair[1].multiplier());
        }
    }
}
