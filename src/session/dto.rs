use serde::{Deserialize, Serialize};
use time::Date;

use crate::ledger::MealRecord;
use crate::profile::Profile;

use super::View;

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub target: View,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub view: View,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Option<Profile>,
    pub view: View,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    /// Lets the user's own description win over the model's name.
    #[serde(default)]
    pub meal_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MacroGauge {
    pub consumed_g: f64,
    pub target_g: f64,
}

#[derive(Debug, Serialize)]
pub struct DashboardMacros {
    pub protein: MacroGauge,
    pub carbs: MacroGauge,
    pub fat: MacroGauge,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(with = "crate::dates::serde_date")]
    pub date: Date,
    pub daily_target_kcal: f64,
    pub consumed_kcal: f64,
    pub remaining_kcal: f64,
    pub macros: DashboardMacros,
    pub meals: Vec<MealRecord>,
}
