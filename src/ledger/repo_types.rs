use serde::Serialize;
use sqlx::FromRow;
use time::Date;

/// A logged meal as stored. Immutable once written; rows only ever
/// leave the table through whole-record deletion.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MealRecord {
    pub id: i64,
    #[serde(with = "crate::dates::serde_date")]
    pub log_date: Date,
    pub meal_name: String,
    pub logged_at: String,
    pub serving: Option<String>,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
}

/// A meal about to be appended; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub log_date: Date,
    pub meal_name: String,
    pub logged_at: String,
    pub serving: Option<String>,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
}

impl NewMeal {
    pub fn into_record(self, id: i64) -> MealRecord {
        MealRecord {
            id,
            log_date: self.log_date,
            meal_name: self.meal_name,
            logged_at: self.logged_at,
            serving: self.serving,
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
            fiber_g: self.fiber_g,
            sugar_g: self.sugar_g,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, FromRow)]
pub struct DailyTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}
