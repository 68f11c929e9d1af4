use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

/// What the model claims about a meal. Transient: held in the session
/// until the user confirms or discards it, never stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionEstimate {
    pub meal_name: String,
    pub serving: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
}

/// Validating parse of the model's reply. The wire contract requires
/// `meal_name`, `serving` and the four core macros; `fiber_g` and
/// `sugar_g` may be absent and default to 0. Anything else - non-JSON,
/// missing keys, non-numeric or negative macros - is an estimation
/// failure and nothing reaches the ledger.
pub fn parse_estimate(raw: &str) -> Result<NutritionEstimate, AppError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| AppError::estimation(format!("vision reply is not valid JSON: {e}")))?;
    let obj = value
        .as_object()
        .ok_or_else(|| AppError::estimation("vision reply is not a JSON object"))?;

    let meal_name = required_string(obj, "meal_name")?;
    if meal_name.trim().is_empty() {
        return Err(AppError::estimation("vision reply has an empty 'meal_name'"));
    }

    Ok(NutritionEstimate {
        meal_name: meal_name.trim().to_owned(),
        serving: required_string(obj, "serving")?,
        calories: required_macro(obj, "calories")?,
        protein_g: required_macro(obj, "protein_g")?,
        carbs_g: required_macro(obj, "carbs_g")?,
        fat_g: required_macro(obj, "fat_g")?,
        fiber_g: optional_macro(obj, "fiber_g")?,
        sugar_g: optional_macro(obj, "sugar_g")?,
    })
}

fn required_string(obj: &Map<String, Value>, key: &str) -> Result<String, AppError> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(AppError::estimation(format!(
            "vision reply field '{key}' is not a string"
        ))),
        None => Err(AppError::estimation(format!(
            "vision reply is missing '{key}'"
        ))),
    }
}

fn required_macro(obj: &Map<String, Value>, key: &str) -> Result<f64, AppError> {
    match obj.get(key) {
        Some(value) => numeric(value, key),
        None => Err(AppError::estimation(format!(
            "vision reply is missing '{key}'"
        ))),
    }
}

fn optional_macro(obj: &Map<String, Value>, key: &str) -> Result<f64, AppError> {
    match obj.get(key) {
        Some(Value::Null) | None => Ok(0.0),
        Some(value) => numeric(value, key),
    }
}

fn numeric(value: &Value, key: &str) -> Result<f64, AppError> {
    let n = value.as_f64().ok_or_else(|| {
        AppError::estimation(format!("vision reply field '{key}' is not a number"))
    })?;
    if !n.is_finite() || n < 0.0 {
        return Err(AppError::estimation(format!(
            "vision reply field '{key}' is out of range: {n}"
        )));
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> serde_json::Value {
        serde_json::json!({
            "meal_name": "Margherita pizza",
            "serving": "2 slices",
            "calories": 540.0,
            "protein_g": 22.0,
            "carbs_g": 62.0,
            "fat_g": 21.0,
            "fiber_g": 4.5,
            "sugar_g": 7.0
        })
    }

    #[test]
    fn parses_a_complete_reply() {
        let est = parse_estimate(&full_payload().to_string()).unwrap();
        assert_eq!(est.meal_name, "Margherita pizza");
        assert_eq!(est.serving, "2 slices");
        assert_eq!(est.calories, 540.0);
        assert_eq!(est.fiber_g, 4.5);
    }

    #[test]
    fn fiber_and_sugar_default_to_zero() {
        let mut payload = full_payload();
        payload.as_object_mut().unwrap().remove("fiber_g");
        payload.as_object_mut().unwrap().remove("sugar_g");

        let est = parse_estimate(&payload.to_string()).unwrap();
        assert_eq!(est.fiber_g, 0.0);
        assert_eq!(est.sugar_g, 0.0);
    }

    #[test]
    fn missing_required_macro_is_an_estimation_error() {
        let mut payload = full_payload();
        payload.as_object_mut().unwrap().remove("protein_g");

        let err = parse_estimate(&payload.to_string()).unwrap_err();
        assert!(matches!(err, AppError::Estimation(_)), "{err}");
        assert!(err.to_string().contains("protein_g"));
    }

    #[test]
    fn numeric_strings_are_rejected() {
        let mut payload = full_payload();
        payload["calories"] = serde_json::json!("540");

        let err = parse_estimate(&payload.to_string()).unwrap_err();
        assert!(matches!(err, AppError::Estimation(_)));
    }

    #[test]
    fn negative_macros_are_rejected() {
        let mut payload = full_payload();
        payload["fat_g"] = serde_json::json!(-3.0);

        assert!(parse_estimate(&payload.to_string()).is_err());
    }

    #[test]
    fn empty_meal_name_is_rejected() {
        let mut payload = full_payload();
        payload["meal_name"] = serde_json::json!("   ");

        assert!(parse_estimate(&payload.to_string()).is_err());
    }

    #[test]
    fn non_json_body_is_an_estimation_error() {
        let err = parse_estimate("I'd say roughly 540 kcal?").unwrap_err();
        assert!(matches!(err, AppError::Estimation(_)));
    }

    #[test]
    fn json_array_is_rejected() {
        assert!(parse_estimate("[1, 2, 3]").is_err());
    }
}
