//! Analysis payload parsing
//!
//! Turns the loosely structured nutrition payload returned by a food
//! analysis backend into a [`FoodRecord`]. Missing or odd numeric fields
//! degrade to zero; only unreadable JSON text is an error.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{FoodRecord, UNKNOWN_FOOD};
use crate::nutrition::aggregator::canonical_log_date;

/// Payload text that is not valid JSON once code fences are removed
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid nutrition payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Candidate keys per field, checked in order
pub const FOOD_NAME_KEYS: &[&str] = &["food_name"];
pub const CALORIES_KEYS: &[&str] = &["calories"];
pub const PROTEIN_KEYS: &[&str] = &["protein"];
pub const CARBS_KEYS: &[&str] = &["carbohydrates", "carbs"];
pub const FAT_KEYS: &[&str] = &["fat", "fats"];

/// Micronutrients shown with an analysis result
const MAX_MICRONUTRIENTS: usize = 6;

const DEFAULT_PORTION: &str = "Standard serving";

/// Resolve a payload to structured JSON
///
/// Strings are treated as JSON text, possibly wrapped in markdown code
/// fences. Anything else is already structured and is returned as-is.
pub fn unwrap(payload: &Value) -> Result<Value, ParseError> {
    match payload {
        Value::String(text) => unwrap_text(text),
        other => Ok(other.clone()),
    }
}

/// Strip ```` ```json ```` / ```` ``` ```` markers and parse the rest
pub fn unwrap_text(text: &str) -> Result<Value, ParseError> {
    let stripped = if text.contains("```") {
        text.replace("```json", "").replace("```", "")
    } else {
        text.to_string()
    };

    Ok(serde_json::from_str(stripped.trim())?)
}

/// Read a number out of a loosely typed value
///
/// Numbers pass through. Text yields its first decimal number ("15g" -> 15,
/// "approximately 15-20g" -> 15). Everything else is 0.
pub fn extract_number(value: &Value) -> f64 {
    if !is_truthy(value) {
        return 0.0;
    }

    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(s) => first_decimal(s).unwrap_or(0.0),
        Value::Array(_) => first_decimal(&value.to_string()).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// First run of digits with at most one decimal point
fn first_decimal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let starts_number = |i: usize| {
        bytes[i].is_ascii_digit()
            || (bytes[i] == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    };

    let start = (0..bytes.len()).find(|&i| starts_number(i))?;

    let mut end = start;
    let mut seen_point = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_point => {
                seen_point = true;
                end += 1;
            }
            _ => break,
        }
    }

    // A trailing point ("15." in "15. grams") is not part of the number
    let digits = text[start..end].trim_end_matches('.');
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// JSON truthiness: null, false, 0, NaN and "" are falsy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First candidate key holding a truthy value
fn first_present<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| is_truthy(value))
}

fn number_field(fields: &Map<String, Value>, keys: &[&str]) -> f64 {
    first_present(fields, keys)
        .map(extract_number)
        .unwrap_or(0.0)
        .max(0.0)
}

fn text_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first_present(fields, keys).map(|value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Normalize an unwrapped payload, stamping it with the current time
pub fn normalize(value: &Value) -> FoodRecord {
    normalize_at(value, Utc::now())
}

/// Normalize an unwrapped payload
///
/// `logged_at` becomes the log date unless the payload carries a readable
/// `log_date` of its own.
pub fn normalize_at(value: &Value, logged_at: DateTime<Utc>) -> FoodRecord {
    let empty = Map::new();
    let fields = value.as_object().unwrap_or(&empty);

    let log_date = text_field(fields, &["log_date"])
        .and_then(|s| canonical_log_date(&s))
        .unwrap_or_else(|| logged_at.to_rfc3339_opts(SecondsFormat::Millis, true));

    FoodRecord {
        id: None,
        food_name: text_field(fields, FOOD_NAME_KEYS).unwrap_or_else(|| UNKNOWN_FOOD.to_string()),
        calories: number_field(fields, CALORIES_KEYS),
        protein_grams: number_field(fields, PROTEIN_KEYS),
        carbs_grams: number_field(fields, CARBS_KEYS),
        fat_grams: number_field(fields, FAT_KEYS),
        log_date,
    }
}

/// Display label for a nutrient key ("vitamin_b12" -> "Vitamin B12")
pub fn format_nutrient_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut in_word = false;

    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        let is_word = c.is_alphanumeric();
        if is_word && !in_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        in_word = is_word;
    }

    out
}

/// One vitamin or mineral line from an analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Micronutrient {
    pub key: String,
    pub label: String,
    pub value: String,
}

/// Display-only extras carried by an analysis payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisDetails {
    pub portion_size: String,
    pub fiber_grams: Option<f64>,
    pub micronutrients: Vec<Micronutrient>,
    pub potential_allergens: Vec<String>,
    pub health_notes: Option<String>,
}

/// Collect the display extras of an unwrapped payload
pub fn details(value: &Value) -> AnalysisDetails {
    let empty = Map::new();
    let fields = value.as_object().unwrap_or(&empty);

    let micronutrients = fields
        .get("vitamins_and_minerals")
        .and_then(Value::as_object)
        .map(|micros| {
            micros
                .iter()
                .filter(|(_, v)| is_truthy(v))
                .take(MAX_MICRONUTRIENTS)
                .map(|(k, v)| Micronutrient {
                    key: k.clone(),
                    label: format_nutrient_key(k),
                    value: match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    },
                })
                .collect()
        })
        .unwrap_or_default();

    let potential_allergens = fields
        .get("potential_allergens")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|v| is_truthy(v))
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    AnalysisDetails {
        portion_size: text_field(fields, &["portion_size"])
            .unwrap_or_else(|| DEFAULT_PORTION.to_string()),
        fiber_grams: first_present(fields, &["fiber"]).map(extract_number),
        micronutrients,
        potential_allergens,
        health_notes: text_field(fields, &["health_assessment", "health_notes"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number(&json!("15g")), 15.0);
        assert_eq!(extract_number(&json!("")), 0.0);
        assert_eq!(extract_number(&json!(12)), 12.0);
        assert_eq!(extract_number(&Value::Null), 0.0);
        assert_eq!(extract_number(&json!("12.5 grams")), 12.5);
        assert_eq!(extract_number(&json!("about 0.5g")), 0.5);
        assert_eq!(extract_number(&json!("none")), 0.0);
        assert_eq!(extract_number(&json!(true)), 0.0);
        assert_eq!(extract_number(&json!({"value": 3})), 0.0);
    }

    #[test]
    fn test_extract_number_takes_first_of_range() {
        assert_eq!(extract_number(&json!("approximately 15-20g")), 15.0);
    }

    #[test]
    fn test_extract_number_single_decimal_point() {
        assert_eq!(extract_number(&json!("1.2.3")), 1.2);
        assert_eq!(extract_number(&json!("v. 7")), 7.0);
        assert_eq!(extract_number(&json!(".5 oz")), 0.5);
        assert_eq!(extract_number(&json!("15. grams")), 15.0);
    }

    #[test]
    fn test_unwrap_fenced_text() {
        let text = "```json\n{\"food_name\": \"Banana\", \"calories\": 105}\n```";
        let value = unwrap(&json!(text)).unwrap();
        assert_eq!(value["food_name"], "Banana");
        assert_eq!(value["calories"], 105);
    }

    #[test]
    fn test_unwrap_plain_fence_and_bare_text() {
        let value = unwrap_text("```\n{\"calories\": 1}\n```").unwrap();
        assert_eq!(value["calories"], 1);

        let value = unwrap_text("  {\"calories\": 2}  ").unwrap();
        assert_eq!(value["calories"], 2);
    }

    #[test]
    fn test_unwrap_structured_passthrough() {
        let payload = json!({"calories": 300});
        assert_eq!(unwrap(&payload).unwrap(), payload);
    }

    #[test]
    fn test_unwrap_invalid_text() {
        assert!(matches!(
            unwrap(&json!("```json\nnot json\n```")),
            Err(ParseError::InvalidJson(_))
        ));
        assert!(unwrap_text("").is_err());
    }

    #[test]
    fn test_normalize_keeps_zero_calories() {
        let record = normalize(&json!({"calories": 0, "protein": "20g"}));
        assert_eq!(record.calories, 0.0);
        assert_eq!(record.protein_grams, 20.0);
        assert_eq!(record.carbs_grams, 0.0);
        assert_eq!(record.fat_grams, 0.0);
        assert_eq!(record.food_name, UNKNOWN_FOOD);
        assert_eq!(record.id, None);
    }

    #[test]
    fn test_normalize_primary_key_wins() {
        let record = normalize(&json!({"carbohydrates": "10g", "carbs": "99g"}));
        assert_eq!(record.carbs_grams, 10.0);

        let record = normalize(&json!({"fat": 4, "fats": 40}));
        assert_eq!(record.fat_grams, 4.0);
    }

    #[test]
    fn test_normalize_falls_back_on_secondary_key() {
        let record = normalize(&json!({"carbs": "30 g", "fats": "7g"}));
        assert_eq!(record.carbs_grams, 30.0);
        assert_eq!(record.fat_grams, 7.0);

        // A falsy primary does not shadow the secondary
        let record = normalize(&json!({"carbohydrates": "", "carbs": "12g"}));
        assert_eq!(record.carbs_grams, 12.0);
    }

    #[test]
    fn test_normalize_clamps_negative_values() {
        let record = normalize(&json!({"calories": -50, "protein": 3}));
        assert_eq!(record.calories, 0.0);
        assert_eq!(record.protein_grams, 3.0);
    }

    #[test]
    fn test_normalize_non_object() {
        let record = normalize(&json!([1, 2, 3]));
        assert_eq!(record.food_name, UNKNOWN_FOOD);
        assert_eq!(record.calories, 0.0);
    }

    #[test]
    fn test_normalize_log_date() {
        let at = Utc.with_ymd_and_hms(2025, 1, 9, 8, 30, 0).unwrap();
        let record = normalize_at(&json!({"food_name": "Oatmeal"}), at);
        assert_eq!(record.food_name, "Oatmeal");
        assert_eq!(record.log_date, "2025-01-09T08:30:00.000Z");

        let record = normalize_at(&json!({"log_date": "2025-02-01"}), at);
        assert_eq!(record.log_date, "2025-02-01");

        let record = normalize_at(&json!({"log_date": "2025-02-01T23:30:00-05:00"}), at);
        assert_eq!(record.log_date, "2025-02-02T04:30:00.000Z");
    }

    #[test]
    fn test_normalize_unreadable_log_date_uses_logged_at() {
        let at = Utc.with_ymd_and_hms(2025, 1, 9, 8, 30, 0).unwrap();

        for bad in ["01/09/2025", "yesterday", ""] {
            let record = normalize_at(&json!({"food_name": "Toast", "log_date": bad}), at);
            assert_eq!(record.log_date, "2025-01-09T08:30:00.000Z");
        }
    }

    #[test]
    fn test_format_nutrient_key() {
        assert_eq!(format_nutrient_key("vitamin_a"), "Vitamin A");
        assert_eq!(format_nutrient_key("vitamin_b12"), "Vitamin B12");
        assert_eq!(format_nutrient_key("omega-3_fatty_acids"), "Omega-3 Fatty Acids");
        assert_eq!(format_nutrient_key("iron"), "Iron");
    }

    #[test]
    fn test_details() {
        let payload = json!({
            "food_name": "Spinach salad",
            "fiber": "4g",
            "vitamins_and_minerals": {
                "vitamin_a": "100% DV",
                "vitamin_c": "",
                "iron": "15% DV",
                "calcium": "10% DV",
                "potassium": "12% DV",
                "magnesium": "8% DV",
                "folate": "30% DV",
                "zinc": "5% DV"
            },
            "potential_allergens": ["nuts"],
            "health_notes": "High in iron"
        });

        let d = details(&payload);
        assert_eq!(d.portion_size, "Standard serving");
        assert_eq!(d.fiber_grams, Some(4.0));
        assert_eq!(d.micronutrients.len(), 6);
        assert!(d.micronutrients.iter().all(|m| m.key != "vitamin_c"));
        assert_eq!(d.potential_allergens, vec!["nuts".to_string()]);
        assert_eq!(d.health_notes.as_deref(), Some("High in iron"));
    }

    #[test]
    fn test_details_keeps_payload_order() {
        let payload = json!({
            "vitamins_and_minerals": {
                "zinc": "5% DV",
                "vitamin_a": "100% DV",
                "iron": "15% DV",
                "calcium": "10% DV",
                "potassium": "12% DV",
                "magnesium": "8% DV",
                "biotin": "3% DV"
            }
        });

        let keys: Vec<String> = details(&payload)
            .micronutrients
            .into_iter()
            .map(|m| m.key)
            .collect();
        assert_eq!(
            keys,
            vec!["zinc", "vitamin_a", "iron", "calcium", "potassium", "magnesium"]
        );
    }

    #[test]
    fn test_details_prefers_health_assessment() {
        let d = details(&json!({
            "portion_size": "1 cup",
            "health_assessment": "Balanced",
            "health_notes": "ignored"
        }));
        assert_eq!(d.portion_size, "1 cup");
        assert_eq!(d.health_notes.as_deref(), Some("Balanced"));
        assert_eq!(d.fiber_grams, None);
    }
}
