//! Nutrition goals model
//!
//! Daily targets stored as one serialized record in the settings store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::{DbResult, SettingsStore};

/// Settings key of the goals record
pub const GOALS_KEY: &str = "nutritionGoals";

pub const DEFAULT_CALORIES: f64 = 2000.0;
pub const DEFAULT_PROTEIN_GRAMS: f64 = 50.0;
pub const DEFAULT_CARBS_GRAMS: f64 = 250.0;
pub const DEFAULT_FAT_GRAMS: f64 = 70.0;

/// Daily nutrient targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionGoals {
    pub calories: f64,
    #[serde(rename = "protein")]
    pub protein_grams: f64,
    #[serde(rename = "carbs")]
    pub carbs_grams: f64,
    #[serde(rename = "fat")]
    pub fat_grams: f64,
}

impl Default for NutritionGoals {
    fn default() -> Self {
        Self {
            calories: DEFAULT_CALORIES,
            protein_grams: DEFAULT_PROTEIN_GRAMS,
            carbs_grams: DEFAULT_CARBS_GRAMS,
            fat_grams: DEFAULT_FAT_GRAMS,
        }
    }
}

/// A usable goal: positive and finite
fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Goal value from a stored field; numbers and numeric strings are accepted
fn stored_goal(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().and_then(positive),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(positive),
        _ => None,
    }
}

impl NutritionGoals {
    /// Goals from user input; missing or non-positive values take the default
    pub fn from_inputs(
        calories: Option<f64>,
        protein_grams: Option<f64>,
        carbs_grams: Option<f64>,
        fat_grams: Option<f64>,
    ) -> Self {
        Self {
            calories: calories.and_then(positive).unwrap_or(DEFAULT_CALORIES),
            protein_grams: protein_grams.and_then(positive).unwrap_or(DEFAULT_PROTEIN_GRAMS),
            carbs_grams: carbs_grams.and_then(positive).unwrap_or(DEFAULT_CARBS_GRAMS),
            fat_grams: fat_grams.and_then(positive).unwrap_or(DEFAULT_FAT_GRAMS),
        }
    }

    /// Parse a stored record, falling back field by field to the defaults
    pub fn from_stored(raw: &str) -> Self {
        let value: Value = serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::warn!("Stored nutrition goals are unreadable, using defaults: {}", e);
            Value::Null
        });

        Self {
            calories: stored_goal(value.get("calories")).unwrap_or(DEFAULT_CALORIES),
            protein_grams: stored_goal(value.get("protein")).unwrap_or(DEFAULT_PROTEIN_GRAMS),
            carbs_grams: stored_goal(value.get("carbs")).unwrap_or(DEFAULT_CARBS_GRAMS),
            fat_grams: stored_goal(value.get("fat")).unwrap_or(DEFAULT_FAT_GRAMS),
        }
    }

    /// Load goals; an absent record yields the defaults
    pub fn load(store: &dyn SettingsStore) -> DbResult<Self> {
        let raw = store.get(GOALS_KEY)?;
        Ok(raw.as_deref().map(Self::from_stored).unwrap_or_default())
    }

    /// Overwrite the stored goals
    pub fn save(&self, store: &dyn SettingsStore) -> DbResult<()> {
        let raw = serde_json::to_string(self)?;
        store.set(GOALS_KEY, &raw)
    }
}
