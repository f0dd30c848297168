//! Data models
//!
//! Rust structs for stored food records, goals, and shared nutrition values.

mod food_record;
mod goals;
mod nutrition;

pub use food_record::{FoodRecord, UNKNOWN_FOOD};
pub use goals::{
    NutritionGoals, DEFAULT_CALORIES, DEFAULT_CARBS_GRAMS, DEFAULT_FAT_GRAMS,
    DEFAULT_PROTEIN_GRAMS, GOALS_KEY,
};
pub use nutrition::{DailyTotals, Nutrition};
