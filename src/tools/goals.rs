//! Nutrition goal MCP tools

use crate::db::{Database, SqliteSettings};
use crate::models::NutritionGoals;

/// Current goals (defaults when none were saved)
pub fn get_goals(db: &Database) -> Result<NutritionGoals, String> {
    NutritionGoals::load(&SqliteSettings::new(db)).map_err(|e| format!("Failed to load goals: {}", e))
}

/// Replace the goals; omitted or non-positive values take the default
pub fn set_goals(
    db: &Database,
    calories: Option<f64>,
    protein_grams: Option<f64>,
    carbs_grams: Option<f64>,
    fat_grams: Option<f64>,
) -> Result<NutritionGoals, String> {
    let goals = NutritionGoals::from_inputs(calories, protein_grams, carbs_grams, fat_grams);

    goals
        .save(&SqliteSettings::new(db))
        .map_err(|e| format!("Failed to save goals: {}", e))?;

    tracing::info!(
        calories = goals.calories,
        protein = goals.protein_grams,
        carbs = goals.carbs_grams,
        fat = goals.fat_grams,
        "Nutrition goals updated"
    );

    Ok(goals)
}
