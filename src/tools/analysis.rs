//! Food analysis MCP tool
//!
//! Normalizes an analysis payload without storing it.

use serde::Serialize;
use serde_json::Value;

use crate::models::FoodRecord;
use crate::nutrition::{self, AnalysisDetails, ParseError};

/// Response for analyze_food
#[derive(Debug, Serialize)]
pub struct AnalyzeFoodResponse {
    pub record: FoodRecord,
    pub details: AnalysisDetails,
}

/// Message returned when a payload holds nothing readable
pub fn no_data_message(err: &ParseError) -> String {
    format!("No nutrition data to display: {}", err)
}

/// Unwrap and normalize a payload
pub fn analyze_food(payload: &Value) -> Result<AnalyzeFoodResponse, String> {
    let unwrapped = nutrition::unwrap(payload).map_err(|e| no_data_message(&e))?;

    let record = nutrition::normalize(&unwrapped);
    tracing::debug!(food = %record.food_name, calories = record.calories, "Analyzed payload");

    Ok(AnalyzeFoodResponse {
        record,
        details: nutrition::details(&unwrapped),
    })
}
