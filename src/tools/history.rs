//! Nutrition history MCP tool
//!
//! Zero-filled daily series for the week or month ending on a date.

use crate::db::Database;
use crate::models::FoodRecord;
use crate::nutrition::{self, HistoryRange, NutritionHistory};
use crate::tools::food_logs::parse_date;

/// History ending on `end_date` (today, UTC, when omitted)
pub fn nutrition_history(
    db: &Database,
    range: Option<&str>,
    end_date: Option<&str>,
) -> Result<NutritionHistory, String> {
    let range = HistoryRange::parse(range);
    let end = end_date.map(parse_date).transpose()?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let records = FoodRecord::list(&conn)
        .map_err(|e| format!("Failed to list food logs: {}", e))?;

    Ok(match end {
        Some(end) => nutrition::build_history_at(&records, end, range),
        None => nutrition::build_history(&records, range),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use crate::tools::food_logs::log_food;
    use serde_json::json;

    #[test]
    fn test_history_from_store() {
        let db = Database::in_memory().unwrap();
        db.with_conn(migrations::run_migrations).unwrap();
        log_food(&db, &json!({"calories": 400, "protein": "20g"}), Some("2025-01-09")).unwrap();
        log_food(&db, &json!({"calories": 100}), Some("2025-01-09")).unwrap();

        let history = nutrition_history(&db, Some("week"), Some("2025-01-10")).unwrap();
        assert_eq!(history.range, HistoryRange::Week);
        assert_eq!(history.dates.len(), 8);
        let idx = history.dates.iter().position(|d| d == "2025-01-09").unwrap();
        assert_eq!(history.calories[idx], 500.0);
        assert_eq!(history.protein[idx], 20.0);

        let month = nutrition_history(&db, Some("month"), Some("2025-01-10")).unwrap();
        assert_eq!(month.dates.len(), 31);
    }

    #[test]
    fn test_history_defaults_to_today() {
        let db = Database::in_memory().unwrap();
        db.with_conn(migrations::run_migrations).unwrap();
        log_food(&db, &json!({"calories": 250}), None).unwrap();

        let history = nutrition_history(&db, None, None).unwrap();
        let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(history.range, HistoryRange::Week);
        assert_eq!(history.dates.last(), Some(&today));
        assert_eq!(history.calories.last(), Some(&250.0));
    }

    #[test]
    fn test_history_rejects_bad_end_date() {
        let db = Database::in_memory().unwrap();
        db.with_conn(migrations::run_migrations).unwrap();
        assert!(nutrition_history(&db, None, Some("tomorrow")).is_err());
    }
}
