//! Food log MCP tools
//!
//! Saving, listing, and deleting canonical food records, and the daily
//! summary built from them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};

use crate::db::{Database, SqliteSettings};
use crate::models::{DailyTotals, FoodRecord, NutritionGoals};
use crate::nutrition::{self, Nutrient, ProgressMetric};
use crate::tools::analysis::no_data_message;

/// Response for log_food
#[derive(Debug, Serialize)]
pub struct LogFoodResponse {
    pub message: String,
    pub record: FoodRecord,
}

/// Response for list_food_logs
#[derive(Debug, Serialize)]
pub struct ListFoodLogsResponse {
    pub date: Option<String>,
    pub logs: Vec<FoodRecord>,
    pub total: usize,
}

/// Response for delete_food_log
#[derive(Debug, Serialize)]
pub struct DeleteFoodLogResponse {
    pub id: i64,
    pub deleted: bool,
    pub message: String,
}

/// Everything a dashboard needs for one day
#[derive(Debug, Serialize)]
pub struct DailySummary {
    pub date: String,
    pub logs: Vec<FoodRecord>,
    pub totals: DailyTotals,
    /// Calories to whole numbers, grams to one decimal
    pub display_totals: DailyTotals,
    pub goals: NutritionGoals,
    pub progress: BTreeMap<Nutrient, ProgressMetric>,
}

/// Parse a `YYYY-MM-DD` tool argument
pub fn parse_date(date: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", date))
}

/// Normalize a payload and store it
pub fn log_food(
    db: &Database,
    payload: &Value,
    log_date: Option<&str>,
) -> Result<LogFoodResponse, String> {
    let unwrapped = nutrition::unwrap(payload).map_err(|e| no_data_message(&e))?;
    let mut record = nutrition::normalize(&unwrapped);

    if let Some(date) = log_date {
        record.log_date = parse_date(date)?.format("%Y-%m-%d").to_string();
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let stored = FoodRecord::insert(&conn, &record)
        .map_err(|e| format!("Failed to log food: {}", e))?;

    tracing::info!(id = ?stored.id, food = %stored.food_name, "Food logged");

    Ok(LogFoodResponse {
        message: "Food logged successfully".to_string(),
        record: stored,
    })
}

/// List stored records, optionally only those of one day
pub fn list_food_logs(db: &Database, date: Option<&str>) -> Result<ListFoodLogsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let mut logs = FoodRecord::list(&conn)
        .map_err(|e| format!("Failed to list food logs: {}", e))?;

    if let Some(date) = date {
        logs = nutrition::filter_by_date(&logs, parse_date(date)?);
    }

    Ok(ListFoodLogsResponse {
        date: date.map(str::to_string),
        total: logs.len(),
        logs,
    })
}

/// One record by id
pub fn get_food_log(db: &Database, id: i64) -> Result<Option<FoodRecord>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    FoodRecord::get_by_id(&conn, id).map_err(|e| format!("Failed to get food log: {}", e))
}

/// Body returned in place of a record that does not exist
pub fn food_log_not_found(id: i64) -> Value {
    json!({ "error": "Food log entry not found", "id": id })
}

/// Delete one record by id
pub fn delete_food_log(db: &Database, id: i64) -> Result<DeleteFoodLogResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = FoodRecord::delete(&conn, id)
        .map_err(|e| format!("Failed to delete food log: {}", e))?;

    let message = if deleted {
        tracing::info!(id, "Food log deleted");
        "Food log deleted successfully".to_string()
    } else {
        format!("Food log entry not found: {}", id)
    };

    Ok(DeleteFoodLogResponse { id, deleted, message })
}

/// Records, totals, and goal progress for one day
pub fn daily_summary(db: &Database, date: &str) -> Result<DailySummary, String> {
    let day = parse_date(date)?;

    let all = {
        let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
        FoodRecord::list(&conn).map_err(|e| format!("Failed to list food logs: {}", e))?
    };

    let goals = NutritionGoals::load(&SqliteSettings::new(db))
        .map_err(|e| format!("Failed to load goals: {}", e))?;

    let logs = nutrition::filter_by_date(&all, day);
    let totals = nutrition::sum_totals(&logs);
    let progress = nutrition::compute_progress(&totals, &goals);

    tracing::debug!(date = %day, entries = logs.len(), "Built daily summary");

    Ok(DailySummary {
        date: day.format("%Y-%m-%d").to_string(),
        logs,
        totals,
        display_totals: totals.rounded_for_display(),
        goals,
        progress,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use crate::nutrition::Severity;

    fn test_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(migrations::run_migrations).unwrap();
        db
    }

    #[test]
    fn test_log_and_list_by_date() {
        let db = test_db();
        log_food(&db, &json!({"food_name": "Toast", "calories": 80}), Some("2025-01-09")).unwrap();
        log_food(&db, &json!({"food_name": "Soup", "calories": 200}), Some("2025-01-08")).unwrap();

        let all = list_food_logs(&db, None).unwrap();
        assert_eq!(all.total, 2);

        let day = list_food_logs(&db, Some("2025-01-09")).unwrap();
        assert_eq!(day.total, 1);
        assert_eq!(day.logs[0].food_name, "Toast");
    }

    #[test]
    fn test_log_rejects_unreadable_payload() {
        let db = test_db();
        assert!(log_food(&db, &json!("no json here"), None).is_err());
        assert_eq!(list_food_logs(&db, None).unwrap().total, 0);
    }

    #[test]
    fn test_payload_log_date() {
        let db = test_db();
        let dated = log_food(
            &db,
            &json!({"food_name": "Toast", "calories": 300, "log_date": "2025-01-09T20:00:00-05:00"}),
            None,
        )
        .unwrap();
        assert_eq!(dated.record.log_date, "2025-01-10T01:00:00.000Z");
        assert_eq!(daily_summary(&db, "2025-01-10").unwrap().totals.calories, 300.0);

        // Unreadable payload dates fall back to the time of logging
        let undated = log_food(
            &db,
            &json!({"food_name": "Toast", "calories": 300, "log_date": "01/09/2025"}),
            None,
        )
        .unwrap();
        assert!(nutrition::record_day(&undated.record.log_date).is_some());
        assert_ne!(undated.record.log_date, "01/09/2025");
    }

    #[test]
    fn test_list_newest_day_first() {
        let db = test_db();
        log_food(&db, &json!({"food_name": "Late", "log_date": "2025-01-10T03:00:00+05:00"}), None).unwrap();
        log_food(&db, &json!({"food_name": "Next"}), Some("2025-01-10")).unwrap();
        log_food(&db, &json!({"food_name": "Early", "log_date": "2025-01-09 07:15:00"}), None).unwrap();

        let names: Vec<String> = list_food_logs(&db, None)
            .unwrap()
            .logs
            .into_iter()
            .map(|r| r.food_name)
            .collect();
        assert_eq!(names, vec!["Next", "Late", "Early"]);
    }

    #[test]
    fn test_food_log_not_found_body() {
        assert_eq!(
            food_log_not_found(42),
            json!({"error": "Food log entry not found", "id": 42})
        );
    }

    #[test]
    fn test_log_rejects_bad_date() {
        let db = test_db();
        let err = log_food(&db, &json!({"calories": 1}), Some("09/01/2025")).unwrap_err();
        assert!(err.contains("expected YYYY-MM-DD"));
    }

    #[test]
    fn test_delete_food_log() {
        let db = test_db();
        let logged = log_food(&db, &json!({"food_name": "Apple"}), Some("2025-01-09")).unwrap();
        let id = logged.record.id.unwrap();

        assert_eq!(get_food_log(&db, id).unwrap().unwrap().food_name, "Apple");
        assert!(delete_food_log(&db, id).unwrap().deleted);
        assert!(get_food_log(&db, id).unwrap().is_none());
        let again = delete_food_log(&db, id).unwrap();
        assert!(!again.deleted);
        assert!(again.message.contains("not found"));
    }

    #[test]
    fn test_daily_summary() {
        let db = test_db();
        log_food(
            &db,
            &json!({"food_name": "Chicken", "calories": 500, "protein": "40g", "carbs": "0g", "fat": "12.34g"}),
            Some("2025-01-09"),
        )
        .unwrap();
        log_food(
            &db,
            &json!({"food_name": "Rice", "calories": "1000 kcal", "protein": 5, "carbohydrates": "150g", "fat": 0}),
            Some("2025-01-09"),
        )
        .unwrap();
        log_food(&db, &json!({"food_name": "Cake", "calories": 900}), Some("2025-01-10")).unwrap();

        let summary = daily_summary(&db, "2025-01-09").unwrap();
        assert_eq!(summary.logs.len(), 2);
        assert_eq!(summary.totals.calories, 1500.0);
        assert_eq!(summary.display_totals.fat_grams, 12.3);
        assert_eq!(summary.goals, NutritionGoals::default());

        let calories = &summary.progress[&Nutrient::Calories];
        assert_eq!(calories.percentage, 75);
        assert_eq!(calories.severity, Severity::High);

        let protein = &summary.progress[&Nutrient::Protein];
        assert_eq!(protein.percentage, 90);
        assert_eq!(protein.severity, Severity::Critical);
    }

    #[test]
    fn test_daily_summary_empty_day() {
        let db = test_db();
        let summary = daily_summary(&db, "2025-01-09").unwrap();
        assert!(summary.logs.is_empty());
        assert!(summary.progress.values().all(|m| m.percentage == 0));
    }
}
