//! Nutrilog Status Tool
//!
//! Runtime status of the service, plus usage notes for MCP clients.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::Database;
use crate::models::FoodRecord;

/// Food logging instructions for AI assistants
pub const LOGGING_INSTRUCTIONS: &str = r#"
# Nutrilog Food Logging Instructions

## Logging a food

1. Pass the analysis result to `analyze_food` to preview it. The payload may be
   a JSON object or JSON text, optionally wrapped in ```json fences.
2. Call `log_food` with the same payload to store it. Pass `log_date`
   (YYYY-MM-DD) when the food was eaten on a day other than today.

Recognized fields:

| Field | Fallback | Notes |
|-------|----------|-------|
| food_name | - | "Unknown Food" when missing |
| calories | - | numbers or text such as "250 kcal" |
| protein | - | grams, "15g" reads as 15 |
| carbohydrates | carbs | first key with a value wins |
| fat | fats | first key with a value wins |

Text values use their first number only: "15-20g" is stored as 15. Give a
single value when you know it.

## Reviewing a day

- `daily_summary` returns the day's entries, totals, and progress toward goals.
- Progress is capped at 100%. Severity: low (<50), medium (<75), high (<90),
  critical (>=90).
- `nutrition_history` returns week or month series for charts.

## Goals

- `get_goals` / `set_goals`. Defaults: 2000 kcal, 50 g protein, 250 g carbs,
  70 g fat. Omitted or non-positive values fall back to these defaults.

## Corrections

- Entries cannot be edited. Delete with `delete_food_log` and log again.
"#;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct NutrilogStatus {
    pub version: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,

    pub database_path: Option<String>,
    pub database_size_bytes: Option<u64>,
    pub food_log_count: Option<i64>,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Collects runtime information
pub struct StatusTracker {
    start_time: Instant,
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn get_status(&self, db: &Database) -> NutrilogStatus {
        let build_info = BuildInfo::current();

        let location = db.location();
        let database_size_bytes = location
            .and_then(|path| std::fs::metadata(path).ok())
            .map(|m| m.len());

        let food_log_count = db.with_conn(FoodRecord::count).ok();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutrilogStatus {
            version: build_info.version,
            build_timestamp: build_info.build_timestamp,
            build_profile: build_info.build_profile,
            database_path: location.map(|path| path.display().to_string()),
            database_size_bytes,
            food_log_count,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
