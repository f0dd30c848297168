//! Daily log aggregation
//!
//! Reduces food records to day totals, goal progress, and history series.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{DailyTotals, FoodRecord, Nutrition, NutritionGoals};

/// Calendar day a log date belongs to
///
/// Timestamps carrying an offset are read in UTC, so a record stored as UTC
/// midnight lands on its written calendar day whatever the host zone is.
/// Naive timestamps and bare dates use their written date.
pub fn record_day(log_date: &str) -> Option<NaiveDate> {
    let s = log_date.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Stored form of a log date, or `None` when it names no day
///
/// Offset timestamps become UTC RFC 3339 with milliseconds, naive
/// timestamps use a `T` separator and bare dates stay bare, so stored
/// dates sort chronologically as text.
pub fn canonical_log_date(log_date: &str) -> Option<String> {
    let s = log_date.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Records logged on `target`, in input order
pub fn filter_by_date(records: &[FoodRecord], target: NaiveDate) -> Vec<FoodRecord> {
    records
        .iter()
        .filter(|r| record_day(&r.log_date) == Some(target))
        .cloned()
        .collect()
}

/// Field-wise sum of the records
pub fn sum_totals(records: &[FoodRecord]) -> DailyTotals {
    records.iter().map(FoodRecord::nutrition).sum()
}

/// Round half up to `decimals` places
pub fn round_display(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor + 0.5).floor() / factor
}

/// Macronutrients tracked against goals
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Calories,
    Protein,
    Carbs,
    Fat,
}

impl Nutrient {
    pub const ALL: [Nutrient; 4] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Carbs,
        Nutrient::Fat,
    ];

    /// This nutrient's amount in `n`
    pub fn amount(&self, n: &Nutrition) -> f64 {
        match self {
            Nutrient::Calories => n.calories,
            Nutrient::Protein => n.protein_grams,
            Nutrient::Carbs => n.carbs_grams,
            Nutrient::Fat => n.fat_grams,
        }
    }

    pub fn goal(&self, goals: &NutritionGoals) -> f64 {
        match self {
            Nutrient::Calories => goals.calories,
            Nutrient::Protein => goals.protein_grams,
            Nutrient::Carbs => goals.carbs_grams,
            Nutrient::Fat => goals.fat_grams,
        }
    }
}

/// Warning level of a progress percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// <50 low, <75 medium, <90 high, otherwise critical
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            0..=49 => Severity::Low,
            50..=74 => Severity::Medium,
            75..=89 => Severity::High,
            _ => Severity::Critical,
        }
    }
}

/// Consumed amount against a daily goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressMetric {
    pub nutrient: Nutrient,
    pub consumed: f64,
    pub goal: f64,
    /// 0..=100
    pub percentage: u32,
    pub severity: Severity,
}

/// Percent of goal reached, capped at 100. 0 when the ratio is not finite.
pub fn progress_percentage(consumed: f64, goal: f64) -> u32 {
    let ratio = consumed / goal * 100.0;
    if !ratio.is_finite() || ratio <= 0.0 {
        return 0;
    }
    round_display(ratio, 0).min(100.0) as u32
}

/// Progress of each tracked nutrient
pub fn compute_progress(
    totals: &DailyTotals,
    goals: &NutritionGoals,
) -> BTreeMap<Nutrient, ProgressMetric> {
    Nutrient::ALL
        .iter()
        .map(|&nutrient| {
            let consumed = nutrient.amount(totals);
            let goal = nutrient.goal(goals);
            let percentage = progress_percentage(consumed, goal);
            let metric = ProgressMetric {
                nutrient,
                consumed,
                goal,
                percentage,
                severity: Severity::from_percentage(percentage),
            };
            (nutrient, metric)
        })
        .collect()
}

/// Window covered by a history series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRange {
    Week,
    Month,
}

impl HistoryRange {
    /// Missing or "week" is a week; any other value is a month
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(str::trim) {
            None | Some("week") => HistoryRange::Week,
            Some(_) => HistoryRange::Month,
        }
    }

    /// Days reached back from the end date
    pub fn days(&self) -> i64 {
        match self {
            HistoryRange::Week => 7,
            HistoryRange::Month => 30,
        }
    }
}

/// Per-day totals as parallel series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionHistory {
    pub range: HistoryRange,
    pub dates: Vec<String>,
    pub calories: Vec<f64>,
    pub protein: Vec<f64>,
    pub carbs: Vec<f64>,
    pub fat: Vec<f64>,
}

/// History ending today (UTC)
pub fn build_history(records: &[FoodRecord], range: HistoryRange) -> NutritionHistory {
    build_history_at(records, Utc::now().date_naive(), range)
}

/// History from `end - range.days()` through `end`, both inclusive.
/// Days without records are zero.
pub fn build_history_at(
    records: &[FoodRecord],
    end: NaiveDate,
    range: HistoryRange,
) -> NutritionHistory {
    let start = end - Duration::days(range.days());

    let mut by_day: HashMap<NaiveDate, Nutrition> = HashMap::new();
    for record in records {
        if let Some(day) = record_day(&record.log_date) {
            if day >= start && day <= end {
                let entry = by_day.entry(day).or_default();
                *entry = *entry + record.nutrition();
            }
        }
    }

    let points = (range.days() + 1) as usize;
    let mut history = NutritionHistory {
        range,
        dates: Vec::with_capacity(points),
        calories: Vec::with_capacity(points),
        protein: Vec::with_capacity(points),
        carbs: Vec::with_capacity(points),
        fat: Vec::with_capacity(points),
    };

    let mut day = start;
    while day <= end {
        let totals = by_day.get(&day).copied().unwrap_or_default();
        history.dates.push(day.format("%Y-%m-%d").to_string());
        history.calories.push(totals.calories);
        history.protein.push(totals.protein_grams);
        history.carbs.push(totals.carbs_grams);
        history.fat.push(totals.fat_grams);
        day += Duration::days(1);
    }

    history
}
