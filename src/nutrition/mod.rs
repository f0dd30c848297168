//! Nutrition core
//!
//! Pure transforms from analysis payloads to canonical records, and from
//! records to totals, goal progress, and history. Nothing here touches the
//! database or logs.

pub mod aggregator;
pub mod parser;

pub use aggregator::{
    build_history, build_history_at, canonical_log_date, compute_progress, filter_by_date,
    progress_percentage, record_day, round_display, sum_totals, HistoryRange, Nutrient,
    NutritionHistory, ProgressMetric, Severity,
};
pub use parser::{
    details, extract_number, format_nutrient_key, normalize, normalize_at, unwrap, unwrap_text,
    AnalysisDetails, Micronutrient, ParseError,
};
