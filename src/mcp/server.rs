//! Nutrilog MCP Server Implementation
//!
//! Exposes the food log, goal, and history tools over MCP.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::tools::status::StatusTracker;
use crate::tools::{analysis, food_logs, goals, history};

/// Nutrilog MCP Service
#[derive(Clone)]
pub struct NutrilogService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<NutrilogService>,
}

impl NutrilogService {
    pub fn new(database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new())),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

/// Serialize a tool response as pretty JSON
fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeFoodParams {
    /// Analysis result: a JSON object, or JSON text (code fences allowed)
    pub payload: Value,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    /// Analysis result: a JSON object, or JSON text (code fences allowed)
    pub payload: Value,
    /// Day the food was eaten (YYYY-MM-DD). Defaults to now.
    pub log_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFoodLogsParams {
    /// Only entries logged on this day (YYYY-MM-DD)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetFoodLogParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteFoodLogParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DailySummaryParams {
    /// Day to summarize (YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetGoalsParams {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NutritionHistoryParams {
    /// "week" (default) or "month"
    pub range: Option<String>,
    /// Last day of the series (YYYY-MM-DD). Defaults to today.
    pub end_date: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutrilogService {
    // --- Status ---

    #[tool(description = "Get the current status of the Nutrilog service including build info, database status, and process information")]
    async fn nutrilog_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database);
        json_result(&status)
    }

    #[tool(description = "Get instructions for logging food and reading summaries. Call this when starting a food logging session.")]
    fn logging_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::LOGGING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(LOGGING_INSTRUCTIONS)]))
    }

    // --- Food Logs ---

    #[tool(description = "Normalize a food analysis result (name, calories, protein, carbs, fat, and display extras) without saving it")]
    fn analyze_food(&self, Parameters(p): Parameters<AnalyzeFoodParams>) -> Result<CallToolResult, McpError> {
        let result = analysis::analyze_food(&p.payload).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Normalize a food analysis result and save it to the food log")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let result = food_logs::log_food(&self.database, &p.payload, p.log_date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List food log entries, newest first, optionally for a single day")]
    fn list_food_logs(&self, Parameters(p): Parameters<ListFoodLogsParams>) -> Result<CallToolResult, McpError> {
        let result = food_logs::list_food_logs(&self.database, p.date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a single food log entry by ID")]
    fn get_food_log(&self, Parameters(p): Parameters<GetFoodLogParams>) -> Result<CallToolResult, McpError> {
        let result = food_logs::get_food_log(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(record) => json_result(&record),
            None => json_result(&food_logs::food_log_not_found(p.id)),
        }
    }

    #[tool(description = "Delete a food log entry by ID")]
    fn delete_food_log(&self, Parameters(p): Parameters<DeleteFoodLogParams>) -> Result<CallToolResult, McpError> {
        let result = food_logs::delete_food_log(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a day's food entries, nutrition totals, and progress toward daily goals")]
    fn daily_summary(&self, Parameters(p): Parameters<DailySummaryParams>) -> Result<CallToolResult, McpError> {
        let result = food_logs::daily_summary(&self.database, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Goals ---

    #[tool(description = "Get the daily nutrition goals")]
    fn get_goals(&self) -> Result<CallToolResult, McpError> {
        let result = goals::get_goals(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set the daily nutrition goals. Omitted or non-positive values reset to the defaults (2000 kcal, 50 g protein, 250 g carbs, 70 g fat).")]
    fn set_goals(&self, Parameters(p): Parameters<SetGoalsParams>) -> Result<CallToolResult, McpError> {
        let result = goals::set_goals(&self.database, p.calories, p.protein, p.carbs, p.fat)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- History ---

    #[tool(description = "Get daily calorie and macronutrient totals for the week or month ending on a date, with empty days as zero")]
    fn nutrition_history(&self, Parameters(p): Parameters<NutritionHistoryParams>) -> Result<CallToolResult, McpError> {
        let result = history::nutrition_history(&self.database, p.range.as_deref(), p.end_date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutrilogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrilog".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutrilog".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutrilog - food analysis logging and daily nutrition goals. \
                 Call logging_instructions first. \
                 Food: analyze_food, log_food, list_food_logs, get_food_log, delete_food_log. \
                 Days: daily_summary. Goals: get_goals, set_goals. \
                 Charts: nutrition_history. Service: nutrilog_status."
                    .into(),
            ),
        }
    }
}
