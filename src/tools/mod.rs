//! Nutrilog Tools module
//!
//! MCP tool implementations. Each function takes the database and returns a
//! serializable response or an error message.

pub mod analysis;
pub mod food_logs;
pub mod goals;
pub mod history;
pub mod status;
