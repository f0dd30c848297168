//! Nutrilog Library
//!
//! Food analysis normalization, daily nutrition logging, and goal tracking.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
