//! Runtime configuration
//!
//! Read from the environment at startup.

use std::path::PathBuf;

/// Environment variable overriding the database location
pub const DATABASE_PATH_VAR: &str = "NUTRILOG_DATABASE_PATH";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let database_path = std::env::var(DATABASE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_database_path());

        Self { database_path }
    }
}

/// `<project>/data/nutrilog.db`, resolved from the executable location
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // target/{debug,release}/ -> project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(root) = path.parent().and_then(|p| p.parent()) {
            path = root.to_path_buf();
        }
    }

    path.push("data");
    path.push("nutrilog.db");
    path
}
