//! Database module
//!
//! Handles SQLite connection, migrations, and the settings store.

pub mod connection;
pub mod migrations;
pub mod settings;

pub use connection::{Database, DbError, DbResult};
pub use settings::{MemorySettings, SettingsStore, SqliteSettings};
