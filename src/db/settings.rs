//! Key-value settings store
//!
//! Small serialized records addressed by a fixed key. Callers receive the
//! store as a trait object so the backing storage can be swapped.

use std::collections::HashMap;
use std::sync::Mutex;

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};

/// Storage for serialized settings records
pub trait SettingsStore {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> DbResult<()>;
}

/// Settings kept in the `settings` table
pub struct SqliteSettings<'a> {
    db: &'a Database,
}

impl<'a> SqliteSettings<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }
}

impl SettingsStore for SqliteSettings<'_> {
    fn get(&self, key: &str) -> DbResult<Option<String>> {
        self.db.with_conn(|conn| {
            let value = conn
                .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| row.get(0))
                .optional()?;
            Ok(value)
        })
    }

    fn set(&self, key: &str, value: &str) -> DbResult<()> {
        self.db.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO settings (key, value) VALUES (?1, ?2)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')
                "#,
                params![key, value],
            )?;
            Ok(())
        })
    }
}

/// Process-local settings, for tests and embedding
#[derive(Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> DbResult<Option<String>> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> DbResult<()> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
