//! Food record model
//!
//! The canonical, persisted shape of one logged food.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::Nutrition;

/// Default name for payloads that carry no usable `food_name`
pub const UNKNOWN_FOOD: &str = "Unknown Food";

/// A normalized food log entry
///
/// All numeric fields are finite and non-negative. `id` is assigned by the
/// store and stays `None` until the record is inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub id: Option<i64>,
    pub food_name: String,
    pub calories: f64,
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fat_grams: f64,
    /// ISO date or RFC 3339 timestamp
    pub log_date: String,
}

impl FoodRecord {
    /// The four macronutrient fields
    pub fn nutrition(&self) -> Nutrition {
        Nutrition {
            calories: self.calories,
            protein_grams: self.protein_grams,
            carbs_grams: self.carbs_grams,
            fat_grams: self.fat_grams,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            food_name: row.get("food_name")?,
            calories: row.get("calories")?,
            protein_grams: row.get("protein_grams")?,
            carbs_grams: row.get("carbs_grams")?,
            fat_grams: row.get("fat_grams")?,
            log_date: row.get("log_date")?,
        })
    }

    /// Store a record and return it with its assigned id
    pub fn insert(conn: &Connection, record: &FoodRecord) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO food_logs (food_name, calories, protein_grams, carbs_grams, fat_grams, log_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.food_name,
                record.calories,
                record.protein_grams,
                record.carbs_grams,
                record.fat_grams,
                record.log_date,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a record by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_logs WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All records, newest log date first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_logs ORDER BY log_date DESC, id DESC",
        )?;

        let records = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Count stored records
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM food_logs", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete a record
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM food_logs WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
