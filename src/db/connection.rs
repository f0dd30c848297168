//! Food log store connection pool

use std::path::{Path, PathBuf};
use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

/// Connections kept open against the database file
const FILE_POOL_SIZE: u32 = 8;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Pooled handle to the food log store
#[derive(Clone)]
pub struct Database {
    pool: Arc<Pool<SqliteConnectionManager>>,
    location: Option<PathBuf>,
}

/// Applied to every file-backed connection as it opens
fn configure_file_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA temp_store = MEMORY;",
    )
}

impl Database {
    /// Open (or create) the store at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let location = path.as_ref().to_path_buf();
        let manager = SqliteConnectionManager::file(&location)
            .with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI,
            )
            .with_init(configure_file_connection);

        let pool = Pool::builder().max_size(FILE_POOL_SIZE).build(manager)?;
        tracing::debug!(path = %location.display(), "Opened food log store");

        Ok(Self {
            pool: Arc::new(pool),
            location: Some(location),
        })
    }

    /// Throwaway store for tests and embedding
    ///
    /// Every SQLite memory connection is its own database, so the pool is
    /// capped at a single connection. Callers must release a connection
    /// before asking for another.
    pub fn in_memory() -> DbResult<Self> {
        let pool = Pool::builder()
            .max_size(1)
            .build(SqliteConnectionManager::memory())?;

        Ok(Self {
            pool: Arc::new(pool),
            location: None,
        })
    }

    /// File backing the store; `None` for in-memory stores
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn get_conn(&self) -> DbResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    /// Run `f` with a pooled connection, released when `f` returns
    pub fn with_conn<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let conn = self.get_conn()?;
        f(&conn)
    }
}
