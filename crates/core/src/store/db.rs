//! SQLite connection and schema

use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use cs2prac_sdk::SteamId;

/// Persistence errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Store worker is not running")]
    WorkerGone,
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Query(e.to_string())
    }
}

const CREATE_PLAYERS: &str = r"
CREATE TABLE IF NOT EXISTS players (
    steamid INTEGER NOT NULL PRIMARY KEY,
    name TEXT NOT NULL,
    total_playtime_seconds INTEGER NOT NULL DEFAULT 0,
    language TEXT NOT NULL DEFAULT 'en',
    last_seen INTEGER NOT NULL
)";

const CREATE_SESSIONS: &str = r"
CREATE TABLE IF NOT EXISTS player_sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    steamid INTEGER NOT NULL,
    connect_time INTEGER NOT NULL,
    disconnect_time INTEGER NULL,
    session_playtime_seconds INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (steamid) REFERENCES players(steamid)
)";

/// Open (or create) a SQLite pool at `path`
///
/// Creates the parent directory, enables WAL and foreign keys and sets a
/// 5-second busy timeout.
pub async fn open_pool(path: &Path) -> Result<Pool<Sqlite>, StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))
        .map_err(|e| StoreError::Connection(e.to_string()))?
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))?;

    tracing::info!(path = %path.display(), "Database opened");
    Ok(pool)
}

/// Open an in-memory pool (for testing)
pub async fn open_pool_in_memory() -> Result<Pool<Sqlite>, StoreError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|e| StoreError::Connection(e.to_string()))?
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))?;

    Ok(pool)
}

/// Current time as a Unix timestamp in seconds
#[allow(clippy::cast_possible_wrap)]
pub fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// SteamID64 as stored in the `steamid` columns
#[allow(clippy::cast_possible_wrap)]
pub(crate) fn steamid_key(id: SteamId) -> i64 {
    id.as_u64() as i64
}

/// Player statistics database
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open or create the database at `path`
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let db = Self {
            pool: open_pool(path).await?,
        };
        db.create_schema().await?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let db = Self {
            pool: open_pool_in_memory().await?,
        };
        db.create_schema().await?;
        Ok(db)
    }

    async fn create_schema(&self) -> Result<(), StoreError> {
        for statement in [CREATE_PLAYERS, CREATE_SESSIONS] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Schema(e.to_string()))?;
        }
        tracing::debug!("Database schema ready");
        Ok(())
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Close the pool, waiting for connections to finish
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
