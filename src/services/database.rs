use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use tracing::info;

/// SQLite store handle for trade data.
///
/// Owns the connection pool and the schema bootstrap. Components that need
/// the store receive a pool clone explicitly; nothing in the crate reads a
/// process-wide connection.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `path` and ensure the
    /// schema exists.
    pub async fn connect(path: &Path) -> Result<Self, sqlx::Error> {
        info!("Opening trade database at {:?}", path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(sqlx::Error::Io)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30))
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options).await?;

        let db = Self { pool };
        db.initialize_schema().await?;

        info!("Trade database ready");
        Ok(db)
    }

    /// Create the trades table and its query index. Idempotent.
    async fn initialize_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trades (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                reference_date TEXT NOT NULL,
                update_action TEXT NOT NULL,
                trade_date TEXT NOT NULL,
                instrument_code TEXT NOT NULL,
                trade_price REAL NOT NULL,
                traded_quantity INTEGER NOT NULL,
                closing_time INTEGER NOT NULL,
                trade_identifier_code TEXT NOT NULL,
                session_type INTEGER NOT NULL,
                buyer_participant_code TEXT NOT NULL,
                seller_participant_code TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Covers the aggregation query's filter and grouping columns.
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_trades_instrument_date \
             ON trades(instrument_code, trade_date)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Cheap liveness probe, used by the health endpoint.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Snapshot of what the store currently holds.
    pub async fn stats(&self) -> Result<DatabaseStats, sqlx::Error> {
        let total_records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trades")
            .fetch_one(&self.pool)
            .await?;

        let distinct_instruments: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT instrument_code) FROM trades")
                .fetch_one(&self.pool)
                .await?;

        let date_range = sqlx::query("SELECT MIN(trade_date), MAX(trade_date) FROM trades")
            .fetch_one(&self.pool)
            .await
            .ok()
            .and_then(|row| {
                let min: Option<String> = row.try_get(0).ok().flatten();
                let max: Option<String> = row.try_get(1).ok().flatten();
                match (min, max) {
                    (Some(min), Some(max)) => Some((min, max)),
                    _ => None,
                }
            });

        Ok(DatabaseStats {
            total_records,
            distinct_instruments,
            date_range,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the connection pool. Called on every server exit path.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Trade database connection pool closed");
    }
}

/// Store contents summary for the status command.
#[derive(Debug)]
pub struct DatabaseStats {
    pub total_records: i64,
    pub distinct_instruments: i64,
    pub date_range: Option<(String, String)>,
}

/// Check whether a database file already exists at `path`.
pub fn database_exists(path: &PathBuf) -> bool {
    path.exists() && path.is_file()
}
