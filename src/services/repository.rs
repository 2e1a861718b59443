use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::debug;

use crate::models::{TradeRecord, TradeWindow};

const INSERT_TRADE: &str = r#"
INSERT INTO trades (
    reference_date, update_action, trade_date, instrument_code,
    trade_price, traded_quantity, closing_time, trade_identifier_code,
    session_type, buyer_participant_code, seller_participant_code
)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
"#;

const AGGREGATE_OPEN: &str = r#"
SELECT CAST(COALESCE(MAX(day_max_price), 0) AS REAL) AS max_price,
       CAST(COALESCE(MAX(day_volume), 0) AS INTEGER) AS max_volume
FROM (
    SELECT MAX(trade_price) AS day_max_price,
           SUM(traded_quantity) AS day_volume
    FROM trades
    WHERE instrument_code = ?1 AND trade_date >= ?2
    GROUP BY trade_date
)
"#;

const AGGREGATE_BOUNDED: &str = r#"
SELECT CAST(COALESCE(MAX(day_max_price), 0) AS REAL) AS max_price,
       CAST(COALESCE(MAX(day_volume), 0) AS INTEGER) AS max_volume
FROM (
    SELECT MAX(trade_price) AS day_max_price,
           SUM(traded_quantity) AS day_volume
    FROM trades
    WHERE instrument_code = ?1 AND trade_date >= ?2 AND trade_date <= ?3
    GROUP BY trade_date
)
"#;

/// Why a batch write failed. Whichever variant occurs, nothing from the
/// batch is persisted.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("empty batch: nothing to persist")]
    EmptyBatch,

    #[error("failed to begin transaction: {0}")]
    Begin(#[source] sqlx::Error),

    #[error("failed to insert record {index}: {source}")]
    Insert {
        /// 1-based position of the failing record within the batch.
        index: usize,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to commit trade batch: {0}")]
    Commit(#[source] sqlx::Error),
}

/// Store operations on persisted trades.
///
/// Receives its pool by explicit parameter; cloning is cheap and shares
/// the underlying connections.
#[derive(Debug, Clone)]
pub struct TradeRepository {
    pool: SqlitePool,
}

impl TradeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Persist a batch of records atomically, preserving input order.
    ///
    /// The whole call is one transaction; every record goes through the
    /// same parameterized INSERT, which sqlx prepares once per connection
    /// and reuses. Any failure rolls the transaction back (dropping the
    /// transaction handle rolls back uncommitted work), so either every
    /// record is durable or none is. Returns the number of rows written.
    pub async fn insert_batch(&self, records: &[TradeRecord]) -> Result<u64, WriteError> {
        if records.is_empty() {
            return Err(WriteError::EmptyBatch);
        }

        let mut tx = self.pool.begin().await.map_err(WriteError::Begin)?;

        for (position, record) in records.iter().enumerate() {
            sqlx::query(INSERT_TRADE)
                .bind(record.reference_date)
                .bind(&record.update_action)
                .bind(&record.trade_date)
                .bind(&record.instrument_code)
                .bind(record.trade_price)
                .bind(record.traded_quantity)
                .bind(record.closing_time)
                .bind(&record.trade_identifier_code)
                .bind(record.session_type)
                .bind(&record.buyer_participant_code)
                .bind(&record.seller_participant_code)
                .execute(&mut *tx)
                .await
                .map_err(|source| WriteError::Insert {
                    index: position + 1,
                    source,
                })?;
        }

        tx.commit().await.map_err(WriteError::Commit)?;

        debug!(records = records.len(), "Trade batch committed");
        Ok(records.len() as u64)
    }

    /// Maximum trade price and maximum single-day traded volume for
    /// `ticker` within `window`.
    ///
    /// Rows are partitioned by their raw `trade_date` text; each partition
    /// sums `traded_quantity` into a daily volume. The two maxima are
    /// taken independently over the same filtered set — the price maximum
    /// is not restricted to the day that produced the volume maximum. An
    /// empty filtered set yields `(0.0, 0)` rather than an error.
    ///
    /// Window bounds compare against `trade_date` as text. That is correct
    /// because bounds are always rendered fixed-width `YYYY-MM-DD` (see
    /// [`TradeWindow`]) and stored ISO dates collate lexicographically in
    /// that form; rows whose verbatim `trade_date` deviates from it sort
    /// textually, as they always have in this data model.
    pub async fn aggregate_window(
        &self,
        ticker: &str,
        window: &TradeWindow,
    ) -> Result<(f64, i64), sqlx::Error> {
        let row = match window.end_bound() {
            Some(end) => {
                sqlx::query(AGGREGATE_BOUNDED)
                    .bind(ticker)
                    .bind(window.start_bound())
                    .bind(end)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query(AGGREGATE_OPEN)
                    .bind(ticker)
                    .bind(window.start_bound())
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        let max_price: f64 = row.try_get("max_price")?;
        let max_daily_volume: i64 = row.try_get("max_volume")?;

        debug!(ticker, max_price, max_daily_volume, "Aggregated trade window");
        Ok((max_price, max_daily_volume))
    }
}
