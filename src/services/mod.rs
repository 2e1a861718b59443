pub mod aggregation;
pub mod database;
pub mod ingestion;
pub mod repository;

pub use aggregation::{aggregate_trades, TradeSummary};
pub use database::{Database, DatabaseStats};
pub use ingestion::{ingest_rows, IngestError, IngestReport, SkippedRow};
pub use repository::{TradeRepository, WriteError};
