use thiserror::Error;
use tracing::warn;

use crate::models::{ParseError, TradeRecord};
use crate::services::repository::{TradeRepository, WriteError};

/// One input row the driver could not turn into a record.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based position of the row in the full input sequence. A header,
    /// when present, is row 1, so the first data row after it is row 2.
    pub row: usize,
    pub reason: ParseError,
}

/// Outcome of a successful ingestion run.
#[derive(Debug)]
pub struct IngestReport {
    /// Number of records durably written.
    pub persisted: u64,
    /// Rows that failed to parse, in input order, with why.
    pub skipped: Vec<SkippedRow>,
}

/// Why an ingestion run persisted nothing.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("no valid records found in input")]
    NoValidRecords,

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Ingest raw delimited rows: parse them all, then write them all.
///
/// Every row is parsed independently; a parse failure drops that row from
/// the batch and records a [`SkippedRow`], but never stops the run. Once
/// parsing is done, the surviving records go to
/// [`TradeRepository::insert_batch`] in a single call, preserving input
/// order, so either every parsed record is persisted or none is.
pub async fn ingest_rows(
    repository: &TradeRepository,
    rows: &[Vec<String>],
    has_header: bool,
) -> Result<IngestReport, IngestError> {
    let data_start = if has_header { 1 } else { 0 };

    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();

    for (index, row) in rows.iter().enumerate().skip(data_start) {
        match TradeRecord::parse_row(row) {
            Ok(record) => records.push(record),
            Err(reason) => {
                warn!(row = index + 1, %reason, "Skipping unparseable row");
                skipped.push(SkippedRow {
                    row: index + 1,
                    reason,
                });
            }
        }
    }

    if records.is_empty() {
        return Err(IngestError::NoValidRecords);
    }

    let persisted = repository.insert_batch(&records).await?;
    Ok(IngestReport { persisted, skipped })
}
