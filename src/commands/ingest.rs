use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{AppError, Result};
use crate::services::{ingest_rows, Database, TradeRepository};
use crate::utils::database_path;

/// Ingest one delimited trade-tape file into the store.
pub async fn run(file: PathBuf, delimiter: char, has_header: bool) -> Result<()> {
    println!("📥 Processing CSV file: {}", file.display());

    if !file.exists() {
        return Err(AppError::InvalidInput(format!(
            "CSV file does not exist: {}",
            file.display()
        )));
    }

    let extension = file
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    if extension.as_deref() != Some("csv") {
        return Err(AppError::InvalidInput(format!(
            "file must be a CSV file (*.csv), got: {}",
            file.display()
        )));
    }

    let rows = read_rows(&file, delimiter)?;
    if rows.is_empty() {
        return Err(AppError::InvalidInput("CSV file is empty".to_string()));
    }
    println!("   Found {} rows", rows.len());

    let db = Database::connect(&database_path()).await?;
    let repository = TradeRepository::new(db.pool().clone());

    let result = ingest_rows(&repository, &rows, has_header).await;
    db.close().await;
    let report = result?;

    println!("✅ Persisted {} records", report.persisted);
    if !report.skipped.is_empty() {
        println!("⚠️  Skipped {} rows:", report.skipped.len());
        for skip in &report.skipped {
            println!("   row {}: {}", skip.row, skip.reason);
        }
    }

    Ok(())
}

/// Read every row of the file verbatim.
///
/// The reader is configured headerless and flexible: header handling is the
/// ingestion driver's contract, and rows with a wrong field count must reach
/// the parser to be reported per row instead of failing the whole read.
fn read_rows(file: &Path, delimiter: char) -> Result<Vec<Vec<String>>> {
    let delimiter = u8::try_from(delimiter).map_err(|_| {
        AppError::InvalidInput(format!("delimiter must be an ASCII character, got: {delimiter:?}"))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(file)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} read {pos} rows")
            .unwrap(),
    );

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(rows)
}
