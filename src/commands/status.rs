use crate::error::Result;
use crate::services::database::{database_exists, Database};
use crate::utils::database_path;

/// Print a summary of what the store currently holds.
pub async fn run() -> Result<()> {
    println!("📊 Trade Store Status\n");

    let path = database_path();
    if !database_exists(&path) {
        println!("⚠️  No database found at {}. Run 'ingest' first.", path.display());
        return Ok(());
    }

    let db = Database::connect(&path).await?;
    let result = db.stats().await;
    db.close().await;
    let stats = result?;

    if stats.total_records == 0 {
        println!("⚠️  No trades stored yet. Run 'ingest' first.");
        return Ok(());
    }

    println!("📈 Total records:        {}", stats.total_records);
    println!("🔹 Distinct instruments: {}", stats.distinct_instruments);
    if let Some((first, last)) = &stats.date_range {
        println!("📅 Trade dates:          {} → {}", first, last);
    }

    Ok(())
}
