use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::error::AppError;
use crate::models::TradeWindow;
use crate::services::repository::TradeRepository;

/// Aggregated answer for one ticker over one window.
///
/// Field names match the JSON contract of the API: `max_range_value` is the
/// maximum trade price over the window and `max_daily_volume` the largest
/// single-day quantity sum, computed independently of each other.
#[derive(Debug, Serialize)]
pub struct TradeSummary {
    pub ticker: String,
    pub max_range_value: f64,
    pub max_daily_volume: i64,
}

/// Aggregate persisted trades for `ticker`.
///
/// Without a start date the query covers the trailing week ending
/// yesterday; with one it is open-ended on the upper side unless `end` caps
/// it. An empty matching set yields a zero summary, not an error.
pub async fn aggregate_trades(
    repository: &TradeRepository,
    ticker: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<TradeSummary, AppError> {
    let window = resolve_window(start, end, Local::now().date_naive());
    debug!(ticker, ?window, "Aggregating trades");

    let (max_range_value, max_daily_volume) =
        repository.aggregate_window(ticker, &window).await?;

    Ok(TradeSummary {
        ticker: ticker.to_string(),
        max_range_value,
        max_daily_volume,
    })
}

/// Window policy for the two query paths.
///
/// No explicit start date means the closed trailing-week default (an `end`
/// without a `start` is ignored; the default window already carries its own
/// upper bound). An explicit start date leaves the window open-ended above
/// unless the caller also supplies `end`.
fn resolve_window(start: Option<NaiveDate>, end: Option<NaiveDate>, today: NaiveDate) -> TradeWindow {
    match (start, end) {
        (None, _) => TradeWindow::trailing_week(today),
        (Some(start), None) => TradeWindow::from_start(start),
        (Some(start), Some(end)) => TradeWindow::bounded(start, end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeRecord;
    use crate::services::database::Database;
    use chrono::Duration;
    use tempfile::{tempdir, TempDir};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn no_start_date_means_trailing_week() {
        let window = resolve_window(None, None, date(2024, 3, 15));

        assert_eq!(window, TradeWindow::bounded(date(2024, 3, 8), date(2024, 3, 14)));
    }

    #[test]
    fn end_without_start_is_ignored() {
        let window = resolve_window(None, Some(date(2030, 1, 1)), date(2024, 3, 15));

        assert_eq!(window.end, Some(date(2024, 3, 14)));
    }

    #[test]
    fn explicit_start_is_open_ended_unless_capped() {
        assert_eq!(
            resolve_window(Some(date(2024, 1, 1)), None, date(2024, 3, 15)),
            TradeWindow::from_start(date(2024, 1, 1))
        );
        assert_eq!(
            resolve_window(Some(date(2024, 1, 1)), Some(date(2024, 2, 1)), date(2024, 3, 15)),
            TradeWindow::bounded(date(2024, 1, 1), date(2024, 2, 1))
        );
    }

    #[test]
    fn summary_serializes_with_api_field_names() {
        let summary = TradeSummary {
            ticker: "PETR4".to_string(),
            max_range_value: 31.0,
            max_daily_volume: 300,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ticker": "PETR4",
                "max_range_value": 31.0,
                "max_daily_volume": 300,
            })
        );
    }

    async fn scratch_repository() -> (TempDir, Database, TradeRepository) {
        let dir = tempdir().unwrap();
        let db = Database::connect(&dir.path().join("trades.db"))
            .await
            .unwrap();
        let repo = TradeRepository::new(db.pool().clone());
        (dir, db, repo)
    }

    fn record(ticker: &str, trade_date: &str, price: f64, quantity: i64) -> TradeRecord {
        TradeRecord {
            reference_date: date(2024, 1, 31),
            update_action: "I".to_string(),
            trade_date: trade_date.to_string(),
            instrument_code: ticker.to_string(),
            trade_price: price,
            traded_quantity: quantity,
            closing_time: 90000000,
            trade_identifier_code: "T1".to_string(),
            session_type: 1,
            buyer_participant_code: "B1".to_string(),
            seller_participant_code: "S1".to_string(),
        }
    }

    #[tokio::test]
    async fn aggregates_two_trades_of_one_day() {
        let (_dir, db, repo) = scratch_repository().await;

        repo.insert_batch(&[
            record("PETR4", "2024-01-01", 30.5, 100),
            record("PETR4", "2024-01-01", 31.0, 200),
        ])
        .await
        .unwrap();

        let summary = aggregate_trades(&repo, "PETR4", Some(date(2024, 1, 1)), None)
            .await
            .unwrap();

        assert_eq!(summary.ticker, "PETR4");
        assert_eq!(summary.max_range_value, 31.0);
        assert_eq!(summary.max_daily_volume, 300);

        db.close().await;
    }

    #[tokio::test]
    async fn empty_matching_set_is_a_zero_summary() {
        let (_dir, db, repo) = scratch_repository().await;

        let summary = aggregate_trades(&repo, "PETR4", None, None).await.unwrap();

        assert_eq!(summary.max_range_value, 0.0);
        assert_eq!(summary.max_daily_volume, 0);

        db.close().await;
    }

    #[tokio::test]
    async fn default_window_excludes_today_and_includes_its_edges() {
        let (_dir, db, repo) = scratch_repository().await;

        let today = Local::now().date_naive();
        let fmt = |d: NaiveDate| d.format("%Y-%m-%d").to_string();

        repo.insert_batch(&[
            record("PETR4", &fmt(today - Duration::days(8)), 80.0, 800), // before window
            record("PETR4", &fmt(today - Duration::days(7)), 21.0, 210), // start day
            record("PETR4", &fmt(today - Duration::days(1)), 22.0, 220), // end day
            record("PETR4", &fmt(today), 99.0, 990),                     // excluded
        ])
        .await
        .unwrap();

        let summary = aggregate_trades(&repo, "PETR4", None, None).await.unwrap();

        assert_eq!(summary.max_range_value, 22.0);
        assert_eq!(summary.max_daily_volume, 220);

        db.close().await;
    }
}
