use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use crate::constants::DATE_FORMAT;
use crate::server::AppState;
use crate::services::aggregate_trades;

/// Query parameters for the aggregated-trades endpoint.
#[derive(Debug, Deserialize)]
pub struct AggregatedQuery {
    /// Instrument to aggregate. Required.
    pub ticker: Option<String>,

    /// Window start (YYYY-MM-DD). Absent means the trailing-week default.
    pub start_date: Option<String>,

    /// Inclusive window end (YYYY-MM-DD). Only meaningful together with
    /// `start_date`, which is otherwise open-ended above.
    pub end_date: Option<String>,
}

/// GET /health - ping the store and report liveness.
pub async fn health_handler(State(state): State<AppState>) -> Response {
    match state.database.ping().await {
        Ok(()) => Json(json!({
            "status": "healthy",
            "timestamp": Utc::now().to_rfc3339(),
        }))
        .into_response(),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Database connection failed",
            )
                .into_response()
        }
    }
}

/// GET /api/v1/trades/aggregated - max price and max daily volume for a
/// ticker over a date window.
///
/// Malformed date strings are rejected here, at the transport boundary; the
/// aggregation service only ever sees parsed dates.
pub async fn aggregated_trades_handler(
    State(state): State<AppState>,
    Query(params): Query<AggregatedQuery>,
) -> Response {
    let ticker = match params.ticker.as_deref() {
        Some(ticker) if !ticker.is_empty() => ticker,
        _ => {
            return (StatusCode::BAD_REQUEST, "ticker parameter is required").into_response();
        }
    };

    let start = match parse_date_param(params.start_date.as_deref()) {
        Ok(start) => start,
        Err(response) => return response,
    };
    let end = match parse_date_param(params.end_date.as_deref()) {
        Ok(end) => end,
        Err(response) => return response,
    };

    debug!(ticker, ?start, ?end, "Aggregated trades request");

    match aggregate_trades(&state.repository, ticker, start, end).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            error!("Error getting aggregated data: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

/// An absent or empty parameter is simply no bound; anything else must be a
/// well-formed ISO date.
fn parse_date_param(raw: Option<&str>) -> Result<Option<NaiveDate>, Response> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Some)
            .map_err(|_| {
                (
                    StatusCode::BAD_REQUEST,
                    "Invalid date format. Use ISO-8601 format (YYYY-MM-DD)",
                )
                    .into_response()
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeRecord;
    use crate::services::{Database, TradeRepository};
    use tempfile::{tempdir, TempDir};

    async fn scratch_state() -> (TempDir, AppState) {
        let dir = tempdir().unwrap();
        let database = Database::connect(&dir.path().join("trades.db"))
            .await
            .unwrap();
        let repository = TradeRepository::new(database.pool().clone());
        (
            dir,
            AppState {
                database,
                repository,
            },
        )
    }

    fn query(ticker: Option<&str>, start_date: Option<&str>, end_date: Option<&str>) -> AggregatedQuery {
        AggregatedQuery {
            ticker: ticker.map(|s| s.to_string()),
            start_date: start_date.map(|s| s.to_string()),
            end_date: end_date.map(|s| s.to_string()),
        }
    }

    fn record(ticker: &str, trade_date: &str, price: f64, quantity: i64) -> TradeRecord {
        TradeRecord {
            reference_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
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

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let (_dir, state) = scratch_state().await;

        let response = health_handler(State(state.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");

        state.database.close().await;
    }

    #[tokio::test]
    async fn missing_ticker_is_bad_request() {
        let (_dir, state) = scratch_state().await;

        let response =
            aggregated_trades_handler(State(state.clone()), Query(query(None, None, None))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response =
            aggregated_trades_handler(State(state.clone()), Query(query(Some(""), None, None)))
                .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        state.database.close().await;
    }

    #[tokio::test]
    async fn malformed_date_is_bad_request() {
        let (_dir, state) = scratch_state().await;

        for bad in ["02/01/2024", "2024-13-01", "yesterday"] {
            let response = aggregated_trades_handler(
                State(state.clone()),
                Query(query(Some("PETR4"), Some(bad), None)),
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{bad}");
        }

        state.database.close().await;
    }

    #[tokio::test]
    async fn aggregated_summary_round_trips_as_json() {
        let (_dir, state) = scratch_state().await;

        state
            .repository
            .insert_batch(&[
                record("PETR4", "2024-01-01", 30.5, 100),
                record("PETR4", "2024-01-01", 31.0, 200),
            ])
            .await
            .unwrap();

        let response = aggregated_trades_handler(
            State(state.clone()),
            Query(query(Some("PETR4"), Some("2024-01-01"), None)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["ticker"], "PETR4");
        assert_eq!(body["max_range_value"], 31.0);
        assert_eq!(body["max_daily_volume"], 300);

        state.database.close().await;
    }
}
