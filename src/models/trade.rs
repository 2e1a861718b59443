use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::constants::{column, DATE_FORMAT, TRADE_COLUMN_COUNT};

/// Why a raw row could not become a [`TradeRecord`].
///
/// Parse failures are recoverable: the ingestion driver records them per
/// row and keeps going.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected {TRADE_COLUMN_COUNT} columns, got {found}")]
    ColumnCount { found: usize },

    #[error("field {field} has unparseable value {value:?}")]
    FieldFormat { field: &'static str, value: String },
}

/// One validated trade event, ready for persistence.
///
/// A record is only produced by [`TradeRecord::parse_row`] from a row with
/// exactly eleven fields in tape order; nothing in the pipeline mutates it
/// afterwards. After a successful batch write the in-memory record is
/// dropped and the store is the sole durable owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    /// As-of date of the tape file the row came from.
    pub reference_date: NaiveDate,

    /// Update-action code (insert/correction/...), kept verbatim.
    pub update_action: String,

    /// Business date of the trade, kept as raw text.
    ///
    /// The upstream source occasionally emits non-ISO values here, so the
    /// field is stored verbatim instead of being parsed into a date.
    pub trade_date: String,

    /// Ticker / instrument identifier.
    pub instrument_code: String,

    /// Traded price. Parseability is the only constraint; no sign or range
    /// check is applied.
    pub trade_price: f64,

    /// Shares/units traded.
    pub traded_quantity: i64,

    /// Encoded time-of-day of the trade (HHMMSS-style integer), not a
    /// calendar timestamp.
    pub closing_time: i64,

    /// Opaque identifier assigned to the trade event by the exchange.
    pub trade_identifier_code: String,

    /// Trading-session code, stored as the raw integer without validation
    /// against a fixed set.
    pub session_type: i32,

    /// Buying counterparty code.
    pub buyer_participant_code: String,

    /// Selling counterparty code.
    pub seller_participant_code: String,
}

impl TradeRecord {
    /// Parse one raw delimited row into a validated record.
    ///
    /// Pure function of its input. Fails with [`ParseError::ColumnCount`]
    /// unless the row has exactly eleven fields, and with
    /// [`ParseError::FieldFormat`] when any of the five typed fields
    /// (`reference_date`, `trade_price`, `traded_quantity`,
    /// `closing_time`, `session_type`) does not parse. The six remaining
    /// fields pass through verbatim; empty strings are acceptable there.
    pub fn parse_row(row: &[String]) -> Result<Self, ParseError> {
        if row.len() != TRADE_COLUMN_COUNT {
            return Err(ParseError::ColumnCount { found: row.len() });
        }

        let reference_date =
            NaiveDate::parse_from_str(&row[column::REFERENCE_DATE], DATE_FORMAT).map_err(|_| {
                ParseError::FieldFormat {
                    field: "reference_date",
                    value: row[column::REFERENCE_DATE].clone(),
                }
            })?;
        let trade_price: f64 = parse_field("trade_price", &row[column::TRADE_PRICE])?;
        let traded_quantity: i64 = parse_field("traded_quantity", &row[column::TRADED_QUANTITY])?;
        let closing_time: i64 = parse_field("closing_time", &row[column::CLOSING_TIME])?;
        let session_type: i32 = parse_field("session_type", &row[column::SESSION_TYPE])?;

        Ok(Self {
            reference_date,
            update_action: row[column::UPDATE_ACTION].clone(),
            trade_date: row[column::TRADE_DATE].clone(),
            instrument_code: row[column::INSTRUMENT_CODE].clone(),
            trade_price,
            traded_quantity,
            closing_time,
            trade_identifier_code: row[column::TRADE_IDENTIFIER_CODE].clone(),
            session_type,
            buyer_participant_code: row[column::BUYER_PARTICIPANT_CODE].clone(),
            seller_participant_code: row[column::SELLER_PARTICIPANT_CODE].clone(),
        })
    }
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::FieldFormat {
        field,
        value: value.to_string(),
    })
}
