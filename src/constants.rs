//! Trade tape file format constants.
//!
//! Defines the fixed column layout of the exchange trade-tape files this
//! service ingests. Every data row carries exactly [`TRADE_COLUMN_COUNT`]
//! fields in the order listed in [`column`]; rows that deviate are skipped
//! by the ingestion driver with a per-row diagnostic.

/// Number of columns in a trade-tape row.
pub const TRADE_COLUMN_COUNT: usize = 11;

/// Date format used by `reference_date` and by window bounds when they are
/// compared against the stored `trade_date` text.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the default aggregation window in calendar days.
///
/// When no start date is supplied, queries cover `today - 7` through
/// `today - 1`, both inclusive.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Column indices for the trade-tape layout (0-indexed).
pub mod column {
    pub const REFERENCE_DATE: usize = 0;
    pub const UPDATE_ACTION: usize = 1;
    pub const TRADE_DATE: usize = 2;
    pub const INSTRUMENT_CODE: usize = 3;
    pub const TRADE_PRICE: usize = 4;
    pub const TRADED_QUANTITY: usize = 5;
    pub const CLOSING_TIME: usize = 6;
    pub const TRADE_IDENTIFIER_CODE: usize = 7;
    pub const SESSION_TYPE: usize = 8;
    pub const BUYER_PARTICIPANT_CODE: usize = 9;
    pub const SELLER_PARTICIPANT_CODE: usize = 10;
}
