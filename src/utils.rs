use std::path::PathBuf;

use crate::error::AppError;

/// Get the SQLite database path from environment variable or use default.
pub fn database_path() -> PathBuf {
    std::env::var("TRADETAPE_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("trades.db"))
}

/// Get the HTTP server port from environment variable or use default.
///
/// A set-but-unparseable `PORT` is a configuration error rather than a
/// silent fallback.
pub fn server_port() -> Result<u16, AppError> {
    match std::env::var("PORT") {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::Config(format!("invalid PORT value: {}", raw))),
        Err(_) => Ok(8080),
    }
}
