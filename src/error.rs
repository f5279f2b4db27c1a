//! Error types for fleet-dashboard

use chrono::NaiveDateTime;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// A custom-range time string that is not `HH:mm` (24-hour).
    #[error("Invalid time format: '{0}' (expected HH:mm)")]
    InvalidTimeFormat(String),

    /// An interval whose start lies after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Calendar overflow: {0}")]
    CalendarOverflow(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an "other" error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a calendar overflow error
    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::CalendarOverflow(msg.into())
    }
}
