//! Error types for the apogee backtester.
//!
//! Every stage of the evaluation pipeline reports failures through
//! [`ApogeeError`]. None of these errors are recovered from inside the
//! pipeline: the first one aborts the evaluation it occurred in.

use crate::{Date, Symbol};
use thiserror::Error;

/// The main error type for apogee operations.
#[derive(Debug, Error)]
pub enum ApogeeError {
    /// The requested (metric, instrument, period) cell is absent from the market data.
    #[error("Data unavailable: {metric} for {instrument} at {period}")]
    DataUnavailable {
        /// Metric name that was requested.
        metric: String,
        /// Instrument that was requested.
        instrument: Symbol,
        /// Period that was requested.
        period: Date,
    },

    /// A leg selection cannot be satisfied by the instruments available.
    #[error("Insufficient universe at {period}: {reason} ({available} instruments available)")]
    InsufficientUniverse {
        /// Formation period of the portfolio being selected.
        period: Date,
        /// Number of instruments in the universe at that period.
        available: usize,
        /// What the selection needed.
        reason: String,
    },

    /// The timeframe left after warm-up is too short to evaluate.
    #[error("Insufficient history: {required} periods required, {available} available")]
    InsufficientHistory {
        /// Periods needed.
        required: usize,
        /// Periods present.
        available: usize,
    },

    /// A series statistic was requested on a zero-length series.
    #[error("Empty return series")]
    EmptySeries,

    /// A portfolio construction invariant was violated.
    #[error("Invalid portfolio: {0}")]
    InvalidPortfolio(String),

    /// A parameter is outside its valid range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error when a required column is missing from a source frame.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error when a date cannot be parsed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Error when a strategy name is not recognised.
    #[error("Strategy not found: {0}")]
    StrategyNotFound(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl ApogeeError {
    /// Shorthand for a [`ApogeeError::DataUnavailable`] error.
    pub fn unavailable(metric: &str, instrument: &str, period: Date) -> Self {
        Self::DataUnavailable {
            metric: metric.to_string(),
            instrument: instrument.to_string(),
            period,
        }
    }
}

impl From<String> for ApogeeError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for ApogeeError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for apogee operations.
pub type Result<T> = std::result::Result<T, ApogeeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_error_display() {
        let period = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
        let err = ApogeeError::unavailable("book_to_price", "101", period);
        assert_eq!(
            err.to_string(),
            "Data unavailable: book_to_price for 101 at 2020-01-31"
        );

        let err = ApogeeError::InsufficientHistory {
            required: 3,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient history: 3 periods required, 1 available"
        );

        assert_eq!(ApogeeError::EmptySeries.to_string(), "Empty return series");
    }

    #[test]
    fn test_error_from_string() {
        let err: ApogeeError = "boom".into();
        assert!(matches!(err, ApogeeError::Other(_)));
    }
}
