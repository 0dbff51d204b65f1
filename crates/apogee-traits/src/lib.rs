#![doc(issue_tracker_base_url = "https://github.com/apogee-quant/apogee/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and trait definitions for the apogee backtester.
//!
//! This crate provides the pieces every stage of the evaluation pipeline
//! shares: the immutable [`MarketData`] panel and its [`DataSource`]s, the
//! [`Indicator`] and [`Signal`] abstractions, and the [`ApogeeError`] type.

/// The version of the apogee-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod indicator;
pub mod signal;
pub mod source;
pub mod stats;
pub mod types;

// Re-exports
pub use error::{ApogeeError, Result};
pub use indicator::Indicator;
pub use signal::{Ranking, Signal};
pub use source::{DataSource, FrameSource};
pub use types::{Date, MarketData, MarketDataBuilder, Symbol, metric};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
