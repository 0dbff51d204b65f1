//! Indicators and ranking signals for the apogee backtester.
//!
//! Indicators turn market data into one number per instrument and period:
//! - Value: book-to-price, read directly or computed from its components
//! - Momentum: compounded trailing returns and trailing means
//! - Raw metrics read as-is
//!
//! Signals rank a whole universe with them, either by a single indicator
//! ([`RankSignal`]) or by a weighted blend of z-scores ([`CompositeSignal`]).
//!
//! # Example
//!
//! ```ignore
//! use apogee_signals::{RankSignal, value::BookToPrice};
//! use apogee_signals::registry::available_signals;
//!
//! // Highest book-to-price first
//! let signal = RankSignal::best(BookToPrice::default());
//!
//! // Discover available signals
//! let signals = available_signals();
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod composite;
pub mod metric;
pub mod momentum;
pub mod rank;
pub mod registry;
pub mod value;

// Re-export key types
pub use composite::{CompositeSignal, CompositeSignalBuilder};
pub use metric::MetricIndicator;
pub use rank::{Order, RankSignal};
pub use registry::{SignalCategory, SignalInfo, build_signal};

#[cfg(test)]
pub(crate) mod testing {
    use apogee_traits::{Date, MarketData};
    use polars::prelude::*;

    /// First day of month `m` of 2020.
    pub(crate) fn period(m: u32) -> Date {
        Date::from_ymd_opt(2020, m, 1).unwrap()
    }

    /// Three instruments over four monthly periods.
    pub(crate) fn fixture() -> MarketData {
        let dates = ["2020-01-01", "2020-02-01", "2020-03-01", "2020-04-01"];
        let df = df! {
            "symbol" => ["A", "A", "A", "A", "B", "B", "B", "B", "C", "C", "C", "C"],
            "date" => dates.repeat(3),
            "return" => [0.00, 0.10, -0.05, 0.02, 0.00, -0.02, 0.04, 0.01, 0.00, 0.05, 0.00, -0.03],
            "book_to_price" => [0.9, 0.8, 0.7, 0.6, 0.5, 0.5, 0.9, 0.9, 0.3, 0.2, 0.1, 0.4],
            "market_cap" => [50.0, 50.0, 50.0, 50.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0],
            "book_value" => [45.0, 40.0, 35.0, 30.0, 50.0, 50.0, 90.0, 90.0, 30.0, 20.0, 10.0, 40.0],
        }
        .unwrap();
        MarketData::from_frame("fixture", &df).unwrap()
    }
}
