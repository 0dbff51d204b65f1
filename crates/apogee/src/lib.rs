#![doc(issue_tracker_base_url = "https://github.com/apogee-quant/apogee/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # apogee
//!
//! Backtester for systematic long/short equity strategies.
//!
//! apogee is an umbrella crate that re-exports the apogee sub-crates. It
//! covers the whole pipeline: loading a market panel, ranking instruments
//! with a signal, forming portfolios, and summarizing the resulting track
//! record.
//!
//! ## Quick Start
//!
//! ```ignore
//! use apogee::{Evaluator, LegSizing, MarketData, PerformanceSummary, StrategyKind};
//!
//! # fn main() -> apogee::Result<()> {
//! let market = MarketData::from_frame("prices", &frame)?;
//! let strategy = StrategyKind::LongShortBp.build(LegSizing::Fraction(0.2))?;
//!
//! let run = Evaluator::new(&market).backtest(&strategy)?;
//! println!("{}", PerformanceSummary::from_run(&run, 0.95)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Market data, indicators, signals and the error type
//! - [`signals`] - Indicator and signal implementations, and their registry
//! - [`eval`] - Portfolios, strategies, the evaluation driver and risk
//!
//! ## Architecture
//!
//! 1. **Market data** is an immutable panel of metrics per instrument and period
//! 2. **Indicators** score every instrument at a period
//! 3. **Signals** turn scores into a ranking
//! 4. **Strategies** pick legs from the ranking
//! 5. **The evaluator** realizes each portfolio over the next period

/// Version information for the apogee crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Core Traits
// ============================================================================

/// Core types and trait definitions.
///
/// - [`MarketData`] - Dense metric panels over periods and instruments
/// - [`DataSource`] - Anything that yields a long-format frame
/// - [`Indicator`] - Per-instrument score at a period
/// - [`Signal`] - Indicator that ranks the universe
pub mod traits {
    pub use apogee_traits::*;
}

pub use apogee_traits::{DataSource, FrameSource, Indicator, Ranking, Signal};
pub use apogee_traits::{ApogeeError, Result};
pub use apogee_traits::{Date, MarketData, MarketDataBuilder, Symbol};

// ============================================================================
// Signals
// ============================================================================

/// Indicator and signal implementations.
///
/// ## Value
///
/// - **BookToPrice**: book value over price, read directly or derived from
///   book value and market capitalization
///
/// ## Momentum
///
/// - **Momentum**: compounded return over a window, skipping recent periods
/// - **TrailingMean**: average of a metric over recent periods
///
/// ## Combination
///
/// - **RankSignal**: rank by an indicator, best or worst first
/// - **CompositeSignal**: weighted sum of standardized indicators
///
/// Every registered signal can be built by name:
///
/// ```ignore
/// use apogee::signals::registry::{available_signals, build_signal};
///
/// for info in available_signals() {
///     let signal = build_signal(info.name)?;
///     println!("{} (warm-up {})", signal.name(), signal.warmup());
/// }
/// ```
pub mod signals {
    pub use apogee_signals::*;
}

pub use apogee_signals::{CompositeSignal, Order, RankSignal, build_signal};

// ============================================================================
// Evaluation
// ============================================================================

/// Strategy evaluation.
///
/// ## Returns
///
/// A strategy's realized return over a period is the weighted sum of its
/// instruments' returns, with long weights summing to `+1` and short
/// weights to `-1`. Series keep geometric and log returns side by side:
///
/// ```text
/// l = ln(1 + r)
/// ```
///
/// ## Risk
///
/// - **VaR**: nearest-rank `(1 - c)` quantile of the log returns
/// - **CVaR**: mean of the log returns at or below VaR
///
/// ## Turnover
///
/// One-way turnover between consecutive portfolios:
///
/// ```text
/// turnover = Σ |w_t - w_{t-1}| / 2
/// ```
pub mod eval {
    pub use apogee_eval::*;
}

pub use apogee_eval::{
    BacktestConfig, BacktestRun, Evaluator, LegSizing, Portfolio, PerformanceSummary,
    ReturnSeries, ReturnSource, Strategy, StrategyKind,
};

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```ignore
/// use apogee::prelude::*;
/// ```
///
/// This brings into scope the core traits ([`Indicator`], [`Signal`],
/// [`Strategy`], [`RiskMetric`](crate::eval::RiskMetric)) along with
/// [`Result`] and [`ApogeeError`].
pub mod prelude {
    pub use crate::eval::RiskMetric;
    pub use crate::{ApogeeError, Indicator, Result, Signal, Strategy};
    pub use crate::{Date, MarketData, Symbol};
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use polars::prelude::*;

    fn market() -> MarketData {
        let dates = ["2020-01-01", "2020-02-01", "2020-03-01", "2020-04-01"];
        let df = df! {
            "symbol" => ["A", "A", "A", "A", "B", "B", "B", "B", "C", "C", "C", "C"],
            "date" => dates.repeat(3),
            "return" => [0.00, 0.10, -0.05, 0.02, 0.00, -0.02, 0.04, 0.01, 0.00, 0.05, 0.00, -0.03],
            "book_to_price" => [0.9, 0.8, 0.7, 0.6, 0.5, 0.5, 0.9, 0.9, 0.3, 0.2, 0.1, 0.4],
        }
        .unwrap();
        MarketData::from_frame("fixture", &df).unwrap()
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_market_backtest() {
        let market = market();
        let strategy = StrategyKind::Market.build(LegSizing::default()).unwrap();
        let run = Evaluator::new(&market).backtest(&strategy).unwrap();

        assert_eq!(run.strategy, "market");
        assert_eq!(run.series.len(), 3);
        let r = run.series.geometric();
        assert_relative_eq!(r[0], 0.13 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(r[1], -0.01 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(r[2], 0.0, epsilon = 1e-12);
        assert_relative_eq!(run.average_turnover(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_long_short_backtest() {
        let market = market();
        let strategy = StrategyKind::LongShortBp.build(LegSizing::Count(1)).unwrap();
        let run = Evaluator::new(&market).backtest(&strategy).unwrap();

        // long A, A, B against short C each month
        let r = run.series.geometric();
        assert_relative_eq!(r[0], 0.05, epsilon = 1e-12);
        assert_relative_eq!(r[1], -0.05, epsilon = 1e-12);
        assert_relative_eq!(r[2], 0.04, epsilon = 1e-12);
        assert_eq!(run.turnover, vec![0.0, 1.0]);

        let summary = PerformanceSummary::from_run(&run, 0.95).unwrap();
        assert_eq!(summary.start, Date::from_ymd_opt(2020, 2, 1).unwrap());
        assert_eq!(summary.end, Date::from_ymd_opt(2020, 4, 1).unwrap());
        assert_relative_eq!(summary.value_at_risk, 0.95_f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(summary.total_return, 1.05 * 0.95 * 1.04 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_eval_many_matches_sequential() {
        let market = market();
        let strategies: Vec<Box<dyn Strategy>> = StrategyKind::ALL
            .iter()
            .map(|kind| kind.build(LegSizing::Count(1)).unwrap())
            .collect();
        let evaluator = Evaluator::new(&market);

        let parallel = evaluator.eval_many(&strategies);
        assert_eq!(parallel.len(), strategies.len());
        for (strategy, run) in strategies.iter().zip(parallel) {
            let sequential = evaluator.backtest(strategy).unwrap();
            let run = run.unwrap();
            assert_eq!(run.strategy, strategy.name());
            assert_eq!(run.series.geometric(), sequential.series.geometric());
        }
    }

    #[test]
    fn test_oversized_legs_fail() {
        let market = market();
        let strategy = StrategyKind::LongShortBp.build(LegSizing::Count(2)).unwrap();
        assert!(matches!(
            Evaluator::new(&market).backtest(&strategy),
            Err(ApogeeError::InsufficientUniverse { .. })
        ));
    }
}
