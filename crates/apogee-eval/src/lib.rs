//! Strategy evaluation for apogee.
//!
//! This crate turns a ranking signal into a track record:
//! - Portfolio construction and per-period realized returns
//! - The evaluation driver: warm-up trimming, period iteration, turnover
//! - Geometric and log return algebra
//! - Tail risk (VaR, CVaR) and a performance summary
//!
//! # Example
//!
//! ```rust,ignore
//! use apogee_eval::{Evaluator, PerformanceSummary, StrategyKind, LegSizing};
//!
//! let evaluator = Evaluator::new(&market);
//! let strategy = StrategyKind::LongShortBp.build(LegSizing::Fraction(0.2))?;
//! let run = evaluator.backtest(&strategy)?;
//! println!("{}", PerformanceSummary::from_run(&run, 0.95)?);
//! ```

pub mod config;
pub mod portfolio;
pub mod returns;
pub mod risk;
pub mod strategies;
pub mod strategy;
pub mod summary;

// Re-export main types
pub use config::BacktestConfig;
pub use portfolio::{Portfolio, Position, Trade};
pub use returns::{HoldingWeights, ReturnSeries, ReturnSource, Side, to_geometric, to_log};
pub use risk::{CVaR, DEFAULT_CONFIDENCE, RiskMetric, VaR};
pub use strategies::{LegSizing, Legs, MarketStrategy, RankedStrategy, StrategyKind};
pub use strategy::{BacktestRun, Evaluation, EvaluationState, Evaluator, Strategy};
pub use summary::PerformanceSummary;

#[cfg(test)]
pub(crate) mod testing {
    use apogee_traits::{Date, MarketData};
    use polars::prelude::*;

    /// First day of month `m` of 2020.
    pub(crate) fn period(m: u32) -> Date {
        Date::from_ymd_opt(2020, m, 1).unwrap()
    }

    /// Three instruments over four monthly periods.
    ///
    /// `return` at a period is the return realized since the previous one.
    pub(crate) fn fixture() -> MarketData {
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
}
