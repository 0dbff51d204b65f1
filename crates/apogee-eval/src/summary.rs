//! Per-strategy performance summary.

use std::fmt;

use apogee_traits::{ApogeeError, Date, Result};
use serde::Serialize;

use crate::returns::{geometric, log};
use crate::risk::{CVaR, RiskMetric, VaR};
use crate::strategy::BacktestRun;

/// Headline statistics of one backtest run, per period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    /// Strategy name
    pub strategy: String,
    /// First realization period
    pub start: Date,
    /// Last realization period
    pub end: Date,
    /// Number of returns
    pub periods: usize,
    /// `(∏(1 + r))^(1/n) - 1`
    pub average_geometric_return: f64,
    /// Mean log return
    pub average_log_return: f64,
    /// Population standard deviation of log returns
    pub volatility: f64,
    /// Confidence level of the risk figures
    pub confidence: f64,
    /// VaR of the log returns
    pub value_at_risk: f64,
    /// CVaR of the log returns
    pub conditional_value_at_risk: f64,
    /// Compounded geometric return
    pub total_return: f64,
    /// Largest peak-to-trough loss of the compounded path
    pub max_drawdown: f64,
    /// Mean one-way turnover per rebalance
    pub average_turnover: f64,
}

impl PerformanceSummary {
    /// Summarizes a run.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::EmptySeries`] for a run without returns, or
    /// the risk metrics' error for an invalid confidence.
    pub fn from_run(run: &BacktestRun, confidence: f64) -> Result<Self> {
        let series = &run.series;
        let (start, end) = series.range().ok_or(ApogeeError::EmptySeries)?;
        Ok(Self {
            strategy: run.strategy.clone(),
            start,
            end,
            periods: series.len(),
            average_geometric_return: geometric::average_over_time(series.geometric())?,
            average_log_return: log::average_over_time(series.log())?,
            volatility: log::volatility(series.log())?,
            confidence,
            value_at_risk: VaR.eval(series.log(), confidence)?,
            conditional_value_at_risk: CVaR.eval(series.log(), confidence)?,
            total_return: series.total_return(),
            max_drawdown: geometric::max_drawdown(series.geometric()),
            average_turnover: run.average_turnover(),
        })
    }
}

impl fmt::Display for PerformanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Backtest summary of {} (per-period values)", self.strategy)?;
        writeln!(f, "Time range            : {} to {}", self.start, self.end)?;
        writeln!(f, "Periods               : {}", self.periods)?;
        writeln!(f, "Average geom. return  : {:+.6}", self.average_geometric_return)?;
        writeln!(f, "Average log return    : {:+.6}", self.average_log_return)?;
        writeln!(f, "Average volatility    : {:+.6}", self.volatility)?;
        writeln!(
            f,
            "Value at Risk (log)   : {:+.6} ({:.0}%)",
            self.value_at_risk,
            self.confidence * 100.0
        )?;
        writeln!(f, "Conditional VaR (log) : {:+.6}", self.conditional_value_at_risk)?;
        writeln!(f, "Total return          : {:+.6}", self.total_return)?;
        writeln!(f, "Max drawdown          : {:.6}", self.max_drawdown)?;
        write!(f, "Average turnover      : {:.6}", self.average_turnover)
    }
}
