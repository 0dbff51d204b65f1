//! Strategy trait and the evaluation driver.
//!
//! A [`Strategy`] only decides which portfolio to hold at a period. Period
//! iteration, warm-up trimming and return reduction live in [`Evaluation`],
//! which strategies cannot override.

use apogee_traits::{ApogeeError, Date, MarketData, Result};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::portfolio::Portfolio;
use crate::returns::{ReturnSeries, ReturnSource};

/// Portfolio selection policy.
pub trait Strategy: Send + Sync {
    /// Returns the name of this strategy.
    fn name(&self) -> &str;

    /// Leading periods that must be skipped before the first selection.
    fn warmup(&self) -> usize {
        0
    }

    /// Metrics the selection reads, checked before the first period.
    fn required_metrics(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Portfolio to hold from `period` to the next period.
    ///
    /// # Errors
    ///
    /// Fails when the data needed to rank or size the portfolio is missing.
    fn select(&self, market: &MarketData, period: Date) -> Result<Portfolio>;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn warmup(&self) -> usize {
        (**self).warmup()
    }

    fn required_metrics(&self) -> Vec<&str> {
        (**self).required_metrics()
    }

    fn select(&self, market: &MarketData, period: Date) -> Result<Portfolio> {
        (**self).select(market, period)
    }
}

/// Where an [`Evaluation`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationState {
    /// Not started.
    Uninitialized,
    /// Next formation period to process, as an index into the timeframe.
    Running {
        /// Index of the next formation period.
        cursor: usize,
    },
    /// Every formation period was processed.
    Completed,
    /// A step failed; no result is available.
    Failed,
}

/// Output of a completed evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestRun {
    /// Name of the evaluated strategy.
    pub strategy: String,
    /// Per-period returns.
    pub series: ReturnSeries,
    /// Turnover at each rebalance after the first.
    pub turnover: Vec<f64>,
}

impl BacktestRun {
    /// Mean turnover per rebalance, zero with a single rebalance.
    pub fn average_turnover(&self) -> f64 {
        if self.turnover.is_empty() {
            0.0
        } else {
            self.turnover.iter().sum::<f64>() / self.turnover.len() as f64
        }
    }
}

/// One run of a strategy over the eligible timeframe.
///
/// The eligible timeframe is every market period after the strategy's
/// warm-up. Each [`step`](Self::step) forms the portfolio at the cursor
/// and realizes it over the following period; the last eligible period is
/// never a formation period.
#[derive(Debug)]
pub struct Evaluation<'a, S: ?Sized> {
    market: &'a MarketData,
    source: &'a ReturnSource,
    strategy: &'a S,
    state: EvaluationState,
    timeframe: &'a [Date],
    series: ReturnSeries,
    turnover: Vec<f64>,
    previous: Option<Portfolio>,
}

impl<'a, S: Strategy + ?Sized> Evaluation<'a, S> {
    /// New evaluation in the [`Uninitialized`](EvaluationState::Uninitialized) state.
    pub const fn new(market: &'a MarketData, source: &'a ReturnSource, strategy: &'a S) -> Self {
        Self {
            market,
            source,
            strategy,
            state: EvaluationState::Uninitialized,
            timeframe: &[],
            series: ReturnSeries::new(),
            turnover: Vec::new(),
            previous: None,
        }
    }

    /// Current state.
    pub const fn state(&self) -> EvaluationState {
        self.state
    }

    /// Periods the evaluation runs over, empty before [`start`](Self::start).
    pub const fn timeframe(&self) -> &'a [Date] {
        self.timeframe
    }

    /// Trims the warm-up and enters the running state.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::MissingColumn`] if the market lacks a metric
    /// the strategy or the return source reads, and
    /// [`ApogeeError::InsufficientHistory`] if fewer than two periods remain
    /// after warm-up.
    pub fn start(&mut self) -> Result<()> {
        if self.state != EvaluationState::Uninitialized {
            return Err(ApogeeError::Other(format!(
                "evaluation of {} already started",
                self.strategy.name()
            )));
        }
        let mut metrics = self.strategy.required_metrics();
        metrics.push(self.source.metric());
        if let Some(missing) = metrics.into_iter().find(|m| !self.market.has_metric(m)) {
            self.state = EvaluationState::Failed;
            return Err(ApogeeError::MissingColumn(missing.to_string()));
        }
        let periods = self.market.periods();
        let warmup = self.strategy.warmup();
        let available = periods.len().saturating_sub(warmup);
        if available < 2 {
            self.state = EvaluationState::Failed;
            return Err(ApogeeError::InsufficientHistory {
                required: warmup + 2,
                available: periods.len(),
            });
        }
        self.timeframe = &periods[warmup..];
        self.state = EvaluationState::Running { cursor: 0 };
        info!(
            strategy = self.strategy.name(),
            warmup,
            periods = self.timeframe.len(),
            "evaluation started"
        );
        Ok(())
    }

    /// Processes one formation period.
    ///
    /// Returns whether more periods remain.
    ///
    /// # Errors
    ///
    /// Any selection or realization failure moves the evaluation to
    /// [`Failed`](EvaluationState::Failed).
    pub fn step(&mut self) -> Result<bool> {
        let EvaluationState::Running { cursor } = self.state else {
            return Err(ApogeeError::Other(format!(
                "evaluation of {} is not running ({:?})",
                self.strategy.name(),
                self.state
            )));
        };
        match self.advance(cursor) {
            Ok(()) if cursor + 2 < self.timeframe.len() => {
                self.state = EvaluationState::Running { cursor: cursor + 1 };
                Ok(true)
            }
            Ok(()) => {
                self.state = EvaluationState::Completed;
                Ok(false)
            }
            Err(err) => {
                self.state = EvaluationState::Failed;
                Err(err)
            }
        }
    }

    fn advance(&mut self, cursor: usize) -> Result<()> {
        let formation = self.timeframe[cursor];
        let realization = self.timeframe[cursor + 1];
        let portfolio = self.strategy.select(self.market, formation)?;
        let r = portfolio.realized_return(self.market, self.source)?;

        if let Some(previous) = &self.previous {
            self.turnover.push(portfolio.turnover(Some(previous)));
        }
        let trades = portfolio.trades(self.previous.as_ref());
        debug!(
            strategy = self.strategy.name(),
            %formation,
            %realization,
            positions = portfolio.len(),
            trades = trades.len(),
            r,
            "rebalanced"
        );
        for trade in &trades {
            debug!(strategy = self.strategy.name(), %formation, %trade, "trade");
        }

        self.series.push(realization, r)?;
        self.previous = Some(portfolio);
        Ok(())
    }

    /// Steps until completion and returns the result.
    ///
    /// # Errors
    ///
    /// The first failure aborts the run; no partial series is returned.
    pub fn run(mut self) -> Result<BacktestRun> {
        if self.state == EvaluationState::Uninitialized {
            self.start()?;
        }
        while self.step()? {}
        self.finish()
    }

    /// Result of a completed evaluation.
    ///
    /// # Errors
    ///
    /// Fails unless the state is [`Completed`](EvaluationState::Completed).
    pub fn finish(self) -> Result<BacktestRun> {
        if self.state != EvaluationState::Completed {
            return Err(ApogeeError::Other(format!(
                "evaluation of {} is not complete ({:?})",
                self.strategy.name(),
                self.state
            )));
        }
        info!(
            strategy = self.strategy.name(),
            periods = self.series.len(),
            total_return = self.series.total_return(),
            "evaluation completed"
        );
        Ok(BacktestRun {
            strategy: self.strategy.name().to_string(),
            series: self.series,
            turnover: self.turnover,
        })
    }
}

/// Evaluates strategies against one market.
///
/// # Example
///
/// ```ignore
/// use apogee_eval::{Evaluator, strategies::MarketStrategy};
///
/// let evaluator = Evaluator::new(&market);
/// let series = evaluator.eval_strategy(&MarketStrategy::new())?;
/// let (timeframe, geometric, log) = series.into_parts();
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    market: &'a MarketData,
    source: ReturnSource,
}

impl<'a> Evaluator<'a> {
    /// Evaluator reading returns from the default `return` metric.
    pub fn new(market: &'a MarketData) -> Self {
        Self::with_return_source(market, ReturnSource::default())
    }

    /// Evaluator with an explicit return source.
    pub const fn with_return_source(market: &'a MarketData, source: ReturnSource) -> Self {
        Self { market, source }
    }

    /// The market evaluated against.
    pub const fn market(&self) -> &'a MarketData {
        self.market
    }

    /// How instrument returns are obtained.
    pub const fn return_source(&self) -> &ReturnSource {
        &self.source
    }

    /// Return series of `strategy` over the eligible timeframe.
    ///
    /// # Errors
    ///
    /// Returns the first error of the run; see [`Evaluation::run`].
    pub fn eval_strategy<S: Strategy + ?Sized>(&self, strategy: &S) -> Result<ReturnSeries> {
        self.backtest(strategy).map(|run| run.series)
    }

    /// Return series plus rebalance turnover.
    ///
    /// # Errors
    ///
    /// Returns the first error of the run; see [`Evaluation::run`].
    pub fn backtest<S: Strategy + ?Sized>(&self, strategy: &S) -> Result<BacktestRun> {
        Evaluation::new(self.market, &self.source, strategy).run()
    }

    /// Runs independent strategies in parallel.
    ///
    /// Results are in input order; one failing strategy does not affect the
    /// others.
    pub fn eval_many<S: Strategy>(&self, strategies: &[S]) -> Vec<Result<BacktestRun>> {
        strategies
            .par_iter()
            .map(|strategy| self.backtest(strategy))
            .collect()
    }
}
