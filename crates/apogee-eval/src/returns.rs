//! Return algebra.
//!
//! Conversions between geometric returns `r` and logarithmic returns
//! `ln(1 + r)`, reductions across a portfolio and across time, and the
//! [`ReturnSeries`] produced by a strategy evaluation.
//!
//! Geometric returns compound multiplicatively, log returns additively:
//!
//! | reduction          | [`geometric`]              | [`log`]                        |
//! |--------------------|----------------------------|--------------------------------|
//! | compound           | `∏(1 + r) - 1`             | `Σ l`                          |
//! | average over time  | `(∏(1 + r))^(1/n) - 1`     | `mean(l)`                      |
//! | portfolio average  | `Σ w r`                    | `ln(1 + Σ w (e^l - 1))`        |
//!
//! Over a `periods x instruments` panel the order of the two reductions
//! matters; see [`HoldingWeights`].

use apogee_traits::{ApogeeError, Date, MarketData, Result, metric};
use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Geometric return to log return.
#[must_use]
pub fn to_log(geometric: f64) -> f64 {
    geometric.ln_1p()
}

/// Log return to geometric return.
#[must_use]
pub fn to_geometric(log: f64) -> f64 {
    log.exp_m1()
}

/// Simple return `(end - start) / start` between two values.
///
/// # Errors
///
/// Returns [`ApogeeError::InvalidData`] for a zero or non-finite start value.
pub fn simple_return(start: f64, end: f64) -> Result<f64> {
    if start == 0.0 || !start.is_finite() || !end.is_finite() {
        return Err(ApogeeError::InvalidData(format!(
            "cannot compute a return from {start} to {end}"
        )));
    }
    Ok((end - start) / start)
}

/// Direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Profits when the instrument rises.
    Long,
    /// Profits when the instrument falls.
    Short,
}

impl Side {
    /// Return earned on this side of an instrument return.
    ///
    /// A short earns the negated return, not the inverse.
    #[must_use]
    pub fn apply(self, r: f64) -> f64 {
        match self {
            Self::Long => r,
            Self::Short => -r,
        }
    }

    /// Sign of a weight on this side.
    pub(crate) const fn sign(self) -> f64 {
        match self {
            Self::Long => 1.0,
            Self::Short => -1.0,
        }
    }
}

/// How the return of an instrument over `t → t+1` is obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReturnSource {
    /// The metric at `t+1` already is the simple return realized over `t → t+1`.
    Returns {
        /// Metric holding returns (default: `return`).
        metric: String,
    },
    /// Returns are computed from the metric's values at `t` and `t+1`.
    Prices {
        /// Metric holding prices or values.
        metric: String,
    },
}

impl Default for ReturnSource {
    fn default() -> Self {
        Self::Returns {
            metric: metric::RETURN.to_string(),
        }
    }
}

impl ReturnSource {
    /// Returns read from `metric`.
    pub fn returns(metric: impl Into<String>) -> Self {
        Self::Returns {
            metric: metric.into(),
        }
    }

    /// Returns computed from the values of `metric`.
    pub fn prices(metric: impl Into<String>) -> Self {
        Self::Prices {
            metric: metric.into(),
        }
    }

    /// The metric read.
    pub fn metric(&self) -> &str {
        match self {
            Self::Returns { metric } | Self::Prices { metric } => metric,
        }
    }

    /// Simple return of `instrument` held from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::DataUnavailable`] for a missing value and
    /// [`ApogeeError::InvalidData`] for a zero start price.
    pub fn instrument_return(
        &self,
        market: &MarketData,
        instrument: &str,
        from: Date,
        to: Date,
    ) -> Result<f64> {
        match self {
            Self::Returns { metric } => market.get(metric, instrument, to),
            Self::Prices { metric } => simple_return(
                market.get(metric, instrument, from)?,
                market.get(metric, instrument, to)?,
            ),
        }
    }
}

/// Weights for reducing a `periods x instruments` return panel.
#[derive(Debug, Clone, Copy)]
pub enum HoldingWeights<'a> {
    /// Initial weights of a book that is never traded: every instrument is
    /// reduced over time first, then the results across the portfolio.
    BuyAndHold(ArrayView1<'a, f64>),
    /// Weights restored every period, one row per period: every period is
    /// reduced across the portfolio first, then the results over time.
    Rebalanced(ArrayView2<'a, f64>),
}

fn ensure_panel(returns: &ArrayView2<'_, f64>, weights: &HoldingWeights<'_>) -> Result<()> {
    if returns.is_empty() {
        return Err(ApogeeError::EmptySeries);
    }
    let matches = match weights {
        HoldingWeights::BuyAndHold(w) => w.len() == returns.ncols(),
        HoldingWeights::Rebalanced(w) => w.dim() == returns.dim(),
    };
    if !matches {
        return Err(ApogeeError::InvalidParameter(format!(
            "weights {weights:?} do not fit returns of shape {:?}",
            returns.dim()
        )));
    }
    Ok(())
}

fn ensure_weights(returns: &[f64], weights: &[f64]) -> Result<()> {
    if returns.is_empty() {
        return Err(ApogeeError::EmptySeries);
    }
    if returns.len() != weights.len() {
        return Err(ApogeeError::InvalidParameter(format!(
            "{} returns but {} weights",
            returns.len(),
            weights.len()
        )));
    }
    Ok(())
}

/// Reductions over geometric returns.
pub mod geometric {
    use super::{ArrayView1, ArrayView2, HoldingWeights, ensure_panel, ensure_weights};
    use apogee_traits::{ApogeeError, Result};

    /// Cumulative return `∏(1 + r) - 1`; zero for an empty slice.
    #[must_use]
    pub fn compound(returns: &[f64]) -> f64 {
        returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
    }

    /// Running cumulative return after each period.
    #[must_use]
    pub fn accumulate(returns: &[f64]) -> Vec<f64> {
        returns
            .iter()
            .scan(1.0, |growth, r| {
                *growth *= 1.0 + r;
                Some(*growth - 1.0)
            })
            .collect()
    }

    /// Per-period return that compounds to the same total, `(∏(1 + r))^(1/n) - 1`.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::EmptySeries`] for an empty slice.
    pub fn average_over_time(returns: &[f64]) -> Result<f64> {
        if returns.is_empty() {
            return Err(ApogeeError::EmptySeries);
        }
        let growth = 1.0 + compound(returns);
        Ok(growth.powf(1.0 / returns.len() as f64) - 1.0)
    }

    /// Weighted portfolio return `Σ w r`.
    ///
    /// # Errors
    ///
    /// Fails on an empty portfolio or mismatched lengths.
    pub fn average_over_portfolio(returns: &[f64], weights: &[f64]) -> Result<f64> {
        ensure_weights(returns, weights)?;
        Ok(ArrayView1::from(returns).dot(&ArrayView1::from(weights)))
    }

    /// Cumulative return of a portfolio over a `periods x instruments` panel.
    ///
    /// # Errors
    ///
    /// Fails on an empty panel or weights of the wrong shape.
    pub fn compound_over_portfolio_and_time(
        returns: ArrayView2<'_, f64>,
        weights: HoldingWeights<'_>,
    ) -> Result<f64> {
        ensure_panel(&returns, &weights)?;
        match weights {
            HoldingWeights::BuyAndHold(w) => {
                let per_instrument: Vec<f64> = returns
                    .columns()
                    .into_iter()
                    .map(|c| c.fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0)
                    .collect();
                Ok(ArrayView1::from(&per_instrument).dot(&w))
            }
            HoldingWeights::Rebalanced(w) => Ok(compound(&per_period(returns, w))),
        }
    }

    /// Per-period return of a portfolio over a `periods x instruments` panel.
    ///
    /// # Errors
    ///
    /// Fails on an empty panel or weights of the wrong shape.
    pub fn average_over_portfolio_and_time(
        returns: ArrayView2<'_, f64>,
        weights: HoldingWeights<'_>,
    ) -> Result<f64> {
        ensure_panel(&returns, &weights)?;
        match weights {
            HoldingWeights::BuyAndHold(w) => {
                let n = returns.nrows() as f64;
                let per_instrument: Vec<f64> = returns
                    .columns()
                    .into_iter()
                    .map(|c| c.fold(1.0, |acc, r| acc * (1.0 + r)).powf(1.0 / n) - 1.0)
                    .collect();
                Ok(ArrayView1::from(&per_instrument).dot(&w))
            }
            HoldingWeights::Rebalanced(w) => average_over_time(&per_period(returns, w)),
        }
    }

    fn per_period(returns: ArrayView2<'_, f64>, weights: ArrayView2<'_, f64>) -> Vec<f64> {
        returns
            .rows()
            .into_iter()
            .zip(weights.rows())
            .map(|(r, w)| r.dot(&w))
            .collect()
    }

    /// Largest peak-to-trough loss of the accumulated path, as a positive fraction.
    #[must_use]
    pub fn max_drawdown(returns: &[f64]) -> f64 {
        let mut max_dd: f64 = 0.0;
        let mut peak: f64 = 0.0;

        for cum_ret in accumulate(returns) {
            peak = peak.max(cum_ret);
            max_dd = max_dd.max((peak - cum_ret) / (1.0 + peak));
        }

        max_dd
    }
}

/// Reductions over log returns.
pub mod log {
    use super::{ArrayView1, ArrayView2, HoldingWeights, ensure_panel, ensure_weights};
    use apogee_traits::{ApogeeError, Result};

    /// Cumulative log return `Σ l`.
    #[must_use]
    pub fn compound(returns: &[f64]) -> f64 {
        returns.iter().sum()
    }

    /// Running cumulative log return after each period.
    #[must_use]
    pub fn accumulate(returns: &[f64]) -> Vec<f64> {
        returns
            .iter()
            .scan(0.0, |total, l| {
                *total += l;
                Some(*total)
            })
            .collect()
    }

    /// Arithmetic mean of log returns.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::EmptySeries`] for an empty slice.
    pub fn average_over_time(returns: &[f64]) -> Result<f64> {
        ArrayView1::from(returns)
            .mean()
            .ok_or(ApogeeError::EmptySeries)
    }

    /// Log return of a weighted portfolio, `ln(1 + Σ w (e^l - 1))`.
    ///
    /// # Errors
    ///
    /// Fails on an empty portfolio or mismatched lengths.
    pub fn average_over_portfolio(returns: &[f64], weights: &[f64]) -> Result<f64> {
        ensure_weights(returns, weights)?;
        let growth: f64 = returns
            .iter()
            .zip(weights)
            .map(|(l, w)| w * l.exp_m1())
            .sum();
        Ok(growth.ln_1p())
    }

    /// Log return of an equally weighted portfolio, `ln(mean(e^l))`.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::EmptySeries`] for an empty portfolio.
    pub fn average_over_equal_portfolio(returns: &[f64]) -> Result<f64> {
        let weights = vec![1.0 / returns.len().max(1) as f64; returns.len()];
        average_over_portfolio(returns, &weights)
    }

    /// Cumulative log return of a portfolio over a `periods x instruments` panel.
    ///
    /// # Errors
    ///
    /// Fails on an empty panel or weights of the wrong shape.
    pub fn compound_over_portfolio_and_time(
        returns: ArrayView2<'_, f64>,
        weights: HoldingWeights<'_>,
    ) -> Result<f64> {
        ensure_panel(&returns, &weights)?;
        match weights {
            HoldingWeights::BuyAndHold(w) => {
                let per_instrument: Vec<f64> = returns.columns().into_iter().map(|c| c.sum()).collect();
                average_over_portfolio(&per_instrument, &w.to_vec())
            }
            HoldingWeights::Rebalanced(w) => Ok(compound(&per_period(returns, w)?)),
        }
    }

    /// Mean log return of a portfolio over a `periods x instruments` panel.
    ///
    /// # Errors
    ///
    /// Fails on an empty panel or weights of the wrong shape.
    pub fn average_over_portfolio_and_time(
        returns: ArrayView2<'_, f64>,
        weights: HoldingWeights<'_>,
    ) -> Result<f64> {
        ensure_panel(&returns, &weights)?;
        match weights {
            HoldingWeights::BuyAndHold(w) => {
                let n = returns.nrows() as f64;
                let per_instrument: Vec<f64> =
                    returns.columns().into_iter().map(|c| c.sum() / n).collect();
                average_over_portfolio(&per_instrument, &w.to_vec())
            }
            HoldingWeights::Rebalanced(w) => average_over_time(&per_period(returns, w)?),
        }
    }

    fn per_period(returns: ArrayView2<'_, f64>, weights: ArrayView2<'_, f64>) -> Result<Vec<f64>> {
        returns
            .rows()
            .into_iter()
            .zip(weights.rows())
            .map(|(l, w)| average_over_portfolio(&l.to_vec(), &w.to_vec()))
            .collect()
    }

    /// Population standard deviation (ddof = 0) of log returns.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::EmptySeries`] for an empty slice.
    pub fn volatility(returns: &[f64]) -> Result<f64> {
        if returns.is_empty() {
            return Err(ApogeeError::EmptySeries);
        }
        Ok(ArrayView1::from(returns).std(0.0))
    }

    /// Annualized drift of a log return earned over `years`.
    ///
    /// A monthly average log return has `years = 1/12`.
    #[must_use]
    pub fn annualized_return(log_return: f64, years: f64) -> f64 {
        log_return / years
    }

    /// Annualized volatility of data sampled every `dt` years.
    ///
    /// Monthly data has `dt = 1/12`.
    #[must_use]
    pub fn annualized_volatility(volatility: f64, dt: f64) -> f64 {
        volatility / dt.sqrt()
    }
}

/// Per-period returns of one strategy run.
///
/// Entry `i` is the return realized over the holding period ending at
/// `periods[i]`. Geometric and log values are kept side by side.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ReturnSeries {
    periods: Vec<Date>,
    geometric: Vec<f64>,
    log: Vec<f64>,
}

impl ReturnSeries {
    /// Empty series.
    pub const fn new() -> Self {
        Self {
            periods: Vec::new(),
            geometric: Vec::new(),
            log: Vec::new(),
        }
    }

    /// Series from aligned periods and geometric returns.
    ///
    /// # Errors
    ///
    /// Fails if the lengths differ or a return cannot be represented.
    pub fn from_geometric(periods: Vec<Date>, geometric: Vec<f64>) -> Result<Self> {
        if periods.len() != geometric.len() {
            return Err(ApogeeError::InvalidData(format!(
                "{} periods but {} returns",
                periods.len(),
                geometric.len()
            )));
        }
        let mut series = Self::new();
        for (period, r) in periods.into_iter().zip(geometric) {
            series.push(period, r)?;
        }
        Ok(series)
    }

    /// Appends the geometric return realized at `period`.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::InvalidData`] for a non-finite return, a loss
    /// of 100% or more (which has no log return), or a period not after the
    /// last one.
    pub fn push(&mut self, period: Date, geometric: f64) -> Result<()> {
        if !geometric.is_finite() || geometric <= -1.0 {
            return Err(ApogeeError::InvalidData(format!(
                "return {geometric} at {period} has no log representation"
            )));
        }
        if self.periods.last().is_some_and(|last| *last >= period) {
            return Err(ApogeeError::InvalidData(format!(
                "return at {period} is out of order"
            )));
        }
        self.periods.push(period);
        self.geometric.push(geometric);
        self.log.push(to_log(geometric));
        Ok(())
    }

    /// Periods at which returns were realized.
    pub fn periods(&self) -> &[Date] {
        &self.periods
    }

    /// Geometric returns.
    pub fn geometric(&self) -> &[f64] {
        &self.geometric
    }

    /// Log returns.
    pub fn log(&self) -> &[f64] {
        &self.log
    }

    /// First and last realization period.
    pub fn range(&self) -> Option<(Date, Date)> {
        self.periods.first().copied().zip(self.periods.last().copied())
    }

    /// Total compounded geometric return.
    pub fn total_return(&self) -> f64 {
        geometric::compound(&self.geometric)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Whether the series has no entries.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// `(periods, geometric, log)`.
    pub fn into_parts(self) -> (Vec<Date>, Vec<f64>, Vec<f64>) {
        (self.periods, self.geometric, self.log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::*;

    fn d(m: u32) -> Date {
        Date::from_ymd_opt(2021, m, 1).unwrap()
    }

    proptest! {
        #[test]
        fn prop_log_geometric_round_trip(r in -0.99f64..10.0) {
            prop_assert!((to_geometric(to_log(r)) - r).abs() < 1e-9);
        }

        #[test]
        fn prop_compound_agrees_across_conventions(
            returns in proptest::collection::vec(-0.5f64..0.5, 1..24)
        ) {
            let logs: Vec<f64> = returns.iter().map(|&r| to_log(r)).collect();
            let via_log = to_geometric(log::compound(&logs));
            prop_assert!((via_log - geometric::compound(&returns)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_simple_return() {
        assert_relative_eq!(simple_return(100.0, 110.0).unwrap(), 0.1);
        assert_relative_eq!(simple_return(50.0, 25.0).unwrap(), -0.5);
        assert!(simple_return(0.0, 1.0).is_err());
    }

    #[test]
    fn test_short_negates() {
        assert_relative_eq!(Side::Long.apply(0.1), 0.1);
        assert_relative_eq!(Side::Short.apply(0.1), -0.1);
        assert_relative_eq!(Side::Short.apply(-0.5), 0.5);
    }

    #[test]
    fn test_geometric_reductions() {
        let returns = [0.1, -0.05, 0.02];
        assert_relative_eq!(
            geometric::compound(&returns),
            1.1 * 0.95 * 1.02 - 1.0,
            epsilon = 1e-12
        );
        let path = geometric::accumulate(&returns);
        assert_eq!(path.len(), 3);
        assert_relative_eq!(path[1], 1.1 * 0.95 - 1.0, epsilon = 1e-12);
        assert_relative_eq!(path[2], geometric::compound(&returns), epsilon = 1e-12);

        let avg = geometric::average_over_time(&returns).unwrap();
        assert_relative_eq!((1.0 + avg).powi(3) - 1.0, path[2], epsilon = 1e-12);
        assert!(geometric::average_over_time(&[]).is_err());
    }

    #[test]
    fn test_portfolio_averages() {
        let returns = [0.1, -0.1];
        let weights = [1.0, -1.0];
        assert_relative_eq!(
            geometric::average_over_portfolio(&returns, &weights).unwrap(),
            0.2,
            epsilon = 1e-12
        );
        let logs: Vec<f64> = returns.iter().map(|&r| to_log(r)).collect();
        assert_relative_eq!(
            log::average_over_portfolio(&logs, &weights).unwrap(),
            to_log(0.2),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            log::average_over_equal_portfolio(&logs).unwrap(),
            0.0,
            epsilon = 1e-12
        );
        assert!(geometric::average_over_portfolio(&returns, &[1.0]).is_err());
        assert!(log::average_over_portfolio(&[], &[]).is_err());
    }

    #[test]
    fn test_log_reductions() {
        let logs = [0.02, -0.01, 0.05, -0.02];
        assert_relative_eq!(log::compound(&logs), 0.04, epsilon = 1e-12);
        assert_relative_eq!(log::accumulate(&logs)[2], 0.06, epsilon = 1e-12);
        assert_relative_eq!(log::average_over_time(&logs).unwrap(), 0.01, epsilon = 1e-12);
        // population std: deviations 0.01, -0.02, 0.04, -0.03
        let expected = ((1e-4 + 4e-4 + 16e-4 + 9e-4) / 4.0_f64).sqrt();
        assert_relative_eq!(log::volatility(&logs).unwrap(), expected, epsilon = 1e-12);
        assert!(log::volatility(&[]).is_err());
        assert!(log::average_over_time(&[]).is_err());
    }

    #[test]
    fn test_reduction_order_matters() {
        // +10% and -10% every period for two periods
        let returns = ndarray::array![[0.1, -0.1], [0.1, -0.1]];
        let held = ndarray::array![0.5, 0.5];
        let rebalanced = ndarray::array![[0.5, 0.5], [0.5, 0.5]];

        let buy_and_hold = HoldingWeights::BuyAndHold(held.view());
        let each_period = HoldingWeights::Rebalanced(rebalanced.view());

        // (0.21 - 0.19) / 2 against two flat periods
        let held_total =
            geometric::compound_over_portfolio_and_time(returns.view(), buy_and_hold).unwrap();
        let rebalanced_total =
            geometric::compound_over_portfolio_and_time(returns.view(), each_period).unwrap();
        assert_relative_eq!(held_total, 0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(rebalanced_total, 0.0, epsilon = 1e-12);

        let logs = returns.mapv(to_log);
        assert_relative_eq!(
            log::compound_over_portfolio_and_time(logs.view(), buy_and_hold).unwrap(),
            to_log(0.01),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            log::compound_over_portfolio_and_time(logs.view(), each_period).unwrap(),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_panel_averages() {
        let returns = ndarray::array![[0.2, 0.0], [-0.1, 0.0]];
        let held = ndarray::array![1.0, 0.0];
        let rebalanced = ndarray::array![[1.0, 0.0], [1.0, 0.0]];
        let expected = 1.08_f64.sqrt() - 1.0;

        for weights in [
            HoldingWeights::BuyAndHold(held.view()),
            HoldingWeights::Rebalanced(rebalanced.view()),
        ] {
            assert_relative_eq!(
                geometric::average_over_portfolio_and_time(returns.view(), weights).unwrap(),
                expected,
                epsilon = 1e-12
            );
            assert_relative_eq!(
                log::average_over_portfolio_and_time(returns.mapv(to_log).view(), weights)
                    .unwrap(),
                1.08_f64.ln() / 2.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_panel_shape_checked() {
        let returns = ndarray::array![[0.1, 0.2]];
        let short = ndarray::array![1.0];
        let empty = ndarray::Array2::<f64>::zeros((0, 2));
        let held = ndarray::array![0.5, 0.5];
        assert!(matches!(
            geometric::compound_over_portfolio_and_time(
                returns.view(),
                HoldingWeights::BuyAndHold(short.view())
            ),
            Err(ApogeeError::InvalidParameter(_))
        ));
        assert!(matches!(
            log::average_over_portfolio_and_time(
                returns.view(),
                HoldingWeights::Rebalanced(ndarray::array![[1.0]].view())
            ),
            Err(ApogeeError::InvalidParameter(_))
        ));
        assert!(matches!(
            geometric::average_over_portfolio_and_time(
                empty.view(),
                HoldingWeights::BuyAndHold(held.view())
            ),
            Err(ApogeeError::EmptySeries)
        ));
    }

    #[test]
    fn test_annualization() {
        assert_relative_eq!(log::annualized_return(0.01, 1.0 / 12.0), 0.12, epsilon = 1e-12);
        assert_relative_eq!(
            log::annualized_volatility(0.02, 1.0 / 12.0),
            0.02 * 12.0_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_max_drawdown() {
        // 1.0 -> 1.2 -> 0.9 -> 1.0
        let returns = [0.2, -0.25, 1.0 / 9.0];
        assert_abs_diff_eq!(geometric::max_drawdown(&returns), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(geometric::max_drawdown(&[0.1, 0.2]), 0.0);
        assert_abs_diff_eq!(geometric::max_drawdown(&[]), 0.0);
    }

    #[test]
    fn test_series_keeps_both_representations() {
        let series = ReturnSeries::from_geometric(vec![d(2), d(3)], vec![0.1, -0.05]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.range(), Some((d(2), d(3))));
        assert_relative_eq!(series.log()[0], 1.1_f64.ln());
        assert_relative_eq!(series.total_return(), 1.1 * 0.95 - 1.0, epsilon = 1e-12);

        let (periods, geometric, log) = series.into_parts();
        assert_eq!(periods, vec![d(2), d(3)]);
        assert_eq!(geometric, vec![0.1, -0.05]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_series_rejects_bad_entries() {
        let mut series = ReturnSeries::new();
        series.push(d(2), 0.1).unwrap();
        assert!(series.push(d(2), 0.1).is_err());
        assert!(series.push(d(3), -1.0).is_err());
        assert!(series.push(d(3), f64::NAN).is_err());
        assert!(ReturnSeries::from_geometric(vec![d(1)], vec![]).is_err());
    }

    #[test]
    fn test_return_source_default() {
        let source = ReturnSource::default();
        assert_eq!(source.metric(), "return");
        assert_eq!(ReturnSource::prices("price").metric(), "price");
    }
}
