//! Tail risk of a finished return series.
//!
//! Both metrics are reported as returns: a loss is negative. The quantile
//! is the nearest-rank order statistic, without interpolation.

use apogee_traits::{ApogeeError, Result};

/// Confidence level used when none is given.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Slack subtracted before rounding the tail rank up.
const RANK_SLACK: f64 = 1e-9;

/// A scalar risk statistic of a return series.
pub trait RiskMetric {
    /// Short identifier.
    fn name(&self) -> &str;

    /// Evaluates the metric at `confidence`.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::EmptySeries`] for no observations,
    /// [`ApogeeError::InvalidParameter`] for a confidence outside `(0, 1)`
    /// and [`ApogeeError::InvalidData`] for a non-finite observation.
    fn eval(&self, returns: &[f64], confidence: f64) -> Result<f64>;

    /// Evaluates the metric at [`DEFAULT_CONFIDENCE`].
    ///
    /// # Errors
    ///
    /// See [`eval`](Self::eval).
    fn eval_default(&self, returns: &[f64]) -> Result<f64> {
        self.eval(returns, DEFAULT_CONFIDENCE)
    }
}

/// Value at Risk: the `(1 - confidence)` quantile of the returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct VaR;

/// Conditional Value at Risk: mean of the returns at or below VaR.
#[derive(Debug, Clone, Copy, Default)]
pub struct CVaR;

impl RiskMetric for VaR {
    fn name(&self) -> &str {
        "var"
    }

    fn eval(&self, returns: &[f64], confidence: f64) -> Result<f64> {
        let sorted = sorted_returns(returns, confidence)?;
        Ok(sorted[tail_rank(sorted.len(), confidence) - 1])
    }
}

impl RiskMetric for CVaR {
    fn name(&self) -> &str {
        "cvar"
    }

    fn eval(&self, returns: &[f64], confidence: f64) -> Result<f64> {
        let sorted = sorted_returns(returns, confidence)?;
        let var = sorted[tail_rank(sorted.len(), confidence) - 1];
        let tail: Vec<f64> = sorted.into_iter().take_while(|r| *r <= var).collect();
        Ok(tail.iter().sum::<f64>() / tail.len() as f64)
    }
}

/// 1-based rank `ceil((1 - confidence) n)`, clamped to `[1, n]`.
fn tail_rank(n: usize, confidence: f64) -> usize {
    let rank = ((1.0 - confidence) * n as f64 - RANK_SLACK).ceil();
    (rank.max(1.0) as usize).min(n)
}

fn sorted_returns(returns: &[f64], confidence: f64) -> Result<Vec<f64>> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(ApogeeError::InvalidParameter(format!(
            "confidence {confidence} is outside (0, 1)"
        )));
    }
    if returns.is_empty() {
        return Err(ApogeeError::EmptySeries);
    }
    if let Some(r) = returns.iter().find(|r| !r.is_finite()) {
        return Err(ApogeeError::InvalidData(format!("non-finite return {r}")));
    }
    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}
