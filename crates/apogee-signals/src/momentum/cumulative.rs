//! Momentum indicator: compounded trailing return, optionally skipping the latest periods.

use apogee_traits::{ApogeeError, Date, Indicator, MarketData, Result, metric};
use serde::{Deserialize, Serialize};

/// Configuration for the momentum indicator.
///
/// Periods are the market's native periods (months for the case-study
/// dataset), not trading days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Metric holding per-period simple returns (default: `return`)
    pub metric: String,

    /// Number of returns compounded (default: 12)
    pub window: usize,

    /// Most recent periods left out to avoid short-term reversal (default: 1)
    pub skip: usize,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            metric: metric::RETURN.to_string(),
            window: 12,
            skip: 1,
        }
    }
}

/// Momentum indicator.
///
/// At period `t` compounds the returns of periods
/// `t - skip - window + 1 ..= t - skip` into `∏(1 + r) - 1`.
/// The first value is available after `window + skip - 1` warm-up periods.
///
/// # Example
///
/// ```ignore
/// use apogee_signals::momentum::{Momentum, MomentumConfig};
///
/// // 12-1 momentum on monthly data
/// let momentum = Momentum::new(MomentumConfig::default())?;
/// let score = momentum.value(&market, "101", period)?;
/// ```
#[derive(Debug, Clone)]
pub struct Momentum {
    config: MomentumConfig,
    name: String,
}

impl Momentum {
    /// Create a momentum indicator.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::InvalidParameter`] for a zero window.
    pub fn new(config: MomentumConfig) -> Result<Self> {
        if config.window == 0 {
            return Err(ApogeeError::InvalidParameter(
                "momentum window must be at least one period".to_string(),
            ));
        }
        let name = format!("momentum_{}_{}", config.window, config.skip);
        Ok(Self { config, name })
    }

    /// Number of compounded returns.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.config.window
    }

    /// Number of skipped recent periods.
    #[must_use]
    pub const fn skip(&self) -> usize {
        self.config.skip
    }
}

impl Indicator for Momentum {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self, market: &MarketData, instrument: &str, period: Date) -> Result<f64> {
        let periods = market.window(period, self.config.window + self.config.skip)?;
        let growth = periods[..self.config.window]
            .iter()
            .try_fold(1.0, |acc, &p| {
                market
                    .get(&self.config.metric, instrument, p)
                    .map(|r| acc * (1.0 + r))
            })?;
        Ok(growth - 1.0)
    }

    fn warmup(&self) -> usize {
        self.config.window + self.config.skip - 1
    }

    fn required_metrics(&self) -> Vec<&str> {
        vec![self.config.metric.as_str()]
    }
}
