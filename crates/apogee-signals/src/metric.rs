//! Raw metric indicator.

use apogee_traits::{Date, Indicator, MarketData, Result};

/// Reads one metric of the market data as-is.
///
/// Useful for datasets that already carry a precomputed score column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricIndicator {
    metric: String,
}

impl MetricIndicator {
    /// Create an indicator reading `metric`.
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
        }
    }
}

impl Indicator for MetricIndicator {
    fn name(&self) -> &str {
        &self.metric
    }

    fn value(&self, market: &MarketData, instrument: &str, period: Date) -> Result<f64> {
        market.get(&self.metric, instrument, period)
    }

    fn required_metrics(&self) -> Vec<&str> {
        vec![self.metric.as_str()]
    }
}
