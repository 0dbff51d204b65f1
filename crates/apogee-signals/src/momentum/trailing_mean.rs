//! Trailing average of a metric.

use apogee_traits::{ApogeeError, Date, Indicator, MarketData, Result, metric};
use serde::{Deserialize, Serialize};

/// Configuration for the trailing mean indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailingMeanConfig {
    /// Metric to average (default: `book_to_price`)
    pub metric: String,

    /// Number of periods averaged, including the current one (default: 3)
    pub periods: usize,
}

impl Default for TrailingMeanConfig {
    fn default() -> Self {
        Self {
            metric: metric::BOOK_TO_PRICE.to_string(),
            periods: 3,
        }
    }
}

/// Arithmetic mean of a metric over the last `periods` periods.
///
/// Smooths noisy fundamentals; needs `periods - 1` warm-up periods.
#[derive(Debug, Clone)]
pub struct TrailingMean {
    config: TrailingMeanConfig,
    name: String,
}

impl TrailingMean {
    /// Create a trailing mean indicator.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::InvalidParameter`] for a zero-length window.
    pub fn new(config: TrailingMeanConfig) -> Result<Self> {
        if config.periods == 0 {
            return Err(ApogeeError::InvalidParameter(
                "trailing mean needs at least one period".to_string(),
            ));
        }
        let name = format!("trailing_mean_{}_{}", config.metric, config.periods);
        Ok(Self { config, name })
    }

    /// Averaging window length.
    #[must_use]
    pub const fn periods(&self) -> usize {
        self.config.periods
    }
}

impl Indicator for TrailingMean {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self, market: &MarketData, instrument: &str, period: Date) -> Result<f64> {
        let window = market.window(period, self.config.periods)?;
        let total = window.iter().try_fold(0.0, |acc, &p| {
            market
                .get(&self.config.metric, instrument, p)
                .map(|v| acc + v)
        })?;
        Ok(total / window.len() as f64)
    }

    fn warmup(&self) -> usize {
        self.config.periods - 1
    }

    fn required_metrics(&self) -> Vec<&str> {
        vec![self.config.metric.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture, period};
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_of_window() {
        let market = fixture();
        let indicator = TrailingMean::new(TrailingMeanConfig::default()).unwrap();
        assert_eq!(indicator.warmup(), 2);
        assert_eq!(indicator.name(), "trailing_mean_book_to_price_3");
        // A book-to-price at periods 2..=4: 0.8, 0.7, 0.6
        assert_relative_eq!(
            indicator.value(&market, "A", period(4)).unwrap(),
            0.7,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_single_period_is_raw_value() {
        let market = fixture();
        let indicator = TrailingMean::new(TrailingMeanConfig {
            periods: 1,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(indicator.warmup(), 0);
        assert_relative_eq!(indicator.value(&market, "C", period(1)).unwrap(), 0.3);
    }

    #[test]
    fn test_warmup_not_met() {
        let market = fixture();
        let indicator = TrailingMean::new(TrailingMeanConfig::default()).unwrap();
        assert!(indicator.value(&market, "A", period(2)).is_err());
    }
}
