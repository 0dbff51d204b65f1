//! Market benchmark strategy.

use apogee_traits::{Date, MarketData, Result};

use crate::portfolio::Portfolio;
use crate::strategy::Strategy;

/// Holds every instrument of the universe with equal weight.
///
/// The benchmark the ranked strategies are compared against.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketStrategy;

impl MarketStrategy {
    /// Create the market strategy.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Strategy for MarketStrategy {
    fn name(&self) -> &str {
        "market"
    }

    fn select(&self, market: &MarketData, period: Date) -> Result<Portfolio> {
        Portfolio::equal_weight(period, market.instruments(period)?, Vec::new())
    }
}
