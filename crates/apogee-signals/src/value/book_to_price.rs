//! Book-to-price value indicator.

use apogee_traits::{ApogeeError, Date, Indicator, MarketData, Result, metric};
use serde::{Deserialize, Serialize};

/// Where the book-to-price ratio comes from.
///
/// Datasets either ship the ratio itself or its two components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BookToPriceConfig {
    /// Read a precomputed ratio (default: `book_to_price`).
    Direct {
        /// Metric holding the ratio.
        metric: String,
    },
    /// Divide book value of equity by market capitalisation.
    FromComponents {
        /// Metric holding book value (default: `book_value`).
        book: String,
        /// Metric holding market value (default: `market_cap`).
        price: String,
    },
}

impl BookToPriceConfig {
    /// Ratio computed from `book_value / market_cap`.
    pub fn from_components() -> Self {
        Self::FromComponents {
            book: metric::BOOK_VALUE.to_string(),
            price: metric::MARKET_CAP.to_string(),
        }
    }
}

impl Default for BookToPriceConfig {
    fn default() -> Self {
        Self::Direct {
            metric: metric::BOOK_TO_PRICE.to_string(),
        }
    }
}

/// Book-to-price ratio of an instrument at a period.
///
/// Higher values indicate stocks trading cheaply relative to book value.
/// The indicator is point-in-time and needs no warm-up.
///
/// # Example
///
/// ```ignore
/// use apogee_signals::value::BookToPrice;
///
/// let bp = BookToPrice::default();
/// let ratio = bp.value(&market, "101", period)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct BookToPrice {
    config: BookToPriceConfig,
}

impl BookToPrice {
    /// Create a new book-to-price indicator with the given configuration.
    #[must_use]
    pub const fn new(config: BookToPriceConfig) -> Self {
        Self { config }
    }

    /// The configured ratio source.
    #[must_use]
    pub const fn config(&self) -> &BookToPriceConfig {
        &self.config
    }
}

impl Indicator for BookToPrice {
    fn name(&self) -> &str {
        match self.config {
            BookToPriceConfig::Direct { .. } => "book_to_price",
            BookToPriceConfig::FromComponents { .. } => "book_to_market",
        }
    }

    fn value(&self, market: &MarketData, instrument: &str, period: Date) -> Result<f64> {
        match &self.config {
            BookToPriceConfig::Direct { metric } => market.get(metric, instrument, period),
            BookToPriceConfig::FromComponents { book, price } => {
                let book_value = market.get(book, instrument, period)?;
                let market_value = market.get(price, instrument, period)?;
                if market_value <= 0.0 {
                    return Err(ApogeeError::InvalidData(format!(
                        "{price} of {instrument} at {period} is {market_value}, expected a positive value"
                    )));
                }
                Ok(book_value / market_value)
            }
        }
    }

    fn required_metrics(&self) -> Vec<&str> {
        match &self.config {
            BookToPriceConfig::Direct { metric } => vec![metric.as_str()],
            BookToPriceConfig::FromComponents { book, price } => {
                vec![book.as_str(), price.as_str()]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture, period};
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config() {
        let bp = BookToPrice::default();
        assert_eq!(
            bp.config(),
            &BookToPriceConfig::Direct {
                metric: "book_to_price".to_string()
            }
        );
        assert_eq!(bp.required_metrics(), vec!["book_to_price"]);
        assert_eq!(bp.warmup(), 0);
    }

    #[test]
    fn test_direct_ratio() {
        let market = fixture();
        let bp = BookToPrice::default();
        assert_relative_eq!(bp.value(&market, "A", period(1)).unwrap(), 0.9);
        assert_relative_eq!(bp.value(&market, "C", period(2)).unwrap(), 0.2);
    }

    #[test]
    fn test_ratio_from_components() {
        let market = fixture();
        let bp = BookToPrice::new(BookToPriceConfig::from_components());
        assert_eq!(bp.required_metrics(), vec!["book_value", "market_cap"]);
        assert_eq!(bp.name(), "book_to_market");
        // 45 / 50
        assert_relative_eq!(bp.value(&market, "A", period(1)).unwrap(), 0.9);
    }

    #[test]
    fn test_missing_ratio_is_unavailable() {
        let market = fixture();
        let bp = BookToPrice::default();
        assert!(matches!(
            bp.value(&market, "A", period(9)),
            Err(ApogeeError::DataUnavailable { .. })
        ));
    }
}
