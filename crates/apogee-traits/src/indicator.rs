//! Indicator trait for per-instrument metrics.
//!
//! An indicator maps market data, an instrument and a period to a single
//! scalar, such as a book-to-price ratio or a trailing average of returns.
//! Indicators read nothing after the period they are asked about.

use crate::{Date, MarketData, Result};

/// A pure, period-local metric of one instrument.
///
/// # Example
///
/// ```no_run
/// use apogee_traits::{Date, Indicator, MarketData, Result};
///
/// struct Leverage;
///
/// impl Indicator for Leverage {
///     fn name(&self) -> &str {
///         "leverage"
///     }
///
///     fn value(&self, market: &MarketData, instrument: &str, period: Date) -> Result<f64> {
///         let assets = market.get("total_assets", instrument, period)?;
///         let equity = market.get("book_value", instrument, period)?;
///         Ok(assets / equity)
///     }
///
///     fn required_metrics(&self) -> Vec<&str> {
///         vec!["total_assets", "book_value"]
///     }
/// }
/// ```
pub trait Indicator: Send + Sync {
    /// Returns the name of this indicator.
    fn name(&self) -> &str;

    /// Computes the indicator for `instrument` at `period`.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::DataUnavailable`](crate::ApogeeError::DataUnavailable)
    /// if any cell the indicator reads is absent.
    fn value(&self, market: &MarketData, instrument: &str, period: Date) -> Result<f64>;

    /// Number of periods before the current one that the indicator reads.
    ///
    /// A trailing average over `k` periods needs `k - 1` warm-up periods.
    fn warmup(&self) -> usize {
        0
    }

    /// Metric names read by this indicator.
    fn required_metrics(&self) -> Vec<&str>;
}

impl<I: Indicator + ?Sized> Indicator for Box<I> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn value(&self, market: &MarketData, instrument: &str, period: Date) -> Result<f64> {
        (**self).value(market, instrument, period)
    }

    fn warmup(&self) -> usize {
        (**self).warmup()
    }

    fn required_metrics(&self) -> Vec<&str> {
        (**self).required_metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    struct Doubled;

    impl Indicator for Doubled {
        fn name(&self) -> &str {
            "doubled"
        }

        fn value(&self, market: &MarketData, instrument: &str, period: Date) -> Result<f64> {
            Ok(2.0 * market.get("x", instrument, period)?)
        }

        fn required_metrics(&self) -> Vec<&str> {
            vec!["x"]
        }
    }

    #[test]
    fn test_boxed_indicator_delegates() {
        let market = MarketData::try_from(
            df! { "symbol" => &["A"], "date" => &["2020-01-01"], "x" => &[1.5] }.unwrap(),
        )
        .unwrap();
        let period = Date::from_ymd_opt(2020, 1, 1).unwrap();
        let boxed: Box<dyn Indicator> = Box::new(Doubled);

        assert_eq!(boxed.name(), "doubled");
        assert_eq!(boxed.warmup(), 0);
        assert_eq!(boxed.value(&market, "A", period).unwrap(), 3.0);
        assert!(boxed.value(&market, "B", period).is_err());
    }
}
