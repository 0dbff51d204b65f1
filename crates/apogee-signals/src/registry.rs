//! Signal registry for discovering and building the built-in signals.
//!
//! The CLI lists these and builds ranked strategies from them by name.

use apogee_traits::{ApogeeError, Result, Signal};
use serde::{Deserialize, Serialize};

use crate::composite::CompositeSignal;
use crate::momentum::{Momentum, MomentumConfig, TrailingMean, TrailingMeanConfig};
use crate::rank::RankSignal;
use crate::value::BookToPrice;

/// Signal category classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignalCategory {
    /// Valuation signals
    Value,
    /// Price momentum signals
    Momentum,
    /// Blends of several indicators
    Composite,
}

impl SignalCategory {
    /// Get a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &str {
        match self {
            Self::Value => "Valuation metrics comparing fundamentals to price",
            Self::Momentum => "Price momentum and trend-following signals",
            Self::Composite => "Weighted blends of standardized indicators",
        }
    }
}

/// Metadata about a signal.
#[derive(Debug, Clone, Serialize)]
pub struct SignalInfo {
    /// Unique identifier for the signal
    pub name: &'static str,

    /// Category classification
    pub category: SignalCategory,

    /// Human-readable description
    pub description: &'static str,

    /// Leading periods consumed before the first score
    pub warmup: usize,

    /// Metrics the signal reads
    pub metrics: &'static [&'static str],
}

/// Name of the signal the book-to-price strategies rank by.
pub const DEFAULT_SIGNAL: &str = "best_book_to_price";

/// Get information about all available signals.
#[must_use]
pub fn available_signals() -> Vec<SignalInfo> {
    vec![
        SignalInfo {
            name: "best_book_to_price",
            category: SignalCategory::Value,
            description: "Highest book-to-price ratio first",
            warmup: 0,
            metrics: &["book_to_price"],
        },
        SignalInfo {
            name: "worst_book_to_price",
            category: SignalCategory::Value,
            description: "Lowest book-to-price ratio first",
            warmup: 0,
            metrics: &["book_to_price"],
        },
        SignalInfo {
            name: "best_book_to_market",
            category: SignalCategory::Value,
            description: "Book value over market capitalisation, highest first",
            warmup: 0,
            metrics: &["book_value", "market_cap"],
        },
        SignalInfo {
            name: "best_trailing_mean_book_to_price_3",
            category: SignalCategory::Value,
            description: "Three-period average book-to-price ratio, highest first",
            warmup: 2,
            metrics: &["book_to_price"],
        },
        SignalInfo {
            name: "best_momentum_12_1",
            category: SignalCategory::Momentum,
            description: "12-period compounded return skipping the latest period",
            warmup: 12,
            metrics: &["return"],
        },
        SignalInfo {
            name: "value_momentum",
            category: SignalCategory::Composite,
            description: "Equal blend of book-to-price and 12-1 momentum z-scores",
            warmup: 12,
            metrics: &["book_to_price", "return"],
        },
    ]
}

/// Get all signals in a specific category.
#[must_use]
pub fn signals_by_category(category: &SignalCategory) -> Vec<SignalInfo> {
    available_signals()
        .into_iter()
        .filter(|info| &info.category == category)
        .collect()
}

/// Get information about a specific signal by name.
#[must_use]
pub fn get_signal_info(name: &str) -> Option<SignalInfo> {
    available_signals()
        .into_iter()
        .find(|info| info.name == name)
}

/// Build a registered signal by name.
///
/// # Errors
///
/// Returns [`ApogeeError::InvalidParameter`] for a name that is not
/// registered.
pub fn build_signal(name: &str) -> Result<Box<dyn Signal>> {
    let signal: Box<dyn Signal> = match name {
        "best_book_to_price" => Box::new(RankSignal::best(BookToPrice::default())),
        "worst_book_to_price" => Box::new(RankSignal::worst(BookToPrice::default())),
        "best_book_to_market" => Box::new(RankSignal::best(BookToPrice::new(
            crate::value::BookToPriceConfig::from_components(),
        ))),
        "best_trailing_mean_book_to_price_3" => Box::new(RankSignal::best(TrailingMean::new(
            TrailingMeanConfig::default(),
        )?)),
        "best_momentum_12_1" => Box::new(RankSignal::best(Momentum::new(
            MomentumConfig::default(),
        )?)),
        "value_momentum" => Box::new(
            CompositeSignal::builder("value_momentum")
                .with(BookToPrice::default(), 0.5)
                .with(Momentum::new(MomentumConfig::default())?, 0.5)
                .build()?,
        ),
        other => {
            return Err(ApogeeError::InvalidParameter(format!(
                "unknown signal '{other}'"
            )));
        }
    };
    Ok(signal)
}

/// Get all signal categories with signals.
#[must_use]
pub fn available_categories() -> Vec<SignalCategory> {
    let mut categories: Vec<_> = available_signals()
        .into_iter()
        .map(|info| info.category)
        .collect();
    categories.sort();
    categories.dedup();
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_signals() {
        let signals = available_signals();
        assert!(!signals.is_empty());
        assert!(get_signal_info(DEFAULT_SIGNAL).is_some());
    }

    #[test]
    fn test_signals_by_category() {
        assert_eq!(signals_by_category(&SignalCategory::Value).len(), 4);
        assert_eq!(signals_by_category(&SignalCategory::Momentum).len(), 1);
        assert_eq!(signals_by_category(&SignalCategory::Composite).len(), 1);
    }

    #[test]
    fn test_registry_matches_built_signals() {
        for info in available_signals() {
            let signal = build_signal(info.name).unwrap();
            assert_eq!(signal.name(), info.name);
            assert_eq!(signal.warmup(), info.warmup, "{}", info.name);
            assert_eq!(signal.required_metrics(), info.metrics, "{}", info.name);
        }
    }

    #[test]
    fn test_unknown_signal() {
        assert!(get_signal_info("nonexistent_signal").is_none());
        assert!(matches!(
            build_signal("nonexistent_signal"),
            Err(ApogeeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_available_categories() {
        assert_eq!(
            available_categories(),
            vec![
                SignalCategory::Value,
                SignalCategory::Momentum,
                SignalCategory::Composite
            ]
        );
        assert!(!SignalCategory::Composite.description().is_empty());
    }
}
