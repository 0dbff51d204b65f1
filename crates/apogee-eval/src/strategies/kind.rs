//! Named strategy set used by the command line.

use std::fmt;
use std::str::FromStr;

use apogee_signals::registry::{DEFAULT_SIGNAL, build_signal};
use apogee_traits::{ApogeeError, Result};
use serde::{Deserialize, Serialize};

use super::{LegSizing, Legs, MarketStrategy, RankedStrategy};
use crate::strategy::Strategy;

/// The built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Equal-weight long the whole universe.
    Market,
    /// Long the highest book-to-price names.
    BestBp,
    /// Short the lowest book-to-price names.
    WorstBp,
    /// Long the highest and short the lowest book-to-price names.
    LongShortBp,
}

impl StrategyKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 4] = [Self::Market, Self::BestBp, Self::WorstBp, Self::LongShortBp];

    /// Canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::BestBp => "best_bp",
            Self::WorstBp => "worst_bp",
            Self::LongShortBp => "long_short_bp",
        }
    }

    /// One-line description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Market => "Equal-weight long position in every instrument",
            Self::BestBp => "Long the top selection ranked by book-to-price",
            Self::WorstBp => "Short the bottom selection ranked by book-to-price",
            Self::LongShortBp => "Long the top and short the bottom selection by book-to-price",
        }
    }

    const fn legs(self) -> Option<Legs> {
        match self {
            Self::Market => None,
            Self::BestBp => Some(Legs::Long),
            Self::WorstBp => Some(Legs::Short),
            Self::LongShortBp => Some(Legs::LongShort),
        }
    }

    /// Builds the strategy with the book-to-price ranking.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::InvalidParameter`] for an invalid sizing.
    pub fn build(self, sizing: LegSizing) -> Result<Box<dyn Strategy>> {
        self.build_with_signal(sizing, DEFAULT_SIGNAL)
    }

    /// Builds the strategy with a registered signal in place of book-to-price.
    ///
    /// The market strategy ignores the signal.
    ///
    /// # Errors
    ///
    /// Fails for an invalid sizing or an unknown signal name.
    pub fn build_with_signal(self, sizing: LegSizing, signal: &str) -> Result<Box<dyn Strategy>> {
        let Some(legs) = self.legs() else {
            return Ok(Box::new(MarketStrategy::new()));
        };
        let name = if signal == DEFAULT_SIGNAL {
            self.name().to_string()
        } else {
            format!("{}[{signal}]", self.name())
        };
        Ok(Box::new(RankedStrategy::new(
            name,
            build_signal(signal)?,
            legs,
            sizing,
        )?))
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = ApogeeError;

    /// Accepts the canonical names, kebab-case, and the class-style names
    /// `MarketStrategy`, `BestBPStrategy`, `WorstBPStrategy` and
    /// `LongShortBPStrategy`, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let key = key.strip_suffix("strategy").unwrap_or(&key);
        match key {
            "market" => Ok(Self::Market),
            "bestbp" => Ok(Self::BestBp),
            "worstbp" => Ok(Self::WorstBp),
            "longshortbp" => Ok(Self::LongShortBp),
            _ => Err(ApogeeError::StrategyNotFound(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Evaluator;
    use crate::testing::fixture;

    #[test]
    fn test_parse_names() {
        assert_eq!("market".parse::<StrategyKind>().unwrap(), StrategyKind::Market);
        assert_eq!("MarketStrategy".parse::<StrategyKind>().unwrap(), StrategyKind::Market);
        assert_eq!("BestBPStrategy".parse::<StrategyKind>().unwrap(), StrategyKind::BestBp);
        assert_eq!("worst-bp".parse::<StrategyKind>().unwrap(), StrategyKind::WorstBp);
        assert_eq!(
            "LongShortBPStrategy".parse::<StrategyKind>().unwrap(),
            StrategyKind::LongShortBp
        );
        assert!(matches!(
            "momentum".parse::<StrategyKind>(),
            Err(ApogeeError::StrategyNotFound(_))
        ));
    }

    #[test]
    fn test_names_round_trip() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
            assert!(!kind.description().is_empty());
        }
    }

    #[test]
    fn test_build_all() {
        let market = fixture();
        let evaluator = Evaluator::new(&market);
        let strategies = StrategyKind::ALL
            .iter()
            .map(|kind| kind.build(LegSizing::Count(1)).unwrap())
            .collect::<Vec<_>>();
        let names: Vec<_> = strategies.iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["market", "best_bp", "worst_bp", "long_short_bp"]);
        for run in evaluator.eval_many(&strategies) {
            assert_eq!(run.unwrap().series.len(), 3);
        }
    }

    #[test]
    fn test_build_with_other_signal() {
        let strategy = StrategyKind::BestBp
            .build_with_signal(LegSizing::Count(1), "best_momentum_12_1")
            .unwrap();
        assert_eq!(strategy.name(), "best_bp[best_momentum_12_1]");
        assert_eq!(strategy.warmup(), 12);
        assert!(
            StrategyKind::BestBp
                .build_with_signal(LegSizing::Count(1), "nope")
                .is_err()
        );
        assert!(StrategyKind::BestBp.build(LegSizing::Count(0)).is_err());
    }
}
