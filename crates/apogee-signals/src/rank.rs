//! Single-indicator ranking signal.

use apogee_traits::{Date, Indicator, MarketData, Ranking, Result, Signal, Symbol};
use serde::{Deserialize, Serialize};

/// Which end of an indicator is attractive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    /// Highest indicator value ranks first.
    #[default]
    HigherIsBetter,
    /// Lowest indicator value ranks first.
    LowerIsBetter,
}

impl Order {
    const fn orient(self, value: f64) -> f64 {
        match self {
            Self::HigherIsBetter => value,
            Self::LowerIsBetter => -value,
        }
    }

    const fn prefix(self) -> &'static str {
        match self {
            Self::HigherIsBetter => "best",
            Self::LowerIsBetter => "worst",
        }
    }
}

/// Ranks a universe by one indicator.
///
/// Ranking scores are oriented so that the best instrument has the highest
/// score: with [`Order::LowerIsBetter`] the indicator value is negated.
///
/// # Example
///
/// ```ignore
/// use apogee_signals::{RankSignal, value::BookToPrice};
///
/// // cheapest stocks first
/// let signal = RankSignal::best(BookToPrice::default());
/// let ranking = signal.score(&market, period, &universe)?;
/// let longs = ranking.top(10);
/// ```
#[derive(Debug, Clone)]
pub struct RankSignal<I> {
    indicator: I,
    order: Order,
    name: String,
}

impl<I: Indicator> RankSignal<I> {
    /// Ranks by `indicator` in the given order.
    pub fn new(indicator: I, order: Order) -> Self {
        let name = format!("{}_{}", order.prefix(), indicator.name());
        Self {
            indicator,
            order,
            name,
        }
    }

    /// Highest indicator value first.
    pub fn best(indicator: I) -> Self {
        Self::new(indicator, Order::HigherIsBetter)
    }

    /// Lowest indicator value first.
    pub fn worst(indicator: I) -> Self {
        Self::new(indicator, Order::LowerIsBetter)
    }

    /// The ranking direction.
    pub const fn order(&self) -> Order {
        self.order
    }

    /// The underlying indicator.
    pub const fn indicator(&self) -> &I {
        &self.indicator
    }
}

impl<I: Indicator> Signal for RankSignal<I> {
    fn name(&self) -> &str {
        &self.name
    }

    fn score(&self, market: &MarketData, period: Date, universe: &[Symbol]) -> Result<Ranking> {
        let scores = universe
            .iter()
            .map(|symbol| {
                self.indicator
                    .value(market, symbol, period)
                    .map(|value| (symbol.clone(), self.order.orient(value)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ranking::from_scores(scores)
    }

    fn warmup(&self) -> usize {
        self.indicator.warmup()
    }

    fn required_metrics(&self) -> Vec<&str> {
        let mut metrics = self.indicator.required_metrics();
        metrics.sort_unstable();
        metrics.dedup();
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture, period};
    use crate::value::BookToPrice;
    use apogee_traits::ApogeeError;

    fn universe() -> Vec<Symbol> {
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    }

    #[test]
    fn test_best_ranks_highest_first() {
        let market = fixture();
        let signal = RankSignal::best(BookToPrice::default());
        assert_eq!(signal.name(), "best_book_to_price");
        let ranking = signal.score(&market, period(1), &universe()).unwrap();
        assert_eq!(ranking.symbols(), vec!["A", "B", "C"]);
        assert_eq!(ranking.score_of("A"), Some(0.9));
    }

    #[test]
    fn test_worst_ranks_lowest_first() {
        let market = fixture();
        let signal = RankSignal::worst(BookToPrice::default());
        assert_eq!(signal.order(), Order::LowerIsBetter);
        let ranking = signal.score(&market, period(1), &universe()).unwrap();
        assert_eq!(ranking.symbols(), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_ties_break_by_symbol() {
        let market = fixture();
        // B and C have the same market cap
        let signal = RankSignal::best(crate::MetricIndicator::new("market_cap"));
        let ranking = signal.score(&market, period(2), &universe()).unwrap();
        assert_eq!(ranking.symbols(), vec!["B", "C", "A"]);

        let signal = RankSignal::worst(crate::MetricIndicator::new("market_cap"));
        let ranking = signal.score(&market, period(2), &universe()).unwrap();
        assert_eq!(ranking.symbols(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_missing_instrument_fails_whole_ranking() {
        let market = fixture();
        let signal = RankSignal::best(BookToPrice::default());
        let mut universe = universe();
        universe.push("Z".to_string());
        assert!(matches!(
            signal.score(&market, period(1), &universe),
            Err(ApogeeError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn test_warmup_follows_indicator() {
        let indicator = crate::momentum::Momentum::new(Default::default()).unwrap();
        assert_eq!(RankSignal::best(indicator).warmup(), 12);
        assert_eq!(RankSignal::best(BookToPrice::default()).warmup(), 0);
    }
}
