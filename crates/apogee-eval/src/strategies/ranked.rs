//! Strategies that trade the ends of a signal ranking.

use apogee_traits::{ApogeeError, Date, MarketData, Result, Signal};
use serde::{Deserialize, Serialize};

use crate::portfolio::Portfolio;
use crate::strategy::Strategy;

/// Absorbs floating point error in `fraction * n` before flooring.
const SIZING_SLACK: f64 = 1e-9;

/// How many instruments go into each leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegSizing {
    /// `floor(fraction * n)` names, `fraction` in `(0, 0.5]`.
    Fraction(f64),
    /// Exactly this many names.
    Count(usize),
}

impl Default for LegSizing {
    fn default() -> Self {
        Self::Fraction(0.2)
    }
}

impl LegSizing {
    /// Checks the sizing parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::InvalidParameter`] for a fraction outside
    /// `(0, 0.5]` or a zero count.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Fraction(f) if !(f > 0.0 && f <= 0.5) => Err(ApogeeError::InvalidParameter(
                format!("selection fraction {f} is outside (0, 0.5]"),
            )),
            Self::Count(0) => Err(ApogeeError::InvalidParameter(
                "selection count must be positive".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Leg size for a universe of `available` instruments.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::InsufficientUniverse`] when the size is zero
    /// or larger than the universe.
    pub fn resolve(&self, period: Date, available: usize) -> Result<usize> {
        let size = match *self {
            Self::Fraction(f) => (f * available as f64 + SIZING_SLACK).floor() as usize,
            Self::Count(k) => k,
        };
        if size == 0 || size > available {
            return Err(ApogeeError::InsufficientUniverse {
                period,
                available,
                reason: format!("{self:?} selects {size} instruments per leg"),
            });
        }
        Ok(size)
    }
}

/// Which legs of the ranking are traded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Legs {
    /// Long the best-ranked names.
    Long,
    /// Short the worst-ranked names.
    Short,
    /// Long the best and short the worst, in equal size.
    LongShort,
}

/// Trades the top and/or bottom of a ranking, equally weighted.
///
/// At each period the whole universe is ranked; the long leg is the best
/// `k` instruments and the short leg the worst `k`, where `k` comes from
/// the [`LegSizing`]. A selection that cannot be filled fails with
/// [`ApogeeError::InsufficientUniverse`], it is never shrunk.
#[derive(Debug)]
pub struct RankedStrategy<S> {
    name: String,
    signal: S,
    legs: Legs,
    sizing: LegSizing,
}

impl<S: Signal> RankedStrategy<S> {
    /// Create a ranked strategy.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::InvalidParameter`] for an invalid sizing.
    pub fn new(name: impl Into<String>, signal: S, legs: Legs, sizing: LegSizing) -> Result<Self> {
        sizing.validate()?;
        Ok(Self {
            name: name.into(),
            signal,
            legs,
            sizing,
        })
    }

    /// The ranking signal.
    pub const fn signal(&self) -> &S {
        &self.signal
    }

    /// Traded legs.
    pub const fn legs(&self) -> Legs {
        self.legs
    }

    /// Leg sizing rule.
    pub const fn sizing(&self) -> LegSizing {
        self.sizing
    }
}

impl<S: Signal> Strategy for RankedStrategy<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.signal.warmup()
    }

    fn required_metrics(&self) -> Vec<&str> {
        self.signal.required_metrics()
    }

    fn select(&self, market: &MarketData, period: Date) -> Result<Portfolio> {
        let universe = market.instruments(period)?;
        let ranking = self.signal.score(market, period, &universe)?;
        let size = self.sizing.resolve(period, ranking.len())?;
        let (long, short) = match self.legs {
            Legs::Long => (ranking.top(size), Vec::new()),
            Legs::Short => (Vec::new(), ranking.bottom(size)),
            Legs::LongShort => ranking.split(size).ok_or_else(|| {
                ApogeeError::InsufficientUniverse {
                    period,
                    available: ranking.len(),
                    reason: format!("long and short legs of {size} would overlap"),
                }
            })?,
        };
        Portfolio::equal_weight(period, long, short)
    }
}
