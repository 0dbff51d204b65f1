//! Holdings for one formation period.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use apogee_traits::{ApogeeError, Date, MarketData, Result, Symbol};
use serde::Serialize;

use crate::returns::{ReturnSource, Side};

/// Tolerance on leg weight sums.
const WEIGHT_TOLERANCE: f64 = 1e-9;

/// One weighted holding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    /// Instrument held.
    pub symbol: Symbol,
    /// Signed weight: positive long, negative short.
    pub weight: f64,
}

/// Long and short positions formed at one period.
///
/// Long weights are positive and sum to +1, short weights are negative and
/// sum to −1, and no instrument is in both legs. Either leg may be empty,
/// but not both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    period: Date,
    long: Vec<Position>,
    short: Vec<Position>,
}

impl Portfolio {
    /// Equal weights within each leg: `+1/n` long, `−1/m` short.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::InvalidPortfolio`] for an empty portfolio, a
    /// duplicate instrument or an instrument in both legs.
    pub fn equal_weight(period: Date, long: Vec<Symbol>, short: Vec<Symbol>) -> Result<Self> {
        Self::with_weights(
            period,
            equal_leg(long, Side::Long),
            equal_leg(short, Side::Short),
        )
    }

    /// Explicit weights per leg.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::InvalidPortfolio`] when any invariant above is
    /// violated.
    pub fn with_weights(
        period: Date,
        long: Vec<(Symbol, f64)>,
        short: Vec<(Symbol, f64)>,
    ) -> Result<Self> {
        if long.is_empty() && short.is_empty() {
            return Err(ApogeeError::InvalidPortfolio(format!(
                "no positions at {period}"
            )));
        }
        let long = validate_leg(long, Side::Long)?;
        let short = validate_leg(short, Side::Short)?;
        let long_symbols: HashSet<&str> = long.iter().map(|p| p.symbol.as_str()).collect();
        if let Some(p) = short.iter().find(|p| long_symbols.contains(p.symbol.as_str())) {
            return Err(ApogeeError::InvalidPortfolio(format!(
                "{} is both long and short",
                p.symbol
            )));
        }
        Ok(Self {
            period,
            long,
            short,
        })
    }

    /// Formation period.
    pub const fn period(&self) -> Date {
        self.period
    }

    /// Long positions.
    pub fn long(&self) -> &[Position] {
        &self.long
    }

    /// Short positions.
    pub fn short(&self) -> &[Position] {
        &self.short
    }

    /// All positions, long leg first.
    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.long.iter().chain(&self.short)
    }

    /// Signed weight of `symbol`, zero when not held.
    pub fn weight_of(&self, symbol: &str) -> f64 {
        self.positions()
            .find(|p| p.symbol == symbol)
            .map_or(0.0, |p| p.weight)
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.long.len() + self.short.len()
    }

    /// Always false; an empty portfolio cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return of the holdings over `period → next period`, `Σ w r`.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::InsufficientHistory`] if the formation period
    /// is the last one, or whatever the return source fails with.
    pub fn realized_return(&self, market: &MarketData, source: &ReturnSource) -> Result<f64> {
        let next = market
            .next_period(self.period)
            .ok_or(ApogeeError::InsufficientHistory {
                required: 2,
                available: 1,
            })?;
        self.positions().try_fold(0.0, |acc, p| {
            source
                .instrument_return(market, &p.symbol, self.period, next)
                .map(|r| acc + p.weight * r)
        })
    }

    /// One-way turnover from `previous`, `Σ|Δw| / 2`.
    ///
    /// Without a previous portfolio the whole book is traded.
    pub fn turnover(&self, previous: Option<&Self>) -> f64 {
        weight_changes(previous, self)
            .values()
            .map(|dw| dw.abs())
            .sum::<f64>()
            / 2.0
    }

    /// Trades that turn `previous` into this portfolio, ordered by symbol.
    pub fn trades(&self, previous: Option<&Self>) -> Vec<Trade> {
        weight_changes(previous, self)
            .into_iter()
            .filter(|(_, dw)| dw.abs() > WEIGHT_TOLERANCE)
            .map(|(symbol, change)| Trade {
                symbol: symbol.to_string(),
                change,
            })
            .collect()
    }
}

/// A change of weight in one instrument between rebalances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    /// Instrument traded.
    pub symbol: Symbol,
    /// Weight change; positive is a buy.
    pub change: f64,
}

impl Trade {
    /// Whether the trade adds weight.
    pub fn is_buy(&self) -> bool {
        self.change > 0.0
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = if self.is_buy() { "buy" } else { "sell" };
        write!(f, "{action} {} {:+.4}", self.symbol, self.change)
    }
}

fn equal_leg(symbols: Vec<Symbol>, side: Side) -> Vec<(Symbol, f64)> {
    let weight = side.sign() / symbols.len().max(1) as f64;
    symbols.into_iter().map(|s| (s, weight)).collect()
}

fn validate_leg(leg: Vec<(Symbol, f64)>, side: Side) -> Result<Vec<Position>> {
    if leg.is_empty() {
        return Ok(Vec::new());
    }
    let mut seen = HashSet::with_capacity(leg.len());
    for (symbol, weight) in &leg {
        if !seen.insert(symbol.as_str()) {
            return Err(ApogeeError::InvalidPortfolio(format!(
                "{symbol} appears twice in the {side:?} leg"
            )));
        }
        if !weight.is_finite() || weight * side.sign() <= 0.0 {
            return Err(ApogeeError::InvalidPortfolio(format!(
                "{symbol} has weight {weight} in the {side:?} leg"
            )));
        }
    }
    let total: f64 = leg.iter().map(|(_, w)| w).sum();
    if (total - side.sign()).abs() > WEIGHT_TOLERANCE {
        return Err(ApogeeError::InvalidPortfolio(format!(
            "{side:?} weights sum to {total}, expected {}",
            side.sign()
        )));
    }
    Ok(leg
        .into_iter()
        .map(|(symbol, weight)| Position { symbol, weight })
        .collect())
}

fn weight_changes<'a>(previous: Option<&'a Portfolio>, next: &'a Portfolio) -> BTreeMap<&'a str, f64> {
    let mut changes = BTreeMap::new();
    for p in previous.into_iter().flat_map(Portfolio::positions) {
        *changes.entry(p.symbol.as_str()).or_insert(0.0) -= p.weight;
    }
    for p in next.positions() {
        *changes.entry(p.symbol.as_str()).or_insert(0.0) += p.weight;
    }
    changes
}
