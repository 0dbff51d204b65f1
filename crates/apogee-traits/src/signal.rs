//! Signal trait for ranking instruments.
//!
//! A signal scores every instrument of a universe at one period and orders
//! them from most to least attractive. Strategies pick their long and short
//! legs from the two ends of that [`Ranking`].

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::{ApogeeError, Date, MarketData, Result, Symbol};

/// A ranking function over instruments at a period.
///
/// Implementations should be thread-safe (`Send + Sync`) so independent
/// strategy runs can share a signal across workers.
pub trait Signal: Send + Sync {
    /// Returns the name of this signal.
    fn name(&self) -> &str;

    /// Scores and ranks every instrument in `universe` at `period`.
    ///
    /// # Errors
    ///
    /// Fails on the first instrument whose score cannot be computed; no
    /// instrument is silently dropped from the ranking.
    fn score(&self, market: &MarketData, period: Date, universe: &[Symbol]) -> Result<Ranking>;

    /// Number of leading periods needed before the first score.
    ///
    /// For a signal built from several indicators this is the maximum of
    /// their warm-ups.
    fn warmup(&self) -> usize;

    /// Metric names read by the signal's indicators, sorted and without
    /// duplicates.
    fn required_metrics(&self) -> Vec<&str>;
}

impl<S: Signal + ?Sized> Signal for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn score(&self, market: &MarketData, period: Date, universe: &[Symbol]) -> Result<Ranking> {
        (**self).score(market, period, universe)
    }

    fn warmup(&self) -> usize {
        (**self).warmup()
    }

    fn required_metrics(&self) -> Vec<&str> {
        (**self).required_metrics()
    }
}

/// Instruments ordered best first.
///
/// Order is descending score; equal scores are ordered by symbol ascending,
/// so a ranking is fully determined by its scores.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    entries: Vec<(Symbol, f64)>,
}

impl Ranking {
    /// Sorts raw scores into a ranking.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::InvalidData`] for a non-finite score or a
    /// symbol that appears twice.
    pub fn from_scores(mut entries: Vec<(Symbol, f64)>) -> Result<Self> {
        if let Some((symbol, score)) = entries.iter().find(|(_, s)| !s.is_finite()) {
            return Err(ApogeeError::InvalidData(format!(
                "non-finite score {score} for {symbol}"
            )));
        }
        {
            let mut seen = HashSet::with_capacity(entries.len());
            if let Some((symbol, _)) = entries.iter().find(|(s, _)| !seen.insert(s.as_str())) {
                return Err(ApogeeError::InvalidData(format!("{symbol} ranked twice")));
            }
        }
        entries.sort_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });
        Ok(Self { entries })
    }

    /// The `n` best instruments, best first.
    pub fn top(&self, n: usize) -> Vec<Symbol> {
        self.entries
            .iter()
            .take(n)
            .map(|(symbol, _)| symbol.clone())
            .collect()
    }

    /// The `n` worst instruments, worst first.
    ///
    /// Equal scores are ordered by symbol ascending here as well, so a tie
    /// group cut by `n` contributes its smallest symbols.
    pub fn bottom(&self, n: usize) -> Vec<Symbol> {
        worst_first(&self.entries, n)
    }

    /// The best `n` instruments and the worst `n` of those left over.
    ///
    /// A tie group straddling both cutoffs gives its smallest symbols to the
    /// first leg and the smallest remaining ones to the second, so the two
    /// never overlap. `None` when `2n` exceeds the ranking.
    pub fn split(&self, n: usize) -> Option<(Vec<Symbol>, Vec<Symbol>)> {
        if 2 * n > self.entries.len() {
            return None;
        }
        Some((self.top(n), worst_first(&self.entries[n..], n)))
    }

    /// All symbols, best first.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.top(self.entries.len())
    }

    /// Score of one instrument.
    pub fn score_of(&self, symbol: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, score)| *score)
    }

    /// `(symbol, score)` pairs, best first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(s, score)| (s.as_str(), *score))
    }

    /// Number of ranked instruments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was ranked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn worst_first(entries: &[(Symbol, f64)], n: usize) -> Vec<Symbol> {
    let mut worst: Vec<&(Symbol, f64)> = entries.iter().collect();
    worst.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    worst
        .into_iter()
        .take(n)
        .map(|(symbol, _)| symbol.clone())
        .collect()
}
