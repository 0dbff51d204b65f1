//! Multi-indicator composite signal.

use std::fmt;

use apogee_traits::stats::standardize;
use apogee_traits::{
    ApogeeError, Date, Indicator, MarketData, Ranking, Result, Signal, Symbol,
};

/// One weighted input of a [`CompositeSignal`].
struct Component {
    indicator: Box<dyn Indicator>,
    weight: f64,
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("indicator", &self.indicator.name())
            .field("weight", &self.weight)
            .finish()
    }
}

/// Weighted sum of cross-sectional z-scores.
///
/// At each period every indicator is evaluated over the whole universe and
/// standardized (sample standard deviation); the composite score of an
/// instrument is `Σ wᵢ · zᵢ`. A negative weight turns a "higher is better"
/// indicator into a "lower is better" one. Constant cross-sections
/// contribute zero.
///
/// # Example
///
/// ```ignore
/// use apogee_signals::{CompositeSignal, momentum::Momentum, value::BookToPrice};
///
/// let signal = CompositeSignal::builder("value_momentum")
///     .with(BookToPrice::default(), 0.5)
///     .with(Momentum::new(Default::default())?, 0.5)
///     .build()?;
/// ```
#[derive(Debug)]
pub struct CompositeSignal {
    name: String,
    components: Vec<Component>,
}

impl CompositeSignal {
    /// Start a composite named `name`.
    pub fn builder(name: impl Into<String>) -> CompositeSignalBuilder {
        CompositeSignalBuilder {
            name: name.into(),
            components: Vec::new(),
        }
    }

    /// Composite giving every indicator weight `1 / n`.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::InvalidParameter`] if `indicators` is empty.
    pub fn equal_weight(
        name: impl Into<String>,
        indicators: Vec<Box<dyn Indicator>>,
    ) -> Result<Self> {
        let weight = 1.0 / indicators.len().max(1) as f64;
        indicators
            .into_iter()
            .fold(Self::builder(name), |builder, indicator| {
                builder.with_boxed(indicator, weight)
            })
            .build()
    }

    /// `(indicator name, weight)` pairs in insertion order.
    pub fn weights(&self) -> impl Iterator<Item = (&str, f64)> {
        self.components
            .iter()
            .map(|c| (c.indicator.name(), c.weight))
    }
}

impl Signal for CompositeSignal {
    fn name(&self) -> &str {
        &self.name
    }

    fn score(&self, market: &MarketData, period: Date, universe: &[Symbol]) -> Result<Ranking> {
        let mut composite = vec![0.0; universe.len()];
        for component in &self.components {
            let values = universe
                .iter()
                .map(|symbol| component.indicator.value(market, symbol, period))
                .collect::<Result<Vec<_>>>()?;
            for (total, z) in composite.iter_mut().zip(standardize(&values)) {
                *total += component.weight * z;
            }
        }
        Ranking::from_scores(universe.iter().cloned().zip(composite).collect())
    }

    fn warmup(&self) -> usize {
        self.components
            .iter()
            .map(|c| c.indicator.warmup())
            .max()
            .unwrap_or(0)
    }

    fn required_metrics(&self) -> Vec<&str> {
        let mut metrics: Vec<&str> = self
            .components
            .iter()
            .flat_map(|c| c.indicator.required_metrics())
            .collect();
        metrics.sort_unstable();
        metrics.dedup();
        metrics
    }
}

/// Collects the components of a [`CompositeSignal`].
#[derive(Debug)]
pub struct CompositeSignalBuilder {
    name: String,
    components: Vec<Component>,
}

impl CompositeSignalBuilder {
    /// Add an indicator with a weight.
    #[must_use]
    pub fn with<I: Indicator + 'static>(self, indicator: I, weight: f64) -> Self {
        self.with_boxed(Box::new(indicator), weight)
    }

    /// Add an already boxed indicator with a weight.
    #[must_use]
    pub fn with_boxed(mut self, indicator: Box<dyn Indicator>, weight: f64) -> Self {
        self.components.push(Component { indicator, weight });
        self
    }

    /// Finish the composite.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::InvalidParameter`] when there are no
    /// components, a weight is not finite, or all weights are zero.
    pub fn build(self) -> Result<CompositeSignal> {
        if self.components.is_empty() {
            return Err(ApogeeError::InvalidParameter(format!(
                "composite signal '{}' has no components",
                self.name
            )));
        }
        if let Some(c) = self.components.iter().find(|c| !c.weight.is_finite()) {
            return Err(ApogeeError::InvalidParameter(format!(
                "weight of {} is {}",
                c.indicator.name(),
                c.weight
            )));
        }
        if self.components.iter().all(|c| c.weight == 0.0) {
            return Err(ApogeeError::InvalidParameter(format!(
                "composite signal '{}' has only zero weights",
                self.name
            )));
        }
        Ok(CompositeSignal {
            name: self.name,
            components: self.components,
        })
    }
}
