//! Concrete strategies.
//!
//! - [`MarketStrategy`]: the equal-weight benchmark
//! - [`RankedStrategy`]: long, short or long-short the ends of a ranking
//! - [`StrategyKind`]: the named set the CLI exposes

mod kind;
mod market;
mod ranked;

pub use kind::StrategyKind;
pub use market::MarketStrategy;
pub use ranked::{LegSizing, Legs, RankedStrategy};
