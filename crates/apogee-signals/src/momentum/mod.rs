//! Time-series indicators that look back over several periods.
//!
//! - Momentum: compounded trailing return, skipping the most recent periods
//! - Trailing mean: moving average of any metric
//!
//! Both declare a warm-up equal to the number of earlier periods they read.

mod cumulative;
mod trailing_mean;

pub use cumulative::{Momentum, MomentumConfig};
pub use trailing_mean::{TrailingMean, TrailingMeanConfig};
