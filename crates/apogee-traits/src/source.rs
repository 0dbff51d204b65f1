//! Pluggable market data sources.
//!
//! A [`DataSource`] hands a long-format frame to
//! [`MarketDataBuilder`](crate::MarketDataBuilder). Sources are only read
//! while the builder runs; the resulting [`MarketData`](crate::MarketData)
//! keeps no reference to them.

use polars::prelude::*;

use crate::Result;

/// A named provider of one long-format market data frame.
///
/// # Example
///
/// ```no_run
/// use apogee_traits::{DataSource, Result};
/// use polars::prelude::*;
///
/// struct Fixture;
///
/// impl DataSource for Fixture {
///     fn name(&self) -> &str {
///         "fixture"
///     }
///
///     fn load(&self) -> Result<DataFrame> {
///         Ok(df! {
///             "symbol" => &["101"],
///             "date" => &["2020-01-31"],
///             "return" => &[0.01],
///         }?)
///     }
/// }
/// ```
pub trait DataSource: Send + Sync {
    /// Name used in error messages and run logs. Should be unique per market.
    fn name(&self) -> &str;

    /// Produces the frame.
    fn load(&self) -> Result<DataFrame>;
}

/// A source over a frame that is already in memory.
#[derive(Debug, Clone)]
pub struct FrameSource {
    name: String,
    frame: DataFrame,
}

impl FrameSource {
    /// Wraps a frame under a source name.
    pub fn new(name: impl Into<String>, frame: DataFrame) -> Self {
        Self {
            name: name.into(),
            frame,
        }
    }
}

impl DataSource for FrameSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<DataFrame> {
        Ok(self.frame.clone())
    }
}
