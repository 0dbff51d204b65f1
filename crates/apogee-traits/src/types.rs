//! Common types used throughout the apogee backtester.
//!
//! The central type is [`MarketData`]: an immutable panel of per-instrument
//! time series keyed by metric name, instrument, and period. It is assembled
//! once from one or more [`DataSource`]s through [`MarketDataBuilder`] and is
//! read-only afterwards, so concurrent evaluations can share it by reference.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use ndarray::Array2;
use polars::prelude::*;

use crate::{ApogeeError, DataSource, Result};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// An instrument identifier.
///
/// Identifiers are scoped to one [`MarketData`] instance.
pub type Symbol = String;

/// Column holding the instrument identifier in a source frame.
pub const SYMBOL_COLUMN: &str = "symbol";

/// Column holding the period in a source frame.
pub const DATE_COLUMN: &str = "date";

/// Format of string-typed period columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Well-known metric names.
pub mod metric {
    /// Simple return realized over the period ending at the row's date.
    pub const RETURN: &str = "return";
    /// Book-to-price ratio.
    pub const BOOK_TO_PRICE: &str = "book_to_price";
    /// Book value of equity.
    pub const BOOK_VALUE: &str = "book_value";
    /// Market capitalisation.
    pub const MARKET_CAP: &str = "market_cap";
    /// Price or other value level.
    pub const PRICE: &str = "price";
}

/// Read-only panel of market data.
///
/// Each metric is stored as a dense `periods x instruments` array. Absent
/// cells are `NaN` internally and surface as
/// [`ApogeeError::DataUnavailable`] from [`get`](Self::get).
///
/// # Example
///
/// ```no_run
/// use apogee_traits::{Date, MarketData};
/// use polars::prelude::*;
///
/// let df = df! {
///     "symbol" => &["101", "102"],
///     "date" => &["2020-01-31", "2020-01-31"],
///     "return" => &[0.01, -0.02],
/// }
/// .unwrap();
///
/// let market = MarketData::try_from(df).unwrap();
/// let period = Date::from_ymd_opt(2020, 1, 31).unwrap();
/// assert_eq!(market.get("return", "101", period).unwrap(), 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct MarketData {
    periods: Vec<Date>,
    instruments: Vec<Symbol>,
    period_index: HashMap<Date, usize>,
    instrument_index: HashMap<Symbol, usize>,
    panels: BTreeMap<String, Array2<f64>>,
    sources: Vec<String>,
}

impl MarketData {
    /// Starts assembling market data from sources.
    pub fn builder() -> MarketDataBuilder {
        MarketDataBuilder::default()
    }

    /// Builds market data from a single in-memory frame.
    pub fn from_frame(name: &str, frame: &DataFrame) -> Result<Self> {
        Self::builder().frame(name, frame)?.build()
    }

    /// Looks up one cell.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::DataUnavailable`] if the metric, instrument or
    /// period is unknown, or the cell holds no value.
    pub fn get(&self, metric: &str, instrument: &str, period: Date) -> Result<f64> {
        self.panels
            .get(metric)
            .zip(self.instrument_index.get(instrument))
            .zip(self.period_index.get(&period))
            .map(|((panel, &i), &t)| panel[[t, i]])
            .filter(|value| value.is_finite())
            .ok_or_else(|| ApogeeError::unavailable(metric, instrument, period))
    }

    /// All periods, ascending.
    pub fn periods(&self) -> &[Date] {
        &self.periods
    }

    /// Every instrument that appears anywhere in the data, ascending.
    pub fn all_instruments(&self) -> &[Symbol] {
        &self.instruments
    }

    /// Instruments with at least one value at `period`, ascending.
    pub fn instruments(&self, period: Date) -> Result<Vec<Symbol>> {
        let t = self.index_of(period)?;
        Ok(self
            .instruments
            .iter()
            .enumerate()
            .filter(|(i, _)| self.panels.values().any(|panel| panel[[t, *i]].is_finite()))
            .map(|(_, symbol)| symbol.clone())
            .collect())
    }

    /// Position of `period` in [`periods`](Self::periods).
    pub fn period_index(&self, period: Date) -> Option<usize> {
        self.period_index.get(&period).copied()
    }

    /// The period following `period`, if any.
    pub fn next_period(&self, period: Date) -> Option<Date> {
        self.period_index(period)
            .and_then(|t| self.periods.get(t + 1))
            .copied()
    }

    /// The `len` periods ending at (and including) `period`.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::InsufficientHistory`] if fewer than `len`
    /// periods precede `period`.
    pub fn window(&self, period: Date, len: usize) -> Result<&[Date]> {
        if len == 0 {
            return Err(ApogeeError::InvalidParameter(
                "window length must be positive".to_string(),
            ));
        }
        let t = self.index_of(period)?;
        if t + 1 < len {
            return Err(ApogeeError::InsufficientHistory {
                required: len,
                available: t + 1,
            });
        }
        Ok(&self.periods[t + 1 - len..=t])
    }

    /// Checks if a metric exists in the market data.
    pub fn has_metric(&self, metric: &str) -> bool {
        self.panels.contains_key(metric)
    }

    /// Metric names, ascending.
    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.panels.keys().map(String::as_str)
    }

    /// Names of the sources this data was assembled from, in load order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Returns the number of periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Returns whether there are no periods.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    fn index_of(&self, period: Date) -> Result<usize> {
        self.period_index(period)
            .ok_or_else(|| ApogeeError::InvalidDate(format!("{period} is not a market period")))
    }
}

impl TryFrom<DataFrame> for MarketData {
    type Error = ApogeeError;

    fn try_from(frame: DataFrame) -> Result<Self> {
        Self::from_frame("frame", &frame)
    }
}

/// Collects source frames into a [`MarketData`].
///
/// Frames are long format: a `symbol` column, a `date` column (polars
/// `Date` or `YYYY-MM-DD` strings) and one numeric column per metric.
/// Non-numeric extra columns are ignored; null or non-finite cells are
/// treated as absent.
#[derive(Debug, Default)]
pub struct MarketDataBuilder {
    cells: BTreeMap<String, HashMap<(Symbol, Date), f64>>,
    periods: BTreeSet<Date>,
    instruments: BTreeSet<Symbol>,
    sources: Vec<String>,
}

impl MarketDataBuilder {
    /// Loads a source and adds its frame.
    pub fn source<S: DataSource + ?Sized>(self, source: &S) -> Result<Self> {
        let frame = source.load()?;
        self.frame(source.name(), &frame)
    }

    /// Adds an in-memory frame under the given source name.
    ///
    /// # Errors
    ///
    /// Fails if the frame lacks the `symbol` or `date` column, has a row
    /// without either, or sets a cell that an earlier frame already set.
    pub fn frame(mut self, name: &str, frame: &DataFrame) -> Result<Self> {
        let symbols = symbol_values(frame)?;
        let dates = date_values(frame)?;

        let mut rows = Vec::with_capacity(symbols.len());
        for (symbol, date) in symbols.into_iter().zip(dates) {
            match (symbol, date) {
                (Some(symbol), Some(date)) => rows.push((symbol, date)),
                _ => {
                    return Err(ApogeeError::InvalidData(format!(
                        "source '{name}' has a row without {SYMBOL_COLUMN} or {DATE_COLUMN}"
                    )));
                }
            }
        }

        for column in frame.get_columns() {
            let metric = column.name().as_str();
            if metric == SYMBOL_COLUMN || metric == DATE_COLUMN || !is_numeric(column.dtype()) {
                continue;
            }
            let values = column.as_materialized_series().cast(&DataType::Float64)?;
            let cells = self.cells.entry(metric.to_string()).or_default();
            for ((symbol, date), value) in rows.iter().zip(values.f64()?.into_iter()) {
                let Some(value) = value.filter(|v| v.is_finite()) else {
                    continue;
                };
                if cells.insert((symbol.clone(), *date), value).is_some() {
                    return Err(ApogeeError::InvalidData(format!(
                        "source '{name}' sets {metric} for {symbol} at {date} a second time"
                    )));
                }
            }
        }

        for (symbol, date) in rows {
            self.periods.insert(date);
            self.instruments.insert(symbol);
        }
        self.sources.push(name.to_string());
        Ok(self)
    }

    /// Freezes the collected cells into dense panels.
    pub fn build(self) -> Result<MarketData> {
        if self.periods.is_empty() {
            return Err(ApogeeError::InvalidData(
                "market data has no rows".to_string(),
            ));
        }

        let periods: Vec<Date> = self.periods.into_iter().collect();
        let instruments: Vec<Symbol> = self.instruments.into_iter().collect();
        let period_index: HashMap<Date, usize> =
            periods.iter().enumerate().map(|(t, d)| (*d, t)).collect();
        let instrument_index: HashMap<Symbol, usize> = instruments
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();

        let panels = self
            .cells
            .into_iter()
            .map(|(metric, cells)| {
                let mut panel = Array2::from_elem((periods.len(), instruments.len()), f64::NAN);
                for ((symbol, date), value) in cells {
                    panel[[period_index[&date], instrument_index[&symbol]]] = value;
                }
                (metric, panel)
            })
            .collect();

        Ok(MarketData {
            periods,
            instruments,
            period_index,
            instrument_index,
            panels,
            sources: self.sources,
        })
    }
}

const fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}

fn required_column<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a Column> {
    frame
        .column(name)
        .map_err(|_| ApogeeError::MissingColumn(name.to_string()))
}

fn symbol_values(frame: &DataFrame) -> Result<Vec<Option<Symbol>>> {
    let symbols = required_column(frame, SYMBOL_COLUMN)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(symbols
        .str()?
        .into_iter()
        .map(|s: Option<&str>| s.map(|s| s.trim().to_string()))
        .collect())
}

fn date_values(frame: &DataFrame) -> Result<Vec<Option<Date>>> {
    let column = required_column(frame, DATE_COLUMN)?;
    match column.dtype() {
        DataType::Date | DataType::String => {}
        other => {
            return Err(ApogeeError::InvalidData(format!(
                "{DATE_COLUMN} column has unsupported type {other}"
            )));
        }
    }
    let dates = column.as_materialized_series().cast(&DataType::String)?;
    dates
        .str()?
        .into_iter()
        .map(|s: Option<&str>| {
            s.map(|s| {
                Date::parse_from_str(s.trim(), DATE_FORMAT)
                    .map_err(|e| ApogeeError::InvalidDate(format!("'{s}': {e}")))
            })
            .transpose()
        })
        .collect()
}
