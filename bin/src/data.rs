//! Data loading utilities for the apogee CLI.

use std::path::{Path, PathBuf};

use apogee_traits::{ApogeeError, DataSource, MarketData};
use polars::prelude::*;
use tracing::info;

/// A long-format CSV file: `symbol`, `date` (`YYYY-MM-DD`) and one column per metric.
#[derive(Debug, Clone)]
pub(crate) struct CsvSource {
    path: PathBuf,
    name: String,
}

impl CsvSource {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl DataSource for CsvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<DataFrame, ApogeeError> {
        if !self.path.is_file() {
            return Err(ApogeeError::InvalidData(format!(
                "data file {} does not exist",
                self.name
            )));
        }
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(self.path.clone()))?
            .finish()?;
        info!(source = %self.name, rows = frame.height(), columns = frame.width(), "loaded csv");
        Ok(frame)
    }
}

/// Load every file into one market.
pub(crate) fn load_market_data<P: AsRef<Path>>(paths: &[P]) -> Result<MarketData, ApogeeError> {
    if paths.is_empty() {
        return Err(ApogeeError::InvalidParameter(
            "at least one data file is required".to_string(),
        ));
    }
    paths
        .iter()
        .try_fold(MarketData::builder(), |builder, path| {
            builder.source(&CsvSource::new(path.as_ref()))
        })?
        .build()
}
