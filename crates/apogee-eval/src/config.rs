//! Backtest configuration.

use apogee_signals::registry::{DEFAULT_SIGNAL, get_signal_info};
use apogee_traits::{ApogeeError, Result};
use serde::{Deserialize, Serialize};

use crate::returns::ReturnSource;
use crate::risk::DEFAULT_CONFIDENCE;
use crate::strategies::LegSizing;

/// Settings shared by every strategy of one backtest.
///
/// Loadable from JSON; missing fields take their defaults:
///
/// ```
/// use apogee_eval::{BacktestConfig, LegSizing};
///
/// let config = BacktestConfig::from_json(r#"{ "sizing": { "count": 10 } }"#).unwrap();
/// assert_eq!(config.sizing, LegSizing::Count(10));
/// assert_eq!(config.confidence, 0.95);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Names per leg (default: 20% of the universe)
    pub sizing: LegSizing,
    /// Where instrument returns come from (default: the `return` metric)
    pub return_source: ReturnSource,
    /// Confidence level of VaR and CVaR (default: 0.95)
    pub confidence: f64,
    /// Registered signal ranked strategies use (default: `best_book_to_price`)
    pub signal: String,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            sizing: LegSizing::default(),
            return_source: ReturnSource::default(),
            confidence: DEFAULT_CONFIDENCE,
            signal: DEFAULT_SIGNAL.to_string(),
        }
    }
}

impl BacktestConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::InvalidParameter`] for malformed JSON or an
    /// invalid value.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ApogeeError::InvalidParameter(format!("backtest config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field.
    ///
    /// # Errors
    ///
    /// Returns [`ApogeeError::InvalidParameter`] for an invalid sizing, a
    /// confidence outside `(0, 1)`, an empty metric name or an unknown
    /// signal.
    pub fn validate(&self) -> Result<()> {
        self.sizing.validate()?;
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(ApogeeError::InvalidParameter(format!(
                "confidence {} is outside (0, 1)",
                self.confidence
            )));
        }
        if self.return_source.metric().is_empty() {
            return Err(ApogeeError::InvalidParameter(
                "return metric name is empty".to_string(),
            ));
        }
        if get_signal_info(&self.signal).is_none() {
            return Err(ApogeeError::InvalidParameter(format!(
                "unknown signal '{}'",
                self.signal
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backtest_config_default() {
        let config = BacktestConfig::default();
        assert_eq!(config.sizing, LegSizing::Fraction(0.2));
        assert_eq!(config.return_source, ReturnSource::returns("return"));
        assert_eq!(config.confidence, 0.95);
        assert_eq!(config.signal, "best_book_to_price");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json() {
        let config = BacktestConfig::from_json(
            r#"{
                "sizing": { "fraction": 0.1 },
                "return_source": { "kind": "prices", "metric": "close" },
                "confidence": 0.99
            }"#,
        )
        .unwrap();
        assert_eq!(config.sizing, LegSizing::Fraction(0.1));
        assert_eq!(config.return_source, ReturnSource::prices("close"));
        assert_eq!(config.confidence, 0.99);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(BacktestConfig::from_json("not json").is_err());
        assert!(BacktestConfig::from_json(r#"{ "confidence": 1.0 }"#).is_err());
        assert!(BacktestConfig::from_json(r#"{ "sizing": { "fraction": 0.75 } }"#).is_err());
        assert!(BacktestConfig::from_json(r#"{ "signal": "nope" }"#).is_err());
        let config = BacktestConfig {
            return_source: ReturnSource::returns(""),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = BacktestConfig {
            sizing: LegSizing::Count(5),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(BacktestConfig::from_json(&json).unwrap(), config);
    }
}
