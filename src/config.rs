use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::greeks::GreekInputs;

/// Settings for a feed run. Built once at startup and not changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    /// Underlying symbol, e.g. `NIFTY`.
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Where the sheet is published. For the CSV sink this is a file path.
    #[serde(default = "default_destination")]
    pub destination: String,

    /// Seconds to wait after a cycle before starting the next one.
    #[serde(default = "default_refresh_seconds")]
    pub refresh_seconds: u64,

    /// Run a browser-backed retrieval without a visible window. The HTTP and
    /// file sources have no window and ignore it.
    #[serde(default)]
    pub headless: bool,

    /// Days to expiry used for every delta in a run.
    #[serde(default = "default_days_to_expiry")]
    pub days_to_expiry: f64,

    /// Annualized risk-free rate as a decimal (0.10 = 10%).
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// Leading snapshot rows that are labels, not data.
    #[serde(default = "default_header_rows")]
    pub header_rows: usize,
}

fn default_symbol() -> String {
    "NIFTY".to_string()
}
fn default_destination() -> String {
    "option_chain.csv".to_string()
}
fn default_refresh_seconds() -> u64 {
    60
}
fn default_days_to_expiry() -> f64 {
    4.0
}
fn default_risk_free_rate() -> f64 {
    0.10
}
fn default_header_rows() -> usize {
    2
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            symbol: default_symbol(),
            destination: default_destination(),
            refresh_seconds: default_refresh_seconds(),
            headless: false,
            days_to_expiry: default_days_to_expiry(),
            risk_free_rate: default_risk_free_rate(),
            header_rows: default_header_rows(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("destination must not be empty")]
    EmptyDestination,

    #[error("refresh_seconds must be a positive integer")]
    ZeroRefresh,

    #[error("days_to_expiry must be a finite number >= 0, got {0}")]
    InvalidDaysToExpiry(f64),

    #[error("risk_free_rate must be finite, got {0}")]
    InvalidRate(f64),
}

/// Values given on the command line. `None` keeps the file or default value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub symbol: Option<String>,
    pub destination: Option<String>,
    pub refresh_seconds: Option<u64>,
    pub headless: bool,
    pub days_to_expiry: Option<f64>,
    pub risk_free_rate: Option<f64>,
    pub header_rows: Option<usize>,
}

impl FeedConfig {
    /// Load from an optional JSON file, apply CLI overrides, validate.
    pub fn resolve(file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::load(path)?,
            None => FeedConfig::default(),
        };
        config.apply(overrides);
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config at {}", path.display()))?;
        let config: FeedConfig = serde_json::from_str(&contents)
            .with_context(|| format!("parsing config at {}", path.display()))?;
        Ok(config)
    }

    fn apply(&mut self, o: &ConfigOverrides) {
        if let Some(symbol) = &o.symbol {
            self.symbol = symbol.clone();
        }
        if let Some(destination) = &o.destination {
            self.destination = destination.clone();
        }
        if let Some(secs) = o.refresh_seconds {
            self.refresh_seconds = secs;
        }
        if o.headless {
            self.headless = true;
        }
        if let Some(days) = o.days_to_expiry {
            self.days_to_expiry = days;
        }
        if let Some(rate) = o.risk_free_rate {
            self.risk_free_rate = rate;
        }
        if let Some(rows) = o.header_rows {
            self.header_rows = rows;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        if self.destination.trim().is_empty() {
            return Err(ConfigError::EmptyDestination);
        }
        if self.refresh_seconds == 0 {
            return Err(ConfigError::ZeroRefresh);
        }
        if !self.days_to_expiry.is_finite() || self.days_to_expiry < 0.0 {
            return Err(ConfigError::InvalidDaysToExpiry(self.days_to_expiry));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(ConfigError::InvalidRate(self.risk_free_rate));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_seconds)
    }

    pub fn greek_inputs(&self) -> GreekInputs {
        GreekInputs::new(self.days_to_expiry, self.risk_free_rate)
    }

    pub fn destination_path(&self) -> PathBuf {
        PathBuf::from(&self.destination)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_match_reference_constants() {
        let config = FeedConfig::default();
        assert_eq!(config.refresh_seconds, 60);
        assert_eq!(config.header_rows, 2);
        let inputs = config.greek_inputs();
        assert!((inputs.time_to_expiry - 4.0 / 365.0).abs() < 1e-15);
        assert_eq!(inputs.risk_free_rate, 0.10);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: FeedConfig =
            serde_json::from_str(r#"{ "symbol": "BANKNIFTY", "days_to_expiry": 2.5 }"#).unwrap();
        assert_eq!(config.symbol, "BANKNIFTY");
        assert_eq!(config.days_to_expiry, 2.5);
        assert_eq!(config.refresh_seconds, 60);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(serde_json::from_str::<FeedConfig>(r#"{ "refresh": 5 }"#).is_err());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "symbol": "FINNIFTY", "refresh_seconds": 30 }}"#).unwrap();
        file.flush().unwrap();

        let overrides = ConfigOverrides {
            refresh_seconds: Some(90),
            headless: true,
            ..Default::default()
        };
        let config = FeedConfig::resolve(Some(file.path()), &overrides).unwrap();
        assert_eq!(config.symbol, "FINNIFTY");
        assert_eq!(config.refresh_seconds, 90);
        assert!(config.headless);
    }

    #[test]
    fn test_validation_errors() {
        let zero = FeedConfig {
            refresh_seconds: 0,
            ..Default::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::ZeroRefresh));

        let negative = FeedConfig {
            days_to_expiry: -1.0,
            ..Default::default()
        };
        assert_eq!(negative.validate(), Err(ConfigError::InvalidDaysToExpiry(-1.0)));

        let blank = FeedConfig {
            symbol: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(blank.validate(), Err(ConfigError::EmptySymbol));

        let overrides = ConfigOverrides {
            refresh_seconds: Some(0),
            ..Default::default()
        };
        assert!(FeedConfig::resolve(None, &overrides).is_err());
    }
}
