use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{DecisionConfig, Error, PipelineConfig, Result};

/// Indicator windows and decision thresholds, loadable from TOML.
///
/// Every key is optional; missing ones take their defaults.
///
/// ```
/// use quantedge_signal::SignalConfig;
///
/// let config = SignalConfig::from_toml_str(
///     r#"
///     [pipeline]
///     fast_sma = 20
///
///     [decision]
///     max_volatility = 0.03
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.pipeline.fast_sma(), 20);
/// assert_eq!(config.pipeline.slow_sma(), 200);
/// assert_eq!(config.decision.max_volatility(), 0.03);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignalConfig {
    pub pipeline: PipelineConfig,
    pub decision: DecisionConfig,
}

impl SignalConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// - [`Error::Toml`] when the document does not parse.
    /// - [`Error::Config`] when a value is out of range.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Checks ranges serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.volatility() < 2 {
            return Err(Error::Config(format!(
                "volatility length must be at least 2, got {}",
                self.pipeline.volatility()
            )));
        }

        self.decision.validate().map_err(Error::Config)
    }
}
