//! Serializable scan configuration.
//!
//! Every section is optional in the TOML file; missing sections and fields
//! take the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use swingscan_core::features::{FeatureConfig, LabelConfig};
use swingscan_core::model::GbmParams;

use crate::scan::AdmissionPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Where the price files and the golden list live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
    pub golden_list: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/raw"),
            golden_list: PathBuf::from("data/cleaned/EDA_golden_list.csv"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Scan tickers on the rayon pool instead of one at a time.
    pub parallel: bool,
}

/// Complete configuration for one scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub paths: PathsConfig,
    pub features: FeatureConfig,
    pub labels: LabelConfig,
    pub model: GbmParams,
    pub admission: AdmissionPolicy,
    pub scan: ScanOptions,
}

impl ScanConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.features;
        if f.rsi_period == 0 || f.ma_period == 0 || f.volume_window == 0 {
            return Err(invalid("feature windows must be >= 1"));
        }
        if f.volatility_window < 2 {
            return Err(invalid("features.volatility_window must be >= 2"));
        }
        if let Some(m) = f.dividend_months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(invalid(format!(
                "features.dividend_months: {m} is not a month (1..=12)"
            )));
        }

        let l = &self.labels;
        if l.target_window == 0 {
            return Err(invalid("labels.target_window must be >= 1"));
        }
        if !(l.profit_threshold > -1.0 && l.profit_threshold.is_finite()) {
            return Err(invalid(format!(
                "labels.profit_threshold must be > -1, got {}",
                l.profit_threshold
            )));
        }

        self.model
            .validate()
            .map_err(|e| invalid(format!("model: {e}")))?;

        let a = &self.admission;
        if !(0.0..1.0).contains(&a.min_confidence) {
            return Err(invalid(format!(
                "admission.min_confidence must lie in [0, 1), got {}",
                a.min_confidence
            )));
        }
        if !(a.max_rsi > 0.0 && a.max_rsi <= 100.0) {
            return Err(invalid(format!(
                "admission.max_rsi must lie in (0, 100], got {}",
                a.max_rsi
            )));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}
