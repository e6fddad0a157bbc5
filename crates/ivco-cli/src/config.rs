//! Configuration file support.
//!
//! Values here sit between built-in defaults and command-line flags: a flag
//! always wins, an unset flag falls back to the file, a key missing from the
//! file falls back to the defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use ivco_core::pipeline::{
    DEFAULT_CC_HIGH, DEFAULT_CC_LOW, DEFAULT_DISCOUNT_RATE, DEFAULT_MAINTENANCE_RATIO,
    DEFAULT_STAGE2_CAGR, DEFAULT_STAGE3_CAGR,
};
use ivco_core::valuation::{DEFAULT_SHARE_PAR_VALUE, DEFAULT_STAGE1_YEARS, DEFAULT_STAGE2_YEARS};
use ivco_core::{FMP_API_KEY_ENV, FMP_BASE_URL};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "IVCO_CONFIG";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub valuation: ValuationConfig,
    pub fmp: FmpConfig,
}

/// Default valuation assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    pub maintenance_ratio: f64,
    pub cc_low: f64,
    pub cc_high: f64,
    pub stage2_cagr: f64,
    pub stage3_cagr: f64,
    pub discount_rate: f64,
    pub share_par_value: i64,
    pub stage1_years: u32,
    pub stage2_years: u32,
}

/// Financial Modeling Prep connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FmpConfig {
    /// Takes precedence over `FMP_API_KEY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            maintenance_ratio: DEFAULT_MAINTENANCE_RATIO,
            cc_low: DEFAULT_CC_LOW,
            cc_high: DEFAULT_CC_HIGH,
            stage2_cagr: DEFAULT_STAGE2_CAGR,
            stage3_cagr: DEFAULT_STAGE3_CAGR,
            discount_rate: DEFAULT_DISCOUNT_RATE,
            share_par_value: DEFAULT_SHARE_PAR_VALUE,
            stage1_years: DEFAULT_STAGE1_YEARS,
            stage2_years: DEFAULT_STAGE2_YEARS,
        }
    }
}

impl Default for FmpConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: String::from(FMP_BASE_URL),
            timeout_ms: ivco_core::http_client::DEFAULT_TIMEOUT_MS,
        }
    }
}

impl FmpConfig {
    /// Configured key, else `FMP_API_KEY`. Blank values count as unset.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(FMP_API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl Config {
    /// Load from `explicit`, else from `$IVCO_CONFIG`, else defaults.
    ///
    /// A named file that cannot be read or parsed is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        match resolve_path(explicit, std::env::var(CONFIG_ENV).ok()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        let config = Self::from_toml(&contents).map_err(|e| {
            CliError::Config(format!("invalid config '{}': {}", path.display(), e.message()))
        })?;

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

fn resolve_path(explicit: Option<&Path>, from_env: Option<String>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        from_env
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
    })
}
