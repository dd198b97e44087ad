//! `toolgrid.toml` configuration
//!
//! Every section is optional. A missing file means all defaults.
//!
//! ```toml
//! [output]
//! dir = "out"
//!
//! [image]
//! format = "webp"
//! quality = 0.8
//!
//! [compress]
//! remove_metadata = false
//!
//! [currency.rates]
//! EUR = 0.92
//! ```

use anyhow::Context;
use convert_core::ExchangeRates;
use image_convert::ConvertOptions;
use pdftools_core::CompressionOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "toolgrid.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub image: ConvertOptions,
    pub compress: CompressionOptions,
    pub currency: CurrencyConfig,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// Load `explicit` if given, else `toolgrid.toml` in `cwd` if present,
    /// else defaults
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let fallback = cwd.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            tracing::debug!(path = %fallback.display(), "using config file");
            Self::from_file(fallback)
        } else {
            Ok(Self::default())
        }
    }

    /// Reference exchange rates with the configured overrides applied
    pub fn exchange_rates(&self) -> anyhow::Result<ExchangeRates> {
        ExchangeRates::reference()
            .with_overrides(
                self.currency
                    .rates
                    .iter()
                    .map(|(code, &rate)| (code.as_str(), rate)),
            )
            .context("Invalid currency rate override")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where result files are written
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    /// Units per 1 USD, keyed by currency code
    pub rates: BTreeMap<String, f64>,
}
