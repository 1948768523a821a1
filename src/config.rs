//! TOML configuration for the `doc-checker` binary.
//!
//! Every section is optional. A missing file yields [`Config::minimal`]; a
//! present file is parsed and validated by [`load_config`].
//!
//! ```toml
//! [analysis]
//! source = "delegated"
//! endpoint = "http://127.0.0.1:5000/analyze"
//! timeout_secs = 60
//!
//! [limits]
//! max_documents = 3
//! min_documents = 2
//!
//! [pricing]
//! document_analysis = 0.50
//! report_generation = 2.00
//!
//! [storage]
//! dir = "./data"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use doc_checker_core::batch::{
    BatchLimits, DEFAULT_MAX_DOCUMENTS, DEFAULT_MAX_FILE_BYTES, DEFAULT_MIN_DOCUMENTS,
};
use doc_checker_core::models::{Credits, Pricing};
use doc_checker_core::source::SAMPLE_COUNT;
use doc_checker_core::store::DEFAULT_REPORTS_KEY;
use doc_checker_core::ControllerConfig;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Fixed number of mock findings; random 1..=3 when unset.
    #[serde(default)]
    pub mock_findings: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            mock_findings: None,
        }
    }
}

fn default_source() -> String {
    "mock".to_string()
}
fn default_endpoint() -> String {
    "http://127.0.0.1:5000/analyze".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    #[serde(default = "default_max_documents")]
    pub max_documents: usize,
    #[serde(default = "default_min_documents")]
    pub min_documents: usize,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_documents: DEFAULT_MAX_DOCUMENTS,
            min_documents: DEFAULT_MIN_DOCUMENTS,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

fn default_max_documents() -> usize {
    DEFAULT_MAX_DOCUMENTS
}
fn default_min_documents() -> usize {
    DEFAULT_MIN_DOCUMENTS
}
fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

/// Prices in dollars, converted to whole cents on load.
#[derive(Debug, Deserialize, Clone)]
pub struct PricingConfig {
    #[serde(default = "default_document_price")]
    pub document_analysis: f64,
    #[serde(default = "default_report_price")]
    pub report_generation: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            document_analysis: default_document_price(),
            report_generation: default_report_price(),
        }
    }
}

fn default_document_price() -> f64 {
    0.50
}
fn default_report_price() -> f64 {
    2.00
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            key: default_key(),
        }
    }
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_key() -> String {
    DEFAULT_REPORTS_KEY.to_string()
}

impl Config {
    /// Defaults for every section: mock source, 2..=3 documents, $0.50 per
    /// document, $2.00 per report, reports under `./data`.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Limits and prices in the form the controller takes.
    pub fn controller_config(&self) -> Result<ControllerConfig> {
        Ok(ControllerConfig {
            limits: BatchLimits {
                max_documents: self.limits.max_documents,
                min_documents: self.limits.min_documents,
                max_file_bytes: self.limits.max_file_bytes,
            },
            pricing: Pricing {
                document_analysis: price("pricing.document_analysis", self.pricing.document_analysis)?,
                report_generation: price("pricing.report_generation", self.pricing.report_generation)?,
            },
        })
    }
}

fn price(field: &str, dollars: f64) -> Result<Credits> {
    Credits::from_dollars(dollars)
        .with_context(|| format!("{} must be a finite, non-negative amount", field))
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to [`Config::minimal`].
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::minimal())
    }
}

fn validate(config: &Config) -> Result<()> {
    // Analysis
    match config.analysis.source.as_str() {
        "mock" => {}
        "delegated" => {
            if config.analysis.endpoint.trim().is_empty() {
                bail!("analysis.endpoint must be set when source is 'delegated'");
            }
        }
        other => bail!(
            "Unknown analysis source: '{}'. Must be mock or delegated.",
            other
        ),
    }
    if config.analysis.timeout_secs == 0 {
        bail!("analysis.timeout_secs must be > 0");
    }
    if let Some(n) = config.analysis.mock_findings {
        if !(1..=SAMPLE_COUNT).contains(&n) {
            bail!("analysis.mock_findings must be in [1, {}]", SAMPLE_COUNT);
        }
    }

    // Limits
    let limits = &config.limits;
    if limits.min_documents == 0 {
        bail!("limits.min_documents must be >= 1");
    }
    if limits.min_documents > limits.max_documents {
        bail!(
            "limits.min_documents ({}) must not exceed limits.max_documents ({})",
            limits.min_documents,
            limits.max_documents
        );
    }
    if limits.max_file_bytes == 0 {
        bail!("limits.max_file_bytes must be > 0");
    }

    // Pricing
    config.controller_config()?;

    // Storage
    if config.storage.key.trim().is_empty() {
        bail!("storage.key must not be empty");
    }

    Ok(())
}
