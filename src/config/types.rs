//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/eventscope/) and project (eventscope.toml)
//! level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::constants::catalog::DEFAULT_OUTPUT_DIR;
use crate::constants::scan::{DEFAULT_MAX_FILE_SIZE, DEFAULT_TIMEOUT_SECS};
use crate::types::Broker;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Remote code-search settings
    pub sourcegraph: SourcegraphConfig,

    /// Event detection settings
    pub detection: DetectionConfig,

    /// Catalog output settings
    pub catalog: CatalogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            sourcegraph: SourcegraphConfig::default(),
            detection: DetectionConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `ScopeError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if Url::parse(&self.sourcegraph.url).is_err() {
            return Err(crate::types::ScopeError::config(format!(
                "sourcegraph.url is not a valid URL: {}",
                self.sourcegraph.url
            )));
        }

        if self.sourcegraph.timeout_secs == 0 {
            return Err(crate::types::ScopeError::config(
                "sourcegraph.timeout_secs must be greater than 0",
            ));
        }

        if self.detection.brokers.is_empty() {
            return Err(crate::types::ScopeError::config(
                "detection.brokers must name at least one broker category",
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Sourcegraph Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcegraphConfig {
    /// Sourcegraph instance URL
    pub url: String,

    /// API access token
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SourcegraphConfig {
    fn default() -> Self {
        Self {
            url: "https://sourcegraph.com".to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Detection Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Broker categories to scan for, in pattern-application order
    pub brokers: Vec<Broker>,

    /// Glob patterns to exclude from local scans
    pub exclude: Vec<String>,

    /// Maximum file size in bytes for local scans
    pub max_file_size: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            brokers: Broker::ALL.to_vec(),
            exclude: vec![],
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

// =============================================================================
// Catalog Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog output directory
    pub output_dir: PathBuf,

    /// Serialization format preference for specification documents
    pub format: OutputFormat,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: OutputFormat::Both,
        }
    }
}

/// Serialized forms written for each specification document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Yaml,
    Json,
    #[default]
    Both,
}

impl OutputFormat {
    pub fn writes_yaml(&self) -> bool {
        matches!(self, OutputFormat::Yaml | OutputFormat::Both)
    }

    pub fn writes_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            "both" => Ok(OutputFormat::Both),
            _ => Err(format!(
                "Unknown output format: {}. Valid values: yaml, json, both",
                s
            )),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
