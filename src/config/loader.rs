//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/eventscope/config.toml)
//! 3. Project config (./eventscope.toml)
//! 4. Environment variables (EVENTSCOPE_* prefix)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{Result, ScopeError};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // e.g. EVENTSCOPE_SOURCEGRAPH_URL -> sourcegraph.url
        figment = figment.merge(Env::prefixed("EVENTSCOPE_").split('_').lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ScopeError::config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| ScopeError::config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/eventscope/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("eventscope"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from("eventscope.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file path
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;

        if as_json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config)
                    .map_err(|e| ScopeError::config(e.to_string()))?
            );
        }

        Ok(())
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a default project config, refusing to overwrite unless forced.
    pub fn init_project(force: bool) -> Result<PathBuf> {
        let config_path = Self::project_config_path();

        if config_path.exists() && !force {
            return Err(ScopeError::config(format!(
                "{} already exists (use --force to overwrite)",
                config_path.display()
            )));
        }

        fs::write(&config_path, Self::default_project_config())?;
        info!("Created project config: {}", config_path.display());

        Ok(config_path)
    }

    /// Generate default project config content (TOML)
    fn default_project_config() -> String {
        r#"# eventscope Project Configuration
# Settings here override the global config (~/.config/eventscope/config.toml).

version = "1.0"

# Remote code search
[sourcegraph]
url = "https://sourcegraph.com"
# token = "sgp_..."
timeout_secs = 30

# Event detection
[detection]
brokers = [
    "kafka",
    "rabbitmq",
    "aws-sns",
    "aws-sqs",
    "pubsub",
    "azure-servicebus",
    "generic",
]
exclude = []

# Catalog output
[catalog]
output_dir = "asyncapi_catalog"
format = "both"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Broker;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_file_defaults() {
        let file = NamedTempFile::new().unwrap();
        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.catalog.format.to_string(), "both");
    }

    #[test]
    fn test_load_from_file_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [sourcegraph]
            url = "https://sg.internal.example.com"

            [detection]
            brokers = ["kafka"]
            "#
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.sourcegraph.url, "https://sg.internal.example.com");
        assert_eq!(config.detection.brokers, vec![Broker::Kafka]);
    }

    #[test]
    fn test_load_from_file_rejects_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [sourcegraph]
            timeout_secs = 0
            "#
        )
        .unwrap();

        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_default_project_config_parses() {
        let config: Config = toml::from_str(&ConfigLoader::default_project_config()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.detection.brokers.len(), Broker::ALL.len());
    }
}
