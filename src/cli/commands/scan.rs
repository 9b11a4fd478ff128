//! Scan Command
//!
//! Scans a local repository checkout for event producers and writes the
//! generated specification, index, and report into the catalog directory.

use std::path::PathBuf;

use crate::catalog::CatalogWriter;
use crate::cli::output::Output;
use crate::config::{Config, ConfigLoader, OutputFormat};
use crate::constants::asyncapi::DEFAULT_API_VERSION;
use crate::corpus::LocalCorpus;
use crate::detector::EventDetector;
use crate::types::{Result, ScopeError};

pub struct ScanOptions {
    /// Path to the repository checkout
    pub path: PathBuf,
    /// Catalog output directory (defaults to the configured one)
    pub output: Option<PathBuf>,
    /// Overrides the configured serialization format
    pub format: Option<OutputFormat>,
    /// Service name for the generated document (defaults to the directory name)
    pub service: Option<String>,
    /// Only report discovered producers, don't generate documents
    pub discover_only: bool,
}

pub async fn run(opts: ScanOptions) -> Result<()> {
    let out = Output::new();

    if !opts.path.exists() {
        return Err(ScopeError::config(format!(
            "Repository path '{}' does not exist",
            opts.path.display()
        )));
    }
    if !opts.path.is_dir() {
        return Err(ScopeError::config(format!(
            "Repository path '{}' is not a directory",
            opts.path.display()
        )));
    }

    let config: Config = ConfigLoader::load()?;

    let corpus = LocalCorpus::new(&opts.path)
        .with_exclude(config.detection.exclude.clone())
        .with_max_file_size(config.detection.max_file_size);
    let service = opts
        .service
        .clone()
        .unwrap_or_else(|| corpus.repository_name());

    out.info(&format!("Scanning repository: {}", opts.path.display()));

    let detector = EventDetector::new(&config.detection.brokers)?;
    let events = detector.detect(&service, &corpus).await?;

    out.success(&format!("Found {} unique events", events.len()));

    if opts.discover_only {
        if !events.is_empty() {
            out.section("Discovered events");
            for event in &events {
                println!("  - {} [{}] in {}", event.name, event.broker, event.file);
            }
        }
        return Ok(());
    }

    let output_dir = opts
        .output
        .unwrap_or_else(|| config.catalog.output_dir.clone());
    let format = opts.format.unwrap_or(config.catalog.format);

    let mut writer = CatalogWriter::new(&output_dir, format)?;
    writer.add_specification(&service, &events, DEFAULT_API_VERSION);
    writer.save()?;
    writer.write_report(&events)?;

    out.success(&format!(
        "AsyncAPI catalog written to {}",
        output_dir.display()
    ));

    Ok(())
}
