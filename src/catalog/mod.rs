//! Catalog Writer
//!
//! Persists generated specification documents under a filesystem-safe name,
//! builds the catalog index, and emits discovery reports. A persistence
//! failure for one document is logged and does not prevent other documents or
//! the index from being written.

pub mod report;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::config::OutputFormat;
use crate::constants::catalog::{INDEX_FILE, REPORTS_DIR, SPECS_DIR, SUMMARY_FILE};
use crate::generator::SpecGenerator;
use crate::types::{EventRecord, Result, ScopeError};

pub use report::DiscoveryReport;

// =============================================================================
// Index Types
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecFiles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaml: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub name: String,
    pub version: String,
    pub title: String,
    pub channel_count: usize,
    pub operation_count: usize,
    pub brokers: Vec<String>,
    pub spec_files: SpecFiles,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogIndex {
    pub generated: String,
    pub total_services: usize,
    pub services: Vec<ServiceSummary>,
}

/// Listing entry for a persisted specification.
#[derive(Debug, Clone, Serialize)]
pub struct SpecListing {
    pub filename: String,
    pub service: String,
    pub version: String,
    pub path: String,
}

// =============================================================================
// Catalog Writer
// =============================================================================

struct SpecEntry {
    service: String,
    spec: Value,
}

pub struct CatalogWriter {
    output_dir: PathBuf,
    specs_dir: PathBuf,
    reports_dir: PathBuf,
    format: OutputFormat,
    generator: SpecGenerator,
    entries: Vec<SpecEntry>,
}

impl CatalogWriter {
    /// Create the catalog directory layout under `output_dir`.
    pub fn new<P: AsRef<Path>>(output_dir: P, format: OutputFormat) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        let specs_dir = output_dir.join(SPECS_DIR);
        let reports_dir = output_dir.join(REPORTS_DIR);

        fs::create_dir_all(&specs_dir)?;
        fs::create_dir_all(&reports_dir)?;

        Ok(Self {
            output_dir,
            specs_dir,
            reports_dir,
            format,
            generator: SpecGenerator::new(),
            entries: Vec::new(),
        })
    }

    /// Open an existing catalog for read-back. Unlike [`CatalogWriter::new`]
    /// this never creates directories, so a wrong path stays untouched.
    pub fn open<P: AsRef<Path>>(output_dir: P, format: OutputFormat) -> Self {
        let output_dir = output_dir.as_ref().to_path_buf();
        Self {
            specs_dir: output_dir.join(SPECS_DIR),
            reports_dir: output_dir.join(REPORTS_DIR),
            output_dir,
            format,
            generator: SpecGenerator::new(),
            entries: Vec::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generate a specification for a service and queue it for persistence.
    pub fn add_specification(&mut self, service: &str, events: &[EventRecord], version: &str) {
        let spec = self.generator.generate(service, events, version);
        self.entries.push(SpecEntry {
            service: service.to_string(),
            spec,
        });
    }

    /// Number of queued specifications.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persist every queued specification plus the catalog index.
    ///
    /// A failed write for one document is logged and skipped; the index only
    /// references documents that were actually written.
    pub fn save(&self) -> Result<CatalogIndex> {
        info!(
            "Saving {} specifications to {}",
            self.entries.len(),
            self.output_dir.display()
        );

        let mut services = Vec::new();

        for entry in &self.entries {
            match self.save_spec(&entry.service, &entry.spec) {
                Ok(files) => services.push(summarize(&entry.service, &entry.spec, files)),
                Err(e) => error!("Failed to save spec for {}: {}", entry.service, e),
            }
        }

        let index = CatalogIndex {
            generated: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            total_services: services.len(),
            services,
        };

        let index_path = self.output_dir.join(INDEX_FILE);
        fs::write(&index_path, serde_json::to_string_pretty(&index)?)?;
        info!("Saved catalog index to {}", index_path.display());

        Ok(index)
    }

    /// Write a discovery report JSON plus the plain-text digest.
    pub fn write_report(&self, events: &[EventRecord]) -> Result<DiscoveryReport> {
        let report = DiscoveryReport::build(events, self.entries.len(), &self.output_dir);

        let report_path = self.reports_dir.join(format!(
            "discovery-report-{}.json",
            Utc::now().format("%Y%m%d-%H%M%S")
        ));
        fs::write(&report_path, serde_json::to_string_pretty(&report)?)?;
        info!("Report saved to {}", report_path.display());

        let summary_path = self.output_dir.join(SUMMARY_FILE);
        fs::write(&summary_path, report.to_text_summary())?;
        info!("Summary saved to {}", summary_path.display());

        Ok(report)
    }

    fn save_spec(&self, service: &str, spec: &Value) -> Result<SpecFiles> {
        let safe_name = sanitize_filename(service);
        let mut files = SpecFiles {
            yaml: None,
            json: None,
        };

        if self.format.writes_yaml() {
            let yaml_path = self.specs_dir.join(format!("{}.yaml", safe_name));
            fs::write(&yaml_path, serde_yaml::to_string(spec)?)?;
            info!("Saved {}", yaml_path.display());
            files.yaml = Some(format!("{}/{}.yaml", SPECS_DIR, safe_name));
        }

        if self.format.writes_json() {
            let json_path = self.specs_dir.join(format!("{}.json", safe_name));
            fs::write(&json_path, serde_json::to_string_pretty(spec)?)?;
            files.json = Some(format!("{}/{}.json", SPECS_DIR, safe_name));
        }

        Ok(files)
    }

    // =========================================================================
    // Read-back helpers
    // =========================================================================

    /// List all YAML specifications persisted in the catalog.
    pub fn list_specifications(&self) -> Result<Vec<SpecListing>> {
        let mut listings = Vec::new();

        if !self.specs_dir.exists() {
            return Ok(listings);
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.specs_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("yaml"))
            .collect();
        paths.sort();

        for path in paths {
            let content = fs::read_to_string(&path)?;
            let spec: Value = serde_yaml::from_str(&content)?;
            listings.push(SpecListing {
                filename: path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
                service: spec["info"]["title"].as_str().unwrap_or("").to_string(),
                version: spec["info"]["version"].as_str().unwrap_or("").to_string(),
                path: path.display().to_string(),
            });
        }

        Ok(listings)
    }

    /// Retrieve one persisted specification by service name.
    pub fn get_specification(&self, service: &str) -> Result<Value> {
        let safe_name = sanitize_filename(service);
        let yaml_path = self.specs_dir.join(format!("{}.yaml", safe_name));

        if !yaml_path.exists() {
            return Err(ScopeError::SpecNotFound(service.to_string()));
        }

        let content = fs::read_to_string(yaml_path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

/// Summarize one persisted spec for the catalog index.
fn summarize(service: &str, spec: &Value, files: SpecFiles) -> ServiceSummary {
    let count = |section: &str| {
        spec.get(section)
            .and_then(Value::as_object)
            .map(|m| m.len())
            .unwrap_or(0)
    };

    let brokers = spec
        .get("servers")
        .and_then(Value::as_object)
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default();

    ServiceSummary {
        name: service.to_string(),
        version: spec["info"]["version"].as_str().unwrap_or("1.0.0").to_string(),
        title: spec["info"]["title"].as_str().unwrap_or("").to_string(),
        channel_count: count("channels"),
        operation_count: count("operations"),
        brokers,
        spec_files: files,
    }
}

/// Sanitize a service name for use as a filename: separators become
/// underscores, everything outside `[A-Za-z0-9_-]` is stripped, and the
/// result is case-folded.
pub fn sanitize_filename(name: &str) -> String {
    name.replace(['/', '\\', ' '], "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect::<String>()
        .to_lowercase()
}

// =============================================================================
// Tests
// =============================================================================
