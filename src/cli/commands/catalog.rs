//! Catalog Command
//!
//! Lists specifications persisted in a catalog directory.

use std::path::PathBuf;

use crate::catalog::CatalogWriter;
use crate::cli::output::Output;
use crate::config::{Config, ConfigLoader};
use crate::types::Result;

pub fn list(output: Option<PathBuf>, format: &str) -> Result<()> {
    let config: Config = ConfigLoader::load()?;
    let output_dir = output.unwrap_or_else(|| config.catalog.output_dir.clone());

    let writer = CatalogWriter::open(&output_dir, config.catalog.format);
    let listings = writer.list_specifications()?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    let out = Output::new();
    if listings.is_empty() {
        out.warning(&format!(
            "No specifications found in {}",
            output_dir.display()
        ));
        return Ok(());
    }

    out.section(&format!("Specifications in {}", output_dir.display()));
    for listing in &listings {
        println!(
            "  {}  {} (v{})",
            listing.filename, listing.service, listing.version
        );
    }

    Ok(())
}
