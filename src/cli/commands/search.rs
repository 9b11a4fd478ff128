//! Search Command
//!
//! Scans repositories through a remote Sourcegraph instance. Repositories are
//! processed sequentially; a failure in one yields zero results for it and
//! the scan continues with the rest.

use std::path::PathBuf;

use tracing::warn;

use crate::catalog::CatalogWriter;
use crate::cli::output::Output;
use crate::config::{Config, ConfigLoader};
use crate::constants::asyncapi::DEFAULT_API_VERSION;
use crate::corpus::{CorpusAccessor, SourcegraphClient};
use crate::detector::EventDetector;
use crate::types::{EventRecord, Result};

pub async fn run(repository: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let out = Output::new();
    let config: Config = ConfigLoader::load()?;

    let client = SourcegraphClient::new(&config.sourcegraph)?;
    let detector = EventDetector::new(&config.detection.brokers)?;

    let repositories = match repository {
        Some(repo) => vec![repo],
        None => match client.get_repositories().await {
            Ok(repos) => repos,
            Err(e) => {
                warn!("Failed to list repositories: {}", e);
                Vec::new()
            }
        },
    };

    out.info(&format!("Scanning {} repositories", repositories.len()));

    let output_dir = output.unwrap_or_else(|| config.catalog.output_dir.clone());
    let mut writer = CatalogWriter::new(&output_dir, config.catalog.format)?;
    let mut all_events: Vec<EventRecord> = Vec::new();

    for repo in &repositories {
        out.info(&format!("Processing repository: {}", repo));

        let events = detector.detect(repo, &client).await?;
        if events.is_empty() {
            out.warning(&format!("No events found in {}", repo));
            continue;
        }

        out.success(&format!("Found {} events in {}", events.len(), repo));
        writer.add_specification(repo, &events, DEFAULT_API_VERSION);
        all_events.extend(events);
    }

    writer.save()?;
    writer.write_report(&all_events)?;

    out.success(&format!(
        "AsyncAPI catalog written to {}",
        output_dir.display()
    ));

    Ok(())
}
