//! Discovery Report
//!
//! Summary of a discovery run: event totals and counts grouped by broker and
//! by originating repository, rendered as JSON and as a plain-text digest.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::types::EventRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_events: usize,
    pub total_services: usize,
    pub total_repositories: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryReport {
    pub timestamp: String,
    pub summary: ReportSummary,
    /// Event counts per broker tag, sorted by tag
    pub brokers: BTreeMap<String, usize>,
    /// Event counts per repository, sorted by name
    pub repositories: BTreeMap<String, usize>,
    pub output_directory: String,
}

impl DiscoveryReport {
    /// Build a report over all discovered events and the number of generated
    /// specifications.
    pub fn build(events: &[EventRecord], total_services: usize, output_dir: &Path) -> Self {
        let mut brokers: BTreeMap<String, usize> = BTreeMap::new();
        let mut repositories: BTreeMap<String, usize> = BTreeMap::new();
        let mut distinct_repos: BTreeSet<&str> = BTreeSet::new();

        for event in events {
            *brokers.entry(event.broker.to_string()).or_insert(0) += 1;
            if !event.repository.is_empty() {
                distinct_repos.insert(&event.repository);
                *repositories.entry(event.repository.clone()).or_insert(0) += 1;
            }
        }

        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            summary: ReportSummary {
                total_events: events.len(),
                total_services,
                total_repositories: distinct_repos.len(),
            },
            brokers,
            repositories,
            output_directory: output_dir.display().to_string(),
        }
    }

    /// Human-readable digest written next to the catalog index.
    pub fn to_text_summary(&self) -> String {
        let bar = "=".repeat(80);
        let mut lines = vec![
            bar.clone(),
            "AsyncAPI Discovery Summary".to_string(),
            bar.clone(),
            String::new(),
            format!("Generated: {}", self.timestamp),
            String::new(),
            "Overview:".to_string(),
            format!("  Total Events Discovered: {}", self.summary.total_events),
            format!("  Total Services: {}", self.summary.total_services),
            format!(
                "  Total Repositories: {}",
                self.summary.total_repositories
            ),
            String::new(),
            "Message Brokers:".to_string(),
        ];

        for (broker, count) in &self.brokers {
            lines.push(format!("  {}: {} events", broker, count));
        }

        lines.push(String::new());
        lines.push("Repositories:".to_string());
        for (repo, count) in &self.repositories {
            lines.push(format!("  {}: {} events", repo, count));
        }

        lines.extend([
            String::new(),
            "Output Location:".to_string(),
            format!("  {}", self.output_directory),
            String::new(),
            "Generated Files:".to_string(),
            format!(
                "  - {} AsyncAPI specifications",
                self.summary.total_services
            ),
            "  - Catalog index: catalog-index.json".to_string(),
            "  - Discovery reports in reports/".to_string(),
            String::new(),
            bar,
        ]);

        lines.join("\n")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Broker;
    use std::path::PathBuf;

    fn event(name: &str, broker: Broker, repository: &str) -> EventRecord {
        EventRecord {
            name: name.to_string(),
            broker,
            file: "src/app.py".to_string(),
            repository: repository.to_string(),
            lines: vec![1],
            source_code: vec![format!("publish(\"{}\")", name)],
        }
    }

    #[test]
    fn test_report_counts() {
        let events = vec![
            event("a.b", Broker::Kafka, "acme/orders"),
            event("c.d", Broker::Kafka, "acme/orders"),
            event("e.f", Broker::Rabbitmq, "acme/billing"),
        ];

        let report = DiscoveryReport::build(&events, 2, &PathBuf::from("/tmp/out"));

        assert_eq!(report.summary.total_events, 3);
        assert_eq!(report.summary.total_services, 2);
        assert_eq!(report.summary.total_repositories, 2);
        assert_eq!(report.brokers["kafka"], 2);
        assert_eq!(report.brokers["rabbitmq"], 1);
        assert_eq!(report.repositories["acme/orders"], 2);
    }

    #[test]
    fn test_text_summary_mentions_brokers() {
        let events = vec![event("a.b", Broker::Kafka, "acme/orders")];
        let report = DiscoveryReport::build(&events, 1, &PathBuf::from("/tmp/out"));
        let text = report.to_text_summary();

        assert!(text.contains("AsyncAPI Discovery Summary"));
        assert!(text.contains("kafka: 1 events"));
        assert!(text.contains("Total Events Discovered: 1"));
        assert!(text.contains("/tmp/out"));
    }

    #[test]
    fn test_empty_events_report() {
        let report = DiscoveryReport::build(&[], 0, &PathBuf::from("out"));
        assert_eq!(report.summary.total_events, 0);
        assert!(report.brokers.is_empty());
    }
}
