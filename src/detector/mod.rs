//! Event Extractor
//!
//! Applies the pattern library against a corpus and produces deduplicated
//! [`EventRecord`]s. Pure aside from reads through the corpus accessor: a
//! failed query is logged and treated as zero results, a malformed match is
//! skipped, and neither aborts the scan.

pub mod patterns;

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use tracing::{debug, info, warn};

use crate::corpus::{CorpusAccessor, LineMatch, SearchMatch};
use crate::types::{Broker, EventRecord, Result, ScopeError};

/// Quoted literal that can plausibly be a topic/event/channel name
const STRING_LITERAL: &str = r#"["']([a-zA-Z0-9._-]+)["']"#;

/// Detects event producers in code regardless of the broker.
pub struct EventDetector {
    /// Compiled patterns in (broker, pattern) application order
    patterns: Vec<(Broker, Vec<Regex>)>,
    /// Extractor for candidate event names
    literal: Regex,
}

impl EventDetector {
    /// Build a detector scanning the given broker categories, in the order
    /// given. Pattern sources come from the static pattern library.
    pub fn new(brokers: &[Broker]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(brokers.len());
        for broker in brokers {
            let mut list = Vec::new();
            for source in patterns::patterns_for(*broker) {
                let regex = RegexBuilder::new(source)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ScopeError::Pattern {
                        pattern: (*source).to_string(),
                        message: e.to_string(),
                    })?;
                list.push(regex);
            }
            compiled.push((*broker, list));
        }

        let literal = RegexBuilder::new(STRING_LITERAL)
            .build()
            .map_err(|e| ScopeError::Pattern {
                pattern: STRING_LITERAL.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            patterns: compiled,
            literal,
        })
    }

    /// Detector over every broker category.
    pub fn all_brokers() -> Result<Self> {
        Self::new(Broker::ALL)
    }

    /// Detect events in one repository.
    ///
    /// Every (broker, pattern) pair is queried against the corpus; matches are
    /// parsed into records and deduplicated by `(name, broker)` keeping
    /// first-seen order.
    pub async fn detect(
        &self,
        repository: &str,
        corpus: &dyn CorpusAccessor,
    ) -> Result<Vec<EventRecord>> {
        info!("Detecting events in repository: {}", repository);

        let mut events = Vec::new();

        for (broker, compiled) in &self.patterns {
            for pattern in compiled {
                let results = match corpus.search(pattern.as_str(), Some(repository)).await {
                    Ok(results) => results,
                    Err(e) => {
                        // One failed query yields zero results, the scan goes on.
                        warn!(
                            "Search failed for pattern '{}' in {}: {}",
                            pattern.as_str(),
                            repository,
                            e
                        );
                        continue;
                    }
                };

                for result in &results {
                    if let Some(event) = self.parse_match(result, *broker) {
                        events.push(event);
                    }
                }
            }
        }

        let events = dedup_events(events);
        info!("Detected {} unique events in {}", events.len(), repository);
        Ok(events)
    }

    /// Parse one search match into an event record.
    ///
    /// Matches without line matches are discarded silently (empty, not an
    /// error).
    fn parse_match(&self, m: &SearchMatch, broker: Broker) -> Option<EventRecord> {
        if m.line_matches.is_empty() {
            debug!("Skipping match without line matches in {}", m.file);
            return None;
        }

        let name = self.extract_event_name(&m.line_matches, broker);

        Some(EventRecord {
            name,
            broker,
            file: m.file.clone(),
            repository: m.repository.clone(),
            lines: m.line_matches.iter().map(|lm| lm.line_number).collect(),
            source_code: m.line_matches.iter().map(|lm| lm.line.clone()).collect(),
        })
    }

    /// Extract an event name from matched lines: the first quoted literal of
    /// length > 2 not starting with an underscore, across lines in encounter
    /// order. Falls back to `<broker>_event`.
    fn extract_event_name(&self, line_matches: &[LineMatch], broker: Broker) -> String {
        for lm in line_matches {
            for capture in self.literal.captures_iter(&lm.line) {
                if let Some(candidate) = capture.get(1) {
                    let s = candidate.as_str();
                    if s.len() > 2 && !s.starts_with('_') {
                        return s.to_string();
                    }
                }
            }
        }
        broker.default_event_name()
    }
}

/// Remove duplicate events by `(name, broker)`, preserving first-seen order.
/// Idempotent: applying it to an already-deduplicated list is a no-op.
pub fn dedup_events(events: Vec<EventRecord>) -> Vec<EventRecord> {
    let mut seen: HashSet<(String, Broker)> = HashSet::new();
    let mut unique = Vec::with_capacity(events.len());

    for event in events {
        let key = (event.name.clone(), event.broker);
        if seen.insert(key) {
            unique.push(event);
        }
    }

    unique
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use proptest::prelude::*;

    /// Corpus applying the query regex against canned file contents.
    struct StaticCorpus {
        entries: Vec<SearchMatch>,
    }

    #[async_trait]
    impl CorpusAccessor for StaticCorpus {
        async fn search(
            &self,
            query: &str,
            _repository: Option<&str>,
        ) -> Result<Vec<SearchMatch>> {
            let regex = RegexBuilder::new(query)
                .case_insensitive(true)
                .build()
                .map_err(|e| ScopeError::search(e.to_string()))?;
            Ok(self
                .entries
                .iter()
                .filter(|m| m.line_matches.iter().any(|lm| regex.is_match(&lm.line)))
                .cloned()
                .collect())
        }

        async fn get_repositories(&self) -> Result<Vec<String>> {
            Ok(vec!["test-repo".to_string()])
        }

        async fn get_file_content(
            &self,
            _repository: &str,
            _path: &str,
            _revision: Option<&str>,
        ) -> Result<Option<String>> {
            Ok(None)
        }
    }

    /// Corpus whose every query fails.
    struct FailingCorpus;

    #[async_trait]
    impl CorpusAccessor for FailingCorpus {
        async fn search(
            &self,
            _query: &str,
            _repository: Option<&str>,
        ) -> Result<Vec<SearchMatch>> {
            Err(ScopeError::search("backend unavailable"))
        }

        async fn get_repositories(&self) -> Result<Vec<String>> {
            Err(ScopeError::search("backend unavailable"))
        }

        async fn get_file_content(
            &self,
            _repository: &str,
            _path: &str,
            _revision: Option<&str>,
        ) -> Result<Option<String>> {
            Err(ScopeError::search("backend unavailable"))
        }
    }

    fn match_with_line(file: &str, line_number: u32, line: &str) -> SearchMatch {
        SearchMatch {
            file: file.to_string(),
            repository: "test-repo".to_string(),
            line_matches: vec![LineMatch {
                line_number,
                line: line.to_string(),
            }],
        }
    }

    fn record(name: &str, broker: Broker) -> EventRecord {
        EventRecord {
            name: name.to_string(),
            broker,
            file: "src/app.py".to_string(),
            repository: "test-repo".to_string(),
            lines: vec![1],
            source_code: vec![format!("publish(\"{}\")", name)],
        }
    }

    #[tokio::test]
    async fn test_detect_rabbitmq_and_kafka_scenario() {
        let corpus = StaticCorpus {
            entries: vec![
                match_with_line(
                    "src/orders.py",
                    42,
                    r#"channel.basic_publish(routing_key="order.placed", body=payload)"#,
                ),
                match_with_line(
                    "src/Payments.java",
                    17,
                    r#"kafkaTemplate.send("payment.processed", event);"#,
                ),
            ],
        };

        let detector = EventDetector::all_brokers().unwrap();
        let events = detector.detect("test-repo", &corpus).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "payment.processed");
        assert_eq!(events[0].broker, Broker::Kafka);
        assert_eq!(events[0].lines, vec![17]);
        assert_eq!(events[1].name, "order.placed");
        assert_eq!(events[1].broker, Broker::Rabbitmq);
        assert_eq!(events[1].file, "src/orders.py");
    }

    #[tokio::test]
    async fn test_detect_survives_failing_corpus() {
        let detector = EventDetector::all_brokers().unwrap();
        let events = detector.detect("test-repo", &FailingCorpus).await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_same_name_same_broker_collapses() {
        let corpus = StaticCorpus {
            entries: vec![
                match_with_line("src/a.js", 3, r#"bus.emit("user.created", user)"#),
                match_with_line("src/b.js", 9, r#"bus.publish("user.created", user)"#),
            ],
        };

        let detector = EventDetector::new(&[Broker::Generic]).unwrap();
        let events = detector.detect("test-repo", &corpus).await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "user.created");
        // First-seen provenance wins
        assert_eq!(events[0].file, "src/a.js");
    }

    #[tokio::test]
    async fn test_default_name_when_no_literal() {
        let corpus = StaticCorpus {
            entries: vec![match_with_line(
                "src/p.py",
                5,
                "producer.send(topic_var, payload)",
            )],
        };

        let detector = EventDetector::new(&[Broker::Kafka]).unwrap();
        let events = detector.detect("test-repo", &corpus).await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "kafka_event");
    }

    #[test]
    fn test_extract_first_qualifying_literal() {
        let detector = EventDetector::all_brokers().unwrap();
        let lines = vec![LineMatch {
            line_number: 1,
            line: r#"send("ok", "_private", "order.shipped")"#.to_string(),
        }];
        // "ok" is too short, "_private" starts with underscore
        assert_eq!(
            detector.extract_event_name(&lines, Broker::Kafka),
            "order.shipped"
        );
    }

    #[test]
    fn test_extract_scans_lines_in_order() {
        let detector = EventDetector::all_brokers().unwrap();
        let lines = vec![
            LineMatch {
                line_number: 1,
                line: "producer.send(topic, payload)".to_string(),
            },
            LineMatch {
                line_number: 8,
                line: r#"producer.send("billing.invoiced", payload)"#.to_string(),
            },
        ];
        assert_eq!(
            detector.extract_event_name(&lines, Broker::Kafka),
            "billing.invoiced"
        );
    }

    #[test]
    fn test_empty_line_matches_discarded() {
        let detector = EventDetector::all_brokers().unwrap();
        let m = SearchMatch {
            file: "src/a.py".to_string(),
            repository: "r".to_string(),
            line_matches: vec![],
        };
        assert!(detector.parse_match(&m, Broker::Kafka).is_none());
    }

    #[test]
    fn test_dedup_keeps_distinct_brokers() {
        let events = vec![
            record("user.created", Broker::Generic),
            record("user.created", Broker::Kafka),
            record("user.created", Broker::Generic),
        ];
        let unique = dedup_events(events);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].broker, Broker::Generic);
        assert_eq!(unique[1].broker, Broker::Kafka);
    }

    proptest! {
        #[test]
        fn prop_dedup_is_idempotent(
            names in proptest::collection::vec("[a-z]{1,6}(\\.[a-z]{1,6})?", 0..20)
        ) {
            let events: Vec<EventRecord> = names
                .iter()
                .map(|n| record(n, Broker::Generic))
                .collect();

            let once = dedup_events(events);
            let twice = dedup_events(once.clone());
            prop_assert_eq!(once, twice);
        }
    }
}
