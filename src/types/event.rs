//! Event Domain Types
//!
//! The detected-producer record and the closed broker set it is tagged with.
//! `(name, broker)` is the identity of a record: the same event name under two
//! different brokers is two distinct records.

use serde::{Deserialize, Serialize};

// =============================================================================
// Broker
// =============================================================================

/// Messaging broker category with a recognizable producer idiom.
///
/// The set is closed: adding a broker means adding a variant here plus its
/// pattern list in [`crate::detector::patterns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Broker {
    Kafka,
    Rabbitmq,
    AwsSns,
    AwsSqs,
    Pubsub,
    AzureServicebus,
    Generic,
}

impl Broker {
    /// All broker categories, in pattern-application order.
    pub const ALL: &'static [Broker] = &[
        Broker::Kafka,
        Broker::Rabbitmq,
        Broker::AwsSns,
        Broker::AwsSqs,
        Broker::Pubsub,
        Broker::AzureServicebus,
        Broker::Generic,
    ];

    /// AsyncAPI protocol tag for this broker. Brokers without a stable
    /// protocol mapping are reported as "unknown".
    pub fn protocol(&self) -> &'static str {
        match self {
            Broker::Kafka => "kafka",
            Broker::Rabbitmq => "amqp",
            Broker::AwsSns => "sns",
            Broker::AwsSqs => "sqs",
            Broker::Pubsub | Broker::AzureServicebus | Broker::Generic => "unknown",
        }
    }

    /// Stable string tag, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Broker::Kafka => "kafka",
            Broker::Rabbitmq => "rabbitmq",
            Broker::AwsSns => "aws-sns",
            Broker::AwsSqs => "aws-sqs",
            Broker::Pubsub => "pubsub",
            Broker::AzureServicebus => "azure-servicebus",
            Broker::Generic => "generic",
        }
    }

    /// Synthesized event name used when no literal can be extracted.
    pub fn default_event_name(&self) -> String {
        format!("{}_event", self.as_str())
    }
}

impl std::fmt::Display for Broker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Broker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kafka" => Ok(Broker::Kafka),
            "rabbitmq" => Ok(Broker::Rabbitmq),
            "aws-sns" => Ok(Broker::AwsSns),
            "aws-sqs" => Ok(Broker::AwsSqs),
            "pubsub" => Ok(Broker::Pubsub),
            "azure-servicebus" => Ok(Broker::AzureServicebus),
            "generic" => Ok(Broker::Generic),
            _ => Err(format!(
                "Unknown broker: {}. Valid values: kafka, rabbitmq, aws-sns, aws-sqs, pubsub, azure-servicebus, generic",
                s
            )),
        }
    }
}

// =============================================================================
// Event Record
// =============================================================================

/// One detected producer call site, deduplicated by `(name, broker)`.
///
/// `lines` and `source_code` are positionally aligned: `source_code[i]` is the
/// raw text of source line `lines[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Inferred topic/event/channel identifier
    pub name: String,

    /// Broker category whose pattern produced the match
    pub broker: Broker,

    /// Provenance: file path within the repository
    pub file: String,

    /// Provenance: repository name
    pub repository: String,

    /// 1-based source line numbers of matches
    pub lines: Vec<u32>,

    /// Raw matched line text, aligned with `lines`
    pub source_code: Vec<String>,
}

impl EventRecord {
    /// Deduplication key: broker is part of identity.
    pub fn key(&self) -> (&str, Broker) {
        (self.name.as_str(), self.broker)
    }
}

// =============================================================================
// Tests
// =============================================================================
