//! Specification Generator
//!
//! Converts a list of event records into an AsyncAPI 3.0 document. Pure and
//! deterministic: identical event lists produce identical documents aside from
//! the generation timestamp, and key membership is insensitive to input order.
//! Maps are insertion-ordered (serde_json `preserve_order`), so synthesized
//! identifiers derive from first-seen group order rather than hash order.

use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value, json};
use tracing::info;

use crate::constants::asyncapi::{CONTENT_TYPE, SPEC_VERSION};
use crate::types::{Broker, EventRecord};

pub struct SpecGenerator;

impl SpecGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a complete AsyncAPI 3.0 document for a service.
    pub fn generate(&self, service_name: &str, events: &[EventRecord], version: &str) -> Value {
        info!(
            "Generating AsyncAPI spec for {} with {} events",
            service_name,
            events.len()
        );

        json!({
            "asyncapi": SPEC_VERSION,
            "info": self.info(service_name, events, version),
            "servers": self.servers(events),
            "channels": self.channels(events),
            "operations": self.operations(events),
            "components": self.components(events),
        })
    }

    fn info(&self, service_name: &str, events: &[EventRecord], version: &str) -> Value {
        // Distinct repositories in first-seen order, for determinism
        let mut repositories: Vec<&str> = Vec::new();
        for event in events {
            if !event.repository.is_empty() && !repositories.contains(&event.repository.as_str()) {
                repositories.push(&event.repository);
            }
        }

        json!({
            "title": format!("{} Event API", service_name),
            "version": version,
            "description": format!(
                "Asynchronous event API for {}. This specification was auto-generated from code analysis.",
                service_name
            ),
            "x-generated": {
                "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
                "eventCount": events.len(),
                "repositories": repositories,
            }
        })
    }

    fn servers(&self, events: &[EventRecord]) -> Value {
        let mut servers = Map::new();

        for (broker, _) in group_by(events, |e| e.broker) {
            servers.insert(broker.as_str().to_string(), self.server_config(broker));
        }

        Value::Object(servers)
    }

    fn server_config(&self, broker: Broker) -> Value {
        let mut config = json!({
            "host": "{environment}.example.com",
            "protocol": broker.protocol(),
            "description": format!("{} message broker", broker.as_str().to_uppercase()),
            "variables": {
                "environment": {
                    "default": "dev",
                    "enum": ["dev", "staging", "prod"]
                }
            }
        });

        let bindings = match broker {
            Broker::Kafka => Some(json!({
                "kafka": { "schemaRegistryUrl": "https://schema-registry.example.com" }
            })),
            Broker::Rabbitmq => Some(json!({
                "amqp": { "exchange": "default" }
            })),
            Broker::AwsSns | Broker::AwsSqs => Some(json!({
                "aws": { "region": "us-east-1" }
            })),
            _ => None,
        };

        if let (Some(obj), Some(bindings)) = (config.as_object_mut(), bindings) {
            obj.insert("bindings".to_string(), bindings);
        }

        config
    }

    fn channels(&self, events: &[EventRecord]) -> Value {
        let mut channels = Map::new();

        for (name, group) in group_by(events, |e| channel_name(e).to_string()) {
            let channel_id = sanitize_channel_id(&name);
            channels.insert(channel_id, self.channel(&name, &group));
        }

        Value::Object(channels)
    }

    fn channel(&self, channel_name: &str, events: &[&EventRecord]) -> Value {
        let channel_id = sanitize_channel_id(channel_name);

        let mut messages = Map::new();
        for idx in 0..events.len() {
            let message_id = format!("{}_message_{}", channel_id, idx);
            messages.insert(
                message_id.clone(),
                json!({ "$ref": format!("#/components/messages/{}", message_id) }),
            );
        }

        let mut channel = json!({
            "address": channel_name,
            "description": format!("Channel: {}", channel_name),
            "messages": messages,
        });

        // Broker-specific bindings from the first event in the group
        let bindings = match events.first().map(|e| e.broker) {
            Some(Broker::Kafka) => Some(json!({
                "kafka": {
                    "topic": channel_name,
                    "partitions": 3,
                    "replicas": 2
                }
            })),
            Some(Broker::Rabbitmq) => {
                let parts: Vec<&str> = channel_name.split('/').collect();
                let (exchange, queue) = if parts.len() > 1 {
                    (parts[0], parts[1])
                } else {
                    ("default", channel_name)
                };
                Some(json!({
                    "amqp": {
                        "is": "topic",
                        "exchange": { "name": exchange, "type": "topic" },
                        "queue": { "name": queue }
                    }
                }))
            }
            _ => None,
        };

        if let (Some(obj), Some(bindings)) = (channel.as_object_mut(), bindings) {
            obj.insert("bindings".to_string(), bindings);
        }

        channel
    }

    fn operations(&self, events: &[EventRecord]) -> Value {
        let mut operations = Map::new();

        for (name, group) in group_by(events, |e| channel_name(e).to_string()) {
            let channel_id = sanitize_channel_id(&name);
            let messages: Vec<Value> = (0..group.len())
                .map(|idx| {
                    json!({
                        "$ref": format!("#/channels/{}/messages/{}_message_{}", channel_id, channel_id, idx)
                    })
                })
                .collect();

            operations.insert(
                format!("send_{}", channel_id),
                json!({
                    "action": "send",
                    "channel": { "$ref": format!("#/channels/{}", channel_id) },
                    "description": format!("Send messages to {}", name),
                    "messages": messages,
                }),
            );
        }

        Value::Object(operations)
    }

    fn components(&self, events: &[EventRecord]) -> Value {
        let mut messages = Map::new();
        let mut schemas = Map::new();

        for (name, group) in group_by(events, |e| channel_name(e).to_string()) {
            let channel_id = sanitize_channel_id(&name);

            for (idx, event) in group.iter().enumerate() {
                let message_id = format!("{}_message_{}", channel_id, idx);
                let schema_id = format!("{}_payload", message_id);

                messages.insert(
                    message_id,
                    json!({
                        "name": name,
                        "title": format!("{} Event", name),
                        "summary": format!("Message published to {}", name),
                        "contentType": CONTENT_TYPE,
                        "payload": { "$ref": format!("#/components/schemas/{}", schema_id) },
                        "x-source": {
                            "repository": event.repository,
                            "filePath": event.file,
                            "lineNumber": event.lines.first().copied().unwrap_or(0),
                        }
                    }),
                );

                schemas.insert(schema_id, self.schema(&name));
            }
        }

        json!({
            "messages": messages,
            "schemas": schemas,
        })
    }

    /// Template payload schema. No type information is recovered from source,
    /// so the payload stays an open object.
    fn schema(&self, event_name: &str) -> Value {
        json!({
            "type": "object",
            "title": event_name,
            "description": format!("Schema for {} (to be enriched with actual fields)", event_name),
            "properties": {
                "eventId": {
                    "type": "string",
                    "description": "Unique event identifier",
                    "format": "uuid"
                },
                "timestamp": {
                    "type": "string",
                    "description": "Event timestamp",
                    "format": "date-time"
                },
                "eventType": {
                    "type": "string",
                    "description": "Type of event",
                    "const": event_name
                },
                "payload": {
                    "type": "object",
                    "description": "Event-specific payload (schema to be defined)",
                    "additionalProperties": true
                }
            },
            "required": ["eventId", "timestamp", "eventType"],
        })
    }
}

impl Default for SpecGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Channel name for an event: the event name, defaulting to "unknown" when a
/// record arrives without one.
fn channel_name(event: &EventRecord) -> &str {
    if event.name.is_empty() {
        "unknown"
    } else {
        &event.name
    }
}

/// Replace path/dot/colon separators so the name is a valid AsyncAPI id.
fn sanitize_channel_id(channel_name: &str) -> String {
    channel_name.replace(['/', '.', ':'], "_")
}

/// Group events by key, preserving first-seen key order and per-group event
/// order.
fn group_by<K, F>(events: &[EventRecord], key: F) -> Vec<(K, Vec<&EventRecord>)>
where
    K: Eq + std::hash::Hash + Clone,
    F: Fn(&EventRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&EventRecord>)> = Vec::new();

    for event in events {
        let k = key(event);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(event),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![event]));
            }
        }
    }

    groups
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn event(name: &str, broker: Broker) -> EventRecord {
        EventRecord {
            name: name.to_string(),
            broker,
            file: format!("src/{}.py", name.replace('.', "_")),
            repository: "acme/shop".to_string(),
            lines: vec![42],
            source_code: vec![format!("publish(\"{}\")", name)],
        }
    }

    fn keys(value: &Value) -> BTreeSet<String> {
        value
            .as_object()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_two_broker_scenario() {
        let events = vec![
            event("order.placed", Broker::Rabbitmq),
            event("payment.processed", Broker::Kafka),
        ];
        let spec = SpecGenerator::new().generate("shop", &events, "1.0.0");

        assert_eq!(spec["asyncapi"], "3.0.0");
        assert_eq!(spec["info"]["title"], "shop Event API");

        let servers = &spec["servers"];
        assert_eq!(
            keys(servers),
            BTreeSet::from(["rabbitmq".to_string(), "kafka".to_string()])
        );
        assert_eq!(servers["rabbitmq"]["protocol"], "amqp");
        assert_eq!(servers["kafka"]["protocol"], "kafka");

        assert_eq!(
            keys(&spec["channels"]),
            BTreeSet::from(["order_placed".to_string(), "payment_processed".to_string()])
        );
        assert_eq!(spec["channels"]["order_placed"]["address"], "order.placed");
    }

    #[test]
    fn test_empty_event_list() {
        let spec = SpecGenerator::new().generate("empty-svc", &[], "1.0.0");

        assert_eq!(spec["asyncapi"], "3.0.0");
        assert_eq!(spec["info"]["title"], "empty-svc Event API");
        assert_eq!(spec["info"]["x-generated"]["eventCount"], 0);
        assert!(spec["channels"].as_object().unwrap().is_empty());
        assert!(spec["operations"].as_object().unwrap().is_empty());
        assert!(spec["servers"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_order_insensitive_key_membership() {
        let forward = vec![
            event("order.placed", Broker::Rabbitmq),
            event("payment.processed", Broker::Kafka),
            event("user.created", Broker::Generic),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let generator = SpecGenerator::new();
        let a = generator.generate("svc", &forward, "1.0.0");
        let b = generator.generate("svc", &reversed, "1.0.0");

        assert_eq!(keys(&a["servers"]), keys(&b["servers"]));
        assert_eq!(keys(&a["channels"]), keys(&b["channels"]));
        assert_eq!(keys(&a["operations"]), keys(&b["operations"]));
        assert_eq!(
            keys(&a["components"]["messages"]),
            keys(&b["components"]["messages"])
        );
        assert_eq!(
            keys(&a["components"]["schemas"]),
            keys(&b["components"]["schemas"])
        );
    }

    #[test]
    fn test_json_round_trip() {
        let events = vec![event("order.placed", Broker::Rabbitmq)];
        let spec = SpecGenerator::new().generate("svc", &events, "1.0.0");

        let serialized = serde_json::to_string(&spec).unwrap();
        let parsed: Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed, spec);
    }

    #[test]
    fn test_kafka_channel_bindings() {
        let events = vec![event("payment.processed", Broker::Kafka)];
        let spec = SpecGenerator::new().generate("svc", &events, "1.0.0");

        let bindings = &spec["channels"]["payment_processed"]["bindings"]["kafka"];
        assert_eq!(bindings["topic"], "payment.processed");
        assert_eq!(bindings["partitions"], 3);
        assert_eq!(bindings["replicas"], 2);
    }

    #[test]
    fn test_rabbitmq_bindings_split_on_slash() {
        let events = vec![event("orders/placed", Broker::Rabbitmq)];
        let spec = SpecGenerator::new().generate("svc", &events, "1.0.0");

        let channel = &spec["channels"]["orders_placed"];
        let amqp = &channel["bindings"]["amqp"];
        assert_eq!(amqp["exchange"]["name"], "orders");
        assert_eq!(amqp["queue"]["name"], "placed");
    }

    #[test]
    fn test_rabbitmq_bindings_default_exchange() {
        let events = vec![event("order.placed", Broker::Rabbitmq)];
        let spec = SpecGenerator::new().generate("svc", &events, "1.0.0");

        let amqp = &spec["channels"]["order_placed"]["bindings"]["amqp"];
        assert_eq!(amqp["exchange"]["name"], "default");
        assert_eq!(amqp["queue"]["name"], "order.placed");
    }

    #[test]
    fn test_operation_references_all_channel_messages() {
        let mut second = event("order.placed", Broker::Rabbitmq);
        second.broker = Broker::Generic;
        let events = vec![event("order.placed", Broker::Rabbitmq), second];

        let spec = SpecGenerator::new().generate("svc", &events, "1.0.0");
        let op = &spec["operations"]["send_order_placed"];

        assert_eq!(op["action"], "send");
        assert_eq!(op["channel"]["$ref"], "#/channels/order_placed");
        assert_eq!(op["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_message_component_provenance_and_schema() {
        let events = vec![event("order.placed", Broker::Rabbitmq)];
        let spec = SpecGenerator::new().generate("svc", &events, "1.0.0");

        let message = &spec["components"]["messages"]["order_placed_message_0"];
        assert_eq!(message["x-source"]["repository"], "acme/shop");
        assert_eq!(message["x-source"]["filePath"], "src/order_placed.py");
        assert_eq!(message["x-source"]["lineNumber"], 42);
        assert_eq!(
            message["payload"]["$ref"],
            "#/components/schemas/order_placed_message_0_payload"
        );

        let schema = &spec["components"]["schemas"]["order_placed_message_0_payload"];
        assert_eq!(schema["properties"]["eventType"]["const"], "order.placed");
        assert_eq!(
            schema["required"],
            json!(["eventId", "timestamp", "eventType"])
        );
    }

    #[test]
    fn test_empty_name_defaults_to_unknown() {
        let mut unnamed = event("x", Broker::Generic);
        unnamed.name = String::new();
        let spec = SpecGenerator::new().generate("svc", &[unnamed], "1.0.0");

        assert!(spec["channels"]["unknown"].is_object());
        assert_eq!(spec["channels"]["unknown"]["address"], "unknown");
    }

    #[test]
    fn test_pubsub_server_protocol_unknown() {
        let events = vec![event("audit.logged", Broker::Pubsub)];
        let spec = SpecGenerator::new().generate("svc", &events, "1.0.0");
        assert_eq!(spec["servers"]["pubsub"]["protocol"], "unknown");
        assert!(spec["servers"]["pubsub"].get("bindings").is_none());
    }
}
