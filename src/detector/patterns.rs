//! Pattern Library
//!
//! Static mapping from broker category to the ordered list of regular
//! expression sources recognizing that broker's producer idiom. Patterns are
//! compiled case-insensitively by the detector; order within a list determines
//! which pattern claims a match first during accumulation.

use crate::types::Broker;

/// Kafka producer idioms (client construction, template sends, annotations)
const KAFKA_PATTERNS: &[&str] = &[
    r"KafkaProducer",
    r"\.send\s*\(",
    r"kafka\.Producer",
    r"@KafkaListener",
];

/// RabbitMQ publisher idioms
const RABBITMQ_PATTERNS: &[&str] = &[
    r"channel\.basic_publish",
    r"RabbitTemplate",
    r"@RabbitListener",
    r"pika\.BlockingConnection",
];

/// AWS SNS publish idioms
const AWS_SNS_PATTERNS: &[&str] = &[r"sns\.publish", r#"boto3\.client\(["']sns["']"#];

/// AWS SQS send idioms
const AWS_SQS_PATTERNS: &[&str] = &[r"sqs\.send_message", r#"boto3\.client\(["']sqs["']"#];

/// Google Pub/Sub idioms
const PUBSUB_PATTERNS: &[&str] = &[
    r"publisher\.publish",
    r"google\.cloud\.pubsub",
    r"PublisherClient",
];

/// Azure Service Bus idioms
const AZURE_PATTERNS: &[&str] = &[r"ServiceBusClient", r"send_messages", r"azure\.servicebus"];

/// Broker-agnostic emitter idioms, applied last
const GENERIC_PATTERNS: &[&str] = &[
    r"\.emit\s*\(",
    r"\.publish\s*\(",
    r"\.fire\s*\(",
    r"EventEmitter",
    r"\.trigger\s*\(",
];

/// Ordered pattern sources for a broker category.
pub fn patterns_for(broker: Broker) -> &'static [&'static str] {
    match broker {
        Broker::Kafka => KAFKA_PATTERNS,
        Broker::Rabbitmq => RABBITMQ_PATTERNS,
        Broker::AwsSns => AWS_SNS_PATTERNS,
        Broker::AwsSqs => AWS_SQS_PATTERNS,
        Broker::Pubsub => PUBSUB_PATTERNS,
        Broker::AzureServicebus => AZURE_PATTERNS,
        Broker::Generic => GENERIC_PATTERNS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;

    fn compile(source: &str) -> regex::Regex {
        RegexBuilder::new(source)
            .case_insensitive(true)
            .build()
            .unwrap()
    }

    #[test]
    fn test_every_broker_has_patterns() {
        for broker in Broker::ALL {
            assert!(
                !patterns_for(*broker).is_empty(),
                "no patterns for {}",
                broker
            );
        }
    }

    #[test]
    fn test_all_patterns_compile() {
        for broker in Broker::ALL {
            for source in patterns_for(*broker) {
                compile(source);
            }
        }
    }

    #[test]
    fn test_kafka_patterns_match_idioms() {
        let send = compile(KAFKA_PATTERNS[1]);
        assert!(send.is_match(r#"kafkaTemplate.send("payment.processed", payload)"#));
        assert!(compile(KAFKA_PATTERNS[0]).is_match("producer = KafkaProducer(bootstrap_servers=servers)"));
    }

    #[test]
    fn test_rabbitmq_patterns_match_idioms() {
        let publish = compile(RABBITMQ_PATTERNS[0]);
        assert!(publish.is_match(r#"channel.basic_publish(exchange="orders", routing_key="order.placed")"#));
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let emitter = compile(GENERIC_PATTERNS[3]);
        assert!(emitter.is_match("const bus = new eventemitter();"));
    }

    #[test]
    fn test_boto3_client_patterns() {
        assert!(compile(AWS_SNS_PATTERNS[1]).is_match(r#"client = boto3.client("sns")"#));
        assert!(compile(AWS_SQS_PATTERNS[1]).is_match(r#"client = boto3.client('sqs')"#));
    }
}
