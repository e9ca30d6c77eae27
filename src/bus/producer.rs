//! Transport traits for the event bus.

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// A message as delivered to a topic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Topic the message was produced to
    pub topic: String,
    /// Position in the delivered log, assigned on flush
    pub offset: u64,
    /// Serialized payload
    pub payload: Vec<u8>,
}

impl Message {
    /// Get the payload as a string (if valid UTF-8).
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    /// Decode a JSON payload.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

/// Error type for transport operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// Connection to the broker failed
    ConnectionFailed(String),
    /// Serialization of the message failed
    SerializationFailed(String),
    /// The broker rejected the message
    Rejected(String),
    /// Timeout waiting for delivery confirmation
    Timeout,
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            PublishError::SerializationFailed(msg) => write!(f, "Serialization failed: {}", msg),
            PublishError::Rejected(msg) => write!(f, "Message rejected: {}", msg),
            PublishError::Timeout => write!(f, "Publish timeout"),
        }
    }
}

impl Error for PublishError {}

/// Trait for producing messages to a broker.
///
/// Mirrors the produce/flush split of broker clients such as Kafka:
/// `produce` only enqueues locally, `flush` blocks until every enqueued
/// message is confirmed or `timeout` elapses. `Ok` means every message the
/// caller produced was delivered. Messages still pending when a flush fails
/// stay queued, so a later flush may deliver them; the failed caller is not
/// told.
///
/// Implementations might include:
/// - `InMemoryQueue` - For testing and single-process scenarios
/// - `KafkaProducer` - For Apache Kafka
/// - `NatsProducer` - For NATS
pub trait Producer: Send + Sync {
    /// Enqueue a payload for delivery to `topic`.
    fn produce(&self, topic: &str, payload: Vec<u8>) -> Result<(), PublishError>;

    /// Block until all enqueued payloads are delivered.
    fn flush(&self, timeout: Duration) -> Result<(), PublishError>;
}

/// Trait for reading delivered messages back from a broker.
///
/// This is a pull-based interface.
pub trait Subscriber: Send + Sync {
    /// Poll for the next message, blocking until one is available or timeout.
    fn poll(&self, timeout_ms: u64) -> Result<Option<Message>, PublishError>;

    /// Acknowledge that a message has been processed.
    fn ack(&self, offset: u64) -> Result<(), PublishError>;
}
