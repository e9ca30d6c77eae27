//! Event bus - publishing record changes to a message broker.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 EventPublisher (per topic)                  │
//! │  publish(record, kind) = encode + produce + flush           │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │               Producer + Subscriber Traits                   │
//! │  Producer: produce(topic, bytes) / flush(timeout)           │
//! │  Subscriber: poll(timeout) / ack(offset)                    │
//! └─────────────────────────────────────────────────────────────┘
//!          │                  │                     │
//!          ▼                  ▼                     ▼
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────────────┐
//! │InMemoryQueue│    │ KafkaQueue  │    │ RedisStreamQueue    │
//! │ (included)  │    │ (external)  │    │    (external)       │
//! └─────────────┘    └─────────────┘    └─────────────────────┘
//! ```

mod event;
mod in_memory_queue;
mod producer;
mod publisher;

pub use event::{ChangeEvent, RecordKind};
pub use in_memory_queue::InMemoryQueue;
pub use producer::{Message, Producer, PublishError, Subscriber};
pub use publisher::EventPublisher;
