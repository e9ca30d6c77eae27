pub mod bus;
pub mod client;
pub mod config;
mod error;
pub mod gateway;
#[cfg(feature = "http")]
pub mod http;
pub mod store;

pub use bus::{ChangeEvent, EventPublisher, InMemoryQueue, Producer, PublishError, RecordKind};
pub use client::{Client, ClientId, ClientPatch, PatchField};
pub use config::{ConfigError, GatewayConfig};
pub use error::GatewayError;
pub use gateway::{DirectWriter, EventingWriter, Gateway, Writer};
pub use store::{ClientRepository, DocumentStore, InMemoryDocumentStore, StoreError};
