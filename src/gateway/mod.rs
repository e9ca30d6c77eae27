//! Gateway - routes client writes to the store or to the event bus.
//!
//! The write path is a [`Writer`] strategy picked once, when the gateway is
//! built, from `GatewayConfig::eventing_enabled`:
//!
//! - [`DirectWriter`] persists through the [`ClientRepository`].
//! - [`EventingWriter`] publishes a change event through the
//!   [`EventPublisher`] and answers with the record it published. That record
//!   is not guaranteed to ever reach the store.
//!
//! Reads never branch: they always go to the repository, so under the event
//! path a write is visible to reads only once something downstream of the
//! topic persists it.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use client_gateway::{Client, Gateway, GatewayConfig, InMemoryDocumentStore, InMemoryQueue};
//!
//! let gateway = Gateway::new(
//!     &GatewayConfig::default(),
//!     Arc::new(InMemoryDocumentStore::new()),
//!     Arc::new(InMemoryQueue::new()),
//! );
//!
//! let created = gateway.create_client(Client::new("Ana", "NY", "a@x.com", 555)).unwrap();
//! assert_eq!(gateway.get_client(&created.id).unwrap(), created);
//! ```

mod direct;
mod eventing;

use std::sync::Arc;

use tracing::{debug, info};

use crate::bus::{EventPublisher, Producer};
use crate::client::{Client, ClientId, ClientPatch};
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::store::{ClientRepository, DocumentStore};

pub use direct::DirectWriter;
pub use eventing::EventingWriter;

/// A write path for client records.
pub trait Writer: Send + Sync {
    /// Short name of the path, for logs.
    fn name(&self) -> &'static str;

    fn create_client(&self, client: Client) -> Result<Client, GatewayError>;

    fn update_client(&self, id: &ClientId, patch: &ClientPatch) -> Result<Client, GatewayError>;
}

pub struct Gateway {
    repository: Arc<ClientRepository>,
    writer: Box<dyn Writer>,
    eventing: bool,
}

impl Gateway {
    /// Build a gateway over injected store and producer connections.
    pub fn new(
        config: &GatewayConfig,
        store: Arc<dyn DocumentStore>,
        producer: Arc<dyn Producer>,
    ) -> Self {
        let repository = Arc::new(ClientRepository::new(store, config));
        let writer: Box<dyn Writer> = if config.eventing_enabled {
            let publisher = EventPublisher::new(producer, config);
            Box::new(EventingWriter::new(repository.clone(), publisher))
        } else {
            Box::new(DirectWriter::new(repository.clone()))
        };

        info!(
            writer = writer.name(),
            collection = repository.collection(),
            "client gateway ready"
        );

        Self {
            repository,
            writer,
            eventing: config.eventing_enabled,
        }
    }

    /// Whether writes go to the event bus.
    pub fn eventing_enabled(&self) -> bool {
        self.eventing
    }

    pub fn get_client(&self, id: &ClientId) -> Result<Client, GatewayError> {
        debug!(client_id = %id, "get client");
        self.repository.get(id)
    }

    pub fn search_clients(&self, text: &str) -> Result<Vec<Client>, GatewayError> {
        debug!(text, "search clients");
        self.repository.search(text)
    }

    pub fn create_client(&self, client: Client) -> Result<Client, GatewayError> {
        debug!(client_id = %client.id, path = self.writer.name(), "create client");
        self.writer.create_client(client)
    }

    /// Apply `patch` to the record `id`.
    ///
    /// Fails with `InvalidPatch` before touching either path if the patch
    /// tries to clear a field.
    pub fn update_client(&self, id: &ClientId, patch: &ClientPatch) -> Result<Client, GatewayError> {
        if let Some(field) = patch.cleared_field() {
            return Err(GatewayError::InvalidPatch(field));
        }
        debug!(client_id = %id, path = self.writer.name(), "update client");
        self.writer.update_client(id, patch)
    }
}
