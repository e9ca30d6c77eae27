//! EventingWriter - the write path that publishes change events.

use std::sync::Arc;

use super::Writer;
use crate::bus::{EventPublisher, RecordKind};
use crate::client::{Client, ClientId, ClientPatch};
use crate::error::GatewayError;
use crate::store::ClientRepository;

/// Publishes writes as change events instead of persisting them.
///
/// The repository is only read: updates start from the last stored state.
/// Two concurrent updates of one id both start from the same state and
/// publish diverging versions; nothing here arbitrates between them.
pub struct EventingWriter {
    repository: Arc<ClientRepository>,
    publisher: EventPublisher,
}

impl EventingWriter {
    pub fn new(repository: Arc<ClientRepository>, publisher: EventPublisher) -> Self {
        Self {
            repository,
            publisher,
        }
    }
}

impl Writer for EventingWriter {
    fn name(&self) -> &'static str {
        "eventing"
    }

    /// Returns the input record; this is not a confirmation of persistence.
    fn create_client(&self, client: Client) -> Result<Client, GatewayError> {
        self.publisher.publish(&client, RecordKind::Client)?;
        Ok(client)
    }

    fn update_client(&self, id: &ClientId, patch: &ClientPatch) -> Result<Client, GatewayError> {
        let current = self.repository.get(id)?;
        let updated = current.patched(patch);
        self.publisher.publish(&updated, RecordKind::Client)?;
        Ok(updated)
    }
}
