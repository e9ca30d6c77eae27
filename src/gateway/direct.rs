//! DirectWriter - the write path that persists to the store.

use std::sync::Arc;

use super::Writer;
use crate::client::{Client, ClientId, ClientPatch};
use crate::error::GatewayError;
use crate::store::ClientRepository;

/// Persists writes straight to the store.
pub struct DirectWriter {
    repository: Arc<ClientRepository>,
}

impl DirectWriter {
    pub fn new(repository: Arc<ClientRepository>) -> Self {
        Self { repository }
    }
}

impl Writer for DirectWriter {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn create_client(&self, client: Client) -> Result<Client, GatewayError> {
        self.repository.insert(&client)
    }

    /// Merge-update, then read back so the caller sees the stored state.
    fn update_client(&self, id: &ClientId, patch: &ClientPatch) -> Result<Client, GatewayError> {
        self.repository.apply_patch(id, patch)?;
        self.repository.get(id)
    }
}
