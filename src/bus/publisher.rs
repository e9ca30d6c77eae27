//! EventPublisher - serializes change events and publishes them to the topic.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{ChangeEvent, Producer, PublishError, RecordKind};
use crate::client::Client;
use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// Publishes record changes to one fixed topic.
///
/// Each publish is produced and then flushed before returning, so a
/// successful call means the transport confirmed delivery. There is no
/// background publication and no retry.
pub struct EventPublisher {
    producer: Arc<dyn Producer>,
    topic: String,
    flush_timeout: Duration,
}

impl EventPublisher {
    pub fn new(producer: Arc<dyn Producer>, config: &GatewayConfig) -> Self {
        Self {
            producer,
            topic: config.topic.clone(),
            flush_timeout: config.flush_timeout,
        }
    }

    pub fn publish(&self, client: &Client, kind: RecordKind) -> Result<(), GatewayError> {
        let payload = ChangeEvent::new(kind, client.clone())
            .to_bytes()
            .map_err(|e| PublishError::SerializationFailed(e.to_string()))
            .map_err(publish_failure)?;

        self.producer
            .produce(&self.topic, payload)
            .map_err(publish_failure)?;
        self.producer
            .flush(self.flush_timeout)
            .map_err(publish_failure)?;

        debug!(topic = %self.topic, kind = %kind, client_id = %client.id, "change event published");
        Ok(())
    }
}

fn publish_failure(err: PublishError) -> GatewayError {
    warn!(error = %err, "change event not published");
    GatewayError::PublishFailed(err.to_string())
}
