use std::fmt;

use crate::client::ClientId;

/// Service-level failure of a gateway operation.
///
/// Every variant is terminal for the request: nothing is retried internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No record matches the id.
    NotFound(ClientId),
    /// The store could not be reached (connectivity, timeout) on a read.
    StoreUnavailable(String),
    /// The store could not persist a write.
    InsertionFailed(String),
    /// The change event could not be published.
    PublishFailed(String),
    /// The patch tries to clear a required field.
    InvalidPatch(&'static str),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::NotFound(id) => write!(f, "client not found: {}", id),
            GatewayError::StoreUnavailable(msg) => write!(f, "store unavailable: {}", msg),
            GatewayError::InsertionFailed(msg) => write!(f, "insertion failed: {}", msg),
            GatewayError::PublishFailed(msg) => write!(f, "publish failed: {}", msg),
            GatewayError::InvalidPatch(field) => {
                write!(f, "invalid patch: field {} cannot be cleared", field)
            }
        }
    }
}

impl std::error::Error for GatewayError {}

impl GatewayError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::NotFound(_) => 404,
            GatewayError::StoreUnavailable(_) => 503,
            GatewayError::InsertionFailed(_) => 502,
            GatewayError::PublishFailed(_) => 502,
            GatewayError::InvalidPatch(_) => 400,
        }
    }
}
