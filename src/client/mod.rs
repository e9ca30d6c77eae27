//! Client records - the entity served by the gateway.
//!
//! A [`Client`] is the full record as stored and as returned to callers.
//! A [`ClientPatch`] is a sparse overlay used by updates: fields it does not
//! carry are left untouched.

mod patch;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use patch::{ClientPatch, PatchField};

/// Opaque, immutable identifier of a client record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random id (UUID v4, simple hex form).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err("client id must not be empty");
        }
        Ok(Self(value))
    }
}

impl From<ClientId> for String {
    fn from(id: ClientId) -> Self {
        id.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A client record.
///
/// When a create payload carries no `id`, one is generated on decode so the
/// record is fully identified before it reaches either write path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default = "ClientId::generate")]
    pub id: ClientId,
    pub name: String,
    pub location: String,
    pub email: String,
    pub phone_number: i64,
}

impl Client {
    /// Create a record with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        email: impl Into<String>,
        phone_number: i64,
    ) -> Self {
        Self {
            id: ClientId::generate(),
            name: name.into(),
            location: location.into(),
            email: email.into(),
            phone_number,
        }
    }

    pub fn with_id(mut self, id: ClientId) -> Self {
        self.id = id;
        self
    }

    /// Return a new version of this record with `patch` laid over it.
    pub fn patched(&self, patch: &ClientPatch) -> Client {
        let mut next = self.clone();
        patch.apply_to(&mut next);
        next
    }
}
