//! Change events - the wire form of the event write path.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::client::Client;

/// Type tag identifying the kind of record an event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    Client,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Client => "Client",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{ "type": <tag>, "content": <record> }`, sent as UTF-8 JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub content: Client,
}

impl ChangeEvent {
    pub fn new(kind: RecordKind, content: Client) -> Self {
        Self { kind, content }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
