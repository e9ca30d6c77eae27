//! Record storage - a document store abstraction and the client adapter over it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 ClientRepository (adapter)                  │
//! │  get / search / insert / apply_patch                        │
//! │  StoreError  ──►  GatewayError                              │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   DocumentStore trait                        │
//! │  find_one / find / insert_one / update_one                  │
//! └─────────────────────────────────────────────────────────────┘
//!          │                                      │
//!          ▼                                      ▼
//! ┌───────────────────────┐          ┌──────────────────────────┐
//! │ InMemoryDocumentStore │          │ MongoDB / other drivers  │
//! │      (included)       │          │        (external)        │
//! └───────────────────────┘          └──────────────────────────┘
//! ```

mod in_memory;
mod repository;

use std::fmt;

use regex::Regex;
use serde_json::{Map, Value};

pub use in_memory::{InMemoryDocumentStore, StoreStats};
pub use repository::ClientRepository;

/// A stored document: a JSON object keyed by field name.
pub type Document = Map<String, Value>;

/// Primary-key field of every document.
pub const ID_FIELD: &str = "_id";

/// A filter matching documents whose string `field` matches `pattern`.
#[derive(Debug, Clone)]
pub struct FieldMatch {
    pub field: String,
    pub pattern: Regex,
}

impl FieldMatch {
    pub fn new(field: impl Into<String>, pattern: Regex) -> Self {
        Self {
            field: field.into(),
            pattern,
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        document
            .get(&self.field)
            .and_then(Value::as_str)
            .is_some_and(|value| self.pattern.is_match(value))
    }
}

/// Error reported by a document store driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached.
    ConnectionFailure(String),
    /// The operation did not complete in time.
    Timeout(String),
    /// A document with the same id already exists.
    DuplicateKey { collection: String, id: String },
    /// A document could not be encoded or decoded.
    Serde(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::ConnectionFailure(msg) => write!(f, "connection failure: {}", msg),
            StoreError::Timeout(msg) => write!(f, "operation timed out: {}", msg),
            StoreError::DuplicateKey { collection, id } => {
                write!(f, "duplicate key {}:{}", collection, id)
            }
            StoreError::Serde(msg) => write!(f, "document serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Document store driver.
///
/// Operations are atomic per document; nothing here spans documents.
pub trait DocumentStore: Send + Sync {
    /// Fetch the document whose primary key is `id`.
    fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Fetch up to `limit` documents matching `filter`, in insertion order.
    fn find(
        &self,
        collection: &str,
        filter: &FieldMatch,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError>;

    /// Insert a new document. The primary key must be present and unused.
    fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError>;

    /// Merge `set` into the document with primary key `id`.
    ///
    /// Returns whether a document matched. A missing id is not an error and
    /// does not create a document.
    fn update_one(&self, collection: &str, id: &str, set: Document) -> Result<bool, StoreError>;
}
