//! ClientRepository - the record store adapter used by the gateway.
//!
//! Translates between [`Client`] values and stored documents, and between
//! driver failures ([`StoreError`]) and service failures ([`GatewayError`]).

use std::sync::Arc;

use regex::RegexBuilder;
use serde_json::Value;
use tracing::{debug, warn};

use super::{Document, DocumentStore, FieldMatch, StoreError, ID_FIELD};
use crate::client::{Client, ClientId, ClientPatch};
use crate::config::GatewayConfig;
use crate::error::GatewayError;

const NAME_FIELD: &str = "name";

pub struct ClientRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
    max_search_results: usize,
}

impl ClientRepository {
    /// A search cap below 1 is raised to 1.
    pub fn new(store: Arc<dyn DocumentStore>, config: &GatewayConfig) -> Self {
        if config.max_search_results == 0 {
            warn!("max_search_results is 0, using 1");
        }
        Self {
            store,
            collection: config.clients_collection.clone(),
            max_search_results: config.max_search_results.max(1),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Point lookup by id.
    pub fn get(&self, id: &ClientId) -> Result<Client, GatewayError> {
        let document = self
            .store
            .find_one(&self.collection, id.as_str())
            .map_err(read_failure)?
            .ok_or_else(|| GatewayError::NotFound(id.clone()))?;

        from_document(document).map_err(read_failure)
    }

    /// Case-insensitive match of `text` against client names.
    ///
    /// `text` is used as a regular expression; if it does not compile it is
    /// matched literally. Blank text matches nothing.
    pub fn search(&self, text: &str) -> Result<Vec<Client>, GatewayError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let filter = FieldMatch::new(NAME_FIELD, name_pattern(text)?);
        let documents = self
            .store
            .find(&self.collection, &filter, self.max_search_results)
            .map_err(read_failure)?;

        let mut clients = Vec::with_capacity(documents.len());
        for document in documents {
            match from_document(document) {
                Ok(client) => clients.push(client),
                Err(e) => warn!(collection = %self.collection, error = %e, "skipping malformed client document"),
            }
        }
        Ok(clients)
    }

    /// Persist a new record as given.
    pub fn insert(&self, client: &Client) -> Result<Client, GatewayError> {
        let document = to_document(client).map_err(write_failure)?;
        self.store
            .insert_one(&self.collection, document)
            .map_err(write_failure)?;
        Ok(client.clone())
    }

    /// Merge the fields present in `patch` into the stored record.
    ///
    /// Returns whether a record matched. A missing id is a no-op, never an
    /// upsert. An empty patch does not reach the store and reports a match;
    /// the caller's follow-up read settles whether the record exists.
    pub fn apply_patch(&self, id: &ClientId, patch: &ClientPatch) -> Result<bool, GatewayError> {
        let set = patch.to_set_document();
        if set.is_empty() {
            debug!(client_id = %id, "empty patch, skipping store write");
            return Ok(true);
        }

        let matched = self
            .store
            .update_one(&self.collection, id.as_str(), set)
            .map_err(write_failure)?;
        if !matched {
            debug!(client_id = %id, "patch matched no client");
        }
        Ok(matched)
    }
}

fn name_pattern(text: &str) -> Result<regex::Regex, GatewayError> {
    let build = |pattern: &str| {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .multi_line(true)
            .dot_matches_new_line(true)
            .build()
    };

    build(text)
        .or_else(|_| build(&regex::escape(text)))
        .map_err(|e| GatewayError::StoreUnavailable(format!("search pattern rejected: {}", e)))
}

fn read_failure(err: StoreError) -> GatewayError {
    warn!(error = %err, "store read failed");
    GatewayError::StoreUnavailable(err.to_string())
}

fn write_failure(err: StoreError) -> GatewayError {
    warn!(error = %err, "store write failed");
    GatewayError::InsertionFailed(err.to_string())
}

/// Store form of a client: the id moves to the primary-key field.
fn to_document(client: &Client) -> Result<Document, StoreError> {
    let value = serde_json::to_value(client).map_err(|e| StoreError::Serde(e.to_string()))?;
    let Value::Object(mut document) = value else {
        return Err(StoreError::Serde("client did not encode to an object".into()));
    };
    if let Some(id) = document.remove("id") {
        document.insert(ID_FIELD.to_string(), id);
    }
    Ok(document)
}

fn from_document(mut document: Document) -> Result<Client, StoreError> {
    if let Some(id) = document.remove(ID_FIELD) {
        document.insert("id".to_string(), id);
    }
    serde_json::from_value(Value::Object(document)).map_err(|e| StoreError::Serde(e.to_string()))
}
