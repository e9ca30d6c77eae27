//! InMemoryDocumentStore - HashMap-backed document store for testing and development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use super::{Document, DocumentStore, FieldMatch, StoreError, ID_FIELD};

/// Internal stored representation of a document.
struct StoredDocument {
    bytes: Vec<u8>,
    version: u64,
    seq: u64,
}

/// Operation counters, for observing which calls reached the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub reads: usize,
    pub inserts: usize,
    pub updates: usize,
}

impl StoreStats {
    /// Total write calls (inserts and updates).
    pub fn writes(&self) -> usize {
        self.inserts + self.updates
    }
}

#[derive(Default)]
struct Counters {
    reads: AtomicUsize,
    inserts: AtomicUsize,
    updates: AtomicUsize,
}

/// In-memory document store backed by a HashMap.
///
/// Storage key is `"collection:id"`. Clone-friendly via Arc; clones share
/// storage, counters and injected faults.
#[derive(Clone)]
pub struct InMemoryDocumentStore {
    storage: Arc<RwLock<HashMap<String, StoredDocument>>>,
    next_seq: Arc<AtomicU64>,
    fault: Arc<Mutex<Option<StoreError>>>,
    counters: Arc<Counters>,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            next_seq: Arc::new(AtomicU64::new(0)),
            fault: Arc::new(Mutex::new(None)),
            counters: Arc::new(Counters::default()),
        }
    }

    fn make_key(collection: &str, id: &str) -> String {
        format!("{}:{}", collection, id)
    }

    /// Make every following operation fail with `fault` until cleared.
    pub fn inject_fault(&self, fault: StoreError) {
        if let Ok(mut slot) = self.fault.lock() {
            *slot = Some(fault);
        }
    }

    pub fn clear_fault(&self) {
        if let Ok(mut slot) = self.fault.lock() {
            *slot = None;
        }
    }

    /// Simulate losing (or regaining) the connection to the store.
    pub fn set_offline(&self, offline: bool) {
        if offline {
            self.inject_fault(StoreError::ConnectionFailure("store offline".into()));
        } else {
            self.clear_fault();
        }
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            reads: self.counters.reads.load(Ordering::SeqCst),
            inserts: self.counters.inserts.load(Ordering::SeqCst),
            updates: self.counters.updates.load(Ordering::SeqCst),
        }
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> usize {
        let prefix = format!("{}:", collection);
        let storage = self.storage.read().unwrap_or_else(|e| e.into_inner());
        storage.keys().filter(|k| k.starts_with(&prefix)).count()
    }

    /// Current version of a document; 1 after insert, bumped by each update.
    pub fn version(&self, collection: &str, id: &str) -> Option<u64> {
        let key = Self::make_key(collection, id);
        let storage = self.storage.read().unwrap_or_else(|e| e.into_inner());
        storage.get(&key).map(|stored| stored.version)
    }

    fn check_fault(&self) -> Result<(), StoreError> {
        let slot = self
            .fault
            .lock()
            .map_err(|_| StoreError::ConnectionFailure("lock poisoned".into()))?;
        match slot.as_ref() {
            Some(fault) => Err(fault.clone()),
            None => Ok(()),
        }
    }

    fn decode(bytes: &[u8]) -> Result<Document, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serde(e.to_string()))
    }

    fn encode(document: &Document) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(document).map_err(|e| StoreError::Serde(e.to_string()))
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.counters.reads.fetch_add(1, Ordering::SeqCst);
        self.check_fault()?;

        let key = Self::make_key(collection, id);
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::ConnectionFailure("lock poisoned".into()))?;

        match storage.get(&key) {
            Some(stored) => Ok(Some(Self::decode(&stored.bytes)?)),
            None => Ok(None),
        }
    }

    fn find(
        &self,
        collection: &str,
        filter: &FieldMatch,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        self.counters.reads.fetch_add(1, Ordering::SeqCst);
        self.check_fault()?;

        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::ConnectionFailure("lock poisoned".into()))?;

        let prefix = format!("{}:", collection);
        let mut matched = Vec::new();

        for (key, stored) in storage.iter() {
            if key.starts_with(&prefix) {
                if let Ok(document) = Self::decode(&stored.bytes) {
                    if filter.matches(&document) {
                        matched.push((stored.seq, document));
                    }
                }
            }
        }

        matched.sort_by_key(|(seq, _)| *seq);
        Ok(matched
            .into_iter()
            .take(limit)
            .map(|(_, document)| document)
            .collect())
    }

    fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        self.counters.inserts.fetch_add(1, Ordering::SeqCst);
        self.check_fault()?;

        let id = document
            .get(ID_FIELD)
            .and_then(|v| v.as_str())
            .ok_or_else(|| StoreError::Serde(format!("document has no string {}", ID_FIELD)))?
            .to_string();
        let key = Self::make_key(collection, &id);
        let bytes = Self::encode(&document)?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::ConnectionFailure("lock poisoned".into()))?;

        if storage.contains_key(&key) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                id,
            });
        }

        storage.insert(
            key,
            StoredDocument {
                bytes,
                version: 1,
                seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
            },
        );

        Ok(())
    }

    fn update_one(&self, collection: &str, id: &str, set: Document) -> Result<bool, StoreError> {
        self.counters.updates.fetch_add(1, Ordering::SeqCst);
        self.check_fault()?;

        let key = Self::make_key(collection, id);
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::ConnectionFailure("lock poisoned".into()))?;

        let Some(stored) = storage.get_mut(&key) else {
            return Ok(false);
        };

        let mut document = Self::decode(&stored.bytes)?;
        for (field, value) in set {
            // The primary key is immutable.
            if field != ID_FIELD {
                document.insert(field, value);
            }
        }

        stored.bytes = Self::encode(&document)?;
        stored.version += 1;
        Ok(true)
    }
}
