//! InMemoryStore — HashMap-backed document store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{Document, DocumentStore, StoreError};

/// In-memory document store backed by a HashMap.
///
/// Storage key is `"collection:id"`, payloads are JSON bytes. Clone-friendly
/// via `Arc`: clones share the same storage.
#[derive(Clone)]
pub struct InMemoryStore {
    storage: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn make_key(collection: &str, id: &str) -> String {
        format!("{}:{}", collection, id)
    }
}

impl DocumentStore for InMemoryStore {
    fn get<D: Document>(&self, id: &str) -> Result<Option<D>, StoreError> {
        let key = Self::make_key(D::COLLECTION, id);
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;

        match storage.get(&key) {
            Some(bytes) => {
                let doc: D = serde_json::from_slice(bytes)
                    .map_err(|e| StoreError::Serde(e.to_string()))?;
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    fn put<D: Document>(&self, doc: &D) -> Result<(), StoreError> {
        let key = Self::make_key(D::COLLECTION, doc.id());
        let bytes = serde_json::to_vec(doc).map_err(|e| StoreError::Serde(e.to_string()))?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;

        storage.insert(key, bytes);
        Ok(())
    }

    fn insert<D: Document>(&self, doc: &D) -> Result<(), StoreError> {
        let key = Self::make_key(D::COLLECTION, doc.id());
        let bytes = serde_json::to_vec(doc).map_err(|e| StoreError::Serde(e.to_string()))?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;

        if storage.contains_key(&key) {
            return Err(StoreError::Conflict {
                collection: D::COLLECTION.to_string(),
                id: doc.id().to_string(),
            });
        }

        storage.insert(key, bytes);
        Ok(())
    }

    fn delete<D: Document>(&self, id: &str) -> Result<bool, StoreError> {
        let key = Self::make_key(D::COLLECTION, id);
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;

        Ok(storage.remove(&key).is_some())
    }

    fn find<D: Document>(&self, predicate: &dyn Fn(&D) -> bool) -> Result<Vec<D>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;

        let prefix = format!("{}:", D::COLLECTION);
        let mut results = Vec::new();

        for (key, bytes) in storage.iter() {
            if key.starts_with(&prefix) {
                if let Ok(doc) = serde_json::from_slice::<D>(bytes) {
                    if predicate(&doc) {
                        results.push(doc);
                    }
                }
            }
        }

        Ok(results)
    }
}
