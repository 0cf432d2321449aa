//! Document store abstraction — arbitrary-key document CRUD.
//!
//! The concrete store (a cloud document database in production) is an
//! external collaborator; this module defines the contract the gateway
//! programs against plus an in-memory implementation for tests and
//! development.
//!
//! ## Example
//!
//! ```
//! use codepod::store::{Document, DocumentStore, InMemoryStore};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Note { id: String, body: String }
//!
//! impl Document for Note {
//!     const COLLECTION: &'static str = "notes";
//!     fn id(&self) -> &str { &self.id }
//! }
//!
//! let store = InMemoryStore::new();
//! store.put(&Note { id: "n1".into(), body: "hi".into() }).unwrap();
//! let loaded: Note = store.get("n1").unwrap().unwrap();
//! assert_eq!(loaded.body, "hi");
//! ```

mod document_store;
mod in_memory;

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

pub use document_store::DocumentStore;
pub use in_memory::InMemoryStore;

/// Trait for types stored as documents.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection name for this document type (e.g. "projects",
    /// "likes"). Maps to a collection in a document database, a table in
    /// SQL, a key prefix in KV stores.
    const COLLECTION: &'static str;

    /// The unique identifier of this document within its collection.
    fn id(&self) -> &str;
}

/// Error type for store operations.
///
/// Provider-specific failure codes are normalized to these variants at the
/// store boundary; the gateway translates them further into its own
/// taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Insert collided with an existing document.
    Conflict { collection: String, id: String },
    /// Document does not exist.
    NotFound { collection: String, id: String },
    /// Serialization / deserialization failure.
    Serde(String),
    /// Storage backend unreachable or failing; retryable by the caller.
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Conflict { collection, id } => {
                write!(f, "document already exists: {}:{}", collection, id)
            }
            StoreError::NotFound { collection, id } => {
                write!(f, "document not found: {}:{}", collection, id)
            }
            StoreError::Serde(msg) => write!(f, "document serialization error: {}", msg),
            StoreError::Unavailable(msg) => write!(f, "document store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
