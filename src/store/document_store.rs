//! DocumentStore — abstract CRUD storage for documents.

use super::{Document, StoreError};

/// Abstract CRUD storage for documents.
///
/// Writes are whole-document: `put` overwrites everything under the key
/// (last write wins, no field merge). Filtered listing goes through `find`;
/// ordering and limits are the caller's concern because not every backend
/// can compound-order without extra indexing.
pub trait DocumentStore: Send + Sync {
    /// Get a document by id. Returns `None` if absent.
    fn get<D: Document>(&self, id: &str) -> Result<Option<D>, StoreError>;

    /// Upsert a document (insert or whole-document overwrite).
    fn put<D: Document>(&self, doc: &D) -> Result<(), StoreError>;

    /// Insert a new document. Fails with [`StoreError::Conflict`] if a
    /// document with the same id already exists.
    fn insert<D: Document>(&self, doc: &D) -> Result<(), StoreError>;

    /// Delete a document by id. Returns whether it existed.
    fn delete<D: Document>(&self, id: &str) -> Result<bool, StoreError>;

    /// Find documents in `D`'s collection matching a predicate.
    fn find<D: Document>(&self, predicate: &dyn Fn(&D) -> bool) -> Result<Vec<D>, StoreError>;
}
