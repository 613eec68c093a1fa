//! The vector store seam used by the note service.
//!
//! A store is configured with its embedding provider, so every call takes
//! text and the store embeds it internally.

use crate::error::StoreResult;
use serde::{Deserialize, Serialize};

/// One ranked hit from [`VectorStore::query`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    pub document: String,
    pub distance: f32,
}

/// A stored document as returned by [`VectorStore::get_all`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredNote {
    pub id: String,
    pub document: String,
}

/// Persistent nearest-neighbour store of (id, document, embedding) records.
pub trait VectorStore: Send + Sync {
    /// Up to `k` records nearest to `text`, nearest first.
    fn query(&self, text: &str, k: usize) -> StoreResult<Vec<QueryMatch>>;

    /// Insert a record, replacing any record with the same id.
    fn upsert(&self, id: &str, document: &str) -> StoreResult<()>;

    /// Remove a record. Absent ids are not an error.
    fn delete(&self, id: &str) -> StoreResult<()>;

    /// Every record in store order.
    fn get_all(&self) -> StoreResult<Vec<StoredNote>>;

    /// Number of stored records.
    fn count(&self) -> StoreResult<usize> {
        Ok(self.get_all()?.len())
    }
}
