//! In-memory [`EntryStore`] backed by `Arc<RwLock<Vec<StoredEntry>>>`.
//!
//! Nothing survives a restart. Used by the HTTP tests and for local runs
//! without a NATS server.

use std::fmt;
use std::sync::{Arc, RwLock};

use super::{EntryId, EntryStore, StoredEntry};
use crate::entry::Entry;

#[derive(Debug)]
pub struct MemoryStoreError(&'static str);

impl fmt::Display for MemoryStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryStore error: {}", self.0)
    }
}

impl std::error::Error for MemoryStoreError {}

const POISONED: MemoryStoreError = MemoryStoreError("lock poisoned");

#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<Vec<StoredEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EntryStore for MemoryStore {
    type Error = MemoryStoreError;

    async fn insert(&self, entry: &Entry) -> Result<EntryId, Self::Error> {
        let id = EntryId::generate();
        self.entries.write().map_err(|_| POISONED)?.push(StoredEntry {
            id: id.clone(),
            entry: entry.clone(),
        });
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<StoredEntry>, Self::Error> {
        Ok(self.entries.read().map_err(|_| POISONED)?.clone())
    }
}
