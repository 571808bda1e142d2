//! Persistence for [`Entry`] documents.
//!
//! The store is append-only: entries are inserted once and listed many
//! times, never updated or deleted.

mod memory;
mod nats;

pub use memory::{MemoryStore, MemoryStoreError};
pub use nats::{ConnectError, DEFAULT_BUCKET, ENTRY_KEY_PREFIX, NatsEntryStore, NatsStoreError, connect};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use uuid::Uuid;

use crate::entry::Entry;

/// Store-assigned identifier of a persisted entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entry together with the id the store assigned to it.
///
/// Serializes flat, which is the shape `GET /api/logs` returns:
/// `{"id": "...", "request_id": "...", "author": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub id: EntryId,
    #[serde(flatten)]
    pub entry: Entry,
}

/// Append-only entry persistence.
///
/// Handles are cloned into every request, so implementations must be cheap to
/// clone and safe to use from concurrent requests.
pub trait EntryStore: Send + Sync + Clone + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist `entry` and return the id assigned to it.
    fn insert(&self, entry: &Entry) -> impl Future<Output = Result<EntryId, Self::Error>> + Send;

    /// Every persisted entry, in no particular order.
    fn list_all(&self) -> impl Future<Output = Result<Vec<StoredEntry>, Self::Error>> + Send;
}
