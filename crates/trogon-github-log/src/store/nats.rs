//! [`EntryStore`] backed by a NATS JetStream key-value bucket.
//!
//! Each entry is one JSON document under `entries.<id>`. Inserts use
//! create-only semantics, so an existing document is never overwritten.

use async_nats::jetstream::{self, kv};
use async_nats::{Client, ConnectOptions, Event};
use futures::TryStreamExt;
use std::time::Duration;
use tracing::{info, instrument, warn};

use super::{EntryId, EntryStore, StoredEntry};
use crate::config::StoreConfig;
use crate::entry::Entry;

pub const DEFAULT_BUCKET: &str = "webhook";
pub const ENTRY_KEY_PREFIX: &str = "entries.";

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum NatsStoreError {
    #[error("KV bucket error: {0}")]
    Bucket(String),
    #[error("KV write error: {0}")]
    Write(String),
    #[error("KV read error: {0}")]
    Read(String),
    #[error("Corrupt document under key {key}: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to connect to NATS servers {servers:?}: {source}")]
pub struct ConnectError {
    servers: Vec<String>,
    source: async_nats::ConnectError,
}

fn reconnect_delay(attempts: usize) -> Duration {
    Duration::from_secs(std::cmp::min(
        MAX_RECONNECT_DELAY.as_secs(),
        2u64.saturating_pow(attempts.min(u32::MAX as usize) as u32),
    ))
}

async fn log_event(event: Event) {
    match event {
        Event::Connected => info!("NATS connected"),
        Event::Disconnected => warn!("NATS disconnected - will attempt reconnect"),
        Event::ServerError(err) => warn!(error = %err, "NATS server error"),
        Event::ClientError(err) => warn!(error = %err, "NATS client error"),
        Event::SlowConsumer(sid) => warn!(sid, "NATS slow consumer detected"),
        Event::LameDuckMode => warn!("NATS server entering lame duck mode"),
        Event::Closed => info!("NATS connection closed"),
        Event::Draining => info!("NATS connection draining"),
    }
}

/// Connect to the servers named by the store connection string.
///
/// The client keeps reconnecting in the background; store calls made while
/// disconnected fail and surface as store errors.
#[instrument(name = "store.connect", skip_all, fields(servers = ?config.servers))]
pub async fn connect(config: &StoreConfig) -> Result<Client, ConnectError> {
    info!("Connecting to NATS");

    ConnectOptions::new()
        .retry_on_initial_connect()
        .connection_timeout(CONNECTION_TIMEOUT)
        .reconnect_delay_callback(reconnect_delay)
        .event_callback(|event| async move { log_event(event).await })
        .connect(&config.servers)
        .await
        .map_err(|source| {
            warn!(error = %source, "Failed to connect to NATS");
            ConnectError {
                servers: config.servers.clone(),
                source,
            }
        })
}

#[derive(Clone)]
pub struct NatsEntryStore {
    kv: kv::Store,
}

impl NatsEntryStore {
    /// Open `bucket`, creating it if it does not exist yet.
    pub async fn open(nats: Client, bucket: &str) -> Result<Self, NatsStoreError> {
        let js = jetstream::new(nats);
        let kv = match js
            .create_key_value(kv::Config {
                bucket: bucket.to_string(),
                history: 1,
                ..Default::default()
            })
            .await
        {
            Ok(kv) => kv,
            Err(_) => js
                .get_key_value(bucket)
                .await
                .map_err(|e| NatsStoreError::Bucket(e.to_string()))?,
        };

        info!(bucket, "Entry bucket ready");
        Ok(Self { kv })
    }

    async fn read(&self, key: String) -> Result<Option<StoredEntry>, NatsStoreError> {
        let Some(value) = self
            .kv
            .get(&key)
            .await
            .map_err(|e| NatsStoreError::Read(e.to_string()))?
        else {
            return Ok(None);
        };

        let entry: Entry = serde_json::from_slice(&value)
            .map_err(|source| NatsStoreError::Corrupt { key: key.clone(), source })?;
        let id = key.strip_prefix(ENTRY_KEY_PREFIX).unwrap_or(&key).to_string();

        Ok(Some(StoredEntry {
            id: EntryId::from(id),
            entry,
        }))
    }
}

impl EntryStore for NatsEntryStore {
    type Error = NatsStoreError;

    async fn insert(&self, entry: &Entry) -> Result<EntryId, Self::Error> {
        let id = EntryId::generate();
        let value = serde_json::to_vec(entry)?;

        self.kv
            .create(format!("{ENTRY_KEY_PREFIX}{id}"), value.into())
            .await
            .map_err(|e| NatsStoreError::Write(e.to_string()))?;

        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<StoredEntry>, Self::Error> {
        let keys: Vec<String> = self
            .kv
            .keys()
            .await
            .map_err(|e| NatsStoreError::Read(e.to_string()))?
            .map_err(|e| NatsStoreError::Read(e.to_string()))
            .try_filter(|key| std::future::ready(key.starts_with(ENTRY_KEY_PREFIX)))
            .try_collect()
            .await?;

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            // Keys listed a moment ago can vanish if the bucket is purged externally.
            if let Some(stored) = self.read(key).await? {
                entries.push(stored);
            }
        }
        Ok(entries)
    }
}
