//! # Entry Registry
//!
//! Process-level deduplication of resolution work. The registry hands out one
//! [`CacheEntry`] handle per URI; the handle serializes concurrent
//! resolutions of that URI so overlapping callers share a single in-flight
//! fetch instead of each hitting the network.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::fs;
use tracing::debug;

use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::store::CacheStore;
use crate::transport::{HttpTransport, create_client};

/// Resolution handle for a single URI.
///
/// Obtained from [`CacheRegistry::get`]; all resolution requests for a URI
/// pass through its one entry. A successful resolution is remembered, but the
/// remembered path is re-verified on disk before being returned, so a
/// whole-cache clear never yields a stale path.
pub struct CacheEntry {
    uri: String,
    store: Arc<CacheStore>,
    resolved: tokio::sync::Mutex<Option<PathBuf>>,
}

impl CacheEntry {
    fn new(uri: String, store: Arc<CacheStore>) -> Self {
        Self {
            uri,
            store,
            resolved: tokio::sync::Mutex::new(None),
        }
    }

    /// The source URI this entry resolves.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Resolve to a local file, downloading it if absent.
    ///
    /// The entry's lock is held across the store call, so concurrent callers
    /// for the same URI wait for the first fetch rather than starting their
    /// own; waiters then hit the existence short-circuit in the store.
    pub async fn resolve(&self) -> Result<Option<PathBuf>, CacheError> {
        let mut resolved = self.resolved.lock().await;

        if let Some(path) = resolved.as_ref() {
            if fs::try_exists(path).await.unwrap_or(false) {
                return Ok(Some(path.clone()));
            }
            // Backing file is gone (e.g. the cache was cleared); resolve anew.
            debug!(uri = %self.uri, path = ?path, "cached path is stale");
            *resolved = None;
        }

        let outcome = self.store.resolve_or_fetch(&self.uri).await?;
        if let Some(path) = &outcome {
            *resolved = Some(path.clone());
        }
        Ok(outcome)
    }
}

/// Owns the per-URI entry map and the underlying store.
///
/// An explicit object rather than process-global state: callers hold it (or a
/// clone of its `Arc`-wrapped self) for as long as the cache should live.
pub struct CacheRegistry {
    store: Arc<CacheStore>,
    entries: Mutex<HashMap<String, Arc<CacheEntry>>>,
}

impl CacheRegistry {
    /// Create a registry over an existing store.
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self {
            store,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Build a registry (client, transport, store) from configuration.
    pub fn with_config(config: CacheConfig) -> Result<Self, CacheError> {
        let client = create_client(&config)?;
        let transport = Arc::new(HttpTransport::new(client));
        let store = Arc::new(CacheStore::new(config.resolved_root(), transport));
        Ok(Self::new(store))
    }

    /// Return the entry for `uri`, creating it on first request.
    ///
    /// Keys are exact URI strings; no normalization is applied. Entries live
    /// for the registry's lifetime and are never evicted.
    pub fn get(&self, uri: &str) -> Arc<CacheEntry> {
        let mut entries = self.entries.lock();
        entries
            .entry(uri.to_owned())
            .or_insert_with(|| Arc::new(CacheEntry::new(uri.to_owned(), self.store.clone())))
            .clone()
    }

    /// Wipe the cache directory and recreate it empty.
    ///
    /// Existing entry handles stay valid; they re-verify their paths and
    /// re-fetch on next resolve.
    pub async fn clear_all(&self) -> Result<(), CacheError> {
        self.store.clear().await
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }
}
