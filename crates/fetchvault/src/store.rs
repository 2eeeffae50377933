//! # Cache Store
//!
//! Owns the cache root directory and implements the resolve-or-fetch
//! protocol: check for the durable file, otherwise download into a staging
//! file and atomically publish it with a rename. Also implements whole-cache
//! invalidation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::fs;
use tokio::io;
use tracing::{debug, warn};

use crate::error::CacheError;
use crate::paths::CachePaths;
use crate::transport::Transport;

/// File cache addressed by URI digest.
///
/// A resolution failure for one URI never poisons the store; every call is a
/// single self-contained attempt against the shared root directory.
#[derive(Clone)]
pub struct CacheStore {
    root: PathBuf,
    transport: Arc<dyn Transport>,
    initialized: Arc<AtomicBool>,
}

impl CacheStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first use.
    pub fn new(root: PathBuf, transport: Arc<dyn Transport>) -> Self {
        Self {
            root,
            transport,
            initialized: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The root directory cached files live under.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Idempotently create the cache root.
    ///
    /// An already-existing root is success. Any other failure is surfaced as
    /// [`CacheError::DirectoryUnavailable`] rather than swallowed, since it
    /// means the cache as a whole cannot operate.
    pub async fn ensure_root(&self) -> Result<(), CacheError> {
        // Fast path - root was already created by this store.
        if self.initialized.load(Ordering::Acquire) {
            return Ok(());
        }

        fs::create_dir_all(&self.root)
            .await
            .map_err(|source| CacheError::DirectoryUnavailable {
                path: self.root.clone(),
                source,
            })?;

        self.initialized.store(true, Ordering::Release);
        Ok(())
    }

    /// Resolve `uri` to a local file, downloading it if absent.
    ///
    /// Returns `Ok(Some(path))` when a byte-identical local copy exists after
    /// the call, `Ok(None)` when no local copy could be produced (transport
    /// failure, non-success status, or a lost publish race). A hit returns
    /// immediately without network access or content re-verification.
    ///
    /// A single attempt, no retries: callers wanting retry call again, and a
    /// concurrently completed fetch short-circuits on the existence check.
    pub async fn resolve_or_fetch(&self, uri: &str) -> Result<Option<PathBuf>, CacheError> {
        self.ensure_root().await?;

        let paths = CachePaths::derive(&self.root, uri);

        match fs::try_exists(&paths.final_path).await {
            Ok(true) => {
                debug!(uri, path = ?paths.final_path, "cache hit");
                return Ok(Some(paths.final_path));
            }
            Ok(false) => {}
            Err(e) => {
                // Treat an unreadable entry as a miss and let the fetch
                // attempt surface anything persistent.
                warn!(path = ?paths.final_path, error = %e, "existence check failed");
            }
        }

        debug!(uri, "cache miss, fetching");
        let status = match self
            .transport
            .download_to_file(uri, &paths.temp_path)
            .await
        {
            Ok(status) => status,
            Err(e) => {
                warn!(uri, error = %e, "transfer failed");
                self.discard_staging(&paths.temp_path).await;
                return Ok(None);
            }
        };

        if !status.is_success() {
            warn!(uri, status = %status, "remote returned non-success status");
            self.discard_staging(&paths.temp_path).await;
            return Ok(None);
        }

        // Publish: the rename makes the fully-written file visible at the
        // final path in one step, so readers never observe a partial write.
        if let Err(e) = fs::rename(&paths.temp_path, &paths.final_path).await {
            warn!(
                from = ?paths.temp_path,
                to = ?paths.final_path,
                error = %e,
                "failed to publish downloaded file"
            );
            self.discard_staging(&paths.temp_path).await;
            return Ok(None);
        }

        debug!(uri, path = ?paths.final_path, "cached remote resource");
        Ok(Some(paths.final_path))
    }

    /// Wipe the cache root and recreate it empty.
    ///
    /// A missing root is not an error. On success the root exists and is
    /// empty; on failure the root may be missing, which the next
    /// [`ensure_root`](Self::ensure_root) repairs.
    pub async fn clear(&self) -> Result<(), CacheError> {
        self.initialized.store(false, Ordering::Release);

        match fs::remove_dir_all(&self.root).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(CacheError::ClearFailed {
                    path: self.root.clone(),
                    source,
                });
            }
        }

        fs::create_dir_all(&self.root)
            .await
            .map_err(|source| CacheError::ClearFailed {
                path: self.root.clone(),
                source,
            })?;

        self.initialized.store(true, Ordering::Release);
        debug!(root = ?self.root, "cache cleared");
        Ok(())
    }

    /// Best-effort removal of a staging file left by a failed resolution.
    async fn discard_staging(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != io::ErrorKind::NotFound {
                debug!(path = ?path, error = %e, "could not remove staging file");
            }
        }
    }
}
