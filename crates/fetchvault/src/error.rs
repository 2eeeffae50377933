use std::io;
use std::path::PathBuf;

/// Errors that indicate the cache itself is unavailable, as opposed to a
/// single resource being unavailable (which surfaces as a `None` resolution).
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache root could not be created for a reason other than already
    /// existing, e.g. permissions or a full disk.
    #[error("cache root {path:?} unavailable: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Wiping or recreating the cache root failed. The root may be missing
    /// afterwards; the next `ensure_root` call repairs it.
    #[error("failed to clear cache root {path:?}: {source}")]
    ClearFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Transport-level failures while downloading into a staging file.
///
/// These never escape the store: together with non-success status codes they
/// are logged and surfaced to callers as a `None` resolution.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("i/o error while writing download: {0}")]
    Io(#[from] io::Error),
}
