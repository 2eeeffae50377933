//! # Cache Naming
//!
//! Derives deterministic on-disk names for remote resources. Given a URI this
//! module produces a content-addressed cache key (SHA-256 of the URI plus an
//! extension inferred from its path) and the pair of filesystem paths used by
//! the resolve-or-fetch protocol. No I/O is performed here.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};

/// Extension used when the URI's last path segment carries none.
const DEFAULT_EXTENSION: &str = ".jpg";

/// Process-wide counter disambiguating concurrent staging files.
static STAGING_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Deterministic identifier for a cached resource.
///
/// The digest is stable across processes; two resolutions of the same URI
/// always address the same final file. Distinct URIs colliding on the digest
/// is an accepted risk and is not mitigated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Hex-encoded SHA-256 digest of the source URI.
    pub digest: String,
    /// Inferred extension, including the leading dot.
    pub extension: String,
}

impl CacheKey {
    /// Derive the key for a URI.
    pub fn for_uri(uri: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(uri.as_bytes());
        let digest = hasher.finalize();

        Self {
            digest: format!("{digest:x}"),
            extension: infer_extension(uri),
        }
    }

    /// Filename stem plus extension for the durable cache file.
    pub fn file_name(&self) -> String {
        format!("{}{}", self.digest, self.extension)
    }

    /// A staging filename unique within this process.
    ///
    /// Every call yields a distinct name, so concurrent downloads of the same
    /// URI never collide on their partial files.
    pub fn staging_name(&self) -> String {
        let serial = STAGING_COUNTER.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}{}", self.digest, serial, self.extension)
    }
}

/// The two filesystem locations a resolution attempt works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePaths {
    /// Durable location, shared across all resolutions of the same URI.
    pub final_path: PathBuf,
    /// Ephemeral staging location, unique per derivation.
    pub temp_path: PathBuf,
}

impl CachePaths {
    /// Compute the path pair for `uri` under `root`.
    pub fn derive(root: &Path, uri: &str) -> Self {
        let key = CacheKey::for_uri(uri);
        Self {
            final_path: root.join(key.file_name()),
            temp_path: root.join(key.staging_name()),
        }
    }
}

/// Infer an extension from the URI's last path segment.
///
/// The segment is everything after the last `/`, truncated at the first `?`.
/// The extension runs from the last `.` within that segment; when the segment
/// has no dot the default `.jpg` is used.
fn infer_extension(uri: &str) -> String {
    let segment = match uri.rfind('/') {
        Some(idx) => &uri[idx + 1..],
        None => uri,
    };
    let segment = match segment.find('?') {
        Some(idx) => &segment[..idx],
        None => segment,
    };

    match segment.rfind('.') {
        Some(idx) => segment[idx..].to_string(),
        None => DEFAULT_EXTENSION.to_string(),
    }
}
