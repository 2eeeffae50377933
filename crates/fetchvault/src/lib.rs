//! # Fetchvault
//!
//! A content-addressed cache for remote resources: given a URI, fetchvault
//! ensures a byte-identical local copy exists on disk, downloading it at most
//! once and reusing the local file on every later request.
//!
//! ## Features
//!
//! - Deterministic, hash-derived filenames with inferred extensions
//! - Download-then-rename publish, so partial writes are never visible
//! - Per-URI entry handles that collapse concurrent fetches
//! - Whole-cache invalidation that handles in-flight downloads gracefully
//!
//! ## Example
//!
//! ```no_run
//! use fetchvault::{CacheConfig, CacheRegistry};
//!
//! # async fn run() -> Result<(), fetchvault::CacheError> {
//! let registry = CacheRegistry::with_config(CacheConfig::default())?;
//! let entry = registry.get("https://example.com/photos/cat.png");
//! match entry.resolve().await? {
//!     Some(path) => println!("cached at {}", path.display()),
//!     None => println!("resource unavailable"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod paths;
pub mod registry;
pub mod store;
pub mod transport;

#[cfg(test)]
pub(crate) mod testutil;

pub use builder::CacheConfigBuilder;
pub use config::CacheConfig;
pub use error::{CacheError, TransferError};
pub use paths::{CacheKey, CachePaths};
pub use registry::{CacheEntry, CacheRegistry};
pub use store::CacheStore;
pub use transport::{HttpTransport, Transport, create_client};
