//! Shared test fixtures: a scriptable in-memory transport and tracing setup.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::fs;

use crate::error::TransferError;
use crate::transport::Transport;

#[inline]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// What the fake network does for every request.
#[derive(Clone)]
enum Behavior {
    /// Write `body` to the destination and report 200.
    Serve { body: Vec<u8>, delay: Option<Duration> },
    /// Report `status` without writing anything.
    Status(StatusCode),
    /// Fail at the transport level.
    Fail,
}

/// Transport double that counts fetches and follows a scripted behavior.
#[derive(Clone)]
pub struct MockTransport {
    behavior: Behavior,
    fetches: Arc<AtomicUsize>,
}

impl MockTransport {
    pub fn serving(body: &[u8]) -> Self {
        Self::with_behavior(Behavior::Serve {
            body: body.to_vec(),
            delay: None,
        })
    }

    /// Like [`serving`](Self::serving), with a short pause before writing so
    /// concurrent callers overlap.
    pub fn serving_slowly(body: &[u8]) -> Self {
        Self::with_behavior(Behavior::Serve {
            body: body.to_vec(),
            delay: Some(Duration::from_millis(25)),
        })
    }

    pub fn status(status: StatusCode) -> Self {
        Self::with_behavior(Behavior::Status(status))
    }

    pub fn failing() -> Self {
        Self::with_behavior(Behavior::Fail)
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of fetches issued through this transport.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn download_to_file(
        &self,
        _url: &str,
        dest: &Path,
    ) -> Result<StatusCode, TransferError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            Behavior::Serve { body, delay } => {
                if let Some(delay) = delay {
                    tokio::time::sleep(*delay).await;
                }
                fs::write(dest, body).await?;
                Ok(StatusCode::OK)
            }
            Behavior::Status(status) => Ok(*status),
            Behavior::Fail => Err(TransferError::Io(std::io::Error::other(
                "simulated connection reset",
            ))),
        }
    }
}
