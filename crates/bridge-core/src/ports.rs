//! Outbound ports (SPI) for the routing core.
//!
//! Each component holds only the capability it needs: the routing bridge
//! holds an index-read and a bus-publish capability, the ownership handler
//! an index-write capability. Concrete transports live behind these traits.

use crate::error::BridgeError;
use async_trait::async_trait;
use bridge_types::{Account, WalletId};
use std::sync::Mutex;
use thiserror::Error;
use tracing::error;

/// Errors from the account index store.
///
/// Absence of a record is NOT an error; it is `Ok(None)` on lookup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// The backing store could not be reached or rejected the operation.
    #[error("Account index unavailable: {0}")]
    Unavailable(String),
}

/// The durable account→wallet associative store.
///
/// Backed by a shared remote store in production; every operation may fail
/// with a distinguishable [`IndexError`]. Writes are atomic per key; a batch
/// is not atomic across keys (partial application on failure is acceptable).
#[async_trait]
pub trait AccountIndex: Send + Sync {
    /// Point read of the wallet currently owning `account`.
    async fn lookup(&self, account: &Account) -> Result<Option<WalletId>, IndexError>;

    /// Create or overwrite the ownership record of every account in the
    /// batch to point at `wallet`. Last writer wins; no conflict detection.
    async fn put_many(&self, accounts: &[Account], wallet: &WalletId) -> Result<(), IndexError>;
}

/// Sink for failures on fire-and-forget paths.
///
/// Delivery stays fire-and-forget (the bus has no reply channel), but
/// failures are observable here so tests can assert on them without
/// scraping logs.
pub trait ErrorSink: Send + Sync {
    /// Record one contained failure.
    fn record(&self, error: &BridgeError);
}

/// Production sink: failures become error-level log lines.
#[derive(Debug, Default)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn record(&self, err: &BridgeError) {
        error!(error = %err, "Bridge operation failed");
    }
}

/// Sink that collects failures for inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    errors: Mutex<Vec<BridgeError>>,
}

impl CollectingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded failures.
    #[must_use]
    pub fn errors(&self) -> Vec<BridgeError> {
        self.errors.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// True when nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ErrorSink for CollectingSink {
    fn record(&self, err: &BridgeError) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(err.clone());
        }
    }
}
