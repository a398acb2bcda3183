//! # Account Index Adapters
//!
//! Key convention plus the in-memory implementation of the index port.

use crate::ports::{AccountIndex, IndexError};
use async_trait::async_trait;
use bridge_types::{Account, WalletId};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// Namespace prefix for ownership records in the backing store.
pub const ACCOUNT_KEY_PREFIX: &str = "accounts:";

/// Storage key for an account's ownership record.
#[must_use]
pub fn account_key(account: &Account) -> String {
    format!("{ACCOUNT_KEY_PREFIX}{account}")
}

/// In-memory implementation of the account index.
///
/// Suitable for single-node operation and tests; a shared deployment would
/// put a remote key-value store behind the same trait. Never fails.
#[derive(Debug, Default)]
pub struct InMemoryAccountIndex {
    entries: RwLock<HashMap<String, WalletId>>,
}

impl InMemoryAccountIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ownership records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// True when no account is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AccountIndex for InMemoryAccountIndex {
    async fn lookup(&self, account: &Account) -> Result<Option<WalletId>, IndexError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;
        Ok(entries.get(&account_key(account)).cloned())
    }

    async fn put_many(&self, accounts: &[Account], wallet: &WalletId) -> Result<(), IndexError> {
        // Each key write is atomic; the batch as a whole is not.
        let mut entries = self
            .entries
            .write()
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;
        for account in accounts {
            entries.insert(account_key(account), wallet.clone());
        }
        debug!(wallet = %wallet, accounts = accounts.len(), "Ownership records upserted");
        Ok(())
    }
}
