//! # Ownership Update Handler
//!
//! Applies wallet-declares-accounts messages to the account index.

use crate::error::BridgeError;
use crate::ports::{AccountIndex, ErrorSink};
use bridge_types::{Account, WalletId};
use std::sync::Arc;
use tracing::{error, info};

/// Consumes ownership declarations and upserts the account index.
///
/// The payload must parse as an ordered sequence of account identifiers; a
/// parse failure is logged and the message is dropped (no retry, no
/// dead-lettering). The write is fire-and-forget from the dispatcher's
/// point of view: its outcome is only logged and recorded in the sink.
pub struct OwnershipUpdateHandler {
    index: Arc<dyn AccountIndex>,
    sink: Arc<dyn ErrorSink>,
}

impl OwnershipUpdateHandler {
    /// Create a handler over an index-write capability.
    pub fn new(index: Arc<dyn AccountIndex>, sink: Arc<dyn ErrorSink>) -> Self {
        Self { index, sink }
    }

    /// Process one declaration from `wallet` with the raw bus payload.
    pub async fn handle(&self, wallet: &WalletId, payload: &[u8]) {
        match self.apply(wallet, payload).await {
            Ok(count) => {
                info!(wallet = %wallet, accounts = count, "Ownership declaration applied");
            }
            Err(e) => {
                error!(wallet = %wallet, error = %e, "Ownership declaration dropped");
                self.sink.record(&e);
            }
        }
    }

    async fn apply(&self, wallet: &WalletId, payload: &[u8]) -> Result<usize, BridgeError> {
        let accounts: Vec<Account> = serde_json::from_slice(payload)
            .map_err(|e| BridgeError::malformed("ownership declaration", e))?;

        self.index.put_many(&accounts, wallet).await?;
        Ok(accounts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::InMemoryAccountIndex;
    use crate::ports::CollectingSink;

    fn handler() -> (
        OwnershipUpdateHandler,
        Arc<InMemoryAccountIndex>,
        Arc<CollectingSink>,
    ) {
        let index = Arc::new(InMemoryAccountIndex::new());
        let sink = Arc::new(CollectingSink::new());
        let handler = OwnershipUpdateHandler::new(index.clone(), sink.clone());
        (handler, index, sink)
    }

    #[tokio::test]
    async fn test_declaration_creates_records() {
        let (handler, index, sink) = handler();
        let wallet = WalletId::from("W5");

        handler.handle(&wallet, br#"["A1","A2","A3"]"#).await;

        assert!(sink.is_empty());
        for account in ["A1", "A2", "A3"] {
            let owner = index.lookup(&Account::from(account)).await.unwrap();
            assert_eq!(owner, Some(wallet.clone()));
        }
    }

    #[tokio::test]
    async fn test_malformed_payload_dropped() {
        let (handler, index, sink) = handler();

        handler.handle(&WalletId::from("W5"), b"not-json").await;

        // Index untouched, one recorded failure, no fault propagated.
        assert!(index.is_empty());
        assert_eq!(sink.len(), 1);
        assert!(matches!(
            sink.errors()[0],
            BridgeError::MalformedInput { .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_declaration_is_valid() {
        let (handler, index, sink) = handler();

        handler.handle(&WalletId::from("W5"), b"[]").await;

        assert!(sink.is_empty());
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_redeclaration_moves_ownership() {
        let (handler, index, _sink) = handler();

        handler.handle(&WalletId::from("W1"), br#"["A1"]"#).await;
        handler.handle(&WalletId::from("W2"), br#"["A1"]"#).await;

        let owner = index.lookup(&Account::from("A1")).await.unwrap();
        assert_eq!(owner, Some(WalletId::from("W2")));
    }
}
