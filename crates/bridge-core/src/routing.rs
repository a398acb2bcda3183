//! # Routing Bridge
//!
//! Classifies inbound block callbacks and republishes them to the owning
//! wallet's topic. This is the one state machine of the core: four block
//! types, each a one-shot transition; the only state that persists between
//! calls is the account index itself.

use crate::error::BridgeError;
use crate::ports::{AccountIndex, ErrorSink};
use crate::topics::{wallet_block_topic, BLOCK_DELIVERY};
use bridge_bus::{BusMessage, MessagePublisher};
use bridge_types::{Account, Block, BlockType, LedgerCallback};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Where one callback ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Republished to the owning wallet's topic.
    Published {
        /// The wallet-scoped topic the notification went to.
        topic: String,
    },
    /// A representative change; no wallet is notified.
    ChangeIgnored,
    /// No wallet owns the routing account; silently not published.
    Untracked,
}

/// Consumes ledger callbacks and routes them through the account index to
/// wallet-scoped bus topics.
pub struct RoutingBridge {
    index: Arc<dyn AccountIndex>,
    publisher: Arc<dyn MessagePublisher>,
    sink: Arc<dyn ErrorSink>,
}

impl RoutingBridge {
    /// Create a bridge over an index-read and a bus-publish capability.
    pub fn new(
        index: Arc<dyn AccountIndex>,
        publisher: Arc<dyn MessagePublisher>,
        sink: Arc<dyn ErrorSink>,
    ) -> Self {
        Self {
            index,
            publisher,
            sink,
        }
    }

    /// Handle one ledger callback.
    ///
    /// Failures are contained here: logged, recorded in the sink, and
    /// dropped. Later callbacks are never affected.
    pub async fn handle(&self, callback: &LedgerCallback) {
        match self.route(callback).await {
            Ok(RouteOutcome::Published { topic }) => {
                debug!(account = %callback.account, topic = %topic, "Block notification routed");
            }
            Ok(RouteOutcome::ChangeIgnored) => {
                info!(account = %callback.account, "Representative change, no wallet notified");
            }
            Ok(RouteOutcome::Untracked) => {
                debug!(account = %callback.account, "Routing account not tracked by any wallet");
            }
            Err(e) => {
                error!(account = %callback.account, error = %e, "Block callback dropped");
                self.sink.record(&e);
            }
        }
    }

    /// Routing decision for one callback.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::MalformedInput`] - unparseable block JSON, or a
    ///   `send` block without a destination
    /// - [`BridgeError::UnknownBlockType`] - type outside the recognized set
    /// - [`BridgeError::Index`] / [`BridgeError::Bus`] - downstream failure
    pub async fn route(&self, callback: &LedgerCallback) -> Result<RouteOutcome, BridgeError> {
        let block: Block = serde_json::from_str(&callback.block)
            .map_err(|e| BridgeError::malformed("block payload", e))?;

        let Some(block_type) = BlockType::parse(&block.kind) else {
            return Err(BridgeError::UnknownBlockType(block.kind));
        };

        let routing_account = match block_type {
            // The account itself learns of opens and receives.
            BlockType::Open | BlockType::Receive => callback.account.clone(),
            // The sender already knows about the send; the notification
            // must reach the recipient's wallet.
            BlockType::Send => self.send_destination(&block)?,
            BlockType::Change => return Ok(RouteOutcome::ChangeIgnored),
        };

        let Some(wallet) = self.index.lookup(&routing_account).await? else {
            return Ok(RouteOutcome::Untracked);
        };

        // Republish the original notification, re-serialized verbatim.
        let payload =
            serde_json::to_vec(callback).map_err(|e| BridgeError::malformed("block payload", e))?;
        let topic = wallet_block_topic(&wallet, block_type);
        self.publisher
            .publish(BusMessage::new(topic.clone(), payload, BLOCK_DELIVERY))
            .await?;

        Ok(RouteOutcome::Published { topic })
    }

    fn send_destination(&self, block: &Block) -> Result<Account, BridgeError> {
        block
            .destination
            .clone()
            .ok_or_else(|| BridgeError::malformed("block payload", "send block without destination"))
    }
}
