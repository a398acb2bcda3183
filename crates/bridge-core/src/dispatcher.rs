//! # Bus Dispatcher
//!
//! Single loop over the inbound subscriptions. Ownership declarations are
//! handed to the ownership handler on a spawned task so the loop never
//! blocks on a store write; control and broadcast messages are logged only.

use crate::ownership::OwnershipUpdateHandler;
use crate::subscriptions::InboundSubscriptions;
use crate::topics::{BROADCAST_ACCOUNT_PARAM, WALLET_ID_PARAM};
use bridge_types::WalletId;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Routes inbound bus messages to the correct handler.
pub struct BusDispatcher {
    ownership: Arc<OwnershipUpdateHandler>,
}

impl BusDispatcher {
    /// Create a dispatcher over the ownership handler.
    pub fn new(ownership: Arc<OwnershipUpdateHandler>) -> Self {
        Self { ownership }
    }

    /// Spawn the dispatch loop on the runtime.
    #[must_use]
    pub fn spawn(self, subscriptions: InboundSubscriptions) -> JoinHandle<()> {
        tokio::spawn(self.run(subscriptions))
    }

    /// Run the dispatch loop until the bus closes.
    ///
    /// Messages on each channel are processed in arrival order; completions
    /// of the spawned store writes may interleave.
    pub async fn run(self, subscriptions: InboundSubscriptions) {
        let InboundSubscriptions {
            mut control,
            mut ownership,
            mut broadcast,
        } = subscriptions;

        info!("Bus dispatcher started");

        loop {
            tokio::select! {
                message = control.recv() => {
                    let Some((message, _)) = message else { break };
                    // Control commands are out of scope for routing.
                    info!(bytes = message.payload.len(), "Control message received");
                }
                message = ownership.recv() => {
                    let Some((message, params)) = message else { break };
                    let Some(id) = params.get(WALLET_ID_PARAM) else {
                        warn!(topic = %message.topic, "Ownership topic without wallet id");
                        continue;
                    };
                    let wallet = WalletId::from(id);
                    let handler = Arc::clone(&self.ownership);
                    // The store write must not stall the dispatch loop.
                    tokio::spawn(async move {
                        handler.handle(&wallet, &message.payload).await;
                    });
                }
                message = broadcast.recv() => {
                    let Some((message, params)) = message else { break };
                    // Broadcast forwarding is handled elsewhere; log only.
                    info!(
                        account = params.get(BROADCAST_ACCOUNT_PARAM).unwrap_or("?"),
                        bytes = message.payload.len(),
                        "Broadcast request received"
                    );
                }
            }
        }

        info!("Bus dispatcher stopped");
    }
}
