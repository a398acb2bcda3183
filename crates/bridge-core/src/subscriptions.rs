//! # Subscription Manager
//!
//! Registers the three inbound topic families at most once per instance.

use crate::topics::{BROADCAST_FILTER, CONTROL_TOPIC, WALLET_ACCOUNTS_FILTER};
use bridge_bus::{BusError, MessageSubscriber, Subscription};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// The three inbound subscription handles, in topic-family order.
pub struct InboundSubscriptions {
    /// Operator control commands (`canoecontrol`).
    pub control: Subscription,
    /// Wallet ownership declarations (`wallet/+id/accounts`).
    pub ownership: Subscription,
    /// Broadcast requests (`broadcast/+account`).
    pub broadcast: Subscription,
}

/// Idempotent registrar for the bridge's inbound subscriptions.
///
/// The one-shot flag is owned by the instance, not the process, so every
/// test can construct a fresh manager.
pub struct SubscriptionManager {
    bus: Arc<dyn MessageSubscriber>,
    subscribed: AtomicBool,
}

impl SubscriptionManager {
    /// Create a manager over the given subscriber capability.
    pub fn new(bus: Arc<dyn MessageSubscriber>) -> Self {
        Self {
            bus,
            subscribed: AtomicBool::new(false),
        }
    }

    /// Register interest in the three inbound topic families.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(subscriptions))` - first call; the three handles
    /// - `Ok(None)` - already subscribed; the bus is not touched
    ///
    /// # Errors
    ///
    /// A subscribe failure clears the flag again so a later call can retry.
    pub fn ensure_subscribed(&self) -> Result<Option<InboundSubscriptions>, BusError> {
        if self.subscribed.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }

        let result = self.subscribe_all();
        if result.is_err() {
            self.subscribed.store(false, Ordering::SeqCst);
        }
        result.map(Some)
    }

    fn subscribe_all(&self) -> Result<InboundSubscriptions, BusError> {
        let control = self.bus.subscribe(CONTROL_TOPIC)?;
        let ownership = self.bus.subscribe(WALLET_ACCOUNTS_FILTER)?;
        let broadcast = self.bus.subscribe(BROADCAST_FILTER)?;

        info!(
            control = CONTROL_TOPIC,
            ownership = WALLET_ACCOUNTS_FILTER,
            broadcast = BROADCAST_FILTER,
            "Inbound bus subscriptions registered"
        );

        Ok(InboundSubscriptions {
            control,
            ownership,
            broadcast,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_bus::InMemoryBus;

    #[tokio::test]
    async fn test_first_call_subscribes_three_families() {
        let bus = Arc::new(InMemoryBus::new());
        let manager = SubscriptionManager::new(bus.clone());

        let subs = manager.ensure_subscribed().unwrap();
        assert!(subs.is_some());

        assert_eq!(bus.subscription_count(CONTROL_TOPIC), 1);
        assert_eq!(bus.subscription_count(WALLET_ACCOUNTS_FILTER), 1);
        assert_eq!(bus.subscription_count(BROADCAST_FILTER), 1);
    }

    #[tokio::test]
    async fn test_second_call_is_noop() {
        let bus = Arc::new(InMemoryBus::new());
        let manager = SubscriptionManager::new(bus.clone());

        let first = manager.ensure_subscribed().unwrap();
        assert!(first.is_some());
        let second = manager.ensure_subscribed().unwrap();
        assert!(second.is_none());

        // Still exactly one subscription per topic family.
        assert_eq!(bus.subscription_count(CONTROL_TOPIC), 1);
        assert_eq!(bus.subscription_count(WALLET_ACCOUNTS_FILTER), 1);
        assert_eq!(bus.subscription_count(BROADCAST_FILTER), 1);
    }

    #[tokio::test]
    async fn test_fresh_instance_subscribes_again() {
        let bus = Arc::new(InMemoryBus::new());

        let first_manager = SubscriptionManager::new(bus.clone());
        let _held = first_manager.ensure_subscribed().unwrap();

        // The flag is per instance, not per process.
        let second_manager = SubscriptionManager::new(bus.clone());
        let subs = second_manager.ensure_subscribed().unwrap();
        assert!(subs.is_some());
        assert_eq!(bus.subscription_count(CONTROL_TOPIC), 2);
    }
}
