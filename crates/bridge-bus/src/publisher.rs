//! # Message Publisher
//!
//! Defines the publishing side of the bus.

use crate::subscriber::{BusError, Subscription};
use crate::topic::TopicPattern;
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Quality-of-service level requested for a published message.
///
/// The in-memory transport treats all levels identically; a distributed
/// transport maps these onto its own delivery guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QosLevel {
    /// Best effort, may be dropped.
    AtMostOnce,
    /// Redelivered until acknowledged, may duplicate.
    AtLeastOnce,
    /// Delivered exactly once.
    ExactlyOnce,
}

/// Per-message delivery options: QoS level plus retention flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryOptions {
    /// Requested quality-of-service level.
    pub qos: QosLevel,
    /// Whether the transport should retain the message for late subscribers.
    pub retain: bool,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self {
            qos: QosLevel::AtMostOnce,
            retain: false,
        }
    }
}

/// A message traveling over the bus.
#[derive(Debug, Clone)]
pub struct BusMessage {
    /// Concrete topic the message was published on.
    pub topic: String,
    /// Raw payload bytes; the bus never interprets them.
    pub payload: Vec<u8>,
    /// Delivery options for this message.
    pub options: DeliveryOptions,
}

impl BusMessage {
    /// Create a message with the given topic, payload, and options.
    #[must_use]
    pub fn new(topic: impl Into<String>, payload: Vec<u8>, options: DeliveryOptions) -> Self {
        Self {
            topic: topic.into(),
            payload,
            options,
        }
    }
}

/// Trait for publishing messages to the bus.
///
/// Fire-and-forget: the bus has no reply channel, so failures surface only
/// to the publishing side.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Publish a message to the bus.
    ///
    /// # Returns
    ///
    /// The number of active subscribers that received the message.
    async fn publish(&self, message: BusMessage) -> Result<usize, BusError>;

    /// Get the total number of messages published.
    fn messages_published(&self) -> u64;
}

/// In-memory implementation of the bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer
/// semantics. Suitable for single-node operation; distributed deployments
/// would plug an external broker client behind the same traits.
pub struct InMemoryBus {
    /// Broadcast sender for messages.
    sender: broadcast::Sender<BusMessage>,

    /// Active subscription count by filter string.
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    /// Total messages published.
    messages_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryBus {
    /// Create a new in-memory bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            messages_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to messages matching a topic filter.
    ///
    /// The filter may contain single-level `+name` wildcards.
    ///
    /// # Errors
    ///
    /// Returns an error when the filter is not a valid topic pattern.
    pub fn subscribe_filter(&self, filter: &str) -> Result<Subscription, BusError> {
        let pattern = TopicPattern::parse(filter)?;
        let receiver = self.sender.subscribe();

        // Track subscription
        {
            if let Ok(mut subs) = self.subscriptions.write() {
                *subs.entry(filter.to_string()).or_insert(0) += 1;
            }
        }

        debug!(filter = %filter, "New subscription created");

        Ok(Subscription::new(
            receiver,
            pattern,
            self.subscriptions.clone(),
        ))
    }

    /// Get the number of live subscriptions for an exact filter string.
    #[must_use]
    pub fn subscription_count(&self, filter: &str) -> usize {
        self.subscriptions
            .read()
            .map(|subs| subs.get(filter).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Get the number of active subscribers across all filters.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePublisher for InMemoryBus {
    async fn publish(&self, message: BusMessage) -> Result<usize, BusError> {
        let topic = message.topic.clone();

        // Always increment counter (publish was attempted)
        self.messages_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(message) {
            Ok(receiver_count) => {
                debug!(
                    topic = %topic,
                    receivers = receiver_count,
                    "Message published"
                );
                Ok(receiver_count)
            }
            Err(e) => {
                // No receivers - message is dropped
                warn!(
                    topic = %topic,
                    error = %e,
                    "Message dropped (no receivers)"
                );
                Ok(0)
            }
        }
    }

    fn messages_published(&self) -> u64 {
        self.messages_published.load(Ordering::Relaxed)
    }
}
