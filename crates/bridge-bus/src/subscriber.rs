//! # Message Subscriber
//!
//! Defines the subscription side of the bus.

use crate::publisher::BusMessage;
use crate::topic::{TopicParams, TopicPattern, TopicPatternError};
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from bus operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The bus was closed.
    #[error("Bus closed")]
    Closed,
    /// The subscription filter was not a valid topic pattern.
    #[error("Invalid topic filter: {0}")]
    InvalidFilter(#[from] TopicPatternError),
    /// The underlying transport rejected the operation.
    #[error("Bus transport failure: {0}")]
    Transport(String),
}

/// Trait for subscribing to messages from the bus.
pub trait MessageSubscriber: Send + Sync {
    /// Subscribe to messages matching a topic filter.
    ///
    /// # Errors
    ///
    /// Returns an error when the filter is invalid or the transport is down.
    fn subscribe(&self, filter: &str) -> Result<Subscription, BusError>;
}

impl MessageSubscriber for crate::publisher::InMemoryBus {
    fn subscribe(&self, filter: &str) -> Result<Subscription, BusError> {
        self.subscribe_filter(filter)
    }
}

/// A subscription handle for receiving messages.
///
/// When dropped, the subscription is automatically cleaned up.
pub struct Subscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<BusMessage>,

    /// Compiled filter for this subscription.
    pattern: TopicPattern,

    /// Reference to subscription tracking (for cleanup).
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,
}

impl Subscription {
    /// Create a new subscription.
    pub(crate) fn new(
        receiver: broadcast::Receiver<BusMessage>,
        pattern: TopicPattern,
        subscriptions: Arc<RwLock<HashMap<String, usize>>>,
    ) -> Self {
        Self {
            receiver,
            pattern,
            subscriptions,
        }
    }

    /// Receive the next message whose topic matches the filter.
    ///
    /// # Returns
    ///
    /// - `Some((message, params))` - the next matching message plus wildcard
    ///   captures from the filter
    /// - `None` - the channel was closed (bus dropped)
    pub async fn recv(&mut self) -> Option<(BusMessage, TopicParams)> {
        loop {
            let message = match self.receiver.recv().await {
                Ok(m) => m,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some messages dropped");
                    continue;
                }
            };

            if let Some(params) = self.pattern.matches(&message.topic) {
                return Some((message, params));
            }
            // Topic doesn't match filter, continue waiting
        }
    }

    /// Try to receive the next matching message without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(..))` - a message was available and matched
    /// - `Ok(None)` - no message available (would block)
    /// - `Err(BusError::Closed)` - the channel was closed
    pub fn try_recv(&mut self) -> Result<Option<(BusMessage, TopicParams)>, BusError> {
        loop {
            let message = match self.receiver.try_recv() {
                Ok(m) => m,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => return Err(BusError::Closed),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if let Some(params) = self.pattern.matches(&message.topic) {
                return Ok(Some((message, params)));
            }
            // Topic doesn't match filter, try again
        }
    }

    /// The filter pattern for this subscription.
    #[must_use]
    pub fn pattern(&self) -> &TopicPattern {
        &self.pattern
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Decrement subscription count
        let Ok(mut subs) = self.subscriptions.write() else {
            return;
        };
        let Some(count) = subs.get_mut(self.pattern.as_str()) else {
            debug!(filter = %self.pattern.as_str(), "Subscription dropped");
            return;
        };

        *count = count.saturating_sub(1);
        if *count == 0 {
            subs.remove(self.pattern.as_str());
        }
        debug!(filter = %self.pattern.as_str(), "Subscription dropped");
    }
}

/// A stream wrapper for subscriptions.
///
/// Implements `tokio_stream::Stream` for use with stream combinators.
pub struct MessageStream {
    subscription: Subscription,
}

impl MessageStream {
    /// Create a new message stream from a subscription.
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }

    /// The filter pattern for this stream.
    #[must_use]
    pub fn pattern(&self) -> &TopicPattern {
        self.subscription.pattern()
    }
}

impl Stream for MessageStream {
    type Item = (BusMessage, TopicParams);

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // Use try_recv for non-blocking check
        match self.subscription.try_recv() {
            Ok(Some(item)) => Poll::Ready(Some(item)),
            Ok(None) => {
                // No message ready, need to wait
                cx.waker().wake_by_ref();
                Poll::Pending
            }
            Err(BusError::Closed) => Poll::Ready(None),
            Err(_) => Poll::Ready(None),
        }
    }
}
