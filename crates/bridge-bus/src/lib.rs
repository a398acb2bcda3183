//! # Bridge Bus - Pub/Sub Transport Abstraction
//!
//! The bus is the multi-tenant transport connecting wallet clients, the
//! bridge, and other producers/consumers. Everything above this crate talks
//! to the two port traits; the concrete transport is swappable.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Wallet client│                    │ Bridge core  │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │     Bus      │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe("wallet/+id/accounts")
//! ```
//!
//! ## Delivery semantics
//!
//! - Fire-and-forget: there is no reply channel, so no error ever travels
//!   back to a producer.
//! - Per-message [`DeliveryOptions`] carry the QoS level and retention flag
//!   the transport should apply.
//! - Subscriptions filter by topic pattern; single-level `+name` wildcards
//!   capture named parameters for the dispatcher.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod publisher;
pub mod subscriber;
pub mod topic;

// Re-export main types
pub use publisher::{BusMessage, DeliveryOptions, InMemoryBus, MessagePublisher, QosLevel};
pub use subscriber::{BusError, MessageStream, MessageSubscriber, Subscription};
pub use topic::{TopicParams, TopicPattern, TopicPatternError};

/// Maximum messages to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
