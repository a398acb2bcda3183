//! # Bridge Core - Account Routing
//!
//! Routes ledger block notifications to the wallet that owns the affected
//! account, and keeps the account→wallet index current as wallets declare
//! ownership over the bus.
//!
//! ## Architecture Role
//!
//! ```text
//! [Ledger node] ──block callback──→ [Routing Bridge]
//!                                        │ lookup
//!                                        ▼
//!                                  [Account Index]
//!                                        │ owner found
//!                                        ▼
//!                              bus: wallet/<w>/block/<type>
//!
//! [Wallet client] ──wallet/<id>/accounts──→ [Dispatcher]
//!                                                │
//!                                                ▼
//!                                    [Ownership Update Handler]
//!                                                │ put_many
//!                                                ▼
//!                                          [Account Index]
//! ```
//!
//! ## Failure containment
//!
//! Every handler contains its own failures: malformed payloads, unknown
//! block types, and store/bus connectivity errors are logged, recorded in
//! the injected [`ErrorSink`], and dropped. One bad message never affects
//! processing of the next, and no error is ever surfaced back through the
//! bus (it has no reply channel).

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod dispatcher;
pub mod error;
pub mod index;
pub mod ownership;
pub mod ports;
pub mod routing;
pub mod subscriptions;
pub mod topics;

// Re-export main types
pub use dispatcher::BusDispatcher;
pub use error::BridgeError;
pub use index::{account_key, InMemoryAccountIndex};
pub use ownership::OwnershipUpdateHandler;
pub use ports::{AccountIndex, CollectingSink, ErrorSink, IndexError, LogSink};
pub use routing::{RouteOutcome, RoutingBridge};
pub use subscriptions::{InboundSubscriptions, SubscriptionManager};
