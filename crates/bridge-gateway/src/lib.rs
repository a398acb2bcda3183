//! # Bridge Gateway - HTTP Surface
//!
//! Two endpoints, both fire-and-forget from the caller's perspective:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    GATEWAY                           │
//! ├─────────────────────────────────────────────────────┤
//! │  POST /callback      POST /rpc                       │
//! │  (ledger node)       (wallet clients)                │
//! │       │                   │                          │
//! │       ▼                   ▼                          │
//! │  Routing Bridge      action allowlist                │
//! │  (spawned task)           │                          │
//! │                           ▼                          │
//! │                      Ledger node (forwarded)         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! - `/callback` ALWAYS answers an empty object, whatever routing does:
//!   the ledger node gets no indication of routing success or failure.
//! - `/rpc` forwards a fixed set of actions to the ledger node and answers
//!   `{"error": "unknown action"}` for everything else — a structured error
//!   object, never an HTTP error status.

#![warn(clippy::all)]
#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod actions;
pub mod ledger;
pub mod router;

// Re-exports for public API
pub use actions::is_action_allowed;
pub use ledger::{GatewayError, HttpLedgerClient, LedgerRpc};
pub use router::{build_router, AppState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
