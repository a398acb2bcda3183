//! # Bridge Types Crate
//!
//! Domain types shared across the bridge subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-crate types are defined here.
//! - **Opaque identifiers**: accounts and wallets are opaque strings minted
//!   elsewhere (by the ledger node and the wallet clients respectively); the
//!   bridge never inspects their structure.
//! - **Verbatim payloads**: the original callback body is what gets
//!   republished, so the parsed views here only carry the fields the routing
//!   decision needs.

pub mod entities;

pub use entities::{Account, Block, BlockType, LedgerCallback, WalletId};
