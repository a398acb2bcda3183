//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: [`Account`], [`WalletId`]
//! - **Ledger**: [`BlockType`], [`Block`], [`LedgerCallback`]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a ledger account.
///
/// Immutable once minted by the ledger; the bridge treats it as a routing key
/// and never validates its structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Account(pub String);

impl Account {
    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Account {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier for a client-side wallet/session.
///
/// One wallet may own zero or more accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(pub String);

impl WalletId {
    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WalletId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The recognized block classifications.
///
/// Anything else on the wire is an unknown classification and is handled by
/// the routing bridge as an error, so unknown strings deliberately do not get
/// a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    /// First block of an account chain.
    Open,
    /// Transfer out of an account; carries the recipient as `destination`.
    Send,
    /// Transfer into an account.
    Receive,
    /// Change of representative; notifies no wallet.
    Change,
}

impl BlockType {
    /// Classify a wire-level type string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "send" => Some(Self::Send),
            "receive" => Some(Self::Receive),
            "change" => Some(Self::Change),
            _ => None,
        }
    }

    /// The literal type name used in outbound topic segments.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Send => "send",
            Self::Receive => "receive",
            Self::Change => "change",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed view of the inner block document.
///
/// Only the fields the routing decision needs; everything else in the block
/// is preserved by republishing the verbatim callback body.
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    /// Wire-level type string (`open`, `send`, `receive`, `change`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Recipient account; present on `send` blocks.
    #[serde(default)]
    pub destination: Option<Account>,
}

/// The ledger node's block callback body.
///
/// `block` is a JSON document encoded as a string, exactly as the node sends
/// it. Transient: lives only for the duration of one callback invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerCallback {
    /// The account the block was observed on.
    pub account: Account,
    /// Amount moved, as a decimal string.
    pub amount: String,
    /// The block itself, JSON-encoded as a string.
    pub block: String,
}
