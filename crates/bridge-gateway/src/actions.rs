//! Fixed allowlist of ledger-node actions the pass-through forwards.
//!
//! Read-only queries plus block submission. Anything that provisions or
//! mutates wallets on the node stays out of reach of bus clients.

/// Actions forwarded verbatim to the ledger node.
pub const FORWARDED_ACTIONS: &[&str] = &[
    "account_balance",
    "account_info",
    "account_history",
    "accounts_balances",
    "accounts_pending",
    "block_info",
    "blocks_info",
    "process",
];

/// Whether an action may be forwarded.
#[must_use]
pub fn is_action_allowed(action: &str) -> bool {
    FORWARDED_ACTIONS.contains(&action)
}
