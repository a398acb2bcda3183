//! Topic layout of the bridge.
//!
//! Three inbound families are consumed (control, ownership declarations,
//! broadcast requests); outbound block notifications go to wallet-scoped
//! topics, all with the same fixed delivery options.

use bridge_bus::{DeliveryOptions, QosLevel};
use bridge_types::{BlockType, WalletId};

/// Fixed control topic for operator commands.
pub const CONTROL_TOPIC: &str = "canoecontrol";

/// Wildcard filter for wallet ownership declarations.
pub const WALLET_ACCOUNTS_FILTER: &str = "wallet/+id/accounts";

/// Name of the wallet-id wildcard in [`WALLET_ACCOUNTS_FILTER`].
pub const WALLET_ID_PARAM: &str = "id";

/// Wildcard filter for broadcast requests.
pub const BROADCAST_FILTER: &str = "broadcast/+account";

/// Name of the account wildcard in [`BROADCAST_FILTER`].
pub const BROADCAST_ACCOUNT_PARAM: &str = "account";

/// Delivery options shared by all outbound block notifications.
pub const BLOCK_DELIVERY: DeliveryOptions = DeliveryOptions {
    qos: QosLevel::ExactlyOnce,
    retain: false,
};

/// Wallet-scoped topic a block notification is republished on.
#[must_use]
pub fn wallet_block_topic(wallet: &WalletId, block_type: BlockType) -> String {
    format!("wallet/{wallet}/block/{block_type}")
}
