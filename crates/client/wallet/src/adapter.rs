//! Wallet adapter contract.
//!
//! An adapter is the facade over one wallet implementation speaking the
//! wallet-standard protocol. The stores only call the operations listed on
//! [`WalletAdapter`]; signing itself always happens inside the wallet.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tokio::sync::broadcast;

use client_blockchain_core::{ExecuteOptions, TransactionBlock, TransactionResponse};

use crate::error::AdapterError;

/// Wallet-standard feature identifiers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum Feature {
    #[strum(serialize = "standard:connect")]
    #[serde(rename = "standard:connect")]
    Connect,
    #[strum(serialize = "standard:disconnect")]
    #[serde(rename = "standard:disconnect")]
    Disconnect,
    #[strum(serialize = "standard:events")]
    #[serde(rename = "standard:events")]
    Events,
    #[strum(serialize = "sui:signAndExecuteTransactionBlock")]
    #[serde(rename = "sui:signAndExecuteTransactionBlock")]
    SignAndExecuteTransactionBlock,
    #[strum(serialize = "sui:signTransactionBlock")]
    #[serde(rename = "sui:signTransactionBlock")]
    SignTransactionBlock,
    #[strum(serialize = "sui:signMessage")]
    #[serde(rename = "sui:signMessage")]
    SignMessage,
    #[strum(serialize = "sui:signPersonalMessage")]
    #[serde(rename = "sui:signPersonalMessage")]
    SignPersonalMessage,
}

/// Features an adapter must expose to be offered to the user.
pub const REQUIRED_FEATURES: [Feature; 3] = [
    Feature::Connect,
    Feature::Events,
    Feature::SignAndExecuteTransactionBlock,
];

/// An account authorized by the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    pub address: String,
    pub public_key: Vec<u8>,

    /// Chain ids the account is available on, most relevant first
    pub chains: Vec<String>,
    pub features: Vec<Feature>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectInput {
    /// Do not prompt the user; only succeed if already authorized
    pub silent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectOutput {
    pub accounts: Vec<WalletAccount>,
}

/// Payload of the wallet-standard `change` event.
///
/// Only the properties that changed are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandardChange {
    pub accounts: Option<Vec<WalletAccount>>,
    pub chains: Option<Vec<String>>,
    pub features: Option<Vec<Feature>>,
}

// ============================================================================
// Signing requests
// ============================================================================

#[derive(Debug, Clone)]
pub struct SignAndExecuteTransactionBlockInput {
    pub transaction_block: TransactionBlock,
    pub account: WalletAccount,
    pub chain: String,
    pub options: Option<ExecuteOptions>,
}

#[derive(Debug, Clone)]
pub struct SignTransactionBlockInput {
    pub transaction_block: TransactionBlock,
    pub account: WalletAccount,
    pub chain: String,
}

#[derive(Debug, Clone)]
pub struct SignMessageInput {
    pub account: WalletAccount,
    pub message: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SignPersonalMessageInput {
    pub account: WalletAccount,
    pub message: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransactionBlock {
    pub transaction_block_bytes: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedMessage {
    pub message_bytes: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedPersonalMessage {
    pub bytes: String,
    pub signature: String,
}

// ============================================================================
// Adapter trait
// ============================================================================

/// Facade over one wallet.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    fn name(&self) -> &str;

    fn icon(&self) -> &str;

    /// Accounts currently authorized.
    fn accounts(&self) -> Vec<WalletAccount>;

    fn features(&self) -> Vec<Feature>;

    fn has_feature(&self, feature: Feature) -> bool {
        self.features().contains(&feature)
    }

    /// Subscribe to the wallet's low-level `change` notifications.
    fn on_change(&self) -> broadcast::Receiver<StandardChange>;

    async fn connect(&self, input: ConnectInput) -> Result<ConnectOutput, AdapterError>;

    /// Optional `standard:disconnect`; callers check [`Feature::Disconnect`] first.
    async fn disconnect(&self) -> Result<(), AdapterError>;

    async fn sign_and_execute_transaction_block(
        &self,
        input: SignAndExecuteTransactionBlockInput,
    ) -> Result<TransactionResponse, AdapterError>;

    async fn sign_transaction_block(
        &self,
        input: SignTransactionBlockInput,
    ) -> Result<SignedTransactionBlock, AdapterError>;

    async fn sign_message(&self, input: SignMessageInput) -> Result<SignedMessage, AdapterError>;

    async fn sign_personal_message(
        &self,
        input: SignPersonalMessageInput,
    ) -> Result<SignedPersonalMessage, AdapterError>;
}

impl fmt::Debug for dyn WalletAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletAdapter")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// Whether `adapter` implements every feature in [`REQUIRED_FEATURES`].
pub fn is_standard_compatible(adapter: &dyn WalletAdapter) -> bool {
    REQUIRED_FEATURES.iter().all(|f| adapter.has_feature(*f))
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::mock::MockWalletAdapter;

    #[test]
    fn test_feature_names_round_trip() {
        for feature in Feature::iter() {
            assert_eq!(feature.to_string().parse::<Feature>().unwrap(), feature);
        }
        assert_eq!(Feature::Connect.as_ref(), "standard:connect");
        assert_eq!(
            serde_json::to_value(Feature::SignPersonalMessage).unwrap(),
            "sui:signPersonalMessage"
        );
    }

    #[test]
    fn test_standard_compatibility() {
        let full = MockWalletAdapter::new("Suiet");
        assert!(is_standard_compatible(&full));

        let partial = MockWalletAdapter::new("Legacy").with_features(vec![Feature::Connect]);
        assert!(!is_standard_compatible(&partial));
    }
}
