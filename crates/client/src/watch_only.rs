//! Read-only wallet for a fixed address.
//!
//! Lets the terminal client browse an owner's kiosks without a browser
//! extension. Every signing request is rejected.

use async_trait::async_trait;
use tokio::sync::broadcast;

use client_blockchain_core::TransactionResponse;
use client_wallet::adapter::{
    SignAndExecuteTransactionBlockInput, SignMessageInput, SignPersonalMessageInput,
    SignTransactionBlockInput, SignedMessage, SignedPersonalMessage, SignedTransactionBlock,
};
use client_wallet::{
    AdapterError, ConnectInput, ConnectOutput, Feature, StandardChange, WalletAccount,
    WalletAdapter,
};

pub const WATCH_ONLY_WALLET: &str = "Watch Only";

pub struct WatchOnlyAdapter {
    account: WalletAccount,
    changes: broadcast::Sender<StandardChange>,
}

impl WatchOnlyAdapter {
    pub fn new(address: impl Into<String>, chain_id: impl Into<String>) -> Self {
        let (changes, _) = broadcast::channel(4);
        Self {
            account: WalletAccount {
                address: address.into(),
                public_key: Vec::new(),
                chains: vec![chain_id.into()],
                features: Vec::new(),
                label: Some(WATCH_ONLY_WALLET.to_string()),
            },
            changes,
        }
    }

    pub fn address(&self) -> &str {
        &self.account.address
    }
}

#[async_trait]
impl WalletAdapter for WatchOnlyAdapter {
    fn name(&self) -> &str {
        WATCH_ONLY_WALLET
    }

    fn icon(&self) -> &str {
        ""
    }

    fn accounts(&self) -> Vec<WalletAccount> {
        vec![self.account.clone()]
    }

    fn features(&self) -> Vec<Feature> {
        vec![
            Feature::Connect,
            Feature::Events,
            Feature::SignAndExecuteTransactionBlock,
        ]
    }

    fn on_change(&self) -> broadcast::Receiver<StandardChange> {
        self.changes.subscribe()
    }

    async fn connect(&self, _input: ConnectInput) -> Result<ConnectOutput, AdapterError> {
        Ok(ConnectOutput {
            accounts: self.accounts(),
        })
    }

    async fn disconnect(&self) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported(Feature::Disconnect))
    }

    async fn sign_and_execute_transaction_block(
        &self,
        _input: SignAndExecuteTransactionBlockInput,
    ) -> Result<TransactionResponse, AdapterError> {
        Err(AdapterError::Rejected("watch-only wallet cannot sign".to_string()))
    }

    async fn sign_transaction_block(
        &self,
        _input: SignTransactionBlockInput,
    ) -> Result<SignedTransactionBlock, AdapterError> {
        Err(AdapterError::Unsupported(Feature::SignTransactionBlock))
    }

    async fn sign_message(&self, _input: SignMessageInput) -> Result<SignedMessage, AdapterError> {
        Err(AdapterError::Unsupported(Feature::SignMessage))
    }

    async fn sign_personal_message(
        &self,
        _input: SignPersonalMessageInput,
    ) -> Result<SignedPersonalMessage, AdapterError> {
        Err(AdapterError::Unsupported(Feature::SignPersonalMessage))
    }
}
