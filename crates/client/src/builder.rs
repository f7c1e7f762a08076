//! Client builder with dependency injection pattern.

use std::sync::Arc;

use anyhow::{Context, Result};

use client_blockchain_core::ChainClientFactory;
use client_wallet::{
    BalanceQuery, KeyValueStorage, KioskStore, WalletConfig, WalletManager, WalletRadar,
};

use crate::KioskClient;

/// Builder for constructing a KioskClient with proper validation.
///
/// # Design Principles
///
/// - **Required fields**: Radar and client factory must be provided
/// - **Optional fields**: Storage (in-memory when unset) and the wallet to select
/// - **Fail-fast validation**: Missing required fields cause build() to fail
#[derive(Default)]
pub struct KioskClientBuilder {
    config: WalletConfig,
    radar: Option<Arc<dyn WalletRadar>>,
    factory: Option<Arc<dyn ChainClientFactory>>,
    storage: Option<Arc<dyn KeyValueStorage>>,
    wallet: Option<String>,
}

impl KioskClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: WalletConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the wallet radar (required).
    pub fn radar(mut self, radar: Arc<dyn WalletRadar>) -> Self {
        self.radar = Some(radar);
        self
    }

    /// Set the chain client factory (required).
    pub fn factory(mut self, factory: Arc<dyn ChainClientFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Set the preference storage (optional).
    pub fn storage(mut self, storage: Arc<dyn KeyValueStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Wallet to select on start (optional).
    ///
    /// Without it the client relies on auto-connect.
    pub fn wallet(mut self, name: impl Into<String>) -> Self {
        self.wallet = Some(name.into());
        self
    }

    /// Build the KioskClient.
    ///
    /// # Errors
    ///
    /// Returns an error if the radar or the client factory is not set.
    pub fn build(self) -> Result<KioskClient> {
        let radar = self
            .radar
            .context("Wallet radar is required. Use .radar() to set it.")?;

        let factory = self
            .factory
            .context("Client factory is required. Use .factory() to set it.")?;

        let mut config = self.config;
        if self.wallet.is_some() {
            // An explicit selection replaces the reconnect attempt
            config.auto_connect = false;
        }

        let mut builder = WalletManager::builder()
            .config(config)
            .radar(radar)
            .factory(factory);
        if let Some(storage) = self.storage {
            builder = builder.storage(storage);
        }
        let manager = builder.build()?;

        Ok(KioskClient {
            kiosks: KioskStore::new(manager.clone()),
            balance: BalanceQuery::new(manager.clone()),
            manager,
            wallet: self.wallet,
        })
    }
}
