//! Terminal kiosk client orchestrating the wallet, kiosk and balance stores.
//!
//! # Architecture
//!
//! ```text
//! KioskClient (Top-level container)
//!   ├─→ WalletManager (connection, chain clients, signing)
//!   ├─→ KioskStore    (owned kiosks, reads through the manager)
//!   └─→ BalanceQuery  (cached coin balances)
//! ```
//!
//! # Design Principles
//!
//! - **Dependency Injection**: radar, storage and client factory injected via builder
//! - **Single hub**: every store reads address and chain from the manager

mod builder;
pub mod logging;
pub mod watch_only;

pub use builder::KioskClientBuilder;

use anyhow::{Result, bail};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use client_wallet::{
    BalanceQuery, CoinBalanceParams, ConnectionStatus, KioskStore, NotificationVariant,
    WalletManager,
};

/// Top-level client container.
pub struct KioskClient {
    manager: WalletManager,
    kiosks: KioskStore,
    balance: BalanceQuery,
    wallet: Option<String>,
}

impl KioskClient {
    pub fn builder() -> KioskClientBuilder {
        KioskClientBuilder::new()
    }

    pub fn manager(&self) -> &WalletManager {
        &self.manager
    }

    pub fn kiosks(&self) -> &KioskStore {
        &self.kiosks
    }

    pub fn balance(&self) -> &BalanceQuery {
        &self.balance
    }

    /// Run one browsing session.
    ///
    /// 1. Mounts the wallet store (detection and auto-connect)
    /// 2. Selects the requested wallet, if any
    /// 3. Reports the account balance and walks every kiosk page
    /// 4. Unmounts
    pub async fn run(&self) -> Result<()> {
        let notifications = self.spawn_notification_logger();
        self.manager.mount();

        let result = self.browse().await;

        self.manager.unmount();
        notifications.abort();
        let _ = notifications.await;

        result
    }

    async fn browse(&self) -> Result<()> {
        if let Some(name) = &self.wallet {
            self.manager.select(name, true).await?;
        }

        let wallet = self.manager.wallet();
        if wallet.status != ConnectionStatus::Connected {
            bail!("No wallet connected. Set KIOSK_OWNER_ADDRESS or connect a wallet first.");
        }

        tracing::info!(
            "Connected {} as {} on {}",
            wallet.name.as_deref().unwrap_or_default(),
            wallet.obfuscated_address.as_deref().unwrap_or_default(),
            wallet.chain.name
        );

        let balance = self
            .balance
            .account_balance(CoinBalanceParams::default())
            .await;
        match balance.error() {
            Some(e) => tracing::warn!("Balance unavailable: {}", e),
            None => tracing::info!("Balance: {} MIST", balance.balance()),
        }

        self.kiosks.get_all_kiosks().await?;

        let state = self.kiosks.state();
        tracing::info!("Found {} kiosk(s)", state.keys.len());
        for kiosk in state.ordered() {
            tracing::info!(
                "Kiosk {}: {} item(s), {} listing(s), profits {}",
                kiosk.id(),
                kiosk.kiosk.item_count,
                kiosk.listing_ids.len(),
                kiosk.kiosk.profits
            );
        }

        Ok(())
    }

    fn spawn_notification_logger(&self) -> JoinHandle<()> {
        let mut rx = self.manager.notifications().subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(notification) => match notification.variant {
                        NotificationVariant::Error | NotificationVariant::Warning => {
                            tracing::warn!("{}: {}", notification.name, notification.description)
                        }
                        NotificationVariant::Success | NotificationVariant::Info => {
                            tracing::info!("{}: {}", notification.name, notification.description)
                        }
                    },
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
