//! Reconnect the last used wallet once it shows up.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::available::WalletDescriptor;
use crate::manager::WalletManager;
use crate::state::ConnectionStatus;
use crate::storage::StorageKey;

/// One-shot reconnect, re-armed by unmount.
#[derive(Debug)]
pub struct AutoConnect {
    enabled: bool,
    latched: AtomicBool,
}

impl AutoConnect {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            latched: AtomicBool::new(false),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the reconnect attempt has been spent.
    pub fn is_latched(&self) -> bool {
        self.latched.load(Ordering::SeqCst)
    }

    pub(crate) fn reset(&self) {
        self.latched.store(false, Ordering::SeqCst);
    }

    /// Called with every available-wallets emission.
    ///
    /// Only the first non-empty emission is acted on. Returns the wallet
    /// name if a connection was attempted.
    pub async fn on_available(
        &self,
        manager: &WalletManager,
        available: &[WalletDescriptor],
    ) -> Option<String> {
        if !self.enabled || available.is_empty() {
            return None;
        }
        if self.latched.swap(true, Ordering::SeqCst) {
            return None;
        }

        if manager.status() != ConnectionStatus::Disconnected {
            return None;
        }

        let name = match manager.storage().get_item(StorageKey::LastConnectWalletName) {
            Ok(Some(name)) => name,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(target: "wallet", "Failed to read last wallet: {}", e);
                return None;
            }
        };

        if !available.iter().any(|wallet| wallet.name == name) {
            tracing::debug!(target: "wallet", wallet = %name, "Last wallet not available");
            return None;
        }

        tracing::info!(target: "wallet", wallet = %name, "Reconnecting last wallet");
        if let Err(e) = manager.select(&name, false).await {
            tracing::error!(target: "wallet", wallet = %name, "could not connect to last connected wallet: {}", e);
        }
        Some(name)
    }
}
