//! Wallet store configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use client_blockchain_core::{ChainDescriptor, default_chains};

use crate::available::WalletPreset;

/// Configuration shared by the wallet, kiosk and balance stores.
#[derive(Clone, Debug)]
pub struct WalletConfig {
    /// Package whose normalized modules are fetched on connect
    pub package_id: Option<String>,

    /// Module exposing `define(kiosk, cap, extension, hash, name, file_type)`
    pub item_module: Option<String>,

    /// Reconnect the last wallet once it is detected
    pub auto_connect: bool,

    pub default_wallets: Vec<WalletPreset>,
    pub chains: Vec<ChainDescriptor>,
    pub routes: RouteConfig,

    /// Directory of the storage file; platform data dir when unset
    pub storage_dir: Option<PathBuf>,

    pub query: QueryConfig,
    pub notification_capacity: usize,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            package_id: None,
            item_module: None,
            auto_connect: true,
            default_wallets: default_wallets(),
            chains: default_chains(),
            routes: RouteConfig::default(),
            storage_dir: None,
            query: QueryConfig::default(),
            notification_capacity: 16,
        }
    }
}

impl WalletConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SUI_PACKAGE_ID` - Package whose modules are fetched on connect
    /// - `KIOSK_ITEM_MODULE` - Item module, e.g. `0xabc::item` (enables item creation)
    /// - `WALLET_AUTO_CONNECT` - Reconnect last wallet (default: true)
    /// - `WALLET_REDIRECT_ROUTE` - Route after an explicit select (default: /files)
    /// - `WALLET_HOME_ROUTE` - Route after disconnect (default: /)
    /// - `WALLET_STORAGE_DIR` - Storage directory (default: platform data dir)
    /// - `BALANCE_STALE_SECS` - Balance freshness window (default: 10)
    /// - `QUERY_CACHE_CAPACITY` - Cached query entries (default: 64)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.package_id = read_env::<String>("SUI_PACKAGE_ID").filter(|s| !s.is_empty());
        config.item_module = read_env::<String>("KIOSK_ITEM_MODULE").filter(|s| !s.is_empty());

        if let Some(auto_connect) = read_env_bool("WALLET_AUTO_CONNECT") {
            config.auto_connect = auto_connect;
        }
        if let Some(route) = read_env::<String>("WALLET_REDIRECT_ROUTE") {
            config.routes.redirect = route;
        }
        if let Some(route) = read_env::<String>("WALLET_HOME_ROUTE") {
            config.routes.home = route;
        }

        config.storage_dir = read_env::<PathBuf>("WALLET_STORAGE_DIR");

        if let Some(secs) = read_env::<u64>("BALANCE_STALE_SECS") {
            config.query.stale_time = Duration::from_secs(secs);
        }
        if let Some(capacity) = read_env::<usize>("QUERY_CACHE_CAPACITY") {
            config.query.capacity = capacity.max(1);
        }

        config
    }

    pub fn with_package_id(mut self, package_id: impl Into<String>) -> Self {
        self.package_id = Some(package_id.into());
        self
    }

    pub fn with_item_module(mut self, item_module: impl Into<String>) -> Self {
        self.item_module = Some(item_module.into());
        self
    }

    pub fn with_auto_connect(mut self, auto_connect: bool) -> Self {
        self.auto_connect = auto_connect;
        self
    }

    pub fn with_default_wallets(mut self, wallets: Vec<WalletPreset>) -> Self {
        self.default_wallets = wallets;
        self
    }

    pub fn with_chains(mut self, chains: Vec<ChainDescriptor>) -> Self {
        self.chains = chains;
        self
    }

    /// Chain a wallet starts on before it reports one.
    pub fn initial_chain(&self) -> ChainDescriptor {
        self.chains.first().cloned().unwrap_or_default()
    }

    /// Configured chain with `id`, if any.
    pub fn find_chain(&self, id: &str) -> Option<&ChainDescriptor> {
        self.chains.iter().find(|c| c.id == id)
    }
}

#[derive(Clone, Debug)]
pub struct RouteConfig {
    /// Route visited after a select with auto-redirect
    pub redirect: String,
    /// Route visited after a disconnect that tore down listeners
    pub home: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            redirect: "/files".to_string(),
            home: "/".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct QueryConfig {
    pub stale_time: Duration,
    pub capacity: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(10),
            capacity: 64,
        }
    }
}

/// Wallets offered even when not installed.
pub fn default_wallets() -> Vec<WalletPreset> {
    [
        "Sui Wallet",
        "Suiet",
        "Slush",
        "Ethos Wallet",
        "Surf Wallet",
        "Martian Sui Wallet",
        "OneKey Wallet",
        "Nightly",
        "Glass Wallet",
    ]
    .into_iter()
    .map(WalletPreset::new)
    .collect()
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_chain_falls_back_to_unknown() {
        let config = WalletConfig::default();
        assert_eq!(config.initial_chain().id, "sui:devnet");

        let config = WalletConfig::default().with_chains(vec![]);
        assert!(config.initial_chain().is_unknown());
    }

    #[test]
    fn test_find_chain() {
        let config = WalletConfig::default();
        assert!(config.find_chain("sui:mainnet").is_some());
        assert!(config.find_chain("sui:unknown").is_none());
    }
}
