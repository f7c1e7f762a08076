//! Wallet connection and kiosk stores for the kiosk dApp client.
//!
//! # Architecture
//!
//! ```text
//! WalletRadar ─→ WalletDetection ─→ resolve_available_wallets ─→ AutoConnect
//!                                                                     │
//!                                                                     ▼
//!                            Navigator ←── WalletManager ──→ Notifications
//!                                              │
//!                               ┌──────────────┴──────────────┐
//!                               ▼                             ▼
//!                          KioskStore                   BalanceQuery
//! ```
//!
//! The manager is the hub: the kiosk store and the balance query read the
//! connected address, chain and clients from it and sign through it.
//!
//! Store values are published through `tokio::sync::watch`; wallet events
//! and notifications through `broadcast`.

pub mod adapter;
pub mod auto_connect;
pub mod available;
pub mod balance;
pub mod config;
pub mod detection;
pub mod error;
pub mod events;
pub mod kiosk;
pub mod manager;
pub mod navigation;
pub mod notifications;
pub mod query;
pub mod state;
pub mod storage;

#[cfg(test)]
mod mock;

pub use adapter::{
    ConnectInput, ConnectOutput, Feature, StandardChange, WalletAccount, WalletAdapter,
    is_standard_compatible,
};
pub use auto_connect::AutoConnect;
pub use available::{AvailableWallets, WalletDescriptor, WalletPreset, resolve_available_wallets};
pub use balance::{AccountBalance, BalanceQuery, CoinBalanceParams};
pub use config::{QueryConfig, RouteConfig, WalletConfig};
pub use detection::{AdapterList, StaticRadar, WalletDetection, WalletRadar};
pub use error::{AdapterError, KioskError, Result, WalletError};
pub use events::{ListenerHandle, WalletEvent, WalletEventKind};
pub use kiosk::{ItemDefinition, KioskResponse, KioskState, KioskStore};
pub use manager::{WalletManager, WalletManagerBuilder};
pub use navigation::{Navigator, NoopNavigator};
pub use notifications::{Notification, NotificationVariant, Notifications};
pub use query::{QueryClient, QueryState, query_key};
pub use state::{ConnectionState, ConnectionStatus, SuiState};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError, StorageKey};
