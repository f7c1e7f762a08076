//! Error types surfaced by the wallet stores.

use client_blockchain_core::TransportError;
use thiserror::Error;

use crate::adapter::Feature;

pub type Result<T> = std::result::Result<T, WalletError>;

/// Failures reported by a wallet adapter.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    #[error("request rejected by wallet: {0}")]
    Rejected(String),

    #[error("wallet does not support {0}")]
    Unsupported(Feature),

    #[error("wallet error: {0}")]
    Wallet(String),
}

/// Failures of the connection manager.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Failed to call function, wallet not connected")]
    NotConnected,

    #[error("no active account")]
    NoActiveAccount,

    #[error(
        "select failed: wallet {name} is not available, all wallets are listed here: [{}]",
        .available.join(", ")
    )]
    WalletNotAvailable { name: String, available: Vec<String> },

    #[error("wallet {0} has no adapter attached")]
    MissingAdapter(String),

    #[error("wallet manager requires {0} to be configured before building")]
    MissingComponent(&'static str),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failures of the kiosk store.
#[derive(Debug, Error)]
pub enum KioskError {
    #[error("wallet address is not defined")]
    AddressUndefined,

    #[error("chain clients are unavailable")]
    ClientsUnavailable,

    #[error("could not find this kiosk")]
    NotFound,

    #[error("could not determine kiosk id")]
    KioskIdUnknown,

    #[error("item module is not configured")]
    ItemModuleUnset,

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
