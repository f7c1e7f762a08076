//! Persistent key/value storage for wallet preferences.
//!
//! Mirrors the browser `localStorage` surface: string keys, string values,
//! synchronous access. Two implementations:
//! - [`MemoryStorage`]: in-process map
//! - [`FileStorage`]: JSON object file under the platform data directory

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Keys the stores persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
pub enum StorageKey {
    /// Name of the wallet last connected successfully
    #[strum(serialize = "WK__LAST_CONNECT_WALLET_NAME")]
    LastConnectWalletName,
}

/// Errors surfaced by storage implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no data directory available on this platform")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Minimal key/value store.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: StorageKey) -> Result<Option<String>>;

    fn set_item(&self, key: StorageKey, value: &str) -> Result<()>;

    fn remove_item(&self, key: StorageKey) -> Result<()>;
}
