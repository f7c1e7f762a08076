//! Merges the configured wallet allow-list with detected adapters.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapter::WalletAdapter;

/// A wallet offered to the user whether or not it is installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletPreset {
    pub name: String,
    pub label: String,
    pub icon_url: String,

    /// Browser extension download page
    pub download_url: String,
}

impl WalletPreset {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            icon_url: String::new(),
            download_url: String::new(),
        }
    }

    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = url.into();
        self
    }
}

/// A wallet choice; `adapter` is present iff `installed`.
#[derive(Clone)]
pub struct WalletDescriptor {
    pub name: String,
    pub label: String,
    pub icon_url: String,
    pub download_url: String,
    pub installed: bool,
    pub adapter: Option<Arc<dyn WalletAdapter>>,
}

impl WalletDescriptor {
    fn configured(preset: &WalletPreset, adapter: Option<Arc<dyn WalletAdapter>>) -> Self {
        Self {
            name: preset.name.clone(),
            label: preset.label.clone(),
            icon_url: preset.icon_url.clone(),
            download_url: preset.download_url.clone(),
            installed: adapter.is_some(),
            adapter,
        }
    }

    fn detected(adapter: Arc<dyn WalletAdapter>) -> Self {
        Self {
            name: adapter.name().to_string(),
            label: adapter.name().to_string(),
            icon_url: adapter.icon().to_string(),
            download_url: String::new(),
            installed: true,
            adapter: Some(adapter),
        }
    }
}

impl fmt::Debug for WalletDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletDescriptor")
            .field("name", &self.name)
            .field("installed", &self.installed)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AvailableWallets {
    /// Every configured wallet, annotated with its install status
    pub configured: Vec<WalletDescriptor>,
    /// Detected wallets missing from the configured list
    pub detected: Vec<WalletDescriptor>,
    /// Installed wallets of both lists, configured first
    pub all_available: Vec<WalletDescriptor>,
}

impl AvailableWallets {
    pub fn find(&self, name: &str) -> Option<&WalletDescriptor> {
        self.all_available.iter().find(|w| w.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.all_available.iter().map(|w| w.name.clone()).collect()
    }
}

pub fn resolve_available_wallets(
    presets: &[WalletPreset],
    detected: &[Arc<dyn WalletAdapter>],
) -> AvailableWallets {
    let configured: Vec<_> = presets
        .iter()
        .map(|preset| {
            let adapter = detected.iter().find(|a| a.name() == preset.name).cloned();
            WalletDescriptor::configured(preset, adapter)
        })
        .collect();

    let extra: Vec<_> = detected
        .iter()
        .filter(|adapter| !presets.iter().any(|p| p.name == adapter.name()))
        .cloned()
        .map(WalletDescriptor::detected)
        .collect();

    let all_available = configured
        .iter()
        .chain(extra.iter())
        .filter(|wallet| wallet.installed)
        .cloned()
        .collect();

    AvailableWallets {
        configured,
        detected: extra,
        all_available,
    }
}
