//! Store values observed through `watch` receivers.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::Display;

use client_blockchain_core::{ChainClients, ChainDescriptor, NormalizedModules};

use crate::adapter::WalletAdapter;
use crate::available::WalletDescriptor;

const UNOBFUSCATED_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// The connection record; `address` is set iff `status` is `Connected`.
#[derive(Clone, Default)]
pub struct ConnectionState {
    pub adapter: Option<Arc<dyn WalletAdapter>>,
    pub address: Option<String>,
    pub connected: bool,
    pub connecting: bool,
    pub chain: ChainDescriptor,
    pub status: ConnectionStatus,
    pub name: Option<String>,
    pub obfuscated_address: Option<String>,
}

impl ConnectionState {
    pub fn new(chain: ChainDescriptor) -> Self {
        Self {
            chain,
            ..Self::default()
        }
    }

    /// Adapter usable for wallet calls: present and connected.
    pub fn callable_adapter(&self) -> Option<&Arc<dyn WalletAdapter>> {
        match self.status {
            ConnectionStatus::Connected => self.adapter.as_ref(),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        self.callable_adapter().is_some()
    }

    /// Back to disconnected, keeping the chain.
    pub(crate) fn reset(&mut self) {
        self.adapter = None;
        self.address = None;
        self.connected = false;
        self.connecting = false;
        self.status = ConnectionStatus::Disconnected;
        self.name = None;
        self.obfuscated_address = None;
    }
}

impl fmt::Debug for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionState")
            .field("name", &self.name)
            .field("status", &self.status)
            .field("address", &self.address)
            .field("chain", &self.chain.id)
            .finish_non_exhaustive()
    }
}

/// Value of the wallet manager store.
#[derive(Debug, Clone, Default)]
pub struct SuiState {
    pub is_initialized: bool,
    pub clients: Option<ChainClients>,
    pub normalized_modules: NormalizedModules,
    pub wallet: ConnectionState,
    pub chains: Vec<ChainDescriptor>,
    pub configured_wallets: Vec<WalletDescriptor>,
    pub detected_wallets: Vec<WalletDescriptor>,
    pub all_available_wallets: Vec<WalletDescriptor>,
}

/// `0x1234...cdef` form of an address.
pub fn obfuscate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    let head: String = chars.iter().take(UNOBFUSCATED_LENGTH).collect();
    let tail: String = chars[chars.len().saturating_sub(UNOBFUSCATED_LENGTH)..]
        .iter()
        .collect();

    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obfuscate_address() {
        assert_eq!(obfuscate_address("0x1234567890abcdef"), "0x12...cdef");
        assert_eq!(obfuscate_address("0x1"), "0x1...0x1");
        assert_eq!(obfuscate_address(""), "...");
    }

    #[test]
    fn test_only_connected_state_is_callable() {
        let mut state = ConnectionState::default();
        assert!(!state.is_callable());

        state.adapter = Some(Arc::new(crate::mock::MockWalletAdapter::new("Suiet")));
        state.status = ConnectionStatus::Connecting;
        assert!(!state.is_callable());

        state.status = ConnectionStatus::Connected;
        assert!(state.is_callable());

        state.reset();
        assert!(!state.is_callable());
        assert!(state.adapter.is_none());
    }
}
