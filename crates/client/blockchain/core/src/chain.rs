//! Sui networks and the chain descriptors wallets report.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Chain id reported when a wallet is on a network we do not know.
pub const UNKNOWN_CHAIN_ID: &str = "sui:unknown";

/// Sui network types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SuiNetwork {
    /// Sui mainnet
    Mainnet,
    /// Sui testnet
    Testnet,
    /// Sui devnet
    Devnet,
    /// Local Sui network
    #[strum(to_string = "localnet", serialize = "local")]
    Localnet,
}

impl SuiNetwork {
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            SuiNetwork::Mainnet => "https://fullnode.mainnet.sui.io:443",
            SuiNetwork::Testnet => "https://fullnode.testnet.sui.io:443",
            SuiNetwork::Devnet => "https://fullnode.devnet.sui.io:443",
            SuiNetwork::Localnet => "http://127.0.0.1:9000",
        }
    }

    /// Wallet-standard chain identifier (`sui:<network>`).
    pub fn chain_id(&self) -> String {
        format!("sui:{}", self)
    }

    /// Chain descriptor pointing at the network's public fullnode.
    pub fn chain(&self) -> ChainDescriptor {
        let name = match self {
            SuiNetwork::Mainnet => "Sui Mainnet",
            SuiNetwork::Testnet => "Sui Testnet",
            SuiNetwork::Devnet => "Sui Devnet",
            SuiNetwork::Localnet => "Sui Localnet",
        };

        ChainDescriptor {
            id: self.chain_id(),
            name: name.to_string(),
            rpc_url: self.default_rpc_url().to_string(),
        }
    }
}

/// A blockchain network endpoint as seen by a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    /// Wallet-standard identifier, e.g. `sui:testnet`
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// JSON-RPC endpoint (empty for the unknown chain)
    pub rpc_url: String,
}

impl ChainDescriptor {
    /// Sentinel used when a wallet reports no chain or an unsupported one.
    pub fn unknown() -> Self {
        Self {
            id: UNKNOWN_CHAIN_ID.to_string(),
            name: "Unknown Network".to_string(),
            rpc_url: String::new(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.id == UNKNOWN_CHAIN_ID
    }

    /// Network encoded in the chain id suffix, if it is one we know.
    pub fn network(&self) -> Option<SuiNetwork> {
        let (_, suffix) = self.id.split_once(':')?;
        suffix.parse().ok()
    }
}

impl Default for ChainDescriptor {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Chains every wallet session can switch between.
pub fn default_chains() -> Vec<ChainDescriptor> {
    vec![
        SuiNetwork::Devnet.chain(),
        SuiNetwork::Testnet.chain(),
        SuiNetwork::Mainnet.chain(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_from_chain_id() {
        let chain = SuiNetwork::Testnet.chain();
        assert_eq!(chain.id, "sui:testnet");
        assert_eq!(chain.network(), Some(SuiNetwork::Testnet));

        assert_eq!(ChainDescriptor::unknown().network(), None);
        assert!(ChainDescriptor::unknown().is_unknown());
    }

    #[test]
    fn test_network_parsing_accepts_aliases() {
        assert_eq!("local".parse::<SuiNetwork>().unwrap(), SuiNetwork::Localnet);
        assert_eq!("MAINNET".parse::<SuiNetwork>().unwrap(), SuiNetwork::Mainnet);
        assert!("moonnet".parse::<SuiNetwork>().is_err());
    }

    #[test]
    fn test_default_chains_order() {
        let ids: Vec<_> = default_chains().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["sui:devnet", "sui:testnet", "sui:mainnet"]);
    }
}
