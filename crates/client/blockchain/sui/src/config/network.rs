//! Sui network configuration.

use std::env;
use std::time::Duration;

use client_blockchain_core::{ChainDescriptor, SuiNetwork};

/// Sui-specific configuration.
#[derive(Debug, Clone)]
pub struct SuiConfig {
    /// Sui network the client starts on
    pub network: SuiNetwork,

    /// Custom RPC endpoint URL (overrides network default)
    pub rpc_url: Option<String>,

    /// Timeout applied to every JSON-RPC request
    pub request_timeout: Duration,

    /// Page size used when walking a kiosk's dynamic fields
    pub dynamic_field_page_size: usize,
}

impl SuiConfig {
    /// Create a new Sui configuration.
    pub fn new(network: SuiNetwork) -> Self {
        Self {
            network,
            rpc_url: None,
            request_timeout: Duration::from_secs(30),
            dynamic_field_page_size: 50,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SUI_NETWORK` - Network name (mainnet, testnet, devnet, localnet) (default: testnet)
    /// - `SUI_RPC_URL` - Custom RPC endpoint URL
    /// - `SUI_REQUEST_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self, String> {
        let raw = env::var("SUI_NETWORK").unwrap_or_else(|_| "testnet".to_string());
        let network = raw.parse::<SuiNetwork>().map_err(|_| {
            format!(
                "Invalid SUI_NETWORK: {}. Must be mainnet, testnet, devnet, or localnet",
                raw
            )
        })?;

        let mut config = Self::new(network);
        config.rpc_url = env::var("SUI_RPC_URL").ok();

        if let Some(secs) = env::var("SUI_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set custom RPC URL.
    pub fn with_rpc_url(mut self, url: String) -> Self {
        self.rpc_url = Some(url);
        self
    }

    /// Set request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Get the RPC URL (custom or default for network).
    pub fn get_rpc_url(&self) -> &str {
        self.rpc_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_rpc_url())
    }

    /// Chain descriptor of the configured network, honouring the RPC override.
    pub fn chain(&self) -> ChainDescriptor {
        let mut chain = self.network.chain();
        chain.rpc_url = self.get_rpc_url().to_string();
        chain
    }

    /// Endpoint to use for `chain`.
    ///
    /// The RPC override only applies to the configured network; other chains
    /// keep the endpoint their descriptor carries.
    pub fn endpoint_for<'a>(&'a self, chain: &'a ChainDescriptor) -> &'a str {
        if self.rpc_url.is_some() && chain.network() == Some(self.network) {
            self.get_rpc_url()
        } else {
            &chain.rpc_url
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        // Validate RPC URL format
        let url = self.get_rpc_url();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(format!("Invalid RPC URL format: {}", url));
        }

        if self.request_timeout.is_zero() {
            return Err("Request timeout must be greater than 0".to_string());
        }

        if self.dynamic_field_page_size == 0 {
            return Err("Dynamic field page size must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for SuiConfig {
    fn default() -> Self {
        Self::new(SuiNetwork::Testnet)
    }
}
