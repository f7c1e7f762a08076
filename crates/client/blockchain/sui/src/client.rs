//! Sui JSON-RPC client and the factory handing out per-chain clients.

use std::sync::Arc;

use async_trait::async_trait;
use sui_sdk::{SuiClient, SuiClientBuilder};

use client_blockchain_core::{
    ChainClientFactory, ChainClients, ChainDescriptor, ChainRpc, NormalizedModules,
    TransportError,
};

use crate::config::SuiConfig;
use crate::core::error::{Result, SuiError};
use crate::kiosk::SuiKioskReader;
use crate::utils::conversion::{to_sui_address, to_sui_object_id};

/// RPC client bound to one chain's endpoint.
#[derive(Clone)]
pub struct SuiRpcClient {
    client: SuiClient,
    url: String,
}

impl SuiRpcClient {
    /// Connect to `url`.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is empty or the endpoint cannot be reached.
    pub async fn connect(url: &str, config: &SuiConfig) -> Result<Self> {
        if url.is_empty() {
            return Err(SuiError::InvalidConfig("chain has no RPC url".to_string()));
        }

        tracing::debug!("Connecting to Sui RPC at {}", url);

        let client = SuiClientBuilder::default()
            .request_timeout(config.request_timeout)
            .build(url)
            .await
            .map_err(|e| SuiError::Network(format!("Failed to connect to {}: {}", url, e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Underlying SDK client.
    pub fn inner(&self) -> &SuiClient {
        &self.client
    }
}

impl std::fmt::Debug for SuiRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiRpcClient").field("url", &self.url).finish()
    }
}

#[async_trait]
impl ChainRpc for SuiRpcClient {
    fn rpc_url(&self) -> &str {
        &self.url
    }

    async fn get_normalized_move_modules_by_package(
        &self,
        package_id: &str,
    ) -> std::result::Result<NormalizedModules, TransportError> {
        let package = to_sui_object_id(&package_id.into())?;

        let modules = self
            .client
            .read_api()
            .get_normalized_move_modules_by_package(package)
            .await
            .map_err(SuiError::from)?;

        modules
            .into_iter()
            .map(|(name, module)| {
                serde_json::to_value(module)
                    .map(|value| (name, value))
                    .map_err(|e| TransportError::from(SuiError::Serialization(e.to_string())))
            })
            .collect()
    }

    async fn get_coin_balance(
        &self,
        owner: &str,
        coin_type: &str,
    ) -> std::result::Result<u128, TransportError> {
        let owner = to_sui_address(owner)?;

        let balance = self
            .client
            .coin_read_api()
            .get_balance(owner, Some(coin_type.to_string()))
            .await
            .map_err(SuiError::from)?;

        Ok(balance.total_balance)
    }
}

/// Builds [`ChainClients`] backed by the Sui JSON-RPC API.
#[derive(Debug, Clone)]
pub struct SuiClientFactory {
    config: SuiConfig,
}

impl SuiClientFactory {
    pub fn new(config: SuiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SuiConfig {
        &self.config
    }
}

#[async_trait]
impl ChainClientFactory for SuiClientFactory {
    async fn connect(
        &self,
        chain: &ChainDescriptor,
    ) -> std::result::Result<ChainClients, TransportError> {
        let url = self.config.endpoint_for(chain);
        let rpc = SuiRpcClient::connect(url, &self.config).await?;

        tracing::info!(chain = %chain.id, url = %url, "Sui clients ready");

        let kiosk = SuiKioskReader::new(rpc.inner().clone(), self.config.dynamic_field_page_size);

        Ok(ChainClients {
            rpc: Arc::new(rpc),
            kiosk: Arc::new(kiosk),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_rpc_url_is_config_error() {
        let factory = SuiClientFactory::new(SuiConfig::default());
        let chain = ChainDescriptor::unknown();

        let err = factory.connect(&chain).await.unwrap_err();
        assert!(matches!(err, TransportError::ConfigError(_)));
    }
}
