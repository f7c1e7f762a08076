//! Coin balance reads for the connected account.

use std::sync::Arc;

use client_blockchain_core::{ChainDescriptor, ChainRpc, SUI_TYPE_ARG, TransportError};

use crate::manager::WalletManager;
use crate::query::{QueryClient, QueryState, query_key};

pub const COIN_BALANCE_KEY: &str = "SUIET_COIN_BALANCE";

/// Balance lookup; unset fields default to the connected wallet's values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoinBalanceParams {
    pub address: Option<String>,
    /// Coin type, `0x2::sui::SUI` when unset
    pub type_arg: Option<String>,
    pub chain_id: Option<String>,
}

/// Balance in the shape account widgets read.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountBalance {
    state: QueryState<u128>,
}

impl AccountBalance {
    pub fn balance(&self) -> u128 {
        self.state.data
    }

    pub fn loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }
}

pub struct BalanceQuery {
    manager: WalletManager,
    cache: QueryClient<u128>,
}

impl BalanceQuery {
    pub fn new(manager: WalletManager) -> Self {
        let cache = QueryClient::new(0, &manager.config().query);
        Self { manager, cache }
    }

    /// Configured chain with `chain_id`, or the wallet's current chain.
    pub fn get_chain(&self, chain_id: Option<&str>) -> Option<ChainDescriptor> {
        let current = self.manager.wallet().chain.id;
        let id = chain_id.unwrap_or(&current);
        self.manager.config().find_chain(id).cloned()
    }

    /// Balance of one coin type, zero while no address or chain is known.
    pub async fn coin_balance(&self, params: CoinBalanceParams) -> QueryState<u128> {
        let address = params.address.or_else(|| self.manager.wallet().address);
        let type_arg = params.type_arg.unwrap_or_else(|| SUI_TYPE_ARG.to_string());
        let chain = self.get_chain(params.chain_id.as_deref());

        let (Some(address), Some(chain)) = (address, chain) else {
            return QueryState::initial(0);
        };

        let key = query_key(
            COIN_BALANCE_KEY,
            &[
                ("address", Some(address.as_str())),
                ("typeArg", Some(type_arg.as_str())),
                ("chainId", Some(chain.id.as_str())),
            ],
        );

        self.cache
            .fetch(&key, || async {
                let rpc = self.rpc_for(&chain).await?;
                rpc.get_coin_balance(&address, &type_arg).await
            })
            .await
    }

    pub async fn account_balance(&self, params: CoinBalanceParams) -> AccountBalance {
        AccountBalance {
            state: self.coin_balance(params).await,
        }
    }

    /// Forget every cached balance.
    pub fn invalidate_all(&self) {
        self.cache.clear();
    }

    async fn rpc_for(&self, chain: &ChainDescriptor) -> Result<Arc<dyn ChainRpc>, TransportError> {
        if self.manager.wallet().chain.id == chain.id {
            if let Some(clients) = self.manager.clients() {
                return Ok(clients.rpc);
            }
        }

        Ok(self.manager.factory().connect(chain).await?.rpc)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use super::*;
    use crate::mock::{ADDRESS, Harness, MockWalletAdapter};

    #[tokio::test]
    async fn test_zero_without_wallet() {
        let h = Harness::new(vec![MockWalletAdapter::new("Suiet")], Harness::config());
        let query = BalanceQuery::new(h.manager.clone());

        let state = query.coin_balance(CoinBalanceParams::default()).await;
        assert_eq!(state.data, 0);
        assert_eq!(h.factory.rpc.balance_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connected_balance_is_cached() {
        let h = Harness::connected(vec![MockWalletAdapter::new("Suiet")], Harness::config()).await;
        h.factory.rpc.set_balance(ADDRESS, SUI_TYPE_ARG, 1_500_000_000);
        let query = BalanceQuery::new(h.manager.clone());

        let balance = query.account_balance(CoinBalanceParams::default()).await;
        assert_eq!(balance.balance(), 1_500_000_000);
        assert!(!balance.loading());

        query.coin_balance(CoinBalanceParams::default()).await;
        assert_eq!(h.factory.rpc.balance_calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(11)).await;
        query.coin_balance(CoinBalanceParams::default()).await;
        assert_eq!(h.factory.rpc.balance_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_other_chain_builds_its_own_client() {
        let h = Harness::connected(vec![MockWalletAdapter::new("Suiet")], Harness::config()).await;
        h.factory.rpc.set_balance("0xb0b", "0xc0ffee::token::TOKEN", 9);
        let query = BalanceQuery::new(h.manager.clone());

        let state = query
            .coin_balance(CoinBalanceParams {
                address: Some("0xb0b".to_string()),
                type_arg: Some("0xc0ffee::token::TOKEN".to_string()),
                chain_id: Some("sui:mainnet".to_string()),
            })
            .await;

        assert_eq!(state.data, 9);
        assert_eq!(h.factory.chains(), vec!["sui:testnet", "sui:mainnet"]);
    }

    #[tokio::test]
    async fn test_failed_read_reports_error() {
        let h = Harness::connected(vec![MockWalletAdapter::new("Suiet")], Harness::config()).await;
        let query = BalanceQuery::new(h.manager.clone());

        let balance = query.account_balance(CoinBalanceParams::default()).await;
        assert_eq!(balance.balance(), 0);
        assert!(balance.error().is_some());
    }

    #[tokio::test]
    async fn test_get_chain() {
        let h = Harness::connected(vec![MockWalletAdapter::new("Suiet")], Harness::config()).await;
        let query = BalanceQuery::new(h.manager.clone());

        assert_eq!(query.get_chain(None).unwrap().id, "sui:testnet");
        assert_eq!(query.get_chain(Some("sui:devnet")).unwrap().id, "sui:devnet");
        assert!(query.get_chain(Some("sui:moonnet")).is_none());
    }
}
