//! Kiosk client binary.
//!
//! Composition root that assembles:
//! 1. Wallet store configuration and Sui client factory
//! 2. A watch-only wallet for `KIOSK_OWNER_ADDRESS`
//! 3. File-backed preference storage
//!
//! # Examples
//!
//! ```bash
//! KIOSK_OWNER_ADDRESS=0x... SUI_NETWORK=testnet cargo run -p kiosk-client
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use client_blockchain_sui::{SuiClientFactory, SuiConfig};
use client_wallet::{FileStorage, KeyValueStorage, MemoryStorage, StaticRadar, WalletConfig};
use kiosk_client::KioskClient;
use kiosk_client::logging::setup_logging;
use kiosk_client::watch_only::{WATCH_ONLY_WALLET, WatchOnlyAdapter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Setup logging
    let log_dir = env::var("KIOSK_LOG_DIR").ok().map(PathBuf::from);
    setup_logging(log_dir.as_deref())?;

    tracing::info!("Starting kiosk client");

    // 2. Load configuration from environment
    let mut wallet_config = WalletConfig::from_env();
    let sui_config = match SuiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Invalid Sui configuration: {}. Falling back to testnet.", e);
            SuiConfig::default()
        }
    };
    if let Err(e) = sui_config.validate() {
        anyhow::bail!("Invalid Sui configuration: {}", e);
    }

    let chain = sui_config.chain();
    if wallet_config.find_chain(&chain.id).is_none() {
        wallet_config.chains.push(chain);
    }

    tracing::info!("Sui network: {} ({})", sui_config.network, sui_config.get_rpc_url());
    tracing::info!("Auto-connect: {}", wallet_config.auto_connect);

    // 3. Preference storage
    let storage: Arc<dyn KeyValueStorage> = match open_storage(&wallet_config) {
        Ok(storage) => {
            tracing::info!("Preferences stored at {}", storage.path().display());
            Arc::new(storage)
        }
        Err(e) => {
            tracing::warn!("Failed to open preference storage: {}. Using memory.", e);
            Arc::new(MemoryStorage::new())
        }
    };

    // 4. Wallets
    let radar = Arc::new(StaticRadar::new(Vec::new()));
    let owner = env::var("KIOSK_OWNER_ADDRESS").ok().filter(|s| !s.is_empty());
    let mut builder = KioskClient::builder();

    match owner {
        Some(address) => {
            let adapter = WatchOnlyAdapter::new(address, sui_config.chain().id);
            tracing::info!("Watching kiosks of {}", adapter.address());
            radar.register(Arc::new(adapter));
            builder = builder.wallet(WATCH_ONLY_WALLET);
        }
        None => {
            tracing::warn!("KIOSK_OWNER_ADDRESS not set, relying on auto-connect");
        }
    }

    // 5. Build and run
    let client = builder
        .config(wallet_config)
        .radar(radar)
        .factory(Arc::new(SuiClientFactory::new(sui_config)))
        .storage(storage)
        .build()?;

    tracing::info!("Client assembled, starting...");
    client.run().await?;

    tracing::info!("Client shutdown complete");
    Ok(())
}

fn open_storage(config: &WalletConfig) -> client_wallet::storage::Result<FileStorage> {
    match &config.storage_dir {
        Some(dir) => FileStorage::new(dir),
        None => FileStorage::in_data_dir(),
    }
}
