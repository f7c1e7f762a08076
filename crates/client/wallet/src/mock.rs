//! In-memory collaborators for tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::broadcast;

use client_blockchain_core::{
    ChainClientFactory, ChainClients, ChainDescriptor, ChainRpc, GetKioskOptions, Kiosk,
    KioskData, KioskReader, NormalizedModules, ObjectChange, ObjectChangeKind, ObjectId,
    OwnedKiosks, OwnedKiosksRequest, TransactionResponse, TransportError,
};

use crate::adapter::{
    ConnectInput, ConnectOutput, Feature, SignAndExecuteTransactionBlockInput, SignMessageInput,
    SignPersonalMessageInput, SignTransactionBlockInput, SignedMessage, SignedPersonalMessage,
    SignedTransactionBlock, StandardChange, WalletAccount, WalletAdapter,
};
use crate::config::WalletConfig;
use crate::detection::StaticRadar;
use crate::error::AdapterError;
use crate::manager::WalletManager;
use crate::navigation::Navigator;
use crate::storage::MemoryStorage;

pub const ADDRESS: &str = "0x7d20dcdb2bca4f508ea9613994683eb4e76e9c4ed371169677c1be02aaf0b58e";

pub fn account(address: &str, chain: &str) -> WalletAccount {
    WalletAccount {
        address: address.to_string(),
        public_key: vec![1, 2, 3],
        chains: vec![chain.to_string()],
        features: vec![Feature::SignAndExecuteTransactionBlock],
        label: None,
    }
}

pub fn kiosk(id: &str) -> Kiosk {
    Kiosk::from_data(KioskData {
        id: ObjectId::new(id),
        allow_extensions: false,
        item_count: 0,
        owner: ADDRESS.to_string(),
        profits: "0".to_string(),
    })
}

pub fn page(ids: &[&str], has_next_page: bool, next_cursor: Option<&str>) -> OwnedKiosks {
    OwnedKiosks {
        kiosk_ids: ids.iter().map(|id| ObjectId::new(*id)).collect(),
        kiosk_owner_caps: Vec::new(),
        has_next_page,
        next_cursor: next_cursor.map(str::to_string),
    }
}

// ============================================================================
// Wallet adapter
// ============================================================================

pub struct MockWalletAdapter {
    name: String,
    features: Vec<Feature>,
    accounts: Mutex<Vec<WalletAccount>>,
    authorized: AtomicBool,
    change_tx: broadcast::Sender<StandardChange>,
    fail_connect: AtomicBool,
    fail_disconnect: AtomicBool,
    pub connect_calls: AtomicUsize,
    pub disconnect_calls: AtomicUsize,
    execute_response: Mutex<TransactionResponse>,
    pub last_execute: Mutex<Option<SignAndExecuteTransactionBlockInput>>,
    pub last_message: Mutex<Option<SignMessageInput>>,
}

impl MockWalletAdapter {
    pub fn new(name: &str) -> Self {
        let (change_tx, _) = broadcast::channel(16);
        Self {
            name: name.to_string(),
            features: vec![
                Feature::Connect,
                Feature::Disconnect,
                Feature::Events,
                Feature::SignAndExecuteTransactionBlock,
                Feature::SignTransactionBlock,
                Feature::SignMessage,
                Feature::SignPersonalMessage,
            ],
            accounts: Mutex::new(vec![account(ADDRESS, "sui:testnet")]),
            authorized: AtomicBool::new(false),
            change_tx,
            fail_connect: AtomicBool::new(false),
            fail_disconnect: AtomicBool::new(false),
            connect_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
            execute_response: Mutex::new(TransactionResponse::default()),
            last_execute: Mutex::new(None),
            last_message: Mutex::new(None),
        }
    }

    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }

    pub fn with_accounts(self, accounts: Vec<WalletAccount>) -> Self {
        *self.accounts.lock().unwrap() = accounts;
        self
    }

    pub fn failing_connect(self) -> Self {
        self.fail_connect.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_disconnect(self) -> Self {
        self.fail_disconnect.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_execute_response(&self, response: TransactionResponse) {
        *self.execute_response.lock().unwrap() = response;
    }

    /// Respond to executions with a created object of `object_type`.
    pub fn creates(&self, object_id: &str, object_type: &str) {
        self.set_execute_response(TransactionResponse {
            digest: "digest".to_string(),
            object_changes: vec![ObjectChange {
                kind: ObjectChangeKind::Created,
                object_id: ObjectId::new(object_id),
                object_type: Some(object_type.to_string()),
            }],
            effects: None,
        });
    }

    /// Emit a wallet-standard `change` event.
    pub fn emit(&self, change: StandardChange) {
        let _ = self.change_tx.send(change);
    }

    pub fn connects(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletAdapter for MockWalletAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn icon(&self) -> &str {
        "data:image/svg+xml;base64,"
    }

    fn accounts(&self) -> Vec<WalletAccount> {
        if self.authorized.load(Ordering::SeqCst) {
            self.accounts.lock().unwrap().clone()
        } else {
            Vec::new()
        }
    }

    fn features(&self) -> Vec<Feature> {
        self.features.clone()
    }

    fn on_change(&self) -> broadcast::Receiver<StandardChange> {
        self.change_tx.subscribe()
    }

    async fn connect(&self, _input: ConnectInput) -> Result<ConnectOutput, AdapterError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(AdapterError::Rejected("user rejected".to_string()));
        }

        self.authorized.store(true, Ordering::SeqCst);
        Ok(ConnectOutput {
            accounts: self.accounts(),
        })
    }

    async fn disconnect(&self) -> Result<(), AdapterError> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        self.authorized.store(false, Ordering::SeqCst);

        if self.fail_disconnect.load(Ordering::SeqCst) {
            return Err(AdapterError::Wallet("extension crashed".to_string()));
        }
        Ok(())
    }

    async fn sign_and_execute_transaction_block(
        &self,
        input: SignAndExecuteTransactionBlockInput,
    ) -> Result<TransactionResponse, AdapterError> {
        *self.last_execute.lock().unwrap() = Some(input);
        Ok(self.execute_response.lock().unwrap().clone())
    }

    async fn sign_transaction_block(
        &self,
        input: SignTransactionBlockInput,
    ) -> Result<SignedTransactionBlock, AdapterError> {
        Ok(SignedTransactionBlock {
            transaction_block_bytes: format!("{}:{}", input.chain, input.account.address),
            signature: "sig".to_string(),
        })
    }

    async fn sign_message(&self, input: SignMessageInput) -> Result<SignedMessage, AdapterError> {
        let signed = SignedMessage {
            message_bytes: String::from_utf8_lossy(&input.message).into_owned(),
            signature: "sig".to_string(),
        };
        *self.last_message.lock().unwrap() = Some(input);
        Ok(signed)
    }

    async fn sign_personal_message(
        &self,
        input: SignPersonalMessageInput,
    ) -> Result<SignedPersonalMessage, AdapterError> {
        Ok(SignedPersonalMessage {
            bytes: String::from_utf8_lossy(&input.message).into_owned(),
            signature: "sig".to_string(),
        })
    }
}

// ============================================================================
// Chain collaborators
// ============================================================================

#[derive(Default)]
pub struct MockRpc {
    url: String,
    pub fail_modules: AtomicBool,
    balances: Mutex<HashMap<(String, String), u128>>,
    pub module_calls: AtomicUsize,
    pub balance_calls: AtomicUsize,
}

impl MockRpc {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn set_balance(&self, owner: &str, coin_type: &str, balance: u128) {
        self.balances
            .lock()
            .unwrap()
            .insert((owner.to_string(), coin_type.to_string()), balance);
    }
}

#[async_trait]
impl ChainRpc for MockRpc {
    fn rpc_url(&self) -> &str {
        &self.url
    }

    async fn get_normalized_move_modules_by_package(
        &self,
        package: &str,
    ) -> Result<NormalizedModules, TransportError> {
        self.module_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_modules.load(Ordering::SeqCst) {
            return Err(TransportError::NetworkError("modules unavailable".to_string()));
        }

        let mut modules = NormalizedModules::new();
        modules.insert("kiosk_item".to_string(), serde_json::json!({ "address": package }));
        Ok(modules)
    }

    async fn get_coin_balance(&self, owner: &str, coin_type: &str) -> Result<u128, TransportError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);

        self.balances
            .lock()
            .unwrap()
            .get(&(owner.to_string(), coin_type.to_string()))
            .copied()
            .ok_or_else(|| TransportError::NetworkError("no balance".to_string()))
    }
}

#[derive(Default)]
pub struct MockKioskReader {
    pages: Mutex<VecDeque<OwnedKiosks>>,
    kiosks: Mutex<HashMap<ObjectId, Kiosk>>,
    failing: Mutex<HashSet<ObjectId>>,
    pub owned_calls: AtomicUsize,
    pub requests: Mutex<Vec<OwnedKiosksRequest>>,
}

impl MockKioskReader {
    pub fn push_page(&self, page: OwnedKiosks) {
        self.pages.lock().unwrap().push_back(page);
    }

    pub fn insert(&self, kiosk: Kiosk) {
        self.kiosks.lock().unwrap().insert(kiosk.id().clone(), kiosk);
    }

    pub fn fail(&self, id: &str) {
        self.failing.lock().unwrap().insert(ObjectId::new(id));
    }

    pub fn owned(&self) -> usize {
        self.owned_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KioskReader for MockKioskReader {
    async fn get_owned_kiosks(
        &self,
        request: OwnedKiosksRequest,
    ) -> Result<OwnedKiosks, TransportError> {
        self.owned_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);

        Ok(self.pages.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn get_kiosk(
        &self,
        id: &ObjectId,
        _options: GetKioskOptions,
    ) -> Result<Option<Kiosk>, TransportError> {
        if self.failing.lock().unwrap().contains(id) {
            return Err(TransportError::ObjectNotFound(id.clone()));
        }
        Ok(self.kiosks.lock().unwrap().get(id).cloned())
    }
}

/// Hands out the same mock clients for every known chain.
#[derive(Default)]
pub struct MockClientFactory {
    pub rpc: Arc<MockRpc>,
    pub kiosk: Arc<MockKioskReader>,
    pub connected: Mutex<Vec<String>>,
}

impl MockClientFactory {
    pub fn new() -> Self {
        Self {
            rpc: Arc::new(MockRpc::new("http://127.0.0.1:9000")),
            ..Self::default()
        }
    }

    pub fn chains(&self) -> Vec<String> {
        self.connected.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainClientFactory for MockClientFactory {
    async fn connect(&self, chain: &ChainDescriptor) -> Result<ChainClients, TransportError> {
        if chain.rpc_url.is_empty() {
            return Err(TransportError::ConfigError(format!("{} has no RPC url", chain.id)));
        }

        self.connected.lock().unwrap().push(chain.id.clone());
        Ok(ChainClients {
            rpc: self.rpc.clone(),
            kiosk: self.kiosk.clone(),
        })
    }
}

// ============================================================================
// Navigation
// ============================================================================

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn goto(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A manager wired to mock collaborators.
pub struct Harness {
    pub manager: WalletManager,
    pub radar: Arc<StaticRadar>,
    pub factory: Arc<MockClientFactory>,
    pub storage: Arc<MemoryStorage>,
    pub navigator: Arc<RecordingNavigator>,
    adapters: Vec<Arc<MockWalletAdapter>>,
}

impl Harness {
    pub fn new(adapters: Vec<MockWalletAdapter>, config: WalletConfig) -> Self {
        Self::with_storage(adapters, config, Arc::new(MemoryStorage::new()))
    }

    pub fn with_storage(
        adapters: Vec<MockWalletAdapter>,
        config: WalletConfig,
        storage: Arc<MemoryStorage>,
    ) -> Self {
        let adapters: Vec<_> = adapters.into_iter().map(Arc::new).collect();
        let radar = Arc::new(StaticRadar::new(
            adapters
                .iter()
                .map(|a| a.clone() as Arc<dyn WalletAdapter>)
                .collect(),
        ));
        let factory = Arc::new(MockClientFactory::new());
        let navigator = Arc::new(RecordingNavigator::default());

        let manager = WalletManager::builder()
            .config(config)
            .radar(radar.clone())
            .factory(factory.clone())
            .storage(storage.clone())
            .navigator(navigator.clone())
            .build()
            .unwrap();

        Self {
            manager,
            radar,
            factory,
            storage,
            navigator,
            adapters,
        }
    }

    /// Package and item module set, auto-connect off.
    pub fn config() -> WalletConfig {
        WalletConfig::default()
            .with_package_id("0xc0ffee")
            .with_item_module("0xc0ffee::item")
            .with_auto_connect(false)
    }

    pub fn adapter(&self, name: &str) -> Arc<MockWalletAdapter> {
        self.adapters
            .iter()
            .find(|a| a.name() == name)
            .cloned()
            .unwrap()
    }

    /// Mounted and connected to the first adapter.
    pub async fn connected(adapters: Vec<MockWalletAdapter>, config: WalletConfig) -> Self {
        let harness = Self::new(adapters, config);
        harness.manager.mount();
        let name = harness.adapters[0].name().to_string();
        harness.manager.select(&name, false).await.unwrap();
        harness
    }
}
