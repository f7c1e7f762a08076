//! Wallet connection manager.
//!
//! Owns the connection record and the chain clients derived from it:
//!
//! ```text
//! DISCONNECTED ──select/connect──→ CONNECTING ──adapter.connect ok──→ CONNECTED
//!      ↑                                │                                 │
//!      └──────────── any failure ───────┘                                 │
//!      └──────────────────────────── disconnect ──────────────────────────┘
//! ```
//!
//! Every other store reads the current address, chain and clients from here.

use std::future::Future;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use client_blockchain_core::{
    ChainClientFactory, ChainClients, ChainDescriptor, ExecuteOptions, NormalizedModules,
    TransactionBlock, TransactionResponse, UNKNOWN_CHAIN_ID,
};

use crate::adapter::{
    ConnectInput, ConnectOutput, Feature, SignAndExecuteTransactionBlockInput, SignMessageInput,
    SignPersonalMessageInput, SignTransactionBlockInput, SignedMessage, SignedPersonalMessage,
    SignedTransactionBlock, WalletAccount, WalletAdapter,
};
use crate::auto_connect::AutoConnect;
use crate::available::resolve_available_wallets;
use crate::config::WalletConfig;
use crate::detection::{AdapterList, WalletDetection, WalletRadar};
use crate::error::{Result, WalletError};
use crate::events::{ListenerHandle, ListenerRegistry, WalletEvent, WalletEventKind, spawn_listener};
use crate::navigation::{Navigator, NoopNavigator};
use crate::notifications::{Notification, Notifications};
use crate::state::{ConnectionState, ConnectionStatus, SuiState, obfuscate_address};
use crate::storage::{KeyValueStorage, MemoryStorage, StorageKey};

const SUPPORTED_NETWORK: &str = "Connected to supported Sui network.";
const UNSUPPORTED_NETWORK: &str = "You appear to be on an unsupported Sui network.";

struct Inner {
    config: WalletConfig,
    state: watch::Sender<SuiState>,
    detection: WalletDetection,
    auto_connect: AutoConnect,
    factory: Arc<dyn ChainClientFactory>,
    storage: Arc<dyn KeyValueStorage>,
    notifications: Notifications,
    navigator: Arc<dyn Navigator>,
    listeners: ListenerRegistry,
    mount_task: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.listeners.clear();
        if let Some(task) = self.mount_task.get_mut().ok().and_then(Option::take) {
            task.abort();
        }
    }
}

/// Handle to the wallet connection store. Cheap to clone.
#[derive(Clone)]
pub struct WalletManager {
    inner: Arc<Inner>,
}

impl WalletManager {
    pub fn builder() -> WalletManagerBuilder {
        WalletManagerBuilder::new()
    }

    // ------------------------------------------------------------------------
    // Store access
    // ------------------------------------------------------------------------

    /// Snapshot of the store value.
    pub fn state(&self) -> SuiState {
        self.inner.state.borrow().clone()
    }

    /// Snapshot of the connection record.
    pub fn wallet(&self) -> ConnectionState {
        self.inner.state.borrow().wallet.clone()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.inner.state.borrow().wallet.status
    }

    pub fn subscribe(&self) -> watch::Receiver<SuiState> {
        self.inner.state.subscribe()
    }

    pub fn clients(&self) -> Option<ChainClients> {
        self.inner.state.borrow().clients.clone()
    }

    pub fn normalized_modules(&self) -> NormalizedModules {
        self.inner.state.borrow().normalized_modules.clone()
    }

    pub fn config(&self) -> &WalletConfig {
        &self.inner.config
    }

    pub fn notifications(&self) -> &Notifications {
        &self.inner.notifications
    }

    pub fn factory(&self) -> &Arc<dyn ChainClientFactory> {
        &self.inner.factory
    }

    pub(crate) fn storage(&self) -> &dyn KeyValueStorage {
        self.inner.storage.as_ref()
    }

    /// Number of live event listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Start wallet detection and auto-connect. Idempotent.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(&self) {
        if self.inner.state.borrow().is_initialized {
            return;
        }

        let inner = &self.inner;
        inner.detection.mount();

        let wallets = resolve_available_wallets(
            &inner.config.default_wallets,
            &inner.detection.current(),
        );
        inner.state.send_modify(|state| {
            state.is_initialized = true;
            state.normalized_modules.clear();
            state.wallet = ConnectionState::new(inner.config.initial_chain());
            state.chains = inner.config.chains.clone();
            state.configured_wallets = wallets.configured;
            state.detected_wallets = wallets.detected;
            state.all_available_wallets = wallets.all_available;
        });

        let weak = Arc::downgrade(&self.inner);
        let mut rx = inner.detection.subscribe();
        let task = tokio::spawn(async move {
            let mut adapters = rx.borrow_and_update().clone();
            loop {
                let Some(manager) = upgrade(&weak) else { break };
                manager.on_detected(adapters).await;
                drop(manager);

                if rx.changed().await.is_err() {
                    break;
                }
                adapters = rx.borrow_and_update().clone();
            }
        });

        if let Some(previous) = lock(&inner.mount_task).replace(task) {
            previous.abort();
        }

        tracing::info!(target: "wallet", "Wallet store mounted");
    }

    /// Stop detection, drop every listener and reset the store.
    pub fn unmount(&self) {
        let inner = &self.inner;
        inner.detection.unmount();

        if let Some(task) = lock(&inner.mount_task).take() {
            task.abort();
        }

        inner.listeners.clear();
        inner.auto_connect.reset();
        inner.state.send_replace(SuiState::default());

        tracing::info!(target: "wallet", "Wallet store unmounted");
    }

    async fn on_detected(&self, adapters: AdapterList) {
        let wallets = resolve_available_wallets(&self.inner.config.default_wallets, &adapters);
        let available = wallets.all_available.clone();

        self.inner.state.send_modify(|state| {
            state.configured_wallets = wallets.configured;
            state.detected_wallets = wallets.detected;
            state.all_available_wallets = wallets.all_available;
        });

        self.inner.auto_connect.on_available(self, &available).await;
    }

    // ------------------------------------------------------------------------
    // Connection
    // ------------------------------------------------------------------------

    /// Connect `adapter`, deriving the active chain from its first account.
    ///
    /// On failure the connection record is reset and the error returned.
    pub async fn connect(
        &self,
        adapter: Arc<dyn WalletAdapter>,
        input: ConnectInput,
    ) -> Result<ConnectOutput> {
        let previous_chain = {
            let mut chain = ChainDescriptor::unknown();
            self.inner.state.send_modify(|state| {
                chain = state.wallet.chain.clone();
                state.wallet.adapter = Some(Arc::clone(&adapter));
                state.wallet.connecting = true;
                state.wallet.status = ConnectionStatus::Connecting;
            });
            chain
        };

        match self.establish(&adapter, input, previous_chain).await {
            Ok(output) => Ok(output),
            Err(e) => {
                tracing::warn!(target: "wallet", wallet = adapter.name(), "Connect failed: {}", e);
                self.inner.state.send_modify(|state| state.wallet.reset());
                Err(e)
            }
        }
    }

    async fn establish(
        &self,
        adapter: &Arc<dyn WalletAdapter>,
        input: ConnectInput,
        previous_chain: ChainDescriptor,
    ) -> Result<ConnectOutput> {
        let output = adapter.connect(input).await?;

        let chain = match output.accounts.first() {
            Some(account) => {
                let id = account
                    .chains
                    .first()
                    .map(String::as_str)
                    .unwrap_or(UNKNOWN_CHAIN_ID);
                self.inner.config.find_chain(id).cloned().unwrap_or_default()
            }
            None => previous_chain,
        };

        let address = adapter
            .accounts()
            .first()
            .map(|account| account.address.clone())
            .ok_or(WalletError::NoActiveAccount)?;

        let (clients, normalized_modules) = self.build_clients(&chain, false).await;

        let name = adapter.name().to_string();
        self.inner.state.send_modify(|state| {
            state.clients = clients;
            state.normalized_modules = normalized_modules;
            state.wallet.obfuscated_address = Some(obfuscate_address(&address));
            state.wallet.address = Some(address);
            state.wallet.connecting = false;
            state.wallet.connected = true;
            state.wallet.chain = chain.clone();
            state.wallet.name = Some(name.clone());
            state.wallet.status = ConnectionStatus::Connected;
        });

        self.watch_chain(adapter);

        if let Err(e) = self
            .inner
            .storage
            .set_item(StorageKey::LastConnectWalletName, &name)
        {
            tracing::warn!(target: "wallet", "Failed to remember wallet {}: {}", name, e);
        }

        tracing::info!(target: "wallet", wallet = %name, chain = %chain.id, "Wallet connected");
        Ok(output)
    }

    /// Build clients for `chain` and fetch the configured package's modules.
    ///
    /// Failures are reported through the notification channel and leave no
    /// clients or an empty module map.
    async fn build_clients(
        &self,
        chain: &ChainDescriptor,
        announce: bool,
    ) -> (Option<ChainClients>, NormalizedModules) {
        let clients = match self.inner.factory.connect(chain).await {
            Ok(clients) => clients,
            Err(e) => {
                tracing::error!(target: "wallet", chain = %chain.id, "Failed to build chain clients: {}", e);
                self.inner.notifications.send(Notification::error(UNSUPPORTED_NETWORK));
                return (None, NormalizedModules::new());
            }
        };

        let Some(package_id) = self.inner.config.package_id.as_deref() else {
            return (Some(clients), NormalizedModules::new());
        };

        let modules = match clients
            .rpc
            .get_normalized_move_modules_by_package(package_id)
            .await
        {
            Ok(modules) => {
                if announce {
                    self.inner.notifications.send(Notification::success(SUPPORTED_NETWORK));
                }
                modules
            }
            Err(e) => {
                tracing::error!(target: "wallet", chain = %chain.id, package_id, "Failed to fetch modules: {}", e);
                self.inner.notifications.send(Notification::error(UNSUPPORTED_NETWORK));
                NormalizedModules::new()
            }
        };

        (Some(clients), modules)
    }

    fn watch_chain(&self, adapter: &Arc<dyn WalletAdapter>) {
        let weak = Arc::downgrade(&self.inner);
        self.subscribe_event(adapter, WalletEventKind::ChainChange, move |event| {
            let weak = weak.clone();
            async move {
                if let (Some(manager), WalletEvent::ChainChange { chain }) = (upgrade(&weak), event) {
                    manager.handle_chain_change(&chain).await;
                }
            }
        });
    }

    async fn handle_chain_change(&self, chain_id: &str) {
        if self.inner.state.borrow().wallet.chain.id == chain_id {
            return;
        }

        let Some(chain) = self.inner.config.find_chain(chain_id).cloned() else {
            tracing::warn!(target: "wallet", chain = chain_id, "Wallet switched to an unknown chain");
            self.inner
                .state
                .send_modify(|state| state.wallet.chain = ChainDescriptor::unknown());
            return;
        };

        let (clients, normalized_modules) = self.build_clients(&chain, true).await;

        tracing::info!(target: "wallet", chain = %chain.id, "Wallet chain changed");
        self.inner.state.send_modify(|state| {
            state.clients = clients;
            state.normalized_modules = normalized_modules;
            state.wallet.chain = chain;
        });
    }

    /// Disconnect the current wallet.
    ///
    /// The connection record is reset even if the wallet's own disconnect
    /// fails; that failure is returned afterwards.
    pub async fn disconnect(&self) -> Result<()> {
        let adapter = self
            .inner
            .state
            .borrow()
            .wallet
            .callable_adapter()
            .cloned()
            .ok_or(WalletError::NotConnected)?;

        if self.inner.listeners.clear() > 0 {
            self.inner.navigator.goto(&self.inner.config.routes.home);
        }

        if let Err(e) = self.inner.storage.remove_item(StorageKey::LastConnectWalletName) {
            tracing::warn!(target: "wallet", "Failed to forget last wallet: {}", e);
        }

        let result = if adapter.has_feature(Feature::Disconnect) {
            adapter.disconnect().await
        } else {
            Ok(())
        };

        self.inner.state.send_modify(|state| {
            state.wallet.reset();
            state.wallet.chain = ChainDescriptor::unknown();
        });

        tracing::info!(target: "wallet", wallet = adapter.name(), "Wallet disconnected");
        result.map_err(WalletError::from)
    }

    /// Connect the available wallet called `name`.
    ///
    /// No-op if that wallet is already connected; any other connected wallet
    /// is disconnected first.
    pub async fn select(&self, name: &str, auto_redirect: bool) -> Result<()> {
        let current = self.inner.state.borrow().wallet.callable_adapter().cloned();
        if let Some(current) = current {
            if current.name() == name {
                return Ok(());
            }
            self.disconnect().await?;
        }

        let adapter = {
            let state = self.inner.state.borrow();
            let wallet = state
                .all_available_wallets
                .iter()
                .find(|wallet| wallet.name == name)
                .ok_or_else(|| WalletError::WalletNotAvailable {
                    name: name.to_string(),
                    available: state
                        .all_available_wallets
                        .iter()
                        .map(|wallet| wallet.name.clone())
                        .collect(),
                })?;
            wallet
                .adapter
                .clone()
                .ok_or_else(|| WalletError::MissingAdapter(name.to_string()))?
        };

        self.connect(adapter, ConnectInput::default()).await?;

        if auto_redirect {
            self.inner.navigator.goto(&self.inner.config.routes.redirect);
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Accounts & events
    // ------------------------------------------------------------------------

    /// First account of the connected wallet.
    pub fn get_account(&self) -> Option<WalletAccount> {
        let adapter = self.inner.state.borrow().wallet.callable_adapter().cloned()?;
        adapter.accounts().into_iter().next()
    }

    pub fn get_accounts(&self) -> Result<Vec<WalletAccount>> {
        Ok(self.callable_adapter()?.accounts())
    }

    /// Register `listener` for events of `kind` from the connected wallet.
    pub fn on<F, Fut>(&self, kind: WalletEventKind, listener: F) -> Result<ListenerHandle>
    where
        F: FnMut(WalletEvent) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let adapter = self.callable_adapter()?;
        Ok(self.subscribe_event(&adapter, kind, listener))
    }

    fn subscribe_event<F, Fut>(
        &self,
        adapter: &Arc<dyn WalletAdapter>,
        kind: WalletEventKind,
        listener: F,
    ) -> ListenerHandle
    where
        F: FnMut(WalletEvent) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        spawn_listener(&self.inner.listeners, adapter.on_change(), kind, listener)
    }

    // ------------------------------------------------------------------------
    // Signing
    // ------------------------------------------------------------------------

    fn callable_adapter(&self) -> Result<Arc<dyn WalletAdapter>> {
        self.inner
            .state
            .borrow()
            .wallet
            .callable_adapter()
            .cloned()
            .ok_or(WalletError::NotConnected)
    }

    fn signer(&self) -> Result<(Arc<dyn WalletAdapter>, WalletAccount, String)> {
        let adapter = self.callable_adapter()?;
        let account = adapter
            .accounts()
            .into_iter()
            .next()
            .ok_or(WalletError::NoActiveAccount)?;
        let chain = self.inner.state.borrow().wallet.chain.id.clone();
        Ok((adapter, account, chain))
    }

    pub async fn sign_and_execute_transaction_block(
        &self,
        transaction_block: TransactionBlock,
        options: Option<ExecuteOptions>,
    ) -> Result<TransactionResponse> {
        let (adapter, account, chain) = self.signer()?;
        let input = SignAndExecuteTransactionBlockInput {
            transaction_block,
            account,
            chain,
            options,
        };
        Ok(adapter.sign_and_execute_transaction_block(input).await?)
    }

    pub async fn sign_transaction_block(
        &self,
        transaction_block: TransactionBlock,
    ) -> Result<SignedTransactionBlock> {
        let (adapter, account, chain) = self.signer()?;
        let input = SignTransactionBlockInput {
            transaction_block,
            account,
            chain,
        };
        Ok(adapter.sign_transaction_block(input).await?)
    }

    pub async fn sign_message(&self, message: Vec<u8>) -> Result<SignedMessage> {
        let (adapter, account, _) = self.signer()?;
        Ok(adapter.sign_message(SignMessageInput { account, message }).await?)
    }

    pub async fn sign_personal_message(&self, message: Vec<u8>) -> Result<SignedPersonalMessage> {
        let (adapter, account, _) = self.signer()?;
        Ok(adapter
            .sign_personal_message(SignPersonalMessageInput { account, message })
            .await?)
    }
}

fn upgrade(weak: &Weak<Inner>) -> Option<WalletManager> {
    weak.upgrade().map(|inner| WalletManager { inner })
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`WalletManager`].
///
/// The radar and the client factory are required; storage defaults to
/// [`MemoryStorage`] and navigation to [`NoopNavigator`].
#[derive(Default)]
pub struct WalletManagerBuilder {
    config: WalletConfig,
    radar: Option<Arc<dyn WalletRadar>>,
    factory: Option<Arc<dyn ChainClientFactory>>,
    storage: Option<Arc<dyn KeyValueStorage>>,
    notifications: Option<Notifications>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl WalletManagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: WalletConfig) -> Self {
        self.config = config;
        self
    }

    pub fn radar(mut self, radar: Arc<dyn WalletRadar>) -> Self {
        self.radar = Some(radar);
        self
    }

    pub fn factory(mut self, factory: Arc<dyn ChainClientFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn storage(mut self, storage: Arc<dyn KeyValueStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn notifications(mut self, notifications: Notifications) -> Self {
        self.notifications = Some(notifications);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn build(self) -> Result<WalletManager> {
        let radar = self.radar.ok_or(WalletError::MissingComponent("a wallet radar"))?;
        let factory = self
            .factory
            .ok_or(WalletError::MissingComponent("a chain client factory"))?;

        let config = self.config;
        let notifications = self
            .notifications
            .unwrap_or_else(|| Notifications::new(config.notification_capacity));
        let state = SuiState {
            wallet: ConnectionState::new(config.initial_chain()),
            ..SuiState::default()
        };

        Ok(WalletManager {
            inner: Arc::new(Inner {
                auto_connect: AutoConnect::new(config.auto_connect),
                detection: WalletDetection::new(radar),
                state: watch::Sender::new(state),
                factory,
                storage: self.storage.unwrap_or_else(|| Arc::new(MemoryStorage::new())),
                notifications,
                navigator: self.navigator.unwrap_or_else(|| Arc::new(NoopNavigator)),
                listeners: ListenerRegistry::new(),
                mount_task: Mutex::new(None),
                config,
            }),
        })
    }
}
