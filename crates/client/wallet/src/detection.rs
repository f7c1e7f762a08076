//! Wallet discovery.
//!
//! A [`WalletRadar`] reports the wallets present in the environment.
//! [`WalletDetection`] wraps it into a watchable list holding only the
//! wallets that implement the required wallet-standard features.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::adapter::{WalletAdapter, is_standard_compatible};

pub type AdapterList = Vec<Arc<dyn WalletAdapter>>;

/// Source of detected wallet adapters.
pub trait WalletRadar: Send + Sync {
    fn activate(&self);

    fn deactivate(&self);

    fn detected_wallet_adapters(&self) -> AdapterList;

    /// Receives the full adapter list whenever it changes.
    fn subscribe(&self) -> broadcast::Receiver<AdapterList>;
}

fn compatible(adapters: AdapterList) -> AdapterList {
    adapters
        .into_iter()
        .filter(|adapter| is_standard_compatible(adapter.as_ref()))
        .collect()
}

/// Watchable list of compatible wallet adapters.
pub struct WalletDetection {
    radar: Arc<dyn WalletRadar>,
    tx: Arc<watch::Sender<AdapterList>>,
    active: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl WalletDetection {
    pub fn new(radar: Arc<dyn WalletRadar>) -> Self {
        Self {
            radar,
            tx: Arc::new(watch::Sender::new(Vec::new())),
            active: AtomicBool::new(false),
            task: Mutex::new(None),
        }
    }

    /// Activate the radar and start forwarding its emissions. Idempotent.
    pub fn mount(&self) {
        if self.active.swap(true, Ordering::SeqCst) {
            return;
        }

        self.radar.activate();

        // Subscribe before reading the snapshot so no emission falls in between.
        let mut rx = self.radar.subscribe();
        self.tx
            .send_replace(compatible(self.radar.detected_wallet_adapters()));

        let tx = Arc::clone(&self.tx);
        let task = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(adapters) => {
                        let adapters = compatible(adapters);
                        tracing::debug!(count = adapters.len(), "Detected wallets changed");
                        tx.send_replace(adapters);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Wallet detection lagged behind radar");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        if let Some(previous) = self.lock_task().replace(task) {
            previous.abort();
        }
    }

    /// Stop forwarding and deactivate the radar. The last list is kept.
    pub fn unmount(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }

        if let Some(task) = self.lock_task().take() {
            task.abort();
        }
        self.radar.deactivate();
    }

    pub fn is_mounted(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> AdapterList {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AdapterList> {
        self.tx.subscribe()
    }

    fn lock_task(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for WalletDetection {
    fn drop(&mut self) {
        if let Some(task) = self.lock_task().take() {
            task.abort();
        }
    }
}

/// Radar over an explicitly registered set of adapters.
pub struct StaticRadar {
    adapters: Mutex<AdapterList>,
    tx: broadcast::Sender<AdapterList>,
    active: AtomicBool,
}

impl StaticRadar {
    pub fn new(adapters: AdapterList) -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            adapters: Mutex::new(adapters),
            tx,
            active: AtomicBool::new(false),
        }
    }

    /// Add an adapter and re-emit the list.
    pub fn register(&self, adapter: Arc<dyn WalletAdapter>) {
        let adapters = {
            let mut adapters = self.adapters.lock().unwrap_or_else(|e| e.into_inner());
            adapters.push(adapter);
            adapters.clone()
        };

        // No subscribers yet is fine; they read the snapshot on subscribe.
        let _ = self.tx.send(adapters);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl WalletRadar for StaticRadar {
    fn activate(&self) {
        self.active.store(true, Ordering::SeqCst);
    }

    fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    fn detected_wallet_adapters(&self) -> AdapterList {
        self.adapters.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<AdapterList> {
        self.tx.subscribe()
    }
}
