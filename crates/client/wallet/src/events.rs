//! Wallet event normalization and listener bookkeeping.
//!
//! Wallets emit a single low-level `change` notification. Listeners subscribe
//! to one of four semantic kinds instead; each listener runs as its own task
//! draining the adapter's broadcast stream and only sees events of its kind.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use strum::{Display, EnumString};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::AbortHandle;

use crate::adapter::{Feature, StandardChange, WalletAccount};

/// Semantic event kinds a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum WalletEventKind {
    Change,
    ChainChange,
    AccountChange,
    FeatureChange,
}

/// A normalized wallet event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// Raw change payload
    Change(StandardChange),
    /// First chain of the change payload
    ChainChange { chain: String },
    /// First account of the change payload
    AccountChange { account: WalletAccount },
    FeatureChange { features: Vec<Feature> },
}

impl WalletEvent {
    /// Event of `kind` carried by `change`, if any.
    pub fn from_change(kind: WalletEventKind, change: &StandardChange) -> Option<Self> {
        match kind {
            WalletEventKind::Change => Some(Self::Change(change.clone())),
            WalletEventKind::ChainChange => change
                .chains
                .as_ref()
                .and_then(|chains| chains.first())
                .map(|chain| Self::ChainChange {
                    chain: chain.clone(),
                }),
            WalletEventKind::AccountChange => change
                .accounts
                .as_ref()
                .and_then(|accounts| accounts.first())
                .map(|account| Self::AccountChange {
                    account: account.clone(),
                }),
            WalletEventKind::FeatureChange => change.features.as_ref().map(|features| {
                Self::FeatureChange {
                    features: features.clone(),
                }
            }),
        }
    }

    pub fn kind(&self) -> WalletEventKind {
        match self {
            Self::Change(_) => WalletEventKind::Change,
            Self::ChainChange { .. } => WalletEventKind::ChainChange,
            Self::AccountChange { .. } => WalletEventKind::AccountChange,
            Self::FeatureChange { .. } => WalletEventKind::FeatureChange,
        }
    }
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    handles: HashMap<u64, AbortHandle>,
}

/// Every live listener task, so they can be torn down together.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Listener tasks never panic while holding the lock, so a poisoned
    // registry still holds consistent data.
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn remove(&self, id: u64) -> Option<AbortHandle> {
        self.lock().handles.remove(&id)
    }

    /// Abort every listener; returns how many were registered.
    pub fn clear(&self) -> usize {
        let handles: Vec<_> = self.lock().handles.drain().map(|(_, h)| h).collect();
        for handle in &handles {
            handle.abort();
        }
        handles.len()
    }

    pub fn len(&self) -> usize {
        self.lock().handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unsubscribe handle returned when registering a listener.
#[derive(Debug)]
pub struct ListenerHandle {
    id: u64,
    registry: ListenerRegistry,
}

impl ListenerHandle {
    /// Stop the listener. No-op if it was already torn down.
    pub fn off(self) {
        if let Some(handle) = self.registry.remove(self.id) {
            handle.abort();
        }
    }
}

/// Spawn a task feeding events of `kind` from `rx` to `listener`.
pub fn spawn_listener<F, Fut>(
    registry: &ListenerRegistry,
    mut rx: broadcast::Receiver<StandardChange>,
    kind: WalletEventKind,
    mut listener: F,
) -> ListenerHandle
where
    F: FnMut(WalletEvent) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    // Holding the lock until the handle is stored keeps a task that exits
    // immediately from removing its entry before it exists.
    let mut guard = registry.lock();
    let id = guard.next_id;
    guard.next_id += 1;

    let owner = registry.clone();
    let task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(change) => {
                    if let Some(event) = WalletEvent::from_change(kind, &change) {
                        listener(event).await;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(%kind, skipped, "Wallet listener lagged behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
        owner.remove(id);
    });

    guard.handles.insert(id, task.abort_handle());
    drop(guard);

    ListenerHandle {
        id,
        registry: registry.clone(),
    }
}
