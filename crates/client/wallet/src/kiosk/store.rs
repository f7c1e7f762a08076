use std::collections::HashMap;
use std::sync::Mutex;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use client_blockchain_core::{
    ChainClients, ExecuteOptions, GetKioskOptions, Kiosk, ObjectId, OwnedKiosksRequest,
};

use super::transactions::{ItemDefinition, KIOSK_TYPE, create_kiosk_transaction};
use crate::error::KioskError;
use crate::manager::WalletManager;

type Result<T> = std::result::Result<T, KioskError>;

/// Kiosks fetched so far, in fetch order.
#[derive(Debug, Clone, PartialEq)]
pub struct KioskState {
    pub has_next_page: bool,
    /// Kiosk ids without duplicates; every key has an entry in `kiosks`
    pub keys: Vec<ObjectId>,
    pub kiosks: HashMap<ObjectId, Kiosk>,
}

impl Default for KioskState {
    fn default() -> Self {
        Self {
            has_next_page: true,
            keys: Vec::new(),
            kiosks: HashMap::new(),
        }
    }
}

impl KioskState {
    /// Kiosks in key order.
    pub fn ordered(&self) -> impl Iterator<Item = &Kiosk> {
        self.keys.iter().filter_map(|id| self.kiosks.get(id))
    }

    fn upsert(&mut self, kiosk: Kiosk) -> bool {
        let id = kiosk.id().clone();
        let added = !self.keys.contains(&id);
        if added {
            self.keys.push(id.clone());
        }
        self.kiosks.insert(id, kiosk);
        added
    }
}

/// Outcome of a kiosk creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KioskResponse {
    pub ok: bool,
    pub kiosk_id: Option<ObjectId>,
}

/// Paginated cache of the connected address's kiosks.
pub struct KioskStore {
    manager: WalletManager,
    state: watch::Sender<KioskState>,
    /// Cursor of the next page; kept out of the observable state
    cursor: Mutex<Option<String>>,
}

impl KioskStore {
    pub fn new(manager: WalletManager) -> Self {
        Self {
            manager,
            state: watch::Sender::new(KioskState::default()),
            cursor: Mutex::new(None),
        }
    }

    pub fn state(&self) -> KioskState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<KioskState> {
        self.state.subscribe()
    }

    /// Drop every cached kiosk and restart pagination.
    pub fn clear_storage(&self) {
        *self.lock_cursor() = None;
        self.state.send_replace(KioskState::default());
    }

    /// Fetch the next page of owned kiosks.
    ///
    /// Returns the number of newly added kiosks. Kiosks that fail to resolve
    /// are skipped without failing the batch.
    pub async fn get_next_kiosk_batch(&self) -> Result<usize> {
        if !self.state.borrow().has_next_page {
            return Ok(0);
        }

        let result = self.fetch_next_batch().await;
        if let Err(e) = &result {
            tracing::error!(target: "kiosk", "Failed to fetch kiosk batch: {}", e);
        }
        result
    }

    async fn fetch_next_batch(&self) -> Result<usize> {
        let address = self.address()?;
        let clients = self.clients()?;

        let cursor = self.lock_cursor().clone();
        let page = clients
            .kiosk
            .get_owned_kiosks(OwnedKiosksRequest::new(address).with_cursor(cursor))
            .await?;

        if let Some(next) = page.next_cursor {
            *self.lock_cursor() = Some(next);
        }

        let resolved = join_all(
            page.kiosk_ids
                .iter()
                .map(|id| resolve_kiosk(&clients, id)),
        )
        .await;

        let mut added = 0;
        self.state.send_modify(|state| {
            state.has_next_page = page.has_next_page;
            for kiosk in resolved.into_iter().flatten() {
                if state.upsert(kiosk) {
                    added += 1;
                }
            }
        });

        tracing::debug!(
            target: "kiosk",
            fetched = page.kiosk_ids.len(),
            added,
            has_next_page = page.has_next_page,
            "Kiosk batch merged"
        );
        Ok(added)
    }

    /// Fetch pages until the owner has no more kiosks.
    ///
    /// Stops early when a page adds nothing and leaves the cursor where it
    /// was, since asking again would return the same page.
    pub async fn get_all_kiosks(&self) -> Result<usize> {
        let mut total = 0;
        while self.state.borrow().has_next_page {
            let cursor = self.lock_cursor().clone();
            let added = self.get_next_kiosk_batch().await?;
            total += added;

            if added == 0 && *self.lock_cursor() == cursor {
                tracing::warn!(target: "kiosk", "Kiosk pagination made no progress, stopping");
                break;
            }
        }
        Ok(total)
    }

    /// Fetch one kiosk and add or refresh it in the cache.
    pub async fn get_single_kiosk(&self, id: &ObjectId) -> Result<Kiosk> {
        let result = self.fetch_single(id).await;
        if let Err(e) = &result {
            tracing::error!(target: "kiosk", kiosk = %id, "Failed to fetch kiosk: {}", e);
        }
        result
    }

    async fn fetch_single(&self, id: &ObjectId) -> Result<Kiosk> {
        let clients = self.clients()?;
        let kiosk = clients
            .kiosk
            .get_kiosk(id, GetKioskOptions { with_kiosk_fields: true })
            .await?
            .ok_or(KioskError::NotFound)?;

        self.state.send_modify(|state| {
            state.upsert(kiosk.clone());
        });
        Ok(kiosk)
    }

    /// Create and share a new kiosk owned by the connected address.
    pub async fn create_kiosk(&self) -> KioskResponse {
        self.create(None).await
    }

    /// Create a kiosk and define `item` in it within the same transaction.
    pub async fn create_kiosk_with_item(&self, item: &ItemDefinition) -> KioskResponse {
        self.create(Some(item)).await
    }

    async fn create(&self, item: Option<&ItemDefinition>) -> KioskResponse {
        match self.submit_create(item).await {
            Ok(kiosk_id) => {
                tracing::info!(target: "kiosk", kiosk = %kiosk_id, "Kiosk created");
                KioskResponse {
                    ok: true,
                    kiosk_id: Some(kiosk_id),
                }
            }
            Err(e) => {
                tracing::error!(target: "kiosk", "Failed to create kiosk: {}", e);
                KioskResponse::default()
            }
        }
    }

    async fn submit_create(&self, item: Option<&ItemDefinition>) -> Result<ObjectId> {
        let address = self.address()?;
        let item = match item {
            Some(item) => {
                let module = self
                    .manager
                    .config()
                    .item_module
                    .as_deref()
                    .ok_or(KioskError::ItemModuleUnset)?;
                Some((module, item))
            }
            None => None,
        };

        let tx = create_kiosk_transaction(&address, item);
        let options = ExecuteOptions {
            show_effects: true,
            show_object_changes: true,
        };
        let response = self
            .manager
            .sign_and_execute_transaction_block(tx, Some(options))
            .await?;

        response
            .find_created(KIOSK_TYPE)
            .map(|change| change.object_id.clone())
            .ok_or(KioskError::KioskIdUnknown)
    }

    fn address(&self) -> Result<String> {
        self.manager
            .wallet()
            .address
            .ok_or(KioskError::AddressUndefined)
    }

    fn clients(&self) -> Result<ChainClients> {
        self.manager.clients().ok_or(KioskError::ClientsUnavailable)
    }

    fn lock_cursor(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.cursor.lock().unwrap_or_else(|e| e.into_inner())
    }
}

async fn resolve_kiosk(clients: &ChainClients, id: &ObjectId) -> Option<Kiosk> {
    match clients
        .kiosk
        .get_kiosk(id, GetKioskOptions { with_kiosk_fields: true })
        .await
    {
        Ok(kiosk) => kiosk,
        Err(e) => {
            tracing::debug!(target: "kiosk", kiosk = %id, "Dropping unresolved kiosk: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WalletConfig;
    use crate::mock::{ADDRESS, Harness, MockWalletAdapter, kiosk, page};

    async fn store() -> (Harness, KioskStore) {
        let h = Harness::connected(vec![MockWalletAdapter::new("Suiet")], Harness::config()).await;
        let store = KioskStore::new(h.manager.clone());
        (h, store)
    }

    fn ids(state: &KioskState) -> Vec<&str> {
        state.keys.iter().map(ObjectId::as_str).collect()
    }

    #[tokio::test]
    async fn test_batch_merges_and_advances_cursor() {
        let (h, store) = store().await;
        let reader = &h.factory.kiosk;
        reader.insert(kiosk("0x1"));
        reader.insert(kiosk("0x2"));
        reader.insert(kiosk("0x3"));
        reader.push_page(page(&["0x1", "0x2"], true, Some("c1")));
        reader.push_page(page(&["0x2", "0x3"], false, None));

        assert_eq!(store.get_next_kiosk_batch().await.unwrap(), 2);
        assert_eq!(store.get_next_kiosk_batch().await.unwrap(), 1);

        let state = store.state();
        assert_eq!(ids(&state), vec!["0x1", "0x2", "0x3"]);
        assert_eq!(state.kiosks.len(), 3);
        assert!(!state.has_next_page);

        let requests = reader.requests.lock().unwrap().clone();
        assert_eq!(requests[0].address, ADDRESS);
        assert_eq!(requests[0].cursor, None);
        assert_eq!(requests[1].cursor.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_exhausted_pages_issue_no_calls() {
        let (h, store) = store().await;
        h.factory.kiosk.insert(kiosk("0x1"));
        h.factory.kiosk.push_page(page(&["0x1"], false, None));

        store.get_next_kiosk_batch().await.unwrap();
        let before = store.state();

        assert_eq!(store.get_next_kiosk_batch().await.unwrap(), 0);
        assert_eq!(h.factory.kiosk.owned(), 1);
        assert_eq!(store.state(), before);
    }

    #[tokio::test]
    async fn test_unresolved_kiosks_are_dropped() {
        let (h, store) = store().await;
        let reader = &h.factory.kiosk;
        reader.insert(kiosk("0x1"));
        reader.fail("0x2");
        reader.push_page(page(&["0x1", "0x2", "0x404"], true, Some("c1")));

        assert_eq!(store.get_next_kiosk_batch().await.unwrap(), 1);
        assert_eq!(ids(&store.state()), vec!["0x1"]);
    }

    #[tokio::test]
    async fn test_batch_requires_address() {
        let h = Harness::new(vec![MockWalletAdapter::new("Suiet")], Harness::config());
        h.manager.mount();
        let store = KioskStore::new(h.manager.clone());

        let err = store.get_next_kiosk_batch().await.unwrap_err();
        assert!(matches!(err, KioskError::AddressUndefined));
        assert_eq!(err.to_string(), "wallet address is not defined");
        assert_eq!(h.factory.kiosk.owned(), 0);
    }

    #[tokio::test]
    async fn test_single_kiosk_upserts_without_duplicates() {
        let (h, store) = store().await;
        h.factory.kiosk.insert(kiosk("0xabc"));

        store.get_single_kiosk(&ObjectId::new("0xabc")).await.unwrap();

        let mut updated = kiosk("0xabc");
        updated.kiosk.item_count = 3;
        h.factory.kiosk.insert(updated);
        store.get_single_kiosk(&ObjectId::new("0xabc")).await.unwrap();

        let state = store.state();
        assert_eq!(ids(&state), vec!["0xabc"]);
        assert_eq!(state.kiosks[&ObjectId::new("0xabc")].kiosk.item_count, 3);
    }

    #[tokio::test]
    async fn test_interleaved_fetches_keep_keys_unique() {
        let (h, store) = store().await;
        let reader = &h.factory.kiosk;
        let stocked = |id: &str, item_count| {
            let mut k = kiosk(id);
            k.kiosk.item_count = item_count;
            k
        };

        reader.insert(stocked("0x1", 1));
        store.get_single_kiosk(&ObjectId::new("0x1")).await.unwrap();

        // The batch refreshes kiosks it has already seen
        reader.insert(stocked("0x1", 2));
        reader.insert(stocked("0x2", 2));
        reader.push_page(page(&["0x1", "0x2"], false, None));
        assert_eq!(store.get_next_kiosk_batch().await.unwrap(), 1);

        reader.insert(stocked("0x2", 3));
        store.get_single_kiosk(&ObjectId::new("0x2")).await.unwrap();

        let state = store.state();
        assert_eq!(ids(&state), vec!["0x1", "0x2"]);
        assert_eq!(state.kiosks.len(), 2);
        assert_eq!(state.kiosks[&ObjectId::new("0x1")].kiosk.item_count, 2);
        assert_eq!(state.kiosks[&ObjectId::new("0x2")].kiosk.item_count, 3);
        assert!(!state.has_next_page);
    }

    #[tokio::test]
    async fn test_get_all_kiosks_walks_every_page() {
        let (h, store) = store().await;
        let reader = &h.factory.kiosk;
        for id in ["0x1", "0x2", "0x3"] {
            reader.insert(kiosk(id));
        }
        reader.push_page(page(&["0x1", "0x2"], true, Some("c1")));
        reader.push_page(page(&["0x3"], false, None));

        assert_eq!(store.get_all_kiosks().await.unwrap(), 3);
        assert_eq!(ids(&store.state()), vec!["0x1", "0x2", "0x3"]);
        assert_eq!(reader.owned(), 2);
    }

    #[tokio::test]
    async fn test_get_all_kiosks_stops_when_cursor_stalls() {
        let (h, store) = store().await;
        let reader = &h.factory.kiosk;
        reader.insert(kiosk("0x1"));
        reader.push_page(page(&["0x1"], true, None));
        reader.push_page(page(&["0x1"], true, None));
        reader.push_page(page(&["0x1"], true, None));

        assert_eq!(store.get_all_kiosks().await.unwrap(), 1);
        assert_eq!(reader.owned(), 2);
        assert!(store.state().has_next_page);
    }

    #[tokio::test]
    async fn test_single_kiosk_not_found() {
        let (_h, store) = store().await;

        let err = store.get_single_kiosk(&ObjectId::new("0xabc")).await.unwrap_err();
        assert_eq!(err.to_string(), "could not find this kiosk");
        assert_eq!(store.state(), KioskState::default());
    }

    #[tokio::test]
    async fn test_clear_storage_restarts_pagination() {
        let (h, store) = store().await;
        let reader = &h.factory.kiosk;
        reader.insert(kiosk("0x1"));
        reader.push_page(page(&["0x1"], false, Some("c1")));
        store.get_next_kiosk_batch().await.unwrap();

        store.clear_storage();
        assert_eq!(store.state(), KioskState::default());

        store.get_next_kiosk_batch().await.unwrap();
        let requests = reader.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].cursor, None);
    }

    #[tokio::test]
    async fn test_create_kiosk_reports_new_id() {
        let (h, store) = store().await;
        h.adapter("Suiet").creates("0xk105k", "0x0000000000000000000000000000000000000000000000000000000000000002::kiosk::Kiosk");

        let response = store.create_kiosk().await;
        assert!(response.ok);
        assert_eq!(response.kiosk_id, Some(ObjectId::new("0xk105k")));

        let input = h.adapter("Suiet").last_execute.lock().unwrap().clone().unwrap();
        assert_eq!(input.transaction_block.commands().len(), 3);
        assert!(input.options.is_some_and(|o| o.show_effects));
    }

    #[tokio::test]
    async fn test_create_kiosk_without_kiosk_change_fails() {
        let (h, store) = store().await;
        h.adapter("Suiet").creates("0xcap", "0x2::kiosk::KioskOwnerCap");

        let response = store.create_kiosk().await;
        assert_eq!(response, KioskResponse::default());
        assert_eq!(store.state(), KioskState::default());
    }

    #[tokio::test]
    async fn test_create_kiosk_with_item() {
        let (h, store) = store().await;
        h.adapter("Suiet").creates("0xk", KIOSK_TYPE);
        let item = ItemDefinition::from_file("notes", "txt", "text/plain", b"hello");

        let response = store.create_kiosk_with_item(&item).await;
        assert!(response.ok);

        let input = h.adapter("Suiet").last_execute.lock().unwrap().clone().unwrap();
        assert_eq!(input.transaction_block.commands().len(), 4);
    }

    #[tokio::test]
    async fn test_create_kiosk_with_item_needs_module() {
        let config = Harness::config();
        let config = WalletConfig {
            item_module: None,
            ..config
        };
        let h = Harness::connected(vec![MockWalletAdapter::new("Suiet")], config).await;
        h.adapter("Suiet").creates("0xk", KIOSK_TYPE);
        let store = KioskStore::new(h.manager.clone());
        let item = ItemDefinition::from_file("notes", "txt", "text/plain", b"hello");

        assert!(!store.create_kiosk_with_item(&item).await.ok);
        assert!(h.adapter("Suiet").last_execute.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_kiosk_when_disconnected() {
        let h = Harness::new(vec![MockWalletAdapter::new("Suiet")], Harness::config());
        let store = KioskStore::new(h.manager.clone());

        assert!(!store.create_kiosk().await.ok);
    }
}
