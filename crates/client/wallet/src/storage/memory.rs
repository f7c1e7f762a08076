//! In-memory storage for tests and embedders without a filesystem.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{KeyValueStorage, Result, StorageError, StorageKey};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<StorageKey, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: StorageKey) -> Result<Option<String>> {
        let items = self.items.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(items.get(&key).cloned())
    }

    fn set_item(&self, key: StorageKey, value: &str) -> Result<()> {
        let mut items = self.items.write().map_err(|_| StorageError::LockPoisoned)?;
        items.insert(key, value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: StorageKey) -> Result<()> {
        let mut items = self.items.write().map_err(|_| StorageError::LockPoisoned)?;
        items.remove(&key);
        Ok(())
    }
}
