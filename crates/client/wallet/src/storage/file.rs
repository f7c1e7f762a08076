//! File-backed storage.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{KeyValueStorage, Result, StorageError, StorageKey};

const STORAGE_FILE: &str = "storage.json";

/// Stores every item in one JSON object file.
///
/// The whole file is rewritten on each mutation (temp file + rename); a
/// missing file reads as empty.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Storage file inside `dir`, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        Ok(Self {
            path: dir.join(STORAGE_FILE),
            lock: Mutex::new(()),
        })
    }

    /// Storage file under the platform data directory.
    ///
    /// - macOS: `~/Library/Application Support/kiosk-client`
    /// - Linux: `~/.local/share/kiosk-client` (or `$XDG_DATA_HOME/kiosk-client`)
    /// - Windows: `%APPDATA%\kiosk-client`
    pub fn in_data_dir() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "kiosk-client")
            .ok_or(StorageError::NoDataDir)?;
        Self::new(dirs.data_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<()> {
        let temp_path = self.path.with_extension("json.tmp");

        fs::write(&temp_path, serde_json::to_vec_pretty(items)?)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;

        let mut items = self.read_all()?;
        f(&mut items);
        self.write_all(&items)?;

        tracing::debug!("Wrote storage file {}", self.path.display());
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: StorageKey) -> Result<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(self.read_all()?.remove(key.as_ref()))
    }

    fn set_item(&self, key: StorageKey, value: &str) -> Result<()> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: StorageKey) -> Result<()> {
        self.update(|items| {
            items.remove(key.as_ref());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let storage = FileStorage::new(dir.path()).unwrap();
        assert_eq!(storage.get_item(StorageKey::LastConnectWalletName).unwrap(), None);

        storage
            .set_item(StorageKey::LastConnectWalletName, "Sui Wallet")
            .unwrap();

        let reopened = FileStorage::new(dir.path()).unwrap();
        assert_eq!(
            reopened.get_item(StorageKey::LastConnectWalletName).unwrap(),
            Some("Sui Wallet".to_string())
        );

        reopened.remove_item(StorageKey::LastConnectWalletName).unwrap();
        assert_eq!(storage.get_item(StorageKey::LastConnectWalletName).unwrap(), None);
    }

    #[test]
    fn test_file_uses_storage_key_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        storage.set_item(StorageKey::LastConnectWalletName, "Suiet").unwrap();

        let raw = fs::read_to_string(storage.path()).unwrap();
        assert!(raw.contains("WK__LAST_CONNECT_WALLET_NAME"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        fs::write(storage.path(), b"not json").unwrap();

        assert!(matches!(
            storage.get_item(StorageKey::LastConnectWalletName),
            Err(StorageError::Json(_))
        ));
    }
}
