//! Durable string-keyed storage and loading/saving the transaction list.
//!
//! The whole transaction list is serialized as one JSON array under
//! [TRANSACTIONS_KEY] after every change.

use std::{
    collections::HashMap,
    fmt::Debug,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::{Error, transaction::Transaction};

/// The key the transaction list is stored under.
pub const TRANSACTIONS_KEY: &str = "transactions";

/// A store that maps string keys to string values and keeps them across restarts.
pub trait KeyValueStore: Debug + Send {
    /// Get the value stored under `key`, or `None` if nothing has been stored.
    ///
    /// # Errors
    /// Returns [Error::StorageError] if the value exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns [Error::StorageError] if the value could not be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error>;
}

/// A [KeyValueStore] that keeps one file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Open the store in `directory`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns [Error::StorageError] if the directory cannot be created.
    pub fn open(directory: impl AsRef<Path>) -> Result<Self, Error> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;

        Ok(Self { directory })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, Error> {
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        if !is_valid_key {
            return Err(Error::StorageError(format!("invalid key {key:?}")));
        }

        Ok(self.directory.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        let path = self.path_for(key)?;
        // Write then rename so readers never see a half written file.
        let temp_path = self.directory.join(format!(".{key}.json.tmp"));
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }
}

/// A [KeyValueStore] held in memory.
///
/// Clones share the same entries, so a test can keep a handle on the store
/// after giving a clone to the transaction store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    write_count: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of successful calls to [KeyValueStore::set].
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let entries = self
            .entries
            .lock()
            .map_err(|error| Error::StorageError(error.to_string()))?;

        Ok(entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|error| Error::StorageError(error.to_string()))?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_count.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }
}

/// Load the transaction list from `storage`.
///
/// Missing or unreadable data is treated as an empty list so the app can
/// always start. Problems are logged.
pub fn load_transactions(storage: &dyn KeyValueStore) -> Vec<Transaction> {
    let text = match storage.get(TRANSACTIONS_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => {
            tracing::info!("No saved transactions found, starting with an empty list");
            return Vec::new();
        }
        Err(error) => {
            tracing::warn!("Could not read saved transactions, starting with an empty list: {error}");
            return Vec::new();
        }
    };

    match serde_json::from_str(&text) {
        Ok(transactions) => transactions,
        Err(error) => {
            tracing::warn!(
                "Saved transactions are not valid JSON, starting with an empty list: {error}"
            );
            Vec::new()
        }
    }
}

/// Serialize the full transaction list and write it to `storage`.
///
/// # Errors
/// Returns [Error::JSONSerializationError] if the list cannot be serialized,
/// or [Error::StorageError] if it cannot be written.
pub fn save_transactions(
    storage: &mut dyn KeyValueStore,
    transactions: &[Transaction],
) -> Result<(), Error> {
    let text = serde_json::to_string(transactions)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    storage.set(TRANSACTIONS_KEY, &text)
}
