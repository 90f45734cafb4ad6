//! Implements a struct that holds the state of the server.

use std::sync::{Arc, Mutex};

use crate::{storage::KeyValueStore, transaction::TransactionStore};

/// The state of the server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,

    /// The transactions, shared between request handlers.
    pub store: Arc<Mutex<TransactionStore>>,
}

impl AppState {
    /// Create a new [AppState] with the transactions saved in `storage`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Asia/Jakarta".
    pub fn new(storage: Box<dyn KeyValueStore>, local_timezone: &str) -> Self {
        Self::with_store(TransactionStore::load(storage), local_timezone)
    }

    /// Create a new [AppState] around an existing store.
    pub fn with_store(store: TransactionStore, local_timezone: &str) -> Self {
        Self {
            local_timezone: local_timezone.to_owned(),
            store: Arc::new(Mutex::new(store)),
        }
    }
}
