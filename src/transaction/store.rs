//! The in-memory transaction list and the operations that change it.
//!
//! Every change is written to the [KeyValueStore] before the operation
//! returns. If the write fails the change is undone, so the list in memory
//! always matches what is stored.

use std::fmt::Debug;

use crate::{
    Error,
    storage::{KeyValueStore, load_transactions, save_transactions},
};

use super::core::{
    MAX_TRANSACTION_ID, Transaction, TransactionId, TransactionInput, TransactionPatch,
};

/// Produces candidate transaction IDs.
pub type IdGenerator = Box<dyn FnMut() -> TransactionId + Send>;

/// Whether the user agreed to delete a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The user agreed, the transaction is deleted.
    Confirmed,
    /// The user cancelled, nothing changes.
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

/// Owns the transaction list, most recent first.
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    storage: Box<dyn KeyValueStore>,
    generate_id: IdGenerator,
}

impl Debug for TransactionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionStore")
            .field("transactions", &self.transactions)
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl TransactionStore {
    /// Create a store with the transactions saved in `storage`.
    ///
    /// Missing or malformed saved data gives an empty store.
    pub fn load(storage: Box<dyn KeyValueStore>) -> Self {
        let transactions = load_transactions(storage.as_ref());
        tracing::info!("Loaded {} transactions", transactions.len());

        Self {
            transactions,
            storage,
            generate_id: Box::new(|| rand::random_range(0..MAX_TRANSACTION_ID)),
        }
    }

    /// Replace the random ID generator, e.g. with a predictable sequence for tests.
    pub fn with_id_generator(mut self, generate_id: IdGenerator) -> Self {
        self.generate_id = generate_id;
        self
    }

    /// All transactions, most recent first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The number of transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether there are no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// The transaction with `id`, if it exists.
    pub fn find_by_id(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| transaction.id == id)
    }

    /// Validate `input` and add it to the front of the list with a new random ID.
    ///
    /// # Errors
    /// Returns [Error::Validation] if `input` is invalid, in which case the
    /// store is unchanged and nothing is written, or a storage error if the
    /// list could not be saved.
    pub fn create(&mut self, input: TransactionInput) -> Result<Transaction, Error> {
        let transaction = input.validate()?.with_id(self.next_id());

        self.transactions.insert(0, transaction.clone());

        if let Err(error) = self.save() {
            self.transactions.remove(0);
            return Err(error);
        }

        tracing::debug!("Created transaction {}", transaction.id);
        Ok(transaction)
    }

    /// Merge `patch` over the transaction with `id`, keeping its ID.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::Validation] if a patched field has an invalid value,
    /// - [Error::UpdateMissingTransaction] if no transaction has `id`,
    /// - or a storage error if the list could not be saved.
    ///
    /// The store is unchanged when an error is returned.
    pub fn update(&mut self, id: TransactionId, patch: TransactionPatch) -> Result<(), Error> {
        let patch = patch.validate()?;
        let index = self
            .position(id)
            .ok_or(Error::UpdateMissingTransaction)?;

        let previous = self.transactions[index].clone();
        self.transactions[index].apply(patch);

        if let Err(error) = self.save() {
            self.transactions[index] = previous;
            return Err(error);
        }

        tracing::debug!("Updated transaction {id}");
        Ok(())
    }

    /// Remove the transaction with `id` if the user confirmed the deletion.
    ///
    /// Returns `false` without changing or writing anything when the deletion
    /// was declined.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if no transaction has `id`,
    /// or a storage error if the list could not be saved.
    pub fn delete(
        &mut self,
        id: TransactionId,
        confirmation: Confirmation,
    ) -> Result<bool, Error> {
        let index = self
            .position(id)
            .ok_or(Error::DeleteMissingTransaction)?;

        if confirmation == Confirmation::Declined {
            tracing::debug!("Deletion of transaction {id} was not confirmed");
            return Ok(false);
        }

        let removed = self.transactions.remove(index);

        if let Err(error) = self.save() {
            self.transactions.insert(index, removed);
            return Err(error);
        }

        tracing::debug!("Deleted transaction {id}");
        Ok(true)
    }

    fn position(&self, id: TransactionId) -> Option<usize> {
        self.transactions
            .iter()
            .position(|transaction| transaction.id == id)
    }

    /// Draw IDs until one is not already in use.
    fn next_id(&mut self) -> TransactionId {
        loop {
            let id = (self.generate_id)();

            if self.find_by_id(id).is_none() {
                return id;
            }

            tracing::debug!("Generated transaction ID {id} is taken, drawing another");
        }
    }

    fn save(&mut self) -> Result<(), Error> {
        save_transactions(self.storage.as_mut(), &self.transactions).inspect_err(|error| {
            tracing::error!("Could not save transactions: {error}");
        })
    }
}
