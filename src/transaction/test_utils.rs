use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use scraper::ElementRef;
use time::{Date, macros::date};

use crate::{
    Error,
    storage::{KeyValueStore, MemoryStore},
};

use super::{
    Transaction, TransactionId, TransactionInput, TransactionType,
    store::{IdGenerator, TransactionStore},
};

/// IDs 1, 2, 3, ... so tests can predict them.
pub fn sequential_ids() -> IdGenerator {
    let mut next: TransactionId = 0;

    Box::new(move || {
        next += 1;
        next
    })
}

/// An empty store with sequential IDs, and a handle on its storage.
pub fn test_store() -> (TransactionStore, MemoryStore) {
    let storage = MemoryStore::new();
    let store =
        TransactionStore::load(Box::new(storage.clone())).with_id_generator(sequential_ids());

    (store, storage)
}

/// A [KeyValueStore] whose writes fail while `failing` is set.
#[derive(Debug, Clone)]
pub struct FailingStore {
    inner: MemoryStore,
    failing: Arc<AtomicBool>,
}

impl Default for FailingStore {
    fn default() -> Self {
        Self {
            inner: MemoryStore::new(),
            failing: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl FailingStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::StorageError("disk full".to_owned()));
        }

        self.inner.set(key, value)
    }
}

pub fn expense_input(category: &str, amount: f64, date: Date) -> TransactionInput {
    TransactionInput {
        transaction_type: TransactionType::Expense,
        category: category.to_owned(),
        payment_method: "Cash".to_owned(),
        amount: Some(amount),
        date: Some(date),
        description: String::new(),
    }
}

pub fn income_input(category: &str, amount: f64, date: Date) -> TransactionInput {
    TransactionInput {
        transaction_type: TransactionType::Income,
        category: category.to_owned(),
        payment_method: "Bank Transfer".to_owned(),
        amount: Some(amount),
        date: Some(date),
        description: String::new(),
    }
}

/// Add a salary and a food expense in January 2025 to `store`.
pub fn seed_store(store: &mut TransactionStore) -> (Transaction, Transaction) {
    let salary = store
        .create(income_input("salary", 1_000_000.0, date!(2025 - 01 - 10)))
        .unwrap();
    let food = store
        .create(expense_input("food", 25_000.0, date!(2025 - 01 - 12)))
        .unwrap();

    (salary, food)
}

#[track_caller]
pub fn assert_transaction_type_inputs(form: &ElementRef, checked_type: &str) {
    let selector = scraper::Selector::parse("input[type=radio][name=type_]").unwrap();
    let inputs = form.select(&selector).collect::<Vec<_>>();
    assert_eq!(
        inputs.len(),
        2,
        "want 2 transaction type inputs, got {}",
        inputs.len()
    );

    let mut values = inputs
        .iter()
        .filter_map(|input| input.value().attr("value"))
        .collect::<Vec<_>>();
    values.sort_unstable();
    assert_eq!(values, vec!["expense", "income"]);

    let checked = inputs
        .iter()
        .filter(|input| input.value().attr("checked").is_some())
        .filter_map(|input| input.value().attr("value"))
        .collect::<Vec<_>>();
    assert_eq!(
        checked,
        vec![checked_type],
        "want only {checked_type} to be checked, got {checked:?}"
    );
}
