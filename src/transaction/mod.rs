//! Transactions: the data model, the store that owns them and the pages and
//! endpoints for creating, editing and deleting them.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod store;
mod transactions_page;
mod view;

#[cfg(test)]
pub(crate) mod test_utils;

pub use core::{
    Transaction, TransactionId, TransactionInput, TransactionPatch, TransactionType,
    ValidTransaction, ValidationError,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use store::{Confirmation, IdGenerator, TransactionStore};
pub use transactions_page::get_transactions_page;
