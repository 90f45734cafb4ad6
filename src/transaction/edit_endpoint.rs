//! Defines the endpoint for updating an existing transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{AppState, Error};

use super::{
    core::{TransactionId, TransactionInput, TransactionPatch},
    edit_page::RedirectQuery,
    store::TransactionStore,
    transactions_page::lock_store,
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The store holding the transaction to update.
    pub store: Arc<Mutex<TransactionStore>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// A route handler for updating a transaction from the edit form.
///
/// The submitted fields are validated like a new transaction and then merged
/// over the stored one, keeping its ID. Redirects to `redirect_url` on success.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<RedirectQuery>,
    Form(input): Form<TransactionInput>,
) -> Response {
    let patch = match input.validate() {
        Ok(transaction) => TransactionPatch::from(transaction),
        Err(error) => {
            tracing::warn!("Rejected update to transaction {transaction_id}: {error}");
            return Error::from(error).into_alert_response();
        }
    };

    let mut store = match lock_store(&state.store) {
        Ok(store) => store,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = store.update(transaction_id, patch) {
        tracing::error!("Could not update transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    tracing::info!("Updated transaction {transaction_id}");

    (HxRedirect(query.redirect_url()), StatusCode::SEE_OTHER).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use time::macros::date;

    use crate::{
        test_utils::assert_hx_redirect,
        transaction::{
            TransactionInput, TransactionType,
            edit_page::RedirectQuery,
            test_utils::{income_input, seed_store, test_store},
        },
    };

    use super::{EditTransactionState, edit_transaction_endpoint};

    #[tokio::test]
    async fn updates_transaction_and_redirects() {
        let (mut store, storage) = test_store();
        let (salary, _) = seed_store(&mut store);
        let state = EditTransactionState {
            store: Arc::new(Mutex::new(store)),
        };
        let query = RedirectQuery {
            redirect_url: Some("/transactions?type=income&category=all&month=0".to_owned()),
        };

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(salary.id),
            Query(query),
            Form(TransactionInput {
                description: "Gaji Januari".to_owned(),
                ..income_input("salary", 1_100_000.0, date!(2025 - 01 - 31))
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/transactions?type=income&category=all&month=0");

        let store = state.store.lock().unwrap();
        let updated = store.find_by_id(salary.id).unwrap();
        assert_eq!(updated.id, salary.id);
        assert_eq!(updated.amount, 1_100_000.0);
        assert_eq!(updated.date, date!(2025 - 01 - 31));
        assert_eq!(updated.description, "Gaji Januari");
        assert_eq!(updated.transaction_type, TransactionType::Income);
        assert_eq!(store.transactions()[1], *updated, "position in the list is kept");
        assert_eq!(storage.write_count(), 3);
    }

    #[tokio::test]
    async fn off_site_redirect_falls_back_to_transactions() {
        let (mut store, _) = test_store();
        let (salary, _) = seed_store(&mut store);
        let state = EditTransactionState {
            store: Arc::new(Mutex::new(store)),
        };

        let response = edit_transaction_endpoint(
            State(state),
            Path(salary.id),
            Query(RedirectQuery {
                redirect_url: Some("/\\evil.com".to_owned()),
            }),
            Form(income_input("salary", 1.0, date!(2025 - 01 - 31))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/transactions");
    }

    #[tokio::test]
    async fn invalid_input_leaves_transaction_unchanged() {
        let (mut store, storage) = test_store();
        let (salary, _) = seed_store(&mut store);
        let state = EditTransactionState {
            store: Arc::new(Mutex::new(store)),
        };

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(salary.id),
            Query(RedirectQuery::default()),
            Form(TransactionInput {
                category: "food".to_owned(),
                ..income_input("salary", 1.0, date!(2025 - 01 - 31))
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(state.store.lock().unwrap().find_by_id(salary.id), Some(&salary));
        assert_eq!(storage.write_count(), 2);
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let (store, storage) = test_store();
        let state = EditTransactionState {
            store: Arc::new(Mutex::new(store)),
        };

        let response = edit_transaction_endpoint(
            State(state),
            Path(99),
            Query(RedirectQuery::default()),
            Form(income_input("salary", 1.0, date!(2025 - 01 - 31))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(storage.write_count(), 0);
    }
}
