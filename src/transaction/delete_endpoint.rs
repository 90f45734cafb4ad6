use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::html;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    filter::{FilterQuery, FilterState},
    timezone::local_today,
};

use super::{
    core::TransactionId,
    store::{Confirmation, TransactionStore},
    transactions_page::{lock_store, render_history},
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The store holding the transaction to delete.
    pub store: Arc<Mutex<TransactionStore>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Whether the user confirmed the deletion in the browser.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// A route handler for deleting a transaction.
///
/// Responds with the history section re-rendered for the filter in the query.
/// Without `confirm=true` nothing is deleted and an error alert is returned.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Query(delete_query): Query<DeleteQuery>,
    Query(filter_query): Query<FilterQuery>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };
    let filter = FilterState::from_query(&filter_query, today.month());

    let mut store = match lock_store(&state.store) {
        Ok(store) => store,
        Err(error) => return error.into_alert_response(),
    };

    match store.delete(transaction_id, Confirmation::from(delete_query.confirm)) {
        Ok(true) => {}
        Ok(false) => return Error::DeleteNotConfirmed.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    }

    tracing::info!("Deleted transaction {transaction_id}");

    html! {
        (render_history(&store, &filter, today))
        (Alert::success("Transaction deleted").into_oob_html())
    }
    .into_response()
}
