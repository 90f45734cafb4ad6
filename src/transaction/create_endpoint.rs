//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use maud::html;

use crate::{AppState, Error, alert::Alert, filter::FilterState, timezone::local_today};

use super::{
    core::TransactionInput,
    store::TransactionStore,
    transactions_page::{filter_query_from_current_url, lock_store, render_history},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The store the new transaction is added to.
    pub store: Arc<Mutex<TransactionStore>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// Responds with the history section re-rendered for the filter on the
/// current page and an out-of-band success alert. Invalid input responds with
/// an error alert and leaves the store unchanged.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    headers: HeaderMap,
    Form(input): Form<TransactionInput>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };
    let filter = FilterState::from_query(&filter_query_from_current_url(&headers), today.month());

    let mut store = match lock_store(&state.store) {
        Ok(store) => store,
        Err(error) => return error.into_alert_response(),
    };

    let transaction = match store.create(input) {
        Ok(transaction) => transaction,
        Err(error @ Error::Validation(_)) => {
            tracing::warn!("Rejected new transaction: {error}");
            return error.into_alert_response();
        }
        Err(error) => {
            tracing::error!("Could not create transaction: {error}");
            return error.into_alert_response();
        }
    };

    tracing::info!(
        "Created {} transaction {}",
        transaction.transaction_type,
        transaction.id
    );

    html! {
        (render_history(&store, &filter, today))
        (Alert::success("Transaction added").into_oob_html())
    }
    .into_response()
}
