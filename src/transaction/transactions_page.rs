//! Defines the route handler for the page with the transaction form, the
//! filters and the filtered history.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{FromRef, Query, State},
    http::{HeaderMap, Uri},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error, endpoints,
    filter::{FilterQuery, FilterState, derive_view},
    html::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, base},
    timezone::local_today,
};

use super::{
    form::{TransactionFormDefaults, transaction_form_fields},
    store::TransactionStore,
    view::{HISTORY_ID, filtered_view, history_section},
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
    /// The transactions to display.
    pub store: Arc<Mutex<TransactionStore>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            store: state.store.clone(),
        }
    }
}

/// Lock the store, logging a poisoned lock.
pub(super) fn lock_store(
    store: &Mutex<TransactionStore>,
) -> Result<MutexGuard<'_, TransactionStore>, Error> {
    store.lock().map_err(|error| {
        tracing::error!("Could not acquire the transaction store lock: {error}");
        Error::StoreLockError
    })
}

/// Read the filter from the page the HTMX request was sent from.
///
/// Falls back to the default filter when the header is missing or invalid.
pub(super) fn filter_query_from_current_url(headers: &HeaderMap) -> FilterQuery {
    let Some(current_url) = headers
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())
    else {
        tracing::warn!("Missing HX-Current-URL header, using the default filter");
        return FilterQuery::default();
    };

    let query = current_url
        .parse::<Uri>()
        .ok()
        .and_then(|uri| uri.query().map(str::to_owned))
        .unwrap_or_default();

    serde_urlencoded::from_str(&query).unwrap_or_else(|error| {
        tracing::warn!("Invalid filter in HX-Current-URL {current_url}: {error}");
        FilterQuery::default()
    })
}

/// Render the history section for `filter`, as seen on `today`.
pub(super) fn render_history(
    store: &TransactionStore,
    filter: &FilterState,
    today: Date,
) -> Markup {
    let view = derive_view(store.transactions(), filter, today.year());
    history_section(&view, filter)
}

fn transactions_page_view(store: &TransactionStore, filter: &FilterState, today: Date) -> Markup {
    let view = derive_view(store.transactions(), filter, today.year());
    let form_fields = transaction_form_fields(&TransactionFormDefaults::new(today));

    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-3xl space-y-8"
            {
                header
                {
                    h1 class="text-2xl font-bold" { "Dompet" }
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    { "Track your income and expenses." }
                }

                section class="rounded bg-white p-6 shadow-sm dark:bg-gray-800"
                {
                    h2 class="mb-4 text-lg font-semibold" { "Add transaction" }

                    form
                        id="transaction-form"
                        hx-post=(endpoints::TRANSACTIONS_API)
                        hx-target={ "#" (HISTORY_ID) }
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                        data-reset-on-success="true"
                        class="space-y-4"
                    {
                        (form_fields)

                        button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
                        {
                            "Add transaction"
                        }
                    }
                }

                (filtered_view(&view, filter))
            }
        }
    };

    base("Transactions", &content)
}

/// Render the transactions page filtered by the query string.
///
/// Without a month in the query, the history shows the current month.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_response(),
    };
    let filter = FilterState::from_query(&query, today.month());

    let store = match lock_store(&state.store) {
        Ok(store) => store,
        Err(error) => return error.into_response(),
    };

    transactions_page_view(&store, &filter, today).into_response()
}
