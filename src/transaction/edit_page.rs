//! Defines the page for editing an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    http::Uri,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint, with_query},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base},
};

use super::{
    core::{Transaction, TransactionId},
    form::{TransactionFormDefaults, transaction_form_fields},
    store::TransactionStore,
    transactions_page::lock_store,
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The store holding the transaction to edit.
    pub store: Arc<Mutex<TransactionStore>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// Where to send the user after they finish editing.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

impl RedirectQuery {
    /// The requested redirect URL if it is a path on this site, otherwise the
    /// transactions page.
    pub fn redirect_url(&self) -> String {
        let Some(raw_url) = self.redirect_url.as_deref() else {
            return endpoints::TRANSACTIONS_VIEW.to_owned();
        };

        normalize_redirect_url(raw_url).unwrap_or_else(|| {
            tracing::warn!("Ignoring redirect URL that leaves the site: {raw_url:?}");
            endpoints::TRANSACTIONS_VIEW.to_owned()
        })
    }
}

/// The path and query of `raw_url` if it points at this site.
fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    // Browsers read '\' as '/', so "/\host" would leave the site.
    if raw_url.contains('\\') || raw_url.chars().any(char::is_control) {
        return None;
    }

    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    let path_and_query = uri.path_and_query()?.as_str();
    if !path_and_query.starts_with('/') || path_and_query.starts_with("//") {
        return None;
    }

    Some(path_and_query.to_owned())
}

fn edit_transaction_view(transaction: &Transaction, redirect_url: &str) -> Markup {
    let update_endpoint = format_endpoint(endpoints::TRANSACTION, transaction.id);
    let update_endpoint = match serde_urlencoded::to_string([("redirect_url", redirect_url)]) {
        Ok(query) => with_query(&update_endpoint, &query),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {redirect_url}: {error}");
            update_endpoint
        }
    };
    let form_fields = transaction_form_fields(&TransactionFormDefaults {
        transaction_type: transaction.transaction_type,
        category: Some(&transaction.category),
        payment_method: Some(&transaction.payment_method),
        amount: Some(transaction.amount),
        date: transaction.date,
        description: Some(&transaction.description),
    });

    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-4"
            {
                h1 class="text-xl font-bold" { "Edit transaction" }

                form
                    hx-put=(update_endpoint)
                    hx-target-error="#alert-container"
                    class="space-y-4"
                {
                    (form_fields)

                    button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Save changes"
                    }
                }

                a href=(redirect_url) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base("Edit Transaction", &content)
}

/// Renders the page for editing a transaction, or the 404 page if it does not exist.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<RedirectQuery>,
) -> Response {
    let store = match lock_store(&state.store) {
        Ok(store) => store,
        Err(error) => return error.into_response(),
    };

    match store.find_by_id(transaction_id) {
        Some(transaction) => {
            edit_transaction_view(transaction, &query.redirect_url()).into_response()
        }
        None => {
            tracing::debug!("Transaction {transaction_id} not found for editing");
            Error::NotFound.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
    };
    use scraper::Selector;

    use crate::{
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, must_get_form, parse_html_document,
        },
        transaction::test_utils::{assert_transaction_type_inputs, seed_store, test_store},
    };

    use super::{EditTransactionPageState, RedirectQuery, get_edit_transaction_page};

    #[tokio::test]
    async fn renders_form_with_transaction_values() {
        let (mut store, _) = test_store();
        let (salary, _) = seed_store(&mut store);
        let state = EditTransactionPageState {
            store: Arc::new(Mutex::new(store)),
        };
        let query = RedirectQuery {
            redirect_url: Some("/transactions?type=income&category=all&month=0".to_owned()),
        };

        let response = get_edit_transaction_page(State(state), Path(salary.id), Query(query)).await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            "/api/transactions/1?redirect_url=%2Ftransactions%3Ftype%3Dincome%26category%3Dall%26month%3D0",
            "hx-put",
        );
        assert_transaction_type_inputs(&form, "income");
        assert_form_input_with_value(&form, "amount", "number", "1000000");
        assert_form_input_with_value(&form, "date", "date", "2025-01-10");

        let selected_category = form
            .select(&Selector::parse("#category option[selected]").unwrap())
            .next()
            .and_then(|option| option.value().attr("value"));
        assert_eq!(selected_category, Some("salary"));
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let (store, _) = test_store();
        let state = EditTransactionPageState {
            store: Arc::new(Mutex::new(store)),
        };

        let response =
            get_edit_transaction_page(State(state), Path(404), Query(RedirectQuery::default()))
                .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn redirect_url_must_stay_on_site() {
        let redirect = |url: &str| {
            RedirectQuery {
                redirect_url: Some(url.to_owned()),
            }
            .redirect_url()
        };

        assert_eq!(redirect("/transactions?month=2"), "/transactions?month=2");
        assert_eq!(redirect("https://example.com"), "/transactions");
        assert_eq!(redirect("//example.com"), "/transactions");
        assert_eq!(redirect("/\\evil.com"), "/transactions");
        assert_eq!(redirect("/\t/evil.com"), "/transactions");
        assert_eq!(redirect("/\\/evil.com"), "/transactions");
        assert_eq!(redirect("transactions"), "/transactions");
        assert_eq!(RedirectQuery::default().redirect_url(), "/transactions");
    }
}
