//! The URIs of the pages and API endpoints.
//!
//! For endpoints that take a parameter, e.g. '/api/transactions/{transaction_id}',
//! use [format_endpoint].

use crate::transaction::TransactionId;

/// The root route, which redirects to the transactions page.
pub const ROOT: &str = "/";
/// The page with the transaction form, summary, filters and history.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for creating transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route for updating or deleting a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route that renders the category options for a transaction type.
pub const CATEGORY_OPTIONS: &str = "/api/categories";

/// Replace the `{...}` parameter in `endpoint_path` with `id`.
///
/// Returns `endpoint_path` unchanged if it has no parameter.
pub fn format_endpoint(endpoint_path: &str, id: TransactionId) -> String {
    let Some(start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let end = endpoint_path[start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| start + offset + 1);

    format!("{}{id}{}", &endpoint_path[..start], &endpoint_path[end..])
}

/// Append `query` to `path`, leaving `path` as is when `query` is empty.
pub fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{query}")
    }
}
