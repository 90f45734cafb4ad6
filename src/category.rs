//! The static catalog of categories for each transaction type, and the
//! endpoint that renders the dependent category select in the transaction form.
//!
//! A transaction stores the category `value`; the `label` is only used for
//! display.

use axum::{
    extract::Query,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{filter::TypeFilter, transaction::TransactionType};

/// A category a transaction can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// The value stored on transactions and sent in forms.
    pub value: &'static str,
    /// The text shown to the user.
    pub label: &'static str,
}

const fn category(value: &'static str, label: &'static str) -> Category {
    Category { value, label }
}

/// The categories offered for income, in display order.
pub const INCOME_CATEGORIES: &[Category] = &[
    category("salary", "Gaji"),
    category("bonus", "Bonus"),
    category("investment", "Investasi"),
    category("gift", "Hadiah"),
    category("other", "Lainnya"),
];

/// The categories offered for expenses, in display order.
pub const EXPENSE_CATEGORIES: &[Category] = &[
    category("food", "Makanan"),
    category("transport", "Transportasi"),
    category("shopping", "Belanja"),
    category("bills", "Tagihan"),
    category("entertainment", "Hiburan"),
    category("health", "Kesehatan"),
    category("education", "Pendidikan"),
    category("other", "Lainnya"),
];

/// The payment methods offered in the transaction form.
///
/// Stored payment methods are free-form, this list only drives the select.
pub const PAYMENT_METHODS: &[&str] = &[
    "Cash",
    "Bank Transfer",
    "Debit Card",
    "Credit Card",
    "E-Wallet",
];

/// The categories allowed for `transaction_type`.
pub fn categories_for(transaction_type: TransactionType) -> &'static [Category] {
    match transaction_type {
        TransactionType::Income => INCOME_CATEGORIES,
        TransactionType::Expense => EXPENSE_CATEGORIES,
    }
}

/// Whether `value` is one of the categories allowed for `transaction_type`.
pub fn is_valid_category(transaction_type: TransactionType, value: &str) -> bool {
    categories_for(transaction_type)
        .iter()
        .any(|category| category.value == value)
}

/// The category to select after the form's transaction type changes.
///
/// The previously selected category is kept if it is also in the list for the
/// new type, otherwise nothing is selected.
pub fn select_category(
    transaction_type: TransactionType,
    previous: Option<&str>,
) -> Option<&'static str> {
    let previous = previous?;

    categories_for(transaction_type)
        .iter()
        .find(|category| category.value == previous)
        .map(|category| category.value)
}

/// The categories offered by the filter control for `type_filter`.
///
/// When the filter allows all types, this is the income list followed by the
/// expense list with duplicate values removed.
pub fn filter_categories(type_filter: TypeFilter) -> Vec<Category> {
    match type_filter {
        TypeFilter::Only(transaction_type) => categories_for(transaction_type).to_vec(),
        TypeFilter::All => {
            let mut categories = INCOME_CATEGORIES.to_vec();

            for category in EXPENSE_CATEGORIES {
                if !categories.iter().any(|c| c.value == category.value) {
                    categories.push(*category);
                }
            }

            categories
        }
    }
}

/// The display label for a stored category value.
///
/// Values that are no longer in the catalog are shown as is.
pub fn label_for(value: &str) -> &str {
    INCOME_CATEGORIES
        .iter()
        .chain(EXPENSE_CATEGORIES)
        .find(|category| category.value == value)
        .map_or(value, |category| category.label)
}

/// Render the `<option>` elements for the form's category select.
pub fn category_options(transaction_type: TransactionType, selected: Option<&str>) -> Markup {
    let current = select_category(transaction_type, selected);

    html! {
        option value="" selected[current.is_none()] { "Select a category" }

        @for category in categories_for(transaction_type) {
            option value=(category.value) selected[current == Some(category.value)]
            {
                (category.label)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryOptionsQuery {
    #[serde(rename = "type_")]
    transaction_type: TransactionType,
    #[serde(default)]
    category: Option<String>,
}

/// A route handler that renders the category options for the type chosen in
/// the transaction form, keeping the current selection where possible.
pub async fn get_category_options(Query(query): Query<CategoryOptionsQuery>) -> Response {
    let category = query.category.as_deref().filter(|value| !value.is_empty());

    Html(category_options(query.transaction_type, category).into_string()).into_response()
}
