//! Filtering the transaction history and summarising the filtered transactions.
//!
//! The filter state lives in the page's query string, e.g.
//! `/transactions?type=expense&category=all&month=0`, so it is never stored.

use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    category::filter_categories,
    transaction::{Transaction, TransactionType},
};

/// The query string value that disables a filter.
pub const ALL: &str = "all";

/// Restricts transactions to a single type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TransactionType),
}

impl TypeFilter {
    fn matches(&self, transaction_type: TransactionType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(only) => *only == transaction_type,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        if value == ALL {
            Some(TypeFilter::All)
        } else {
            TransactionType::parse(value).map(TypeFilter::Only)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::All => ALL,
            TypeFilter::Only(transaction_type) => transaction_type.as_str(),
        }
    }
}

/// Restricts transactions to a single category value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(only) => only == category,
        }
    }

    fn parse(value: &str) -> Self {
        if value == ALL || value.is_empty() {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_owned())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL,
            CategoryFilter::Only(category) => category,
        }
    }
}

/// Restricts transactions to a single month of the reference year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonthFilter {
    #[default]
    All,
    Only(Month),
}

impl MonthFilter {
    /// Parse a zero-based month index ("0" is January) or "all".
    fn parse(value: &str) -> Option<Self> {
        if value == ALL {
            return Some(MonthFilter::All);
        }

        let index: u8 = value.parse().ok()?;
        let month = Month::try_from(index.checked_add(1)?).ok()?;

        Some(MonthFilter::Only(month))
    }

    /// The zero-based month index, or "all".
    pub fn to_query_value(&self) -> String {
        match self {
            MonthFilter::All => ALL.to_owned(),
            MonthFilter::Only(month) => (u8::from(*month) - 1).to_string(),
        }
    }
}

/// The filter query parameters as they appear in the URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

/// The active filters for the transaction history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub transaction_type: TypeFilter,
    pub category: CategoryFilter,
    pub month: MonthFilter,
}

impl FilterState {
    /// Build the filter state from the page query.
    ///
    /// A missing month parameter selects `current_month`, so the history
    /// opens on this month. Values that cannot be parsed disable that filter,
    /// as does a category that is not offered for the selected type.
    pub fn from_query(query: &FilterQuery, current_month: Month) -> Self {
        let transaction_type = match query.transaction_type.as_deref() {
            None => TypeFilter::All,
            Some(value) => TypeFilter::parse(value).unwrap_or_else(|| {
                tracing::warn!("Ignoring invalid transaction type filter {value:?}");
                TypeFilter::All
            }),
        };

        let category = match query.category.as_deref().map(CategoryFilter::parse) {
            Some(CategoryFilter::Only(category))
                if filter_categories(transaction_type)
                    .iter()
                    .any(|option| option.value == category) =>
            {
                CategoryFilter::Only(category)
            }
            Some(CategoryFilter::Only(category)) => {
                tracing::debug!(
                    "Category {category:?} is not offered for type {}, showing all categories",
                    transaction_type.as_str()
                );
                CategoryFilter::All
            }
            _ => CategoryFilter::All,
        };

        let month = match query.month.as_deref() {
            None => MonthFilter::Only(current_month),
            Some(value) => MonthFilter::parse(value).unwrap_or_else(|| {
                tracing::warn!("Ignoring invalid month filter {value:?}");
                MonthFilter::All
            }),
        };

        Self {
            transaction_type,
            category,
            month,
        }
    }

    /// The query for this filter state, with every parameter set explicitly.
    pub fn to_query(&self) -> FilterQuery {
        FilterQuery {
            transaction_type: Some(self.transaction_type.as_str().to_owned()),
            category: Some(self.category.as_str().to_owned()),
            month: Some(self.month.to_query_value()),
        }
    }

    /// The URL-encoded query string for this filter state, e.g. "type=all&category=all&month=3".
    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(self.to_query()).unwrap_or_else(|error| {
            tracing::error!("Could not encode filter query: {error}");
            String::new()
        })
    }

    /// Whether `transaction` passes every active filter.
    ///
    /// When the month filter is active, only transactions from
    /// `reference_year` match, so the same month of other years is excluded.
    pub fn matches(&self, transaction: &Transaction, reference_year: i32) -> bool {
        let type_match = self.transaction_type.matches(transaction.transaction_type);
        let category_match = self.category.matches(&transaction.category);
        let month_match = match self.month {
            MonthFilter::All => true,
            MonthFilter::Only(month) => {
                transaction.date.month() == month && transaction.date.year() == reference_year
            }
        };

        type_match && category_match && month_match
    }
}

/// The totals of a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    /// The sum of income amounts.
    pub income: f64,
    /// The sum of expense amounts, as a positive number.
    pub expense: f64,
    /// Income minus expenses.
    pub balance: f64,
}

impl Summary {
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let (income, expense) =
            transactions
                .into_iter()
                .fold((0.0, 0.0), |(income, expense), transaction| {
                    match transaction.transaction_type {
                        TransactionType::Income => (income + transaction.amount, expense),
                        TransactionType::Expense => (income, expense + transaction.amount),
                    }
                });

        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

/// The transactions that pass the filter, in store order, and their totals.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionsView<'a> {
    pub transactions: Vec<&'a Transaction>,
    pub summary: Summary,
}

/// Apply `filter` to `transactions` and summarise the result.
///
/// The summary only covers the filtered transactions, not the whole store.
pub fn derive_view<'a>(
    transactions: &'a [Transaction],
    filter: &FilterState,
    reference_year: i32,
) -> TransactionsView<'a> {
    let transactions: Vec<&Transaction> = transactions
        .iter()
        .filter(|transaction| filter.matches(transaction, reference_year))
        .collect();
    let summary = Summary::from_transactions(transactions.iter().copied());

    TransactionsView {
        transactions,
        summary,
    }
}
