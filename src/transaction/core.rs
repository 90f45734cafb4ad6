//! Defines the core data models for transactions and the rules for validating user input.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::category::is_valid_category;

// ============================================================================
// MODELS
// ============================================================================

/// The identifier of a [Transaction].
///
/// IDs are drawn at random from `0..MAX_TRANSACTION_ID` rather than assigned
/// sequentially.
pub type TransactionId = i64;

/// The exclusive upper bound for randomly generated transaction IDs.
pub const MAX_TRANSACTION_ID: TransactionId = 100_000_000;

/// The description stored when the user leaves the description empty.
pub const EMPTY_DESCRIPTION: &str = "-";

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The value used for this type in forms, query strings and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Parse the value produced by [TransactionType::as_str].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The serialized field names match the persisted JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The catalog value of the category, e.g. "food".
    pub category: String,
    /// How the transaction was paid, e.g. "Cash".
    pub payment_method: String,
    /// The amount of money spent or earned, always positive.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
}

impl Transaction {
    /// Merge the fields set in `patch` over this transaction, keeping the ID.
    pub fn apply(&mut self, patch: TransactionPatch) {
        let TransactionPatch {
            transaction_type,
            category,
            payment_method,
            amount,
            date,
            description,
        } = patch;

        if let Some(transaction_type) = transaction_type {
            self.transaction_type = transaction_type;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(payment_method) = payment_method {
            self.payment_method = payment_method;
        }
        if let Some(amount) = amount {
            self.amount = amount;
        }
        if let Some(date) = date {
            self.date = date;
        }
        if let Some(description) = description {
            self.description = description;
        }
    }
}

/// The fields submitted by the user when creating or editing a transaction.
///
/// Nothing is checked until [TransactionInput::validate] is called, so this
/// type can be deserialized straight from a form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionInput {
    /// Named `type_` in forms since `type` is a keyword.
    #[serde(rename = "type_")]
    pub transaction_type: TransactionType,
    /// The catalog value of the chosen category.
    #[serde(default)]
    pub category: String,
    /// How the transaction was paid.
    #[serde(default)]
    pub payment_method: String,
    /// The amount as entered, `None` when the field was left empty.
    #[serde(default)]
    pub amount: Option<f64>,
    /// The date as entered, `None` when the field was left empty.
    #[serde(default)]
    pub date: Option<Date>,
    /// Optional free text.
    #[serde(default)]
    pub description: String,
}

/// A transaction that passed validation but has not been assigned an ID yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTransaction {
    /// Whether the transaction is income or an expense.
    pub transaction_type: TransactionType,
    /// A category from the catalog for `transaction_type`.
    pub category: String,
    /// How the transaction was paid, never empty.
    pub payment_method: String,
    /// A positive amount of Rupiah.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// The description, or [EMPTY_DESCRIPTION].
    pub description: String,
}

impl ValidTransaction {
    /// Turn this into a stored [Transaction] with `id`.
    pub fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            transaction_type: self.transaction_type,
            category: self.category,
            payment_method: self.payment_method,
            amount: self.amount,
            date: self.date,
            description: self.description,
        }
    }
}

impl TransactionInput {
    /// Check that every required field is filled in, the amount is positive
    /// and the category belongs to the catalog for the chosen type.
    ///
    /// An empty description is replaced with [EMPTY_DESCRIPTION].
    ///
    /// # Errors
    /// Returns the first [ValidationError] found, checking fields in form order.
    pub fn validate(self) -> Result<ValidTransaction, ValidationError> {
        let category = required_text(self.category, "category")?;
        let payment_method = required_text(self.payment_method, "payment method")?;
        let amount = self.amount.ok_or(ValidationError::MissingField("amount"))?;
        check_amount(amount)?;
        let date = self.date.ok_or(ValidationError::MissingField("date"))?;

        if !is_valid_category(self.transaction_type, &category) {
            return Err(ValidationError::UnknownCategory {
                transaction_type: self.transaction_type,
                category,
            });
        }

        Ok(ValidTransaction {
            transaction_type: self.transaction_type,
            category,
            payment_method,
            amount,
            date,
            description: description_or_default(self.description),
        })
    }
}

/// A partial update to a transaction. Fields left as `None` keep their value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    /// The new type.
    pub transaction_type: Option<TransactionType>,
    /// The new category value.
    pub category: Option<String>,
    /// The new payment method.
    pub payment_method: Option<String>,
    /// The new amount, must be positive.
    pub amount: Option<f64>,
    /// The new date.
    pub date: Option<Date>,
    /// The new description, empty becomes [EMPTY_DESCRIPTION].
    pub description: Option<String>,
}

impl TransactionPatch {
    /// Check the values of the fields that are set.
    ///
    /// The category is not checked against the catalog here, that only
    /// happens when the user submits a form.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let category = self
            .category
            .map(|category| required_text(category, "category"))
            .transpose()?;
        let payment_method = self
            .payment_method
            .map(|payment_method| required_text(payment_method, "payment method"))
            .transpose()?;
        if let Some(amount) = self.amount {
            check_amount(amount)?;
        }

        Ok(Self {
            category,
            payment_method,
            description: self.description.map(description_or_default),
            ..self
        })
    }
}

impl From<ValidTransaction> for TransactionPatch {
    fn from(transaction: ValidTransaction) -> Self {
        Self {
            transaction_type: Some(transaction.transaction_type),
            category: Some(transaction.category),
            payment_method: Some(transaction.payment_method),
            amount: Some(transaction.amount),
            date: Some(transaction.date),
            description: Some(transaction.description),
        }
    }
}

/// The reasons a transaction may be rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was left empty.
    #[error("The {0} is required")]
    MissingField(&'static str),

    /// The amount was zero, negative or not a finite number.
    #[error("The amount must be greater than zero, got {0}")]
    NonPositiveAmount(f64),

    /// The category is not in the catalog for the transaction type.
    #[error("\"{category}\" is not an {transaction_type} category")]
    UnknownCategory {
        /// The type the category was checked against.
        transaction_type: TransactionType,
        /// The submitted category value.
        category: String,
    },
}

fn required_text(value: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_owned())
    }
}

fn check_amount(amount: f64) -> Result<(), ValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveAmount(amount))
    }
}

fn description_or_default(description: String) -> String {
    if description.trim().is_empty() {
        EMPTY_DESCRIPTION.to_owned()
    } else {
        description
    }
}

// ============================================================================
// TESTS
// ============================================================================
