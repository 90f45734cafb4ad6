use maud::{Markup, html};
use time::Date;

use crate::{
    category::{PAYMENT_METHODS, category_options},
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::core::TransactionType,
};

/// The values the transaction form starts with.
pub struct TransactionFormDefaults<'a> {
    pub transaction_type: TransactionType,
    pub category: Option<&'a str>,
    pub payment_method: Option<&'a str>,
    pub amount: Option<f64>,
    pub date: Date,
    pub description: Option<&'a str>,
}

impl TransactionFormDefaults<'_> {
    /// An empty expense form dated `today`.
    pub fn new(today: Date) -> Self {
        Self {
            transaction_type: TransactionType::Expense,
            category: None,
            payment_method: None,
            amount: None,
            date: today,
            description: None,
        }
    }
}

fn transaction_type_radio(
    transaction_type: TransactionType,
    label: &str,
    checked: bool,
) -> Markup {
    let id = format!("transaction-type-{}", transaction_type.as_str());

    html! {
        div class="flex items-center gap-3"
        {
            input
                name="type_"
                id=(id)
                type="radio"
                value=(transaction_type.as_str())
                checked[checked]
                required
                hx-get=(endpoints::CATEGORY_OPTIONS)
                hx-trigger="change"
                hx-include="#category"
                hx-target="#category"
                hx-swap="innerHTML"
                class=(FORM_RADIO_INPUT_STYLE);

            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (label) }
        }
    }
}

/// Render the inputs shared by the create and edit transaction forms.
///
/// Changing the transaction type reloads the category options for that type
/// from the server, keeping the selected category if the new type has it.
pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let is_expense = defaults.transaction_type == TransactionType::Expense;
    let amount = defaults.amount.map(|amount| amount.to_string());
    // Stored payment methods are free-form, so keep one that is not in the list.
    let custom_payment_method = defaults
        .payment_method
        .filter(|method| !PAYMENT_METHODS.iter().any(|listed| listed == method));

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                (transaction_type_radio(TransactionType::Expense, "Expense", is_expense))
                (transaction_type_radio(TransactionType::Income, "Income", !is_expense))
            }
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            select name="category" id="category" required class=(FORM_TEXT_INPUT_STYLE)
            {
                (category_options(defaults.transaction_type, defaults.category))
            }
        }

        div
        {
            label for="payment-method" class=(FORM_LABEL_STYLE) { "Payment method" }

            select
                name="payment_method"
                id="payment-method"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" selected[defaults.payment_method.is_none()]
                { "Select a payment method" }

                @for method in PAYMENT_METHODS {
                    option value=(method) selected[defaults.payment_method == Some(*method)]
                    { (method) }
                }

                @if let Some(method) = custom_payment_method {
                    option value=(method) selected { (method) }
                }
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount (Rp)" }

            input
                name="amount"
                id="amount"
                type="number"
                step="any"
                min="0.01"
                placeholder="0"
                required
                value=[amount]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Optional"
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
