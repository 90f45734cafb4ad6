//! HTML rendering for the transaction history, the summary and the filter controls.

use maud::{Markup, html};
use time::Month;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    category::{filter_categories, label_for},
    endpoints::{self, format_endpoint, with_query},
    filter::{
        ALL, CategoryFilter, FilterState, MonthFilter, Summary, TransactionsView, TypeFilter,
    },
    html::{
        BUTTON_DELETE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        format_long_date, format_rupiah, month_name,
    },
};

use super::core::{Transaction, TransactionId, TransactionType};

/// The max number of graphemes to display on a card before truncating and
/// displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// The id of the section that holds the summary and the history list.
pub const HISTORY_ID: &str = "history";

/// The id of the section that filter changes replace.
pub const FILTERED_VIEW_ID: &str = "filtered-view";

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// The display data for one transaction in the history.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionCard {
    pub id: TransactionId,
    pub transaction_type: TransactionType,
    /// The category label, e.g. "Makanan".
    pub category: String,
    pub payment_method: String,
    /// The description, truncated to fit on the card.
    pub description: String,
    /// The full description when `description` was truncated.
    pub full_description: Option<String>,
    /// The date in long form, e.g. "5 Januari 2025".
    pub date: String,
    /// The amount with its sign, e.g. "- Rp300.000".
    pub amount: String,
    pub edit_url: String,
    pub delete_url: String,
}

impl TransactionCard {
    /// Project `transaction` into a card whose actions return to the page
    /// filtered by `filter`.
    pub fn new(transaction: &Transaction, filter: &FilterState) -> Self {
        let (description, full_description) = truncate_description(&transaction.description);
        let filter_query = filter.to_query_string();
        let sign = match transaction.transaction_type {
            TransactionType::Income => '+',
            TransactionType::Expense => '-',
        };

        Self {
            id: transaction.id,
            transaction_type: transaction.transaction_type,
            category: label_for(&transaction.category).to_owned(),
            payment_method: transaction.payment_method.clone(),
            description,
            full_description,
            date: format_long_date(transaction.date),
            amount: format!("{sign} {}", format_rupiah(transaction.amount)),
            edit_url: edit_url(transaction.id, &filter_query),
            delete_url: delete_url(transaction.id, &filter_query),
        }
    }
}

fn edit_url(id: TransactionId, filter_query: &str) -> String {
    let edit_page = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, id);
    let redirect_url = with_query(endpoints::TRANSACTIONS_VIEW, filter_query);

    match serde_urlencoded::to_string([("redirect_url", redirect_url.as_str())]) {
        Ok(query) => with_query(&edit_page, &query),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {redirect_url}: {error}");
            edit_page
        }
    }
}

fn delete_url(id: TransactionId, filter_query: &str) -> String {
    let endpoint = format_endpoint(endpoints::TRANSACTION, id);

    if filter_query.is_empty() {
        format!("{endpoint}?confirm=true")
    } else {
        format!("{endpoint}?confirm=true&{filter_query}")
    }
}

fn truncate_description(description: &str) -> (String, Option<String>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        (truncated + "...", Some(description.to_owned()))
    }
}

fn amount_class(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "text-green-700 dark:text-green-300",
        TransactionType::Expense => "text-red-700 dark:text-red-300",
    }
}

fn border_class(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "border-l-green-500",
        TransactionType::Expense => "border-l-red-500",
    }
}

fn transaction_card_view(card: &TransactionCard) -> Markup {
    let confirm_message = format!(
        "Are you sure you want to delete the transaction '{}'? This cannot be undone.",
        card.description
    );

    html! {
        article
            class={ "rounded border border-gray-200 border-l-4 bg-white px-4 py-3 shadow-sm \
                dark:border-gray-700 dark:bg-gray-800 " (border_class(card.transaction_type)) }
            data-transaction-card="true"
            data-transaction-id=(card.id)
        {
            div class="flex items-start justify-between gap-3"
            {
                div class="min-w-0 flex-1"
                {
                    h3 class="text-sm font-semibold text-gray-900 dark:text-white"
                    { (card.category) }

                    p
                        class="truncate text-sm text-gray-700 dark:text-gray-300"
                        title=[card.full_description.as_deref()]
                    { (card.description) }
                }

                span
                    class={ "shrink-0 text-sm font-medium tabular-nums whitespace-nowrap " (amount_class(card.transaction_type)) }
                    data-amount="true"
                { (card.amount) }
            }

            div class="mt-3 flex items-center justify-between gap-3 border-t border-gray-200 pt-2 text-xs text-gray-500 dark:border-gray-700 dark:text-gray-400"
            {
                div class="flex items-center gap-2"
                {
                    time { (card.date) }
                    span { "·" }
                    span { (card.payment_method) }
                }

                div class="flex items-center gap-4 text-sm"
                {
                    a href=(card.edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        type="button"
                        hx-delete=(card.delete_url)
                        hx-confirm=(confirm_message)
                        hx-target={ "#" (HISTORY_ID) }
                        hx-target-error="#alert-container"
                        hx-swap="outerHTML"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

/// Render the balance, income and expense totals.
pub fn summary_view(summary: &Summary) -> Markup {
    html! {
        div id="summary" class="grid grid-cols-1 sm:grid-cols-3 gap-3"
        {
            div class="rounded bg-white p-4 shadow-sm dark:bg-gray-800"
            {
                p class="text-xs uppercase text-gray-500 dark:text-gray-400" { "Balance" }
                p id="current-balance" class="text-lg font-bold tabular-nums"
                { (format_rupiah(summary.balance)) }
            }

            div class="rounded bg-white p-4 shadow-sm dark:bg-gray-800"
            {
                p class="text-xs uppercase text-gray-500 dark:text-gray-400" { "Income" }
                p id="total-income" class="text-lg font-bold tabular-nums text-green-700 dark:text-green-300"
                { "+" (format_rupiah(summary.income)) }
            }

            div class="rounded bg-white p-4 shadow-sm dark:bg-gray-800"
            {
                p class="text-xs uppercase text-gray-500 dark:text-gray-400" { "Expenses" }
                p id="total-expenses" class="text-lg font-bold tabular-nums text-red-700 dark:text-red-300"
                { "-" (format_rupiah(summary.expense)) }
            }
        }
    }
}

/// Render the summary and one card per filtered transaction.
///
/// This section is the swap target for creating and deleting transactions.
pub fn history_section(view: &TransactionsView<'_>, filter: &FilterState) -> Markup {
    html! {
        section id=(HISTORY_ID) class="space-y-4"
        {
            (summary_view(&view.summary))

            div id="history-list" class="space-y-3"
            {
                @for transaction in &view.transactions {
                    (transaction_card_view(&TransactionCard::new(transaction, filter)))
                }

                @if view.transactions.is_empty() {
                    p
                        data-empty-state="true"
                        class="rounded-lg border border-dashed border-gray-300 bg-white px-4 py-6 \
                            text-center text-sm text-gray-500 dark:border-gray-700 \
                            dark:bg-gray-800 dark:text-gray-400"
                    {
                        "No transactions match these filters."
                    }
                }
            }
        }
    }
}

/// Render the type, category and month selects.
///
/// Changing any select reloads the filtered view with the new query and
/// pushes it to the browser history.
pub fn filter_controls(filter: &FilterState) -> Markup {
    let type_options = [
        (TypeFilter::All, "All types"),
        (TypeFilter::Only(TransactionType::Income), "Income"),
        (TypeFilter::Only(TransactionType::Expense), "Expense"),
    ];
    let selected_month = match filter.month {
        MonthFilter::All => None,
        MonthFilter::Only(month) => Some(month),
    };

    html! {
        form
            id="filters"
            hx-get=(endpoints::TRANSACTIONS_VIEW)
            hx-trigger="change"
            hx-select={ "#" (FILTERED_VIEW_ID) }
            hx-target={ "#" (FILTERED_VIEW_ID) }
            hx-swap="outerHTML"
            hx-push-url="true"
            class="grid grid-cols-1 sm:grid-cols-3 gap-3"
        {
            div
            {
                label for="filter-type" class=(FORM_LABEL_STYLE) { "Type" }

                select id="filter-type" name="type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (option, label) in type_options {
                        option value=(option.as_str()) selected[filter.transaction_type == option]
                        { (label) }
                    }
                }
            }

            div
            {
                label for="filter-category" class=(FORM_LABEL_STYLE) { "Category" }

                select id="filter-category" name="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value=(ALL) selected[filter.category == CategoryFilter::All]
                    { "All categories" }

                    @for category in filter_categories(filter.transaction_type) {
                        option
                            value=(category.value)
                            selected[filter.category.as_str() == category.value]
                        { (category.label) }
                    }
                }
            }

            div
            {
                label for="filter-month" class=(FORM_LABEL_STYLE) { "Month" }

                select id="filter-month" name="month" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value=(ALL) selected[selected_month.is_none()] { "All months" }

                    @for month in MONTHS {
                        option
                            value=(MonthFilter::Only(month).to_query_value())
                            selected[selected_month == Some(month)]
                        { (month_name(month)) }
                    }
                }
            }
        }
    }
}

/// Render the filter controls together with the history they control.
pub fn filtered_view(view: &TransactionsView<'_>, filter: &FilterState) -> Markup {
    html! {
        section id=(FILTERED_VIEW_ID) class="space-y-4"
        {
            h2 class="text-lg font-semibold" { "History" }
            (filter_controls(filter))
            (history_section(view, filter))
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::{Month, macros::date};

    use crate::{
        filter::{CategoryFilter, FilterState, MonthFilter, TypeFilter, derive_view},
        transaction::{Transaction, TransactionType},
    };

    use super::{TransactionCard, filter_controls, history_section, truncate_description};

    fn expense() -> Transaction {
        Transaction {
            id: 48_213_907,
            transaction_type: TransactionType::Expense,
            category: "food".to_owned(),
            payment_method: "Cash".to_owned(),
            amount: 300_000.0,
            date: date!(2025 - 02 - 05),
            description: "Belanja bulanan".to_owned(),
        }
    }

    fn income() -> Transaction {
        Transaction {
            id: 12,
            transaction_type: TransactionType::Income,
            category: "salary".to_owned(),
            payment_method: "Bank Transfer".to_owned(),
            amount: 1_000_000.0,
            date: date!(2025 - 01 - 25),
            description: "-".to_owned(),
        }
    }

    #[test]
    fn card_shows_signed_amount_label_and_long_date() {
        let filter = FilterState::default();

        let card = TransactionCard::new(&expense(), &filter);

        assert_eq!(card.amount, "- Rp300.000");
        assert_eq!(card.category, "Makanan");
        assert_eq!(card.date, "5 Februari 2025");
        assert_eq!(card.payment_method, "Cash");
        assert_eq!(
            TransactionCard::new(&income(), &filter).amount,
            "+ Rp1.000.000"
        );
    }

    #[test]
    fn card_actions_keep_filter() {
        let filter = FilterState {
            transaction_type: TypeFilter::Only(TransactionType::Expense),
            category: CategoryFilter::All,
            month: MonthFilter::Only(Month::February),
        };

        let card = TransactionCard::new(&expense(), &filter);

        assert_eq!(
            card.delete_url,
            "/api/transactions/48213907?confirm=true&type=expense&category=all&month=1"
        );
        assert_eq!(
            card.edit_url,
            "/transactions/48213907/edit?redirect_url=%2Ftransactions%3Ftype%3Dexpense%26category%3Dall%26month%3D1"
        );
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let description = "Makan malam bersama keluarga di restoran Padang";

        let (truncated, full) = truncate_description(description);

        assert_eq!(truncated, "Makan malam bersama keluarga ...");
        assert_eq!(full.as_deref(), Some(description));
        assert_eq!(truncate_description("Kopi"), ("Kopi".to_owned(), None));
    }

    #[test]
    fn history_renders_one_card_per_transaction_in_order() {
        let transactions = vec![expense(), income()];
        let filter = FilterState::default();
        let view = derive_view(&transactions, &filter, 2025);

        let html = Html::parse_fragment(&history_section(&view, &filter).into_string());

        let ids: Vec<_> = html
            .select(&Selector::parse("[data-transaction-card]").unwrap())
            .filter_map(|card| card.value().attr("data-transaction-id"))
            .collect();
        assert_eq!(ids, ["48213907", "12"]);
        assert_eq!(text_of(&html, "#current-balance"), "Rp700.000");
        assert_eq!(text_of(&html, "#total-income"), "+Rp1.000.000");
        assert_eq!(text_of(&html, "#total-expenses"), "-Rp300.000");
        assert!(
            html.select(&Selector::parse("[data-empty-state]").unwrap())
                .next()
                .is_none()
        );
    }

    #[test]
    fn empty_history_shows_empty_state() {
        let filter = FilterState::default();
        let view = derive_view(&[], &filter, 2025);

        let html = Html::parse_fragment(&history_section(&view, &filter).into_string());

        assert!(
            html.select(&Selector::parse("[data-empty-state]").unwrap())
                .next()
                .is_some()
        );
        assert_eq!(text_of(&html, "#current-balance"), "Rp0");
    }

    #[test]
    fn delete_button_asks_for_confirmation() {
        let transactions = vec![expense()];
        let filter = FilterState::default();
        let view = derive_view(&transactions, &filter, 2025);

        let html = Html::parse_fragment(&history_section(&view, &filter).into_string());

        let button = html
            .select(&Selector::parse("button[hx-delete]").unwrap())
            .next()
            .expect("No delete button found");
        let confirm = button.value().attr("hx-confirm").unwrap_or_default();
        assert!(confirm.contains("Belanja bulanan"), "got {confirm:?}");
        assert_eq!(button.value().attr("hx-target"), Some("#history"));
    }

    #[test]
    fn filter_controls_select_current_values() {
        let filter = FilterState {
            transaction_type: TypeFilter::Only(TransactionType::Income),
            category: CategoryFilter::Only("bonus".to_owned()),
            month: MonthFilter::Only(Month::March),
        };

        let html = Html::parse_fragment(&filter_controls(&filter).into_string());

        assert_eq!(selected_value(&html, "type"), "income");
        assert_eq!(selected_value(&html, "category"), "bonus");
        assert_eq!(selected_value(&html, "month"), "2");

        let category_options = html
            .select(&Selector::parse("select[name=category] option").unwrap())
            .count();
        assert_eq!(category_options, 6, "want 'all' plus the 5 income categories");
    }

    #[track_caller]
    fn text_of(html: &Html, selector: &str) -> String {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("No element matches {selector}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    #[track_caller]
    fn selected_value(html: &Html, name: &str) -> String {
        let selector = Selector::parse(&format!("select[name={name}] option[selected]")).unwrap();
        html.select(&selector)
            .next()
            .and_then(|option| option.value().attr("value"))
            .unwrap_or_else(|| panic!("No option selected for {name}"))
            .to_owned()
    }
}
