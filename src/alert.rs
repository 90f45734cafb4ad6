//! Alert system for displaying success and error messages to users.
//!
//! Alerts are swapped into the fixed `#alert-container` at the bottom of the
//! page, either as the error target of an HTMX request or as an out-of-band
//! swap alongside a successful response. `static/app.js` hides them again
//! after [ALERT_DISMISS_DELAY].

use std::time::Duration;

use maud::{Markup, html};

/// How long an alert stays on screen before it is dismissed.
pub const ALERT_DISMISS_DELAY: Duration = Duration::from_secs(3);

/// The id of the element that alerts are rendered into.
pub const ALERT_CONTAINER_ID: &str = "alert-container";

/// A transient message shown to the user after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Success { message: String, details: String },
    Error { message: String, details: String },
}

impl Alert {
    /// Create a success alert without details.
    pub fn success(message: &str) -> Self {
        Alert::Success {
            message: message.to_owned(),
            details: String::new(),
        }
    }

    pub fn into_html(self) -> Markup {
        let (message, details, style, role) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "text-green-800 bg-green-50 border-green-300 dark:bg-gray-800 \
                dark:text-green-400 dark:border-green-800",
                "status",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "text-red-800 bg-red-50 border-red-300 dark:bg-gray-800 \
                dark:text-red-400 dark:border-red-800",
                "alert",
            ),
        };

        html! {
            div
                role=(role)
                data-dismiss-after=(ALERT_DISMISS_DELAY.as_millis())
                class={ "p-4 mb-4 text-sm rounded-lg border " (style) }
            {
                p class="font-medium" { (message) }

                @if !details.is_empty() {
                    p class="mt-1" { (details) }
                }
            }
        }
    }

    /// Render the alert as an out-of-band swap that replaces the alert
    /// container, for responses whose main target is elsewhere on the page.
    pub fn into_oob_html(self) -> Markup {
        alert_container(Some(self.into_html()), true)
    }
}

/// The fixed element at the bottom of the page that holds alerts.
pub fn alert_container(content: Option<Markup>, out_of_band: bool) -> Markup {
    html! {
        div
            id=(ALERT_CONTAINER_ID)
            hx-swap-oob=[out_of_band.then_some("true")]
            class={ @if content.is_none() { "hidden " } "w-full max-w-md px-4" }
            style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
        {
            @if let Some(content) = content {
                (content)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::{ALERT_CONTAINER_ID, Alert};

    #[test]
    fn error_alert_has_alert_role_and_dismiss_delay() {
        let markup = Alert::Error {
            message: "Oops".to_owned(),
            details: "Something broke".to_owned(),
        }
        .into_html();
        let html = Html::parse_fragment(&markup.into_string());

        let selector = Selector::parse("div[role=alert]").unwrap();
        let alert = html
            .select(&selector)
            .next()
            .expect("could not find alert element");
        assert_eq!(alert.value().attr("data-dismiss-after"), Some("3000"));
        let text = alert.text().collect::<String>();
        assert!(text.contains("Oops") && text.contains("Something broke"));
    }

    #[test]
    fn success_alert_omits_empty_details() {
        let markup = Alert::success("Transaction added!").into_html();
        let html = Html::parse_fragment(&markup.into_string());

        let selector = Selector::parse("div[role=status] p").unwrap();
        assert_eq!(html.select(&selector).count(), 1);
    }

    #[test]
    fn oob_alert_replaces_container() {
        let markup = Alert::success("Saved").into_oob_html();
        let html = Html::parse_fragment(&markup.into_string());

        let selector = Selector::parse(&format!("#{ALERT_CONTAINER_ID}")).unwrap();
        let container = html
            .select(&selector)
            .next()
            .expect("could not find alert container");
        assert_eq!(container.value().attr("hx-swap-oob"), Some("true"));
        assert!(
            !container.value().classes().any(|class| class == "hidden"),
            "container with an alert should be visible"
        );
    }
}
