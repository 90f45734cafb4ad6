//! Full-page responses for missing resources and internal server errors.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// A full error page, as opposed to an alert fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPage {
    /// 404, the page or transaction does not exist.
    NotFound,
    /// 500, with a short description of what failed and how to fix it.
    Internal { description: String, fix: String },
}

impl ErrorPage {
    /// The generic internal error page.
    pub fn internal() -> Self {
        ErrorPage::Internal {
            description: "Sorry, something went wrong.".to_owned(),
            fix: "Try again later or check the server logs".to_owned(),
        }
    }
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        let (status_code, markup) = match self {
            ErrorPage::NotFound => (
                StatusCode::NOT_FOUND,
                error_view(
                    "Not Found",
                    "404",
                    "Something's missing.",
                    "That page or transaction does not exist. \
                    It may have been deleted, head back to your transactions.",
                ),
            ),
            ErrorPage::Internal { description, fix } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_view("Internal Server Error", "500", &description, &fix),
            ),
        };

        (status_code, Html(markup.into_string())).into_response()
    }
}

/// The fallback route handler for unknown paths.
pub async fn get_404_not_found() -> Response {
    ErrorPage::NotFound.into_response()
}
