//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, error_pages::ErrorPage, transaction::ValidationError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The submitted transaction was missing a required field or had an
    /// invalid value.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested page or transaction does not exist.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An update named an ID that is not in the store.
    #[error("tried to update a transaction that is not in the store")]
    UpdateMissingTransaction,

    /// A delete named an ID that is not in the store.
    #[error("tried to delete a transaction that is not in the store")]
    DeleteMissingTransaction,

    /// A delete was requested without the user confirming it first.
    #[error("the deletion was not confirmed")]
    DeleteNotConfirmed,

    /// The key-value store could not be read from or written to.
    ///
    /// The string holds the original I/O error message.
    #[error("could not access the key-value store: {0}")]
    StorageError(String),

    /// The transaction list could not be turned into JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the transaction store lock
    #[error("could not acquire the transaction store lock")]
    StoreLockError,

    /// The configured timezone name is not a canonical IANA timezone.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::StorageError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => ErrorPage::NotFound.into_response(),
            Error::InvalidTimezoneError(timezone) => ErrorPage::Internal {
                description: "Invalid Timezone Settings".to_owned(),
                fix: timezone_fix(&timezone),
            }
            .into_response(),
            Error::StoreLockError => ErrorPage::internal().into_response(),
            // Storage and serialization details stay in the server log.
            error => {
                tracing::error!("Unhandled error while rendering a page: {error}");
                ErrorPage::internal().into_response()
            }
        }
    }
}

fn timezone_fix(timezone: &str) -> String {
    format!(
        "\"{timezone}\" is not a timezone the server recognises. Restart it with \
        --timezone set to a canonical name such as Asia/Jakarta."
    )
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Validation(error) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Could not save transaction".to_owned(),
                    details: format!(
                        "{error}. All fields except the description are required and the \
                        amount must be positive."
                    ),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: timezone_fix(&timezone),
                },
            ),
            Error::NotFound | Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update transaction".to_owned(),
                    details: "It may have been deleted, reload the page to see the current list."
                        .to_owned(),
                },
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete transaction".to_owned(),
                    details: "It may already be gone, reload the page to see the current list."
                        .to_owned(),
                },
            ),
            Error::DeleteNotConfirmed => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Transaction was not deleted".to_owned(),
                    details: "Deleting a transaction must be confirmed first.".to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Could not save your changes".to_owned(),
                    details: "Nothing was changed. The server log has the details.".to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
