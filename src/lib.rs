//! Spendlog is a small web app for tracking daily expenses.
//!
//! This library serves a single-page expense dashboard (form, table, stacked
//! bar chart, CSV export) backed by either a SQLite database or a JSON
//! snapshot file, plus a JSON CRUD API over the same store.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::response::{IntoResponse, Response};
use axum_server::Handle;
use tokio::signal;

mod aggregation;
mod app_state;
mod chart;
mod controller;
mod dashboard;
mod db;
mod endpoints;
mod expense;
mod export;
mod fallback;
mod html;
mod logging;
mod not_found;
mod routing;
mod store;
mod timezone;

pub use aggregation::{Summary, UNCATEGORIZED_LABEL, aggregate, category_order};
pub use app_state::AppState;
pub use controller::{Controller, DraftForm, EditMode, ViewState};
pub use expense::{Expense, NewExpense};
pub use logging::logging_middleware;
pub use routing::build_router;
pub use store::{ExpenseStore, SnapshotStore, SqliteStore};

use crate::fallback::render_fallback_page;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was submitted as an expense description.
    #[error("Description cannot be empty")]
    EmptyDescription,

    /// The draft date could not be parsed as a calendar date.
    #[error("\"{0}\" is not a valid calendar date")]
    InvalidDate(String),

    /// The draft amount could not be parsed as a number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// An amount of zero or less was submitted.
    ///
    /// Expenses record money that was spent, so the amount must be greater
    /// than zero.
    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(f64),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an expense that does not exist in the store.
    #[error("tried to update an expense that is not in the store")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist in the store.
    #[error("tried to delete an expense that is not in the store")]
    DeleteMissingExpense,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The snapshot file could not be read or written.
    #[error("could not access the snapshot file: {0}")]
    SnapshotIo(String),

    /// The snapshot file did not contain a valid expense array.
    #[error("could not parse the snapshot file: {0}")]
    SnapshotFormat(String),

    /// Could not acquire the store lock.
    #[error("could not acquire the store lock")]
    StoreLockError,
}

impl Error {
    /// Whether this error comes from validating a form draft.
    ///
    /// Validation errors are caught before any store call and are shown
    /// inline next to the form rather than replacing the page.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyDescription
                | Error::InvalidDate(_)
                | Error::InvalidAmount(_)
                | Error::NonPositiveAmount(_)
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => not_found::get_404_not_found_response(),
            Error::UpdateMissingExpense => render_fallback_page(
                axum::http::StatusCode::NOT_FOUND,
                "Could not update expense",
                "The expense could not be found. It may have already been deleted.",
            ),
            Error::DeleteMissingExpense => render_fallback_page(
                axum::http::StatusCode::NOT_FOUND,
                "Could not delete expense",
                "The expense could not be found. It may have already been deleted.",
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_fallback_page(
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Sorry, something went wrong.",
                    "Try again later or check the server logs.",
                )
            }
        }
    }
}
