//! The full-page error view shown when a request cannot be completed.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// Render a full error page for `status` with a short `description` of what
/// went wrong and a `fix` suggesting what the user can do about it.
pub fn render_fallback_page(status: StatusCode, description: &str, fix: &str) -> Response {
    let header = status.as_str().to_owned();
    let title = status.canonical_reason().unwrap_or("Error");

    (
        status,
        Html(error_view(title, &header, description, fix).into_string()),
    )
        .into_response()
}
