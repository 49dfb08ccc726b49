//! The 404 page served for unknown routes and missing resources.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// The fallback route handler for paths that match no route.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// Build the 404 response directly, for errors that map to a missing
/// resource.
pub fn get_404_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(
            error_view(
                "Not Found",
                "404",
                "Sorry, the page you were looking for does not exist.",
                "Check the address for typos or head back home.",
            )
            .into_string(),
        ),
    )
        .into_response()
}
