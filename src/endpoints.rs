//! The application route URIs.
//!
//! For endpoints that take a parameter, e.g., '/expenses/{expense_id}/delete',
//! use [format_endpoint].

/// The dashboard page: form, chart, table and filter controls.
pub const ROOT: &str = "/";
/// The form endpoint for creating or updating an expense.
pub const EXPENSE_FORM: &str = "/expenses";
/// The form endpoint for deleting an expense from the table.
pub const DELETE_EXPENSE: &str = "/expenses/{expense_id}/delete";
/// The CSV export of the (optionally filtered) expense table.
pub const EXPORT_CSV: &str = "/export/expenses.csv";

/// The JSON CRUD surface over the expense store.
pub const EXPENSES_API: &str = "/api/expenses";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/expenses/{expense_id}/delete',
/// '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::EXPENSE_FORM);
        assert_endpoint_is_valid_uri(endpoints::EXPORT_CSV);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES_API);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint(endpoints::DELETE_EXPENSE, 42);

        assert_eq!(formatted_path, "/expenses/42/delete");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/expenses", 1);

        assert_eq!(formatted_path, "/expenses");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
