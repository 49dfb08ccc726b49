//! Application router configuration.

use axum::{
    Router,
    middleware,
    routing::{get, post},
};

use crate::{
    AppState,
    dashboard::{delete_expense_form, get_dashboard_page, submit_expense_form},
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, list_expenses_endpoint,
        update_expense_endpoint,
    },
    export::get_expenses_csv,
    logging::logging_middleware,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_dashboard_page))
        .route(endpoints::EXPENSE_FORM, post(submit_expense_form))
        .route(endpoints::DELETE_EXPENSE, post(delete_expense_form))
        .route(endpoints::EXPORT_CSV, get(get_expenses_csv))
        .route(
            endpoints::EXPENSES_API,
            get(list_expenses_endpoint)
                .post(create_expense_endpoint)
                .put(update_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .layer(middleware::from_fn(logging_middleware))
        .fallback(get_404_not_found)
        .with_state(state)
}
