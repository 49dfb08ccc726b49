//! The JSON CRUD surface over the expense store.
//!
//! Four operations on one route, JSON in and out:
//! - `GET /api/expenses` lists every expense.
//! - `POST /api/expenses` creates an expense from `{date, description|desc, amount, category?}`.
//! - `PUT /api/expenses` updates `{id, ...}` with the same fields.
//! - `DELETE /api/expenses?id=<id>` deletes one expense.
//!
//! Every failure is terminal for that request and reported as a 500 with an
//! `{"error": ...}` body; clients retry by issuing a new request. Any other
//! method gets a 405 with an `Allow` header (see the routing tests).

use axum::{
    Json,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use time::Date;

use crate::{AppState, expense::NewExpense, store::SharedStore};

/// The state needed to serve the expense API.
#[derive(Clone)]
pub struct ExpenseApiState {
    /// The expense store shared between request handlers.
    pub store: SharedStore,
}

impl FromRef<AppState> for ExpenseApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// The payload for creating an expense.
///
/// Accepts `desc` as an alias for `description`, and the amount as either a
/// JSON number or a numeric string, since the form-driven client sends its
/// fields as text.
#[derive(Debug, Deserialize)]
pub struct ExpensePayload {
    /// When the money was spent, as `YYYY-MM-DD`.
    pub date: Date,
    /// What the money was spent on.
    #[serde(alias = "desc")]
    pub description: String,
    /// Optional free-text category label.
    #[serde(default)]
    pub category: String,
    /// The amount spent in dollars.
    #[serde(deserialize_with = "number_or_string")]
    pub amount: f64,
}

impl From<ExpensePayload> for NewExpense {
    fn from(payload: ExpensePayload) -> Self {
        NewExpense {
            date: payload.date,
            description: payload.description,
            category: payload.category,
            amount: payload.amount,
        }
    }
}

/// The payload for updating an expense.
#[derive(Debug, Deserialize)]
pub struct UpdateExpensePayload {
    /// The ID of the expense to overwrite.
    #[serde(deserialize_with = "id_number_or_string")]
    pub id: i64,
    /// The replacement field values.
    #[serde(flatten)]
    pub expense: ExpensePayload,
}

/// The query parameters for deleting an expense.
#[derive(Debug, Deserialize)]
pub struct DeleteExpenseParams {
    /// The ID of the expense to delete.
    pub id: i64,
}

fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(value) => Ok(value),
        Amount::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn id_number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(i64),
        Text(String),
    }

    match Id::deserialize(deserializer)? {
        Id::Number(value) => Ok(value),
        Id::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn api_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

/// A route handler returning every expense as a JSON array.
pub async fn list_expenses_endpoint(State(state): State<ExpenseApiState>) -> Response {
    let store = match state.store.lock() {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("could not acquire store lock: {error}");
            return api_error("Failed to load expenses");
        }
    };

    match store.list() {
        Ok(expenses) => (StatusCode::OK, Json(expenses)).into_response(),
        Err(error) => {
            tracing::error!("could not list expenses: {error}");
            api_error("Failed to load expenses")
        }
    }
}

/// A route handler creating an expense, returning the stored record with its
/// assigned ID.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseApiState>,
    Json(payload): Json<ExpensePayload>,
) -> Response {
    let mut store = match state.store.lock() {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("could not acquire store lock: {error}");
            return api_error("Failed to create expense");
        }
    };

    match store.create(payload.into()) {
        Ok(expense) => (StatusCode::CREATED, Json(expense)).into_response(),
        Err(error) => {
            tracing::error!("could not create expense: {error}");
            api_error("Failed to create expense")
        }
    }
}

/// A route handler overwriting an expense, returning the updated record.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseApiState>,
    Json(payload): Json<UpdateExpensePayload>,
) -> Response {
    let mut store = match state.store.lock() {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("could not acquire store lock: {error}");
            return api_error("Failed to update expense");
        }
    };

    match store.update(payload.id, payload.expense.into()) {
        Ok(expense) => (StatusCode::OK, Json(expense)).into_response(),
        Err(error) => {
            tracing::error!("could not update expense {}: {error}", payload.id);
            api_error("Failed to update expense")
        }
    }
}

/// A route handler deleting an expense, returning an empty 204 on success.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseApiState>,
    Query(params): Query<DeleteExpenseParams>,
) -> Response {
    let mut store = match state.store.lock() {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("could not acquire store lock: {error}");
            return api_error("Failed to delete expense");
        }
    };

    match store.delete(params.id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => {
            tracing::error!("could not delete expense {}: {error}", params.id);
            api_error("Failed to delete expense")
        }
    }
}
