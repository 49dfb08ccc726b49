//! Expense management for the dashboard.
//!
//! This module contains:
//! - The [Expense] model and [NewExpense] for validated, not-yet-stored entries
//! - Database functions behind the SQLite store strategy
//! - The JSON CRUD API handlers at `/api/expenses`

mod api;
mod core;

pub use api::{
    create_expense_endpoint, delete_expense_endpoint, list_expenses_endpoint,
    update_expense_endpoint,
};
pub use core::{
    Expense, NewExpense, create_expense, create_expense_table, delete_expense, list_expenses,
    map_expense_row, update_expense,
};
