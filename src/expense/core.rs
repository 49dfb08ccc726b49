//! Defines the core expense model and the SQLite statements behind
//! [crate::store::SqliteStore].

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

/// A single expense: money spent on a given calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, assigned by the store.
    pub id: i64,
    /// When the money was spent. A calendar date with no time component.
    pub date: Date,
    /// A text description of what the money was spent on.
    pub description: String,
    /// A free-text category label, e.g. "Food". May be empty.
    pub category: String,
    /// The amount of money spent in dollars. Always greater than zero.
    pub amount: f64,
}

/// A validated expense that has not been given an ID yet.
///
/// Produced by [crate::DraftForm::validate] or from an API payload, and
/// consumed by [crate::store::ExpenseStore] create/update calls.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// When the money was spent.
    pub date: Date,
    /// A text description of what the money was spent on. Non-empty.
    pub description: String,
    /// A free-text category label. May be empty.
    pub category: String,
    /// The amount of money spent in dollars. Greater than zero.
    pub amount: f64,
}

/// Create a new expense in the database.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn create_expense(expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "INSERT INTO expense (date, description, category, amount)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, date, description, category, amount",
        )?
        .query_row(
            (
                expense.date,
                expense.description,
                expense.category,
                expense.amount,
            ),
            map_expense_row,
        )?;

    Ok(expense)
}

/// Overwrite the expense with ID `id` in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingExpense] if `id` does not refer to an expense in the database,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(
    id: i64,
    expense: NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(
            "UPDATE expense SET date = ?1, description = ?2, category = ?3, amount = ?4
             WHERE id = ?5
             RETURNING id, date, description, category, amount",
        )?
        .query_row(
            (
                expense.date,
                expense.description,
                expense.category,
                expense.amount,
                id,
            ),
            map_expense_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingExpense,
            error => error.into(),
        })
}

/// Delete the expense with ID `id` from the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingExpense] if `id` does not refer to an expense in the database,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_expense(id: i64, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Retrieve all expenses from the database, newest first.
///
/// Ties on the date are broken by ID so that the most recently created
/// expense comes first, matching the order new entries appear in the table.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn list_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    let expenses = connection
        .prepare(
            "SELECT id, date, description, category, amount FROM expense
             ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_expense_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(expenses)
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT '',
                amount REAL NOT NULL
                )",
        (),
    )?;

    // Index used by the date-descending list query.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Expense].
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let description = row.get(2)?;
    let category = row.get(3)?;
    let amount = row.get(4)?;

    Ok(Expense {
        id,
        date,
        description,
        category,
        amount,
    })
}
