//! The SQLite persistence strategy.

use rusqlite::Connection;

use crate::{
    Error,
    db::initialize,
    expense::{
        Expense, NewExpense, create_expense, delete_expense, list_expenses, update_expense,
    },
    store::ExpenseStore,
};

/// An expense store backed by a SQLite database.
///
/// Lists expenses newest first. Deleting or updating an expense that is not
/// in the database is an error, which the JSON API surfaces as a failed
/// request.
pub struct SqliteStore {
    connection: Connection,
}

impl SqliteStore {
    /// Create a store over `connection`, creating the expense table if it
    /// does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self { connection })
    }
}

impl ExpenseStore for SqliteStore {
    fn list(&self) -> Result<Vec<Expense>, Error> {
        list_expenses(&self.connection)
    }

    fn create(&mut self, expense: NewExpense) -> Result<Expense, Error> {
        create_expense(expense, &self.connection)
    }

    fn update(&mut self, id: i64, expense: NewExpense) -> Result<Expense, Error> {
        update_expense(id, expense, &self.connection)
    }

    fn delete(&mut self, id: i64) -> Result<(), Error> {
        delete_expense(id, &self.connection)
    }
}
