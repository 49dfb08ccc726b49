//! Database initialization for the SQLite strategy.

use rusqlite::Connection;

use crate::expense::create_expense_table;

/// Create the application tables in the database if they do not exist.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_expense_table(connection)
}
