//! The persistence strategies for the expense store.
//!
//! [ExpenseStore] is the seam between the controller/web layer and
//! persistence. Two interchangeable strategies implement it:
//! - [SqliteStore]: one-to-one SQL statements against a SQLite database.
//! - [SnapshotStore]: the whole store serialized to one JSON file, rewritten
//!   after every mutation.

mod snapshot;
mod sqlite;

pub use snapshot::SnapshotStore;
pub use sqlite::SqliteStore;

use std::sync::{Arc, Mutex};

use crate::{
    Error,
    expense::{Expense, NewExpense},
};

/// Handles the persistence of expenses.
///
/// Each operation either fully succeeds or fails with an [Error]; no
/// operation retries. The order of [ExpenseStore::list] is strategy-defined:
/// newest first for [SqliteStore], insertion order for [SnapshotStore].
pub trait ExpenseStore {
    /// Retrieve all expenses from the store.
    fn list(&self) -> Result<Vec<Expense>, Error>;

    /// Create a new expense in the store and return it with its assigned ID.
    fn create(&mut self, expense: NewExpense) -> Result<Expense, Error>;

    /// Overwrite the expense with ID `id` and return the updated record.
    fn update(&mut self, id: i64, expense: NewExpense) -> Result<Expense, Error>;

    /// Delete the expense with ID `id` from the store.
    fn delete(&mut self, id: i64) -> Result<(), Error>;
}

impl<S: ExpenseStore + ?Sized> ExpenseStore for &mut S {
    fn list(&self) -> Result<Vec<Expense>, Error> {
        (**self).list()
    }

    fn create(&mut self, expense: NewExpense) -> Result<Expense, Error> {
        (**self).create(expense)
    }

    fn update(&mut self, id: i64, expense: NewExpense) -> Result<Expense, Error> {
        (**self).update(id, expense)
    }

    fn delete(&mut self, id: i64) -> Result<(), Error> {
        (**self).delete(id)
    }
}

/// The store shared between request handlers.
///
/// The mutex serializes mutations so that no two actions are in flight
/// against the same store snapshot at once.
pub type SharedStore = Arc<Mutex<Box<dyn ExpenseStore + Send>>>;
