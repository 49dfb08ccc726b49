//! The JSON snapshot persistence strategy.
//!
//! The whole store lives in memory and is serialized to a single JSON file:
//! read once when the store is opened, rewritten in full after every
//! mutation. This mirrors a browser local-storage setup where the entire
//! expense array sits under one storage key.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    Error,
    expense::{Expense, NewExpense},
    store::ExpenseStore,
};

/// An expense store backed by a single JSON snapshot file.
///
/// Lists expenses in insertion order. IDs are stable generated integers
/// rather than positional indices, so deleting an expense does not shift the
/// IDs of the expenses after it. Deleting an ID that is not in the store is
/// a no-op.
pub struct SnapshotStore {
    path: PathBuf,
    expenses: Vec<Expense>,
}

impl SnapshotStore {
    /// Open the snapshot at `path`, reading the stored expenses if the file
    /// exists and starting empty otherwise.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::SnapshotIo] if the file exists but cannot be read,
    /// - or [Error::SnapshotFormat] if its contents are not a JSON expense array.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let expenses = if path.exists() {
            let text =
                fs::read_to_string(path).map_err(|error| Error::SnapshotIo(error.to_string()))?;
            serde_json::from_str(&text).map_err(|error| Error::SnapshotFormat(error.to_string()))?
        } else {
            Vec::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            expenses,
        })
    }

    /// Rewrite the whole snapshot file from the in-memory store.
    fn save(&self) -> Result<(), Error> {
        let text = serde_json::to_string(&self.expenses)
            .map_err(|error| Error::SnapshotFormat(error.to_string()))?;

        fs::write(&self.path, text).map_err(|error| Error::SnapshotIo(error.to_string()))
    }

    fn next_id(&self) -> i64 {
        self.expenses
            .iter()
            .map(|expense| expense.id)
            .max()
            .unwrap_or(0)
            + 1
    }
}

impl ExpenseStore for SnapshotStore {
    fn list(&self) -> Result<Vec<Expense>, Error> {
        Ok(self.expenses.clone())
    }

    fn create(&mut self, expense: NewExpense) -> Result<Expense, Error> {
        let expense = Expense {
            id: self.next_id(),
            date: expense.date,
            description: expense.description,
            category: expense.category,
            amount: expense.amount,
        };

        self.expenses.push(expense.clone());
        self.save()?;

        Ok(expense)
    }

    fn update(&mut self, id: i64, expense: NewExpense) -> Result<Expense, Error> {
        let stored = self
            .expenses
            .iter_mut()
            .find(|stored| stored.id == id)
            .ok_or(Error::UpdateMissingExpense)?;

        *stored = Expense {
            id,
            date: expense.date,
            description: expense.description,
            category: expense.category,
            amount: expense.amount,
        };
        let updated = stored.clone();
        self.save()?;

        Ok(updated)
    }

    fn delete(&mut self, id: i64) -> Result<(), Error> {
        self.expenses.retain(|expense| expense.id != id);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use time::macros::date;

    use crate::{
        expense::NewExpense,
        store::{ExpenseStore, SnapshotStore},
    };

    fn new_expense(description: &str, amount: f64) -> NewExpense {
        NewExpense {
            date: date!(2024 - 03 - 01),
            description: description.to_owned(),
            category: "Food".to_owned(),
            amount,
        }
    }

    #[test]
    fn snapshot_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.json");

        let mut store = SnapshotStore::open(&path).unwrap();
        let coffee = store.create(new_expense("Coffee", 4.5)).unwrap();
        let lunch = store.create(new_expense("Lunch", 12.0)).unwrap();

        let reopened = SnapshotStore::open(&path).unwrap();
        assert_eq!(reopened.list().unwrap(), vec![coffee, lunch]);
    }

    #[test]
    fn ids_are_stable_across_deletes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.json");

        let mut store = SnapshotStore::open(&path).unwrap();
        let first = store.create(new_expense("Coffee", 4.5)).unwrap();
        let second = store.create(new_expense("Lunch", 12.0)).unwrap();

        store.delete(first.id).unwrap();
        let third = store.create(new_expense("Dinner", 20.0)).unwrap();

        // The survivor keeps its ID and the new expense does not reuse a
        // freed one.
        assert_eq!(second.id, 2);
        assert_eq!(third.id, 3);
        let ids: Vec<i64> = store.list().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn delete_missing_id_is_a_no_op() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.json");

        let mut store = SnapshotStore::open(&path).unwrap();
        let coffee = store.create(new_expense("Coffee", 4.5)).unwrap();

        store.delete(404).expect("delete of a missing ID should succeed");

        assert_eq!(store.list().unwrap(), vec![coffee]);
    }

    #[test]
    fn opening_a_missing_file_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.json");

        let store = SnapshotStore::open(&path).unwrap();

        assert!(store.list().unwrap().is_empty());
        // The file is only created once something is written.
        assert!(!path.exists());
    }
}
