//! Implements a struct that holds the state of the web server.

use std::sync::{Arc, Mutex};

use crate::store::{ExpenseStore, SharedStore};

/// The state of the web server.
#[derive(Clone)]
pub struct AppState {
    /// The expense store shared between request handlers.
    pub store: SharedStore,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// Used to default the expense form's date field to today.
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] over `store`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g.
    /// "Pacific/Auckland".
    pub fn new(store: Box<dyn ExpenseStore + Send>, local_timezone: &str) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            local_timezone: local_timezone.to_owned(),
        }
    }
}
