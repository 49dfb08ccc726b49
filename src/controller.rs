//! The view-state controller: transient form state plus the transitions that
//! dispatch store mutations.
//!
//! The controller owns no persistence of its own. It validates the draft
//! before any store call, and a store failure leaves both the store and the
//! view state exactly as they were, so the caller can re-render the page and
//! let the user try again.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    expense::{Expense, NewExpense},
    store::ExpenseStore,
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The in-progress, unvalidated form state.
///
/// Every field is kept as text until a submit parses it, so the form can be
/// re-rendered with whatever the user typed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DraftForm {
    /// The date field, expected as `YYYY-MM-DD`.
    pub date: String,
    /// The description field.
    pub description: String,
    /// The category field. May be left empty.
    pub category: String,
    /// The amount field, expected as a positive decimal number.
    pub amount: String,
}

impl DraftForm {
    /// Populate a draft from an existing expense, for editing.
    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            date: expense.date.to_string(),
            description: expense.description.clone(),
            category: expense.category.clone(),
            amount: expense.amount.to_string(),
        }
    }

    /// Parse and validate the draft into a [NewExpense].
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyDescription] if the description is empty or whitespace,
    /// - [Error::InvalidDate] if the date does not parse as `YYYY-MM-DD`,
    /// - [Error::InvalidAmount] if the amount does not parse as a number,
    /// - or [Error::NonPositiveAmount] if the amount is zero or less.
    pub fn validate(&self) -> Result<NewExpense, Error> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        let date = Date::parse(self.date.trim(), DATE_FORMAT)
            .map_err(|_| Error::InvalidDate(self.date.clone()))?;

        let amount: f64 = self
            .amount
            .trim()
            .parse()
            .map_err(|_| Error::InvalidAmount(self.amount.clone()))?;
        if amount <= 0.0 {
            return Err(Error::NonPositiveAmount(amount));
        }

        Ok(NewExpense {
            date,
            description: description.to_owned(),
            category: self.category.trim().to_owned(),
            amount,
        })
    }
}

/// Whether a submit creates a new expense or overwrites an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EditMode {
    /// Creating a new expense.
    #[default]
    Drafting,
    /// Editing the expense with the given ID.
    Editing(i64),
}

/// The transient UI state: draft form, edit target and active filter.
///
/// Independent of the store lifecycle; reset to defaults after a successful
/// submit or a cancel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    /// The in-progress form fields.
    pub draft: DraftForm,
    /// Whether the draft creates a new expense or edits an existing one.
    pub mode: EditMode,
    /// The active category filter. `None` or empty shows all expenses.
    pub filter: Option<String>,
}

/// Dispatches user actions against an injected [ExpenseStore].
///
/// One controller serves one action at a time; the store mutex in the web
/// layer guarantees no two mutations race against the same store snapshot.
pub struct Controller<S> {
    store: S,
    view: ViewState,
}

impl<S: ExpenseStore> Controller<S> {
    /// Create a controller over `store` with default view state.
    pub fn new(store: S) -> Self {
        Self::with_view(store, ViewState::default())
    }

    /// Create a controller over `store` resuming from `view`.
    pub fn with_view(store: S, view: ViewState) -> Self {
        Self { store, view }
    }

    /// The current view state.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Consume the controller, releasing the store borrow and returning the
    /// view state.
    pub fn into_view(self) -> ViewState {
        self.view
    }

    /// Replace the draft with new field values. Mode and filter are untouched.
    pub fn set_draft(&mut self, draft: DraftForm) {
        self.view.draft = draft;
    }

    /// Validate the draft and issue a create (drafting) or update (editing).
    ///
    /// On success the draft is cleared and the mode returns to drafting. On
    /// any error the draft, mode and store are left unchanged.
    ///
    /// # Errors
    /// Returns a validation error before any store call, or the store's own
    /// error if the create/update fails.
    pub fn submit(&mut self) -> Result<Expense, Error> {
        let expense = self.view.draft.validate()?;

        let saved = match self.view.mode {
            EditMode::Drafting => self.store.create(expense)?,
            EditMode::Editing(id) => self.store.update(id, expense)?,
        };

        self.view.draft = DraftForm::default();
        self.view.mode = EditMode::Drafting;

        Ok(saved)
    }

    /// Populate the draft from the stored expense with ID `id` and switch to
    /// editing it.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` is not in the store, leaving the
    /// view state unchanged.
    pub fn start_edit(&mut self, id: i64) -> Result<(), Error> {
        let expenses = self.store.list()?;
        let expense = expenses
            .iter()
            .find(|expense| expense.id == id)
            .ok_or(Error::NotFound)?;

        self.view.draft = DraftForm::from_expense(expense);
        self.view.mode = EditMode::Editing(id);

        Ok(())
    }

    /// Discard the draft without mutating the store and return to drafting.
    pub fn cancel_edit(&mut self) {
        self.view.draft = DraftForm::default();
        self.view.mode = EditMode::Drafting;
    }

    /// Delete the expense with ID `id`.
    ///
    /// The edit state only changes when the deleted expense is the one being
    /// edited, in which case the controller reverts to drafting.
    ///
    /// # Errors
    /// Returns the store's error if the delete fails, leaving the view state
    /// unchanged.
    pub fn remove(&mut self, id: i64) -> Result<(), Error> {
        self.store.delete(id)?;

        if self.view.mode == EditMode::Editing(id) {
            self.cancel_edit();
        }

        Ok(())
    }

    /// Update the active category filter. Draft and edit state are untouched.
    pub fn set_filter(&mut self, category: Option<String>) {
        self.view.filter = category.filter(|category| !category.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        controller::{Controller, DraftForm, EditMode},
        expense::{Expense, NewExpense},
        store::ExpenseStore,
    };

    /// An in-memory store that can be told to fail every call, for testing
    /// the controller's failure semantics.
    struct TestStore {
        expenses: Vec<Expense>,
        next_id: i64,
        fail: bool,
    }

    impl TestStore {
        fn new() -> Self {
            Self {
                expenses: Vec::new(),
                next_id: 1,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        fn check_fail(&self) -> Result<(), Error> {
            if self.fail {
                Err(Error::SnapshotIo("injected failure".to_owned()))
            } else {
                Ok(())
            }
        }
    }

    impl ExpenseStore for TestStore {
        fn list(&self) -> Result<Vec<Expense>, Error> {
            self.check_fail()?;
            Ok(self.expenses.clone())
        }

        fn create(&mut self, expense: NewExpense) -> Result<Expense, Error> {
            self.check_fail()?;
            let expense = Expense {
                id: self.next_id,
                date: expense.date,
                description: expense.description,
                category: expense.category,
                amount: expense.amount,
            };
            self.next_id += 1;
            self.expenses.push(expense.clone());
            Ok(expense)
        }

        fn update(&mut self, id: i64, expense: NewExpense) -> Result<Expense, Error> {
            self.check_fail()?;
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
            Ok(stored.clone())
        }

        fn delete(&mut self, id: i64) -> Result<(), Error> {
            self.check_fail()?;
            self.expenses.retain(|expense| expense.id != id);
            Ok(())
        }
    }

    fn valid_draft() -> DraftForm {
        DraftForm {
            date: "2024-03-01".to_owned(),
            description: "Coffee".to_owned(),
            category: "Food".to_owned(),
            amount: "4.50".to_owned(),
        }
    }

    #[test]
    fn submit_valid_draft_creates_one_expense_and_clears_draft() {
        let mut controller = Controller::new(TestStore::new());
        controller.set_draft(valid_draft());

        let saved = controller.submit().expect("submit should succeed");

        assert_eq!(saved.amount, 4.5);
        assert_eq!(saved.date, date!(2024 - 03 - 01));
        assert_eq!(controller.view().draft, DraftForm::default());
        assert_eq!(controller.view().mode, EditMode::Drafting);

        let (view, store) = (controller.view.clone(), controller.store);
        assert_eq!(store.expenses.len(), 1);
        assert_eq!(view.mode, EditMode::Drafting);
    }

    #[test]
    fn submit_rejects_zero_and_negative_amounts_before_any_store_call() {
        // A failing store proves validation happens first: a store call
        // would return SnapshotIo, not a validation error.
        let mut controller = Controller::new(TestStore::failing());

        let mut draft = valid_draft();
        draft.amount = "0".to_owned();
        controller.set_draft(draft.clone());
        assert_eq!(controller.submit(), Err(Error::NonPositiveAmount(0.0)));

        draft.amount = "-5".to_owned();
        controller.set_draft(draft.clone());
        assert_eq!(controller.submit(), Err(Error::NonPositiveAmount(-5.0)));

        // The draft is kept for the user to correct.
        assert_eq!(controller.view().draft, draft);
    }

    #[test]
    fn submit_rejects_missing_description_and_bad_dates() {
        let mut controller = Controller::new(TestStore::failing());

        let mut draft = valid_draft();
        draft.description = "  ".to_owned();
        controller.set_draft(draft);
        assert_eq!(controller.submit(), Err(Error::EmptyDescription));

        let mut draft = valid_draft();
        draft.date = "2024-13-41".to_owned();
        controller.set_draft(draft);
        assert_eq!(
            controller.submit(),
            Err(Error::InvalidDate("2024-13-41".to_owned()))
        );

        let mut draft = valid_draft();
        draft.amount = "four fifty".to_owned();
        controller.set_draft(draft);
        assert_eq!(
            controller.submit(),
            Err(Error::InvalidAmount("four fifty".to_owned()))
        );
    }

    #[test]
    fn submit_while_editing_updates_and_returns_to_drafting() {
        let mut controller = Controller::new(TestStore::new());
        controller.set_draft(valid_draft());
        let saved = controller.submit().unwrap();

        controller.start_edit(saved.id).unwrap();
        let mut draft = controller.view().draft.clone();
        draft.amount = "6.00".to_owned();
        controller.set_draft(draft);

        let updated = controller.submit().expect("update should succeed");

        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.amount, 6.0);
        assert_eq!(controller.view().mode, EditMode::Drafting);
        assert_eq!(controller.view().draft, DraftForm::default());
        assert_eq!(controller.store.expenses.len(), 1);
    }

    #[test]
    fn start_edit_populates_draft_from_the_record() {
        let mut controller = Controller::new(TestStore::new());
        controller.set_draft(valid_draft());
        let saved = controller.submit().unwrap();

        controller.start_edit(saved.id).unwrap();

        assert_eq!(controller.view().mode, EditMode::Editing(saved.id));
        assert_eq!(controller.view().draft.date, "2024-03-01");
        assert_eq!(controller.view().draft.description, "Coffee");
        assert_eq!(controller.view().draft.amount, "4.5");
    }

    #[test]
    fn start_edit_of_missing_id_is_not_found() {
        let mut controller = Controller::new(TestStore::new());

        assert_eq!(controller.start_edit(404), Err(Error::NotFound));
        assert_eq!(controller.view().mode, EditMode::Drafting);
    }

    #[test]
    fn cancel_discards_draft_without_touching_the_store() {
        let mut controller = Controller::new(TestStore::new());
        controller.set_draft(valid_draft());
        let saved = controller.submit().unwrap();
        let before = controller.store.expenses.clone();

        controller.start_edit(saved.id).unwrap();
        let mut draft = controller.view().draft.clone();
        draft.description = "Something else".to_owned();
        controller.set_draft(draft);
        controller.cancel_edit();

        assert_eq!(controller.view().mode, EditMode::Drafting);
        assert_eq!(controller.view().draft, DraftForm::default());
        assert_eq!(controller.store.expenses, before);
    }

    #[test]
    fn remove_reverts_to_drafting_only_for_the_edited_record() {
        let mut controller = Controller::new(TestStore::new());
        controller.set_draft(valid_draft());
        let first = controller.submit().unwrap();
        let mut draft = valid_draft();
        draft.description = "Lunch".to_owned();
        controller.set_draft(draft);
        let second = controller.submit().unwrap();

        // Removing an unrelated record keeps the edit in progress.
        controller.start_edit(first.id).unwrap();
        controller.remove(second.id).unwrap();
        assert_eq!(controller.view().mode, EditMode::Editing(first.id));

        // Removing the record being edited reverts to drafting.
        controller.remove(first.id).unwrap();
        assert_eq!(controller.view().mode, EditMode::Drafting);
        assert_eq!(controller.view().draft, DraftForm::default());
    }

    #[test]
    fn store_failure_leaves_view_state_unchanged() {
        let mut controller = Controller::new(TestStore::failing());
        let draft = valid_draft();
        controller.set_draft(draft.clone());

        let result = controller.submit();

        assert_eq!(result, Err(Error::SnapshotIo("injected failure".to_owned())));
        assert_eq!(controller.view().draft, draft);
        assert_eq!(controller.view().mode, EditMode::Drafting);
    }

    #[test]
    fn set_filter_does_not_touch_draft_or_mode() {
        let mut controller = Controller::new(TestStore::new());
        controller.set_draft(valid_draft());
        let saved = controller.submit().unwrap();
        controller.start_edit(saved.id).unwrap();
        let draft = controller.view().draft.clone();

        controller.set_filter(Some("Food".to_owned()));

        assert_eq!(controller.view().filter.as_deref(), Some("Food"));
        assert_eq!(controller.view().draft, draft);
        assert_eq!(controller.view().mode, EditMode::Editing(saved.id));

        // An empty filter means "all categories".
        controller.set_filter(Some(String::new()));
        assert_eq!(controller.view().filter, None);
    }

    #[test]
    fn amount_string_with_trailing_zeroes_parses_to_plain_float() {
        let draft = valid_draft();

        let expense = draft.validate().unwrap();

        assert_eq!(expense.amount, 4.5);
        assert_eq!(expense.category, "Food");
    }
}
