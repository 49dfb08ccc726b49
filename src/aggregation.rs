//! Pure functions deriving the displayed rows, totals and chart buckets from
//! the expense list and the active category filter.
//!
//! Nothing in this module touches the store: the same input always produces
//! the same output, and the derived data is recomputed for every render
//! rather than persisted.

use time::Date;

use crate::expense::Expense;

/// The category label used for expenses with an empty category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// The derived view of the store for one render: the rows to display, the
/// running total and the per-day chart buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// The expenses matching the active filter, input order preserved.
    pub filtered: Vec<Expense>,
    /// The full-precision sum of `amount` over `filtered`.
    ///
    /// Rounding to two decimal places happens at display time only.
    pub total: f64,
    /// Per-day buckets in first-appearance order of the day.
    pub days: Vec<DaySummary>,
}

/// The per-category sums for one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    /// The calendar day this bucket covers.
    pub date: Date,
    /// Summed amounts per category, in first-appearance order within the day.
    ///
    /// Expenses with an empty category are summed under
    /// [UNCATEGORIZED_LABEL].
    pub by_category: Vec<(String, f64)>,
}

impl DaySummary {
    /// The summed amount for `category` on this day, if any expense with that
    /// category was recorded.
    pub fn amount_for(&self, category: &str) -> Option<f64> {
        self.by_category
            .iter()
            .find(|(label, _)| label == category)
            .map(|(_, amount)| *amount)
    }
}

/// Derive the filtered rows, total and chart buckets for one render.
///
/// A non-empty `filter` keeps only the expenses whose category label equals
/// it, so filtering by [UNCATEGORIZED_LABEL] selects the expenses with an
/// empty category. An empty or absent filter keeps all expenses, order
/// unchanged. The buckets are built in a single pass over the filtered list,
/// keyed first by day and then by category, both in first-appearance order.
pub fn aggregate(expenses: &[Expense], filter: Option<&str>) -> Summary {
    let filtered: Vec<Expense> = match filter {
        Some(category) if !category.is_empty() => expenses
            .iter()
            .filter(|expense| category_label(expense) == category)
            .cloned()
            .collect(),
        _ => expenses.to_vec(),
    };

    let total = filtered.iter().map(|expense| expense.amount).sum();

    let mut days: Vec<DaySummary> = Vec::new();
    for expense in &filtered {
        let day_index = match days.iter().position(|day| day.date == expense.date) {
            Some(index) => index,
            None => {
                days.push(DaySummary {
                    date: expense.date,
                    by_category: Vec::new(),
                });
                days.len() - 1
            }
        };
        let day = &mut days[day_index];

        let label = category_label(expense);
        match day
            .by_category
            .iter_mut()
            .find(|(category, _)| category == label)
        {
            Some((_, amount)) => *amount += expense.amount,
            None => day.by_category.push((label.to_owned(), expense.amount)),
        }
    }

    Summary {
        filtered,
        total,
        days,
    }
}

/// The categories observed in `expenses`, ordered by first appearance.
///
/// The chart renders one series per entry, so the series order matches the
/// order categories show up in the record list rather than alphabetical
/// order.
pub fn category_order(expenses: &[Expense]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();

    for expense in expenses {
        let label = category_label(expense);
        if !categories.iter().any(|category| category == label) {
            categories.push(label.to_owned());
        }
    }

    categories
}

fn category_label(expense: &Expense) -> &str {
    if expense.category.is_empty() {
        UNCATEGORIZED_LABEL
    } else {
        &expense.category
    }
}
