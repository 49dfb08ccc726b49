//! CSV export of the expense list.
//!
//! The export is a plain-text CSV artifact: a fixed header row, then one row
//! per expense with the date in `YYYY-MM-DD`, the description and category
//! double-quoted with internal quotes doubled, and the amount with exactly
//! two decimal places.

use axum::{
    extract::{FromRef, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{AppState, Error, aggregation::aggregate, expense::Expense, store::SharedStore};

/// The header row of an expense CSV export.
pub const CSV_HEADER: &str = "Date,Description,Category,Amount";

/// The state needed to serve the CSV export.
#[derive(Clone)]
pub struct ExportState {
    /// The expense store shared between request handlers.
    pub store: SharedStore,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// Serialize `expenses` to CSV text, newest rows in the order given.
pub fn to_csv(expenses: &[Expense]) -> String {
    let mut lines = Vec::with_capacity(expenses.len() + 1);
    lines.push(CSV_HEADER.to_owned());

    for expense in expenses {
        lines.push(format!(
            "{},{},{},{:.2}",
            expense.date,
            quote(&expense.description),
            quote(&expense.category),
            expense.amount
        ));
    }

    lines.join("\n")
}

/// Wrap `field` in double quotes, doubling any quotes it contains.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// The query parameters for the CSV export.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// The active category filter, carried over from the table view.
    pub category: Option<String>,
}

/// A route handler that serves the expense table as a downloadable CSV file,
/// restricted to the active category filter when one is set.
pub async fn get_expenses_csv(
    State(state): State<ExportState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, Error> {
    let store = state.store.lock().map_err(|_| Error::StoreLockError)?;
    let expenses = store.list()?;
    let expenses = aggregate(&expenses, query.category.as_deref()).filtered;

    let response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"expenses.csv\"",
            ),
        ],
        to_csv(&expenses),
    )
        .into_response();

    Ok(response)
}

#[cfg(test)]
mod export_tests {
    use time::macros::date;

    use crate::{
        expense::Expense,
        export::{CSV_HEADER, to_csv},
    };

    fn create_test_expense(description: &str, category: &str, amount: f64) -> Expense {
        Expense {
            id: 1,
            date: date!(2024 - 03 - 01),
            description: description.to_owned(),
            category: category.to_owned(),
            amount,
        }
    }

    #[test]
    fn csv_starts_with_the_header_row() {
        let csv = to_csv(&[]);

        assert_eq!(csv, CSV_HEADER);
    }

    #[test]
    fn csv_quotes_text_fields_and_pads_amounts() {
        let expenses = vec![create_test_expense("Coffee", "Food", 4.5)];

        let csv = to_csv(&expenses);

        assert_eq!(
            csv,
            format!("{CSV_HEADER}\n2024-03-01,\"Coffee\",\"Food\",4.50")
        );
    }

    #[test]
    fn csv_doubles_internal_quotes() {
        let expenses = vec![create_test_expense("Say \"cheese\"", "", 10.0)];

        let csv = to_csv(&expenses);

        assert!(csv.contains("\"Say \"\"cheese\"\"\""));
    }

    #[test]
    fn csv_round_trips_through_a_csv_reader() {
        let expenses = vec![
            create_test_expense("Coffee, large", "Food", 4.5),
            create_test_expense("Say \"cheese\"", "", 12.0),
        ];

        let csv = to_csv(&expenses);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv.as_bytes());

        let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.unwrap()).collect();
        assert_eq!(rows.len(), expenses.len());

        for (row, expense) in rows.iter().zip(&expenses) {
            assert_eq!(&row[0], expense.date.to_string().as_str());
            assert_eq!(&row[1], expense.description.as_str());
            assert_eq!(&row[2], expense.category.as_str());
            assert_eq!(row[3].parse::<f64>().unwrap(), expense.amount);
        }
    }
}
