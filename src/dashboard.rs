//! The expense dashboard: HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for displaying the dashboard and submitting the expense
//!   form
//! - HTML view functions for the form, table, category filter and chart
//! - State and form types used by the handlers
//!
//! The dashboard is a single page. Transient view state (the form draft, the
//! edit target and the category filter) travels in query and form parameters
//! rather than server-side sessions, so every request rebuilds a
//! [Controller] from the incoming parameters, applies one action and
//! re-renders.

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    aggregation::{Summary, aggregate, category_order},
    chart::{ExpenseChart, chart_script, chart_view},
    controller::{Controller, DraftForm, EditMode, ViewState},
    endpoints,
    expense::Expense,
    html::{HeadElement, base, format_currency},
    store::SharedStore,
    timezone::get_local_offset,
};

/// The URL of the ECharts library loaded into the dashboard page.
const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.4.3/dist/echarts.min.js";

/// The state needed for displaying the dashboard page.
#[derive(Clone)]
pub struct DashboardState {
    /// The expense store shared between request handlers.
    pub store: SharedStore,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters carrying the dashboard's transient view state.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The active category filter. Empty or absent shows all expenses.
    pub category: Option<String>,
    /// The ID of the expense to load into the form for editing.
    pub edit: Option<i64>,
}

/// The expense form fields as submitted, all text.
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    /// The ID of the expense being edited, or empty when creating.
    #[serde(default)]
    pub id: String,
    /// The date field, expected as `YYYY-MM-DD`.
    pub date: String,
    /// The description field.
    pub description: String,
    /// The category field. May be left empty.
    #[serde(default)]
    pub category: String,
    /// The amount field, expected as a positive decimal number.
    pub amount: String,
    /// The active category filter, carried through the submit.
    #[serde(default)]
    pub filter: String,
}

/// The form fields accompanying a delete button press.
#[derive(Debug, Deserialize)]
pub struct DeleteExpenseForm {
    /// The active category filter, carried through the delete.
    #[serde(default)]
    pub filter: String,
}

/// Display the expense dashboard: form, table, filter and chart.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let mut store = state
        .store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire store lock: {error}"))
        .map_err(|_| Error::StoreLockError)?;

    let mut controller = Controller::new(&mut **store);
    controller.set_filter(query.category);

    if let Some(id) = query.edit {
        controller.start_edit(id)?;
    }

    let view = controller.into_view();
    let expenses = store.list()?;

    let today = local_today(&state.local_timezone);
    Ok(dashboard_view(&view, &expenses, None, today).into_response())
}

/// Handle an expense form submit, creating or updating an expense.
///
/// On success the client is redirected back to the dashboard so a page
/// refresh cannot resubmit the form. A validation failure re-renders the
/// page with the submitted draft and an inline error message.
pub async fn submit_expense_form(
    State(state): State<DashboardState>,
    Form(form): Form<ExpenseForm>,
) -> Result<Response, Error> {
    let mut store = state
        .store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire store lock: {error}"))
        .map_err(|_| Error::StoreLockError)?;

    let view = view_state_from_form(&form);
    let mut controller = Controller::with_view(&mut **store, view);

    match controller.submit() {
        Ok(_) => Ok(redirect_to_dashboard(&form.filter).into_response()),
        Err(error) if error.is_validation() => {
            let view = controller.into_view();
            let expenses = store.list()?;
            let today = local_today(&state.local_timezone);

            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                dashboard_view(&view, &expenses, Some(&error.to_string()), today),
            )
                .into_response())
        }
        Err(error) => Err(error),
    }
}

/// Handle a delete button press for the expense with ID `expense_id`.
pub async fn delete_expense_form(
    State(state): State<DashboardState>,
    Path(expense_id): Path<i64>,
    Form(form): Form<DeleteExpenseForm>,
) -> Result<Response, Error> {
    let mut store = state
        .store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire store lock: {error}"))
        .map_err(|_| Error::StoreLockError)?;

    let mut controller = Controller::new(&mut **store);
    controller.remove(expense_id)?;

    Ok(redirect_to_dashboard(&form.filter).into_response())
}

/// Rebuild the controller's view state from the submitted form fields.
fn view_state_from_form(form: &ExpenseForm) -> ViewState {
    let mode = match form.id.trim().parse() {
        Ok(id) => EditMode::Editing(id),
        Err(_) => EditMode::Drafting,
    };

    ViewState {
        draft: DraftForm {
            date: form.date.clone(),
            description: form.description.clone(),
            category: form.category.clone(),
            amount: form.amount.clone(),
        },
        mode,
        filter: Some(form.filter.clone()).filter(|filter| !filter.is_empty()),
    }
}

fn redirect_to_dashboard(filter: &str) -> Redirect {
    if filter.is_empty() {
        Redirect::to(endpoints::ROOT)
    } else {
        let query = serde_urlencoded::to_string([("category", filter)]).unwrap_or_default();
        Redirect::to(&format!("{}?{}", endpoints::ROOT, query))
    }
}

/// Today's date in the configured timezone, falling back to UTC when the
/// timezone name is unknown.
fn local_today(local_timezone: &str) -> Date {
    let now = OffsetDateTime::now_utc();

    match get_local_offset(local_timezone) {
        Some(offset) => now.to_offset(offset).date(),
        None => {
            tracing::warn!("unknown timezone {local_timezone}, defaulting to UTC");
            now.date()
        }
    }
}

/// Render the full dashboard page.
fn dashboard_view(
    view: &ViewState,
    expenses: &[Expense],
    form_error: Option<&str>,
    today: Date,
) -> Markup {
    let categories = category_order(expenses);
    let summary = aggregate(expenses, view.filter.as_deref());
    let chart = ExpenseChart::new(&summary.filtered, &summary.days);

    let content = html!(
        h1 { "Expenses" }

        (expense_form_view(view, form_error, today))
        (filter_view(&categories, view.filter.as_deref()))
        (expense_table_view(&summary, view))
        (chart_view(&chart))

        p
        {
            a href=(export_url(view.filter.as_deref())) class="action-link" { "Export CSV" }
        }
    );

    base(
        "Expenses",
        &[
            HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
            chart_script(&chart),
        ],
        &content,
    )
}

/// Render the add/edit expense form with the current draft values.
fn expense_form_view(view: &ViewState, form_error: Option<&str>, today: Date) -> Markup {
    let date_value = if view.draft.date.is_empty() {
        today.to_string()
    } else {
        view.draft.date.clone()
    };

    let (submit_label, editing_id) = match view.mode {
        EditMode::Drafting => ("Add Expense", None),
        EditMode::Editing(id) => ("Save Changes", Some(id)),
    };

    html!(
        form class="expense-form" method="post" action=(endpoints::EXPENSE_FORM)
        {
            @if let Some(id) = editing_id
            {
                input type="hidden" name="id" value=(id);
            }
            input type="hidden" name="filter" value=(view.filter.as_deref().unwrap_or(""));

            label
            {
                "Date"
                input type="date" name="date" value=(date_value) required;
            }

            label
            {
                "Description"
                input
                    type="text"
                    name="description"
                    value=(view.draft.description)
                    placeholder="What did you buy?"
                    required;
            }

            label
            {
                "Category"
                input
                    type="text"
                    name="category"
                    value=(view.draft.category)
                    placeholder="e.g. Food";
            }

            label
            {
                "Amount"
                input
                    type="number"
                    name="amount"
                    value=(view.draft.amount)
                    step="0.01"
                    min="0.01"
                    required;
            }

            button type="submit" { (submit_label) }

            @if editing_id.is_some()
            {
                a href=(cancel_edit_url(view.filter.as_deref())) class="action-link" { "Cancel" }
            }

            @if let Some(message) = form_error
            {
                p class="form-error" { (message) }
            }
        }
    )
}

/// Render the category filter as a form of links, one per observed category.
fn filter_view(categories: &[String], filter: Option<&str>) -> Markup {
    html!(
        form id="category-filter" method="get" action=(endpoints::ROOT)
        {
            label
            {
                "Filter by category "
                select name="category" onchange="this.form.submit()"
                {
                    option value="" selected[filter.is_none()] { "All categories" }

                    @for category in categories
                    {
                        option
                            value=(category)
                            selected[filter == Some(category.as_str())]
                        {
                            (category)
                        }
                    }
                }
            }
        }
    )
}

/// Render the expense table with a totals row in the footer.
fn expense_table_view(summary: &Summary, view: &ViewState) -> Markup {
    html!(
        table class="expense-table"
        {
            thead
            {
                tr
                {
                    th { "Date" }
                    th { "Description" }
                    th { "Category" }
                    th class="amount" { "Amount" }
                    th { "Actions" }
                }
            }

            tbody
            {
                @if summary.filtered.is_empty()
                {
                    tr
                    {
                        td colspan="5" { "No expenses recorded." }
                    }
                }

                @for expense in &summary.filtered
                {
                    tr
                    {
                        td { (expense.date) }
                        td { (expense.description) }
                        td { (expense.category) }
                        td class="amount" { (format_currency(expense.amount)) }
                        td
                        {
                            a
                                href=(edit_url(expense.id, view.filter.as_deref()))
                                class="action-link"
                            {
                                "Edit"
                            }
                            " "
                            form
                                method="post"
                                action=(endpoints::format_endpoint(
                                    endpoints::DELETE_EXPENSE,
                                    expense.id
                                ))
                                style="display:inline"
                            {
                                input
                                    type="hidden"
                                    name="filter"
                                    value=(view.filter.as_deref().unwrap_or(""));
                                button type="submit" class="link-button delete-button"
                                {
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }

            tfoot
            {
                tr
                {
                    td colspan="3" { "Total" }
                    td class="amount" id="expense-total" { (format_currency(summary.total)) }
                    td {}
                }
            }
        }
    )
}

fn edit_url(id: i64, filter: Option<&str>) -> String {
    let mut params = vec![("edit", id.to_string())];
    if let Some(filter) = filter {
        params.push(("category", filter.to_owned()));
    }

    let query = serde_urlencoded::to_string(params).unwrap_or_default();
    format!("{}?{}", endpoints::ROOT, query)
}

fn export_url(filter: Option<&str>) -> String {
    match filter {
        Some(filter) => {
            let query =
                serde_urlencoded::to_string([("category", filter)]).unwrap_or_default();
            format!("{}?{}", endpoints::EXPORT_CSV, query)
        }
        None => endpoints::EXPORT_CSV.to_owned(),
    }
}

fn cancel_edit_url(filter: Option<&str>) -> String {
    match filter {
        Some(filter) => {
            let query =
                serde_urlencoded::to_string([("category", filter)]).unwrap_or_default();
            format!("{}?{}", endpoints::ROOT, query)
        }
        None => endpoints::ROOT.to_owned(),
    }
}
