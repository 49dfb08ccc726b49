//! Shared HTML building blocks: the base page layout, the error page view and
//! currency formatting.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// The stylesheet inlined into every page.
const STYLESHEET: &str = r#"
    body {
        font-family: system-ui, sans-serif;
        max-width: 56rem;
        margin: 0 auto;
        padding: 1rem;
        color: #111827;
        background: #f9fafb;
    }

    h1 { font-size: 1.5rem; }

    form.expense-form {
        display: flex;
        flex-wrap: wrap;
        gap: 0.5rem;
        align-items: end;
        margin-bottom: 1rem;
    }

    form.expense-form label {
        display: flex;
        flex-direction: column;
        font-size: 0.875rem;
    }

    form.expense-form input {
        padding: 0.375rem;
        border: 1px solid #d1d5db;
        border-radius: 0.25rem;
    }

    .form-error { color: #dc2626; }

    table.expense-table {
        width: 100%;
        border-collapse: collapse;
        margin-bottom: 1rem;
    }

    table.expense-table th, table.expense-table td {
        text-align: left;
        padding: 0.5rem 0.75rem;
        border-bottom: 1px solid #e5e7eb;
    }

    table.expense-table td.amount, table.expense-table th.amount {
        text-align: right;
    }

    table.expense-table tfoot { font-weight: 600; }

    .chart-section { margin-bottom: 1rem; }

    .chart-container { min-height: 380px; }

    a.action-link, button.link-button {
        color: #2563eb;
        text-decoration: underline;
        background: none;
        border: none;
        padding: 0;
        cursor: pointer;
        font-size: inherit;
    }

    button.delete-button { color: #dc2626; }

    .error-page { text-align: center; padding: 4rem 1rem; }
    .error-page h1 { font-size: 4rem; color: #2563eb; margin-bottom: 1rem; }
"#;

/// An extra element to place in a page's head.
pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

/// Render `content` inside the shared page scaffold.
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Spendlog" }

                style { (PreEscaped(STYLESHEET)) }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }
            }

            body
            {
                (content)
            }
        }
    }
}

/// The full-page view shown for 404s and unrecoverable errors.
pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        section class="error-page"
        {
            h1 { (header) }

            p { (description) }

            p { (fix) }

            p
            {
                a href="/" class="action-link" { "Back to Homepage" }
            }
        }
    );

    base(title, &[], &content)
}

/// Format `number` as a dollar amount with two decimal places, e.g. "$12.30".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "$0.00".to_owned()
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

#[cfg(test)]
mod format_currency_tests {
    use crate::html::format_currency;

    #[test]
    fn formats_two_decimal_places() {
        assert_eq!(format_currency(4.5), "$4.50");
        assert_eq!(format_currency(12.3), "$12.30");
        assert_eq!(format_currency(12.34), "$12.34");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn formats_thousands_separator() {
        assert_eq!(format_currency(1234.5), "$1,234.50");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(format_currency(-4.5), "-$4.50");
    }
}

#[cfg(test)]
mod base_tests {
    use maud::html;

    use crate::html::{HeadElement, base};

    #[test]
    fn base_includes_title_and_content() {
        let markup = base("Expenses", &[], &html!(p { "hello" })).into_string();

        assert!(markup.contains("<title>Expenses - Spendlog</title>"));
        assert!(markup.contains("<p>hello</p>"));
    }

    #[test]
    fn base_includes_script_links() {
        let markup = base(
            "Expenses",
            &[HeadElement::ScriptLink("https://example.com/echarts.js".to_owned())],
            &html!(p {}),
        )
        .into_string();

        assert!(markup.contains("src=\"https://example.com/echarts.js\""));
    }
}
