//! Plain-text and JSON renderings of a [`Summary`], shared by the headless
//! mode and the UI's number formatting.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::aggregate::{Summary, ViewEntry};
use crate::data::filter::FilterSelection;
use crate::data::month::MonthOrder;

/// `$1,234,567.89`; negatives as `-$12.00`.
pub fn format_currency(value: f64) -> String {
    let cents = format!("{:.2}", value.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{frac}")
}

/// Two decimals with a `%` sign, or `N/A` when undefined.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => "N/A".to_string(),
    }
}

/// Label shown for an optional constraint.
pub fn constraint_label(constraint: &Option<String>) -> &str {
    constraint.as_deref().unwrap_or("All")
}

// ---------------------------------------------------------------------------
// Text report
// ---------------------------------------------------------------------------

/// Render the summary as aligned text sections.
pub fn render_text(summary: &Summary, selection: &FilterSelection) -> String {
    let mut out = String::new();
    let k = &summary.kpis;

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Wage Summary");
    let _ = writeln!(
        out,
        "Filters: company={} department={} month={}",
        constraint_label(&selection.company),
        constraint_label(&selection.department),
        constraint_label(&selection.date),
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Total Wage Bill:   {}", format_currency(k.total_wage));
    let _ = writeln!(out, "Total Companies:   {}", k.companies);
    let _ = writeln!(out, "Total Departments: {}", k.departments);
    let _ = writeln!(out, "Rows:              {}", k.rows);

    section(&mut out, "Wage by Company", &summary.by_company, |v| format_currency(*v));
    section(&mut out, "Wage by Department", &summary.by_department, |v| {
        format_currency(*v)
    });
    section(&mut out, "Monthly Wage", &summary.monthly, |v| format_currency(*v));
    section(
        &mut out,
        "Month-over-Month Wage Change (%)",
        &summary.monthly_change,
        |v| format_percent(*v),
    );
    section(&mut out, "Department Wage %", &summary.department_share, |v| {
        format_percent(*v)
    });
    section(&mut out, "Quarterly Wage", &summary.quarterly, |v| format_currency(*v));
    out
}

fn section<T>(
    out: &mut String,
    title: &str,
    entries: &[ViewEntry<T>],
    fmt: impl Fn(&T) -> String,
) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}");
    if entries.is_empty() {
        let _ = writeln!(out, "  (no data)");
        return;
    }
    let width = entries
        .iter()
        .map(|e| e.label.chars().count())
        .max()
        .unwrap_or(0);
    for e in entries {
        let _ = writeln!(out, "  {:<width$}  {:>16}", e.label, fmt(&e.value));
    }
}

// ---------------------------------------------------------------------------
// JSON export
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Export<'a> {
    selection: &'a FilterSelection,
    month_order: MonthOrder,
    summary: &'a Summary,
}

/// Pretty JSON with the selection that produced the summary.
pub fn to_json(
    summary: &Summary,
    selection: &FilterSelection,
    month_order: MonthOrder,
) -> Result<String> {
    let export = Export {
        selection,
        month_order,
        summary,
    };
    serde_json::to_string_pretty(&export).context("serializing summary")
}

/// Write [`to_json`] output to `path`.
pub fn export_json(
    path: &Path,
    summary: &Summary,
    selection: &FilterSelection,
    month_order: MonthOrder,
) -> Result<()> {
    let json = to_json(summary, selection, month_order)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported summary to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::summarize;
    use crate::data::model::{Dataset, Row};

    fn example_summary() -> Summary {
        let ds = Dataset::from_rows(vec![
            Row::new("A", "X", "Jan-2024", Some(100.0)),
            Row::new("A", "Y", "Feb-2024", Some(50.0)),
            Row::new("B", "X", "Jan-2024", Some(200.0)),
        ]);
        summarize(&ds, &FilterSelection::default(), MonthOrder::Chronological)
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(350.0), "$350.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-987654.0), "-$987,654.00");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn percent_renders_undefined_as_na() {
        assert_eq!(format_percent(Some(-83.33333)), "-83.33%");
        assert_eq!(format_percent(None), "N/A");
    }

    #[test]
    fn text_report_lists_every_view() {
        let text = render_text(&example_summary(), &FilterSelection::default());
        assert!(text.contains("company=All department=All month=All"));
        assert!(text.contains("Total Wage Bill:   $350.00"));
        assert!(text.contains("Wage by Company"));
        assert!(text.contains("N/A"));
        assert!(text.contains("-83.33%"));
        assert!(text.contains("85.71%"));
        assert!(text.contains("Q1-2024"));
    }

    #[test]
    fn empty_views_say_so() {
        let text = render_text(&Summary::default(), &FilterSelection::default());
        assert!(text.contains("(no data)"));
        assert!(text.contains("Total Wage Bill:   $0.00"));
    }

    #[test]
    fn json_keeps_undefined_as_null() {
        let json = to_json(
            &example_summary(),
            &FilterSelection::default(),
            MonthOrder::Chronological,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["kpis"]["total_wage"], 350.0);
        assert!(value["summary"]["monthly_change"][0]["value"].is_null());
        assert_eq!(value["month_order"], "Chronological");
        assert!(value["selection"]["company"].is_null());
    }

    #[test]
    fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        export_json(
            &path,
            &example_summary(),
            &FilterSelection::default(),
            MonthOrder::Label,
        )
        .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("by_department"));
    }
}
