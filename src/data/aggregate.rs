use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::filter::FilterSelection;
use super::model::{Dataset, Row};
use super::month::{parse_month, MonthOrder};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One `(label, measure)` pair of an aggregate view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewEntry<T> {
    pub label: String,
    pub value: T,
}

impl<T> ViewEntry<T> {
    fn new(label: impl Into<String>, value: T) -> Self {
        ViewEntry {
            label: label.into(),
            value,
        }
    }
}

/// Wage sums per key.
pub type SumView = Vec<ViewEntry<f64>>;

/// Derived percentages; `None` where the ratio is undefined.
pub type RatioView = Vec<ViewEntry<Option<f64>>>;

/// Headline scalars.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    /// Sum of WAGE; missing values contribute zero.
    pub total_wage: f64,
    pub companies: usize,
    pub departments: usize,
    /// Rows left after filtering.
    pub rows: usize,
}

/// Everything the dashboard shows for one filter selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub kpis: Kpis,
    /// Ascending by company.
    pub by_company: SumView,
    /// Ascending by department.
    pub by_department: SumView,
    /// In the requested [`MonthOrder`].
    pub monthly: SumView,
    /// Aligned with `monthly`; the first entry is always `None`.
    pub monthly_change: RatioView,
    /// Aligned with `by_department`.
    pub department_share: RatioView,
    /// Chronological; only rows whose DATE parses as a month.
    pub quarterly: SumView,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Filter `dataset` with `selection` and compute every view.
pub fn summarize(dataset: &Dataset, selection: &FilterSelection, order: MonthOrder) -> Summary {
    aggregate(&selection.filtered_rows(dataset), order)
}

/// Compute every view over already-filtered rows.
pub fn aggregate(rows: &[&Row], order: MonthOrder) -> Summary {
    let by_company = sum_by(rows, |r| r.company.as_str());
    let by_department = sum_by(rows, |r| r.department.as_str());
    let monthly = monthly_totals(rows, order);

    let kpis = Kpis {
        total_wage: rows.iter().map(|r| r.wage_or_zero()).sum(),
        companies: by_company.len(),
        departments: by_department.len(),
        rows: rows.len(),
    };

    Summary {
        kpis,
        monthly_change: percent_change(&monthly),
        department_share: share_of_total(&by_department),
        quarterly: quarterly_totals(&monthly),
        by_company,
        by_department,
        monthly,
    }
}

/// Group by `key`, summing WAGE; ascending by key.
fn sum_by<'a>(rows: &[&'a Row], key: impl Fn(&'a Row) -> &'a str) -> SumView {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for &row in rows {
        *sums.entry(key(row)).or_default() += row.wage_or_zero();
    }
    sums.into_iter()
        .map(|(label, value)| ViewEntry::new(label, value))
        .collect()
}

fn monthly_totals(rows: &[&Row], order: MonthOrder) -> SumView {
    let mut sums: HashMap<&str, f64> = HashMap::new();
    for row in rows {
        *sums.entry(row.date.as_str()).or_default() += row.wage_or_zero();
    }
    let mut view: SumView = sums
        .into_iter()
        .map(|(label, value)| ViewEntry::new(label, value))
        .collect();
    view.sort_by(|a, b| order.compare(&a.label, &b.label));
    view
}

/// Period-over-period change in percent. The first entry has no predecessor
/// and a zero predecessor has no defined ratio; both yield `None`.
pub fn percent_change(series: &[ViewEntry<f64>]) -> RatioView {
    let mut previous: Option<f64> = None;
    series
        .iter()
        .map(|entry| {
            let change = previous
                .filter(|p| *p != 0.0)
                .map(|p| (entry.value - p) / p * 100.0);
            previous = Some(entry.value);
            ViewEntry::new(entry.label.clone(), change)
        })
        .collect()
}

/// Each entry as a percentage of the view's total. A zero total makes every
/// share `None`.
pub fn share_of_total(view: &[ViewEntry<f64>]) -> RatioView {
    let total: f64 = view.iter().map(|e| e.value).sum();
    view.iter()
        .map(|e| {
            let share = (total != 0.0).then(|| e.value / total * 100.0);
            ViewEntry::new(e.label.clone(), share)
        })
        .collect()
}

/// Roll monthly sums up into calendar quarters.
fn quarterly_totals(monthly: &[ViewEntry<f64>]) -> SumView {
    let mut quarters: BTreeMap<(i32, u32), (String, f64)> = BTreeMap::new();
    for entry in monthly {
        let Some(month) = parse_month(&entry.label) else {
            continue;
        };
        let slot = quarters
            .entry(month.quarter_key())
            .or_insert_with(|| (month.quarter_label(), 0.0));
        slot.1 += entry.value;
    }
    quarters
        .into_values()
        .map(|(label, value)| ViewEntry::new(label, value))
        .collect()
}
