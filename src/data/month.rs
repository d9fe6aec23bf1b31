//! Month label parsing for the chronological order and the quarterly view.
//!
//! DATE values are opaque labels by default; this module only tries to read
//! a (year, month) out of them when asked.

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// How the monthly view is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MonthOrder {
    /// Ascending by label text.
    #[default]
    Label,
    /// Ascending by parsed (year, month); unparseable labels go last.
    Chronological,
}

impl MonthOrder {
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            MonthOrder::Label => a.cmp(b),
            MonthOrder::Chronological => match (parse_month(a), parse_month(b)) {
                (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.cmp(b),
            },
        }
    }
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Quarter label, e.g. `Q1-2024`.
    pub fn quarter_label(self) -> String {
        format!("Q{}-{}", (self.month - 1) / 3 + 1, self.year)
    }

    /// Sort key of the quarter this month falls in.
    pub fn quarter_key(self) -> (i32, u32) {
        (self.year, (self.month - 1) / 3 + 1)
    }
}

/// Try to read a month out of a DATE label.
///
/// Accepted shapes: `Jan-2024`, `January-2024`, `Jan 2024`, `2024-01`,
/// `2024-01-15`, `01/2024`, `1/15/2024`.
pub fn parse_month(label: &str) -> Option<YearMonth> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }

    const FULL_DATES: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%b-%Y"];
    for fmt in FULL_DATES {
        if let Ok(d) = NaiveDate::parse_from_str(label, fmt) {
            return Some(YearMonth {
                year: d.year(),
                month: d.month(),
            });
        }
    }

    // Month-only labels: pin them to the first day so chrono accepts them.
    const MONTH_ONLY: [&str; 6] = ["%b-%Y", "%B-%Y", "%b %Y", "%B %Y", "%Y-%m", "%m/%Y"];
    let pinned = format!("01 {label}");
    for fmt in MONTH_ONLY {
        if let Ok(d) = NaiveDate::parse_from_str(&pinned, &format!("%d {fmt}")) {
            return Some(YearMonth {
                year: d.year(),
                month: d.month(),
            });
        }
    }
    None
}
