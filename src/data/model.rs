use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COMPANY: &str = "COMPANY";
pub const DEPARTMENT: &str = "DEPARTMENT";
pub const DATE: &str = "DATE";
pub const WAGE: &str = "WAGE";

/// Columns every dataset must provide, in display order.
pub const REQUIRED_COLUMNS: [&str; 4] = [COMPANY, DEPARTMENT, DATE, WAGE];

/// Trim and upper-case a raw header.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim().to_uppercase()
}

// ---------------------------------------------------------------------------
// Row – one payroll record
// ---------------------------------------------------------------------------

/// A single payroll record.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub company: String,
    pub department: String,
    /// Month label, kept verbatim (e.g. `Jan-2024`).
    pub date: String,
    /// `None` when the source value did not parse as a number.
    pub wage: Option<f64>,
    /// Values of the non-required columns, aligned with [`Dataset::extra_columns`].
    pub extra: Vec<String>,
}

impl Row {
    pub fn new(company: &str, department: &str, date: &str, wage: Option<f64>) -> Self {
        Row {
            company: company.to_string(),
            department: department.to_string(),
            date: date.to_string(),
            wage,
            extra: Vec::new(),
        }
    }

    /// Contribution of this row to any sum: missing wages count as zero.
    pub fn wage_or_zero(&self) -> f64 {
        self.wage.unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the normalized in-memory table
// ---------------------------------------------------------------------------

/// The loaded table. Immutable once built; filtering produces a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub rows: Vec<Row>,
    /// Normalized names of the columns beyond the four required ones.
    pub extra_columns: Vec<String>,
}

impl Dataset {
    pub fn new(rows: Vec<Row>, extra_columns: Vec<String>) -> Self {
        Dataset {
            rows,
            extra_columns,
        }
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self::new(rows, Vec::new())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every normalized column name, required ones first.
    pub fn column_names(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.extra_columns.iter().cloned())
            .collect()
    }

    pub fn companies(&self) -> Vec<String> {
        distinct_in_order(self.rows.iter().map(|r| r.company.as_str()))
    }

    pub fn departments(&self) -> Vec<String> {
        distinct_in_order(self.rows.iter().map(|r| r.department.as_str()))
    }

    pub fn dates(&self) -> Vec<String> {
        distinct_in_order(self.rows.iter().map(|r| r.date.as_str()))
    }

    /// Number of WAGE cells that were coerced to missing.
    pub fn missing_wages(&self) -> usize {
        self.rows.iter().filter(|r| r.wage.is_none()).count()
    }
}

/// Distinct values in order of first appearance, which is how the selectors
/// list them.
fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_whitespace_and_case() {
        assert_eq!(normalize_column_name("  wage "), "WAGE");
        assert_eq!(normalize_column_name("Department\t"), "DEPARTMENT");
    }

    #[test]
    fn distinct_values_keep_first_appearance_order() {
        let ds = Dataset::from_rows(vec![
            Row::new("B", "X", "Feb-2024", Some(1.0)),
            Row::new("A", "Y", "Jan-2024", None),
            Row::new("B", "X", "Jan-2024", Some(2.0)),
        ]);
        assert_eq!(ds.companies(), vec!["B", "A"]);
        assert_eq!(ds.departments(), vec!["X", "Y"]);
        assert_eq!(ds.dates(), vec!["Feb-2024", "Jan-2024"]);
        assert_eq!(ds.missing_wages(), 1);
    }

    #[test]
    fn column_names_put_required_first() {
        let ds = Dataset::new(Vec::new(), vec!["EMPLOYEE".into()]);
        assert_eq!(
            ds.column_names(),
            vec!["COMPANY", "DEPARTMENT", "DATE", "WAGE", "EMPLOYEE"]
        );
    }
}
