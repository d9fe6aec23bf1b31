use serde::Serialize;

use super::model::{Dataset, Row};

// ---------------------------------------------------------------------------
// Filter selection: one optional equality constraint per categorical column
// ---------------------------------------------------------------------------

/// The user's current constraints. `None` means "All".
///
/// Matching is exact: case-sensitive, no trimming at filter time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub company: Option<String>,
    pub department: Option<String>,
    pub date: Option<String>,
}

impl FilterSelection {
    /// Whether every constraint is "All".
    pub fn is_unconstrained(&self) -> bool {
        self.company.is_none() && self.department.is_none() && self.date.is_none()
    }

    /// Company, then department, then date; the first mismatch rejects the row.
    pub fn matches(&self, row: &Row) -> bool {
        fn passes(constraint: &Option<String>, value: &str) -> bool {
            constraint.as_deref().map_or(true, |c| c == value)
        }
        passes(&self.company, &row.company)
            && passes(&self.department, &row.department)
            && passes(&self.date, &row.date)
    }

    /// Rows passing all active constraints, in dataset order.
    pub fn filtered_rows<'a>(&self, dataset: &'a Dataset) -> Vec<&'a Row> {
        dataset.rows.iter().filter(|r| self.matches(r)).collect()
    }

    /// Indices of rows passing all active constraints.
    pub fn filtered_indices(&self, dataset: &Dataset) -> Vec<usize> {
        dataset
            .rows
            .iter()
            .enumerate()
            .filter(|(_, r)| self.matches(r))
            .map(|(i, _)| i)
            .collect()
    }

    /// The filtered dataset as a new table.
    pub fn apply(&self, dataset: &Dataset) -> Dataset {
        Dataset::new(
            self.filtered_rows(dataset).into_iter().cloned().collect(),
            dataset.extra_columns.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_rows(vec![
            Row::new("A", "X", "Jan-2024", Some(100.0)),
            Row::new("A", "Y", "Feb-2024", Some(50.0)),
            Row::new("B", "X", "Jan-2024", Some(200.0)),
            Row::new("a", "X", "Jan-2024", Some(1.0)),
        ])
    }

    #[test]
    fn no_constraints_keeps_everything() {
        let ds = sample();
        let sel = FilterSelection::default();
        assert!(sel.is_unconstrained());
        assert_eq!(sel.apply(&ds), ds);
    }

    #[test]
    fn constraints_combine() {
        let ds = sample();
        let sel = FilterSelection {
            company: Some("A".into()),
            department: Some("X".into()),
            date: None,
        };
        assert_eq!(sel.filtered_indices(&ds), vec![0]);
    }

    #[test]
    fn matching_is_case_sensitive_and_untrimmed() {
        let ds = sample();
        let sel = FilterSelection {
            company: Some("a".into()),
            ..Default::default()
        };
        assert_eq!(sel.filtered_indices(&ds), vec![3]);

        let padded = FilterSelection {
            company: Some("A ".into()),
            ..Default::default()
        };
        assert!(padded.apply(&ds).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = sample();
        let selections = [
            FilterSelection::default(),
            FilterSelection {
                date: Some("Jan-2024".into()),
                ..Default::default()
            },
            FilterSelection {
                company: Some("B".into()),
                department: Some("Y".into()),
                date: None,
            },
        ];
        for sel in selections {
            let once = sel.apply(&ds);
            let twice = sel.apply(&once);
            assert_eq!(once, twice);
        }
    }
}
