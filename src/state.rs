use std::path::{Path, PathBuf};

use crate::color::ColorMap;
use crate::data::aggregate::{summarize, Summary};
use crate::data::filter::FilterSelection;
use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::data::month::MonthOrder;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The per-session context: loaded data, current selection and the views
/// derived from them. Independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Dataset>,

    /// Where `dataset` came from, for Reload.
    pub source: Option<PathBuf>,

    /// Current company / department / month constraints.
    pub selection: FilterSelection,

    /// Ordering of the monthly views.
    pub month_order: MonthOrder,

    /// Views for the current selection (cached).
    pub summary: Summary,

    /// Indices of rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Colours per company / department, fixed for the dataset's lifetime.
    pub company_colors: ColorMap,
    pub department_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset. Constraints whose value no longer
    /// occurs in the new data fall back to "All".
    pub fn set_dataset(&mut self, dataset: Dataset, source: Option<PathBuf>) {
        retain_known(&mut self.selection.company, &dataset.companies());
        retain_known(&mut self.selection.department, &dataset.departments());
        retain_known(&mut self.selection.date, &dataset.dates());

        self.company_colors = ColorMap::new(&dataset.companies());
        self.department_colors = ColorMap::new(&dataset.departments());

        self.dataset = Some(dataset);
        self.source = source;
        self.status_message = None;
        self.recompute();
    }

    /// Load `path`, replacing the current dataset. On failure the previous
    /// dataset stays and the error becomes the status message.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => self.set_dataset(dataset, Some(path.to_path_buf())),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Re-read the current source file.
    pub fn reload(&mut self) {
        if let Some(path) = self.source.clone() {
            self.load_path(&path);
        }
    }

    /// Recompute the cached views after a selection or dataset change.
    pub fn recompute(&mut self) {
        match &self.dataset {
            Some(ds) => {
                self.summary = summarize(ds, &self.selection, self.month_order);
                self.visible_indices = self.selection.filtered_indices(ds);
            }
            None => {
                self.summary = Summary::default();
                self.visible_indices.clear();
            }
        }
        log::debug!(
            "Selection {:?} keeps {} rows",
            self.selection,
            self.visible_indices.len()
        );
    }

    pub fn set_company(&mut self, company: Option<String>) {
        self.selection.company = company;
        self.recompute();
    }

    pub fn set_department(&mut self, department: Option<String>) {
        self.selection.department = department;
        self.recompute();
    }

    pub fn set_date(&mut self, date: Option<String>) {
        self.selection.date = date;
        self.recompute();
    }

    /// Reset every constraint to "All".
    pub fn clear_filters(&mut self) {
        self.selection = FilterSelection::default();
        self.recompute();
    }

    pub fn set_month_order(&mut self, order: MonthOrder) {
        self.month_order = order;
        self.recompute();
    }
}

fn retain_known(constraint: &mut Option<String>, known: &[String]) {
    if constraint.as_ref().is_some_and(|c| !known.contains(c)) {
        log::info!("Filter value {constraint:?} not in dataset, resetting to All");
        *constraint = None;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::Row;

    fn dataset() -> Dataset {
        Dataset::from_rows(vec![
            Row::new("A", "X", "Jan-2024", Some(100.0)),
            Row::new("A", "Y", "Feb-2024", Some(50.0)),
            Row::new("B", "X", "Jan-2024", Some(200.0)),
        ])
    }

    #[test]
    fn empty_state_has_empty_summary() {
        let mut state = AppState::default();
        state.recompute();
        assert_eq!(state.summary, Summary::default());
        assert!(state.visible_indices.is_empty());
    }

    #[test]
    fn selection_changes_recompute_views() {
        let mut state = AppState::default();
        state.set_dataset(dataset(), None);
        assert_eq!(state.summary.kpis.total_wage, 350.0);
        assert_eq!(state.visible_indices, vec![0, 1, 2]);

        state.set_company(Some("A".into()));
        assert_eq!(state.summary.kpis.total_wage, 150.0);

        state.set_department(Some("X".into()));
        assert_eq!(state.visible_indices, vec![0]);

        state.set_date(Some("Feb-2024".into()));
        assert_eq!(state.summary.kpis.total_wage, 0.0);
        assert!(state.summary.by_company.is_empty());

        state.clear_filters();
        assert_eq!(state.summary.kpis.rows, 3);
    }

    #[test]
    fn month_order_reorders_monthly_view() {
        let mut state = AppState::default();
        state.set_dataset(dataset(), None);
        assert_eq!(state.summary.monthly[0].label, "Feb-2024");
        state.set_month_order(MonthOrder::Chronological);
        assert_eq!(state.summary.monthly[0].label, "Jan-2024");
    }

    #[test]
    fn new_dataset_drops_unknown_constraints() {
        let mut state = AppState::default();
        state.selection.company = Some("Z".into());
        state.selection.department = Some("X".into());
        state.set_dataset(dataset(), None);
        assert_eq!(state.selection.company, None);
        assert_eq!(state.selection.department.as_deref(), Some("X"));
        assert_eq!(state.summary.kpis.total_wage, 300.0);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut state = AppState::default();
        state.set_dataset(dataset(), None);

        let dir = tempfile::tempdir().unwrap();
        state.load_path(&dir.path().join("missing.csv"));

        assert!(state.dataset.is_some());
        let msg = state.status_message.as_deref().unwrap();
        assert!(msg.contains("Source not found"), "{msg}");
    }

    #[test]
    fn reload_picks_up_file_changes() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "company,department,date,wage\nA,X,Jan,10\n").unwrap();
        file.flush().unwrap();

        let mut state = AppState::default();
        state.load_path(file.path());
        assert_eq!(state.summary.kpis.total_wage, 10.0);

        writeln!(file, "B,Y,Feb,5").unwrap();
        file.flush().unwrap();
        state.reload();
        assert_eq!(state.summary.kpis.total_wage, 15.0);
        assert_eq!(state.source.as_deref(), Some(file.path()));
    }
}
