use std::path::{Path, PathBuf};

use clap::Parser;

use crate::data::filter::FilterSelection;
use crate::data::month::MonthOrder;

/// Loaded when no path is given on the command line or in the environment.
pub const DEFAULT_SOURCE: &str = "combined_wagebill.csv";

/// Wage bill summary dashboard.
///
/// Opens a window by default; `--summary` / `--json` print the same figures
/// to stdout instead.
#[derive(Debug, Parser)]
#[command(name = "wage-dashboard", version, about)]
pub struct Cli {
    /// Wage table to load (.csv, .json or .parquet) [default: combined_wagebill.csv]
    #[arg(env = "WAGE_DASHBOARD_CSV")]
    pub path: Option<PathBuf>,

    /// Only rows of this company.
    #[arg(long)]
    pub company: Option<String>,

    /// Only rows of this department.
    #[arg(long)]
    pub department: Option<String>,

    /// Only rows with this DATE label.
    #[arg(long)]
    pub date: Option<String>,

    /// Order months by parsed calendar date instead of by label.
    #[arg(long)]
    pub chronological: bool,

    /// Print a text summary and exit.
    #[arg(long, conflicts_with = "json")]
    pub summary: bool,

    /// Print the summary as JSON and exit.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn selection(&self) -> FilterSelection {
        FilterSelection {
            company: self.company.clone(),
            department: self.department.clone(),
            date: self.date.clone(),
        }
    }

    pub fn month_order(&self) -> MonthOrder {
        if self.chronological {
            MonthOrder::Chronological
        } else {
            MonthOrder::Label
        }
    }

    /// The file to read: the given path, or [`DEFAULT_SOURCE`].
    pub fn source(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE))
    }

    /// What the window loads at start. A path the user named is always
    /// tried so a typo shows up as an error; the default file only when it
    /// exists.
    pub fn startup_source(&self) -> Option<PathBuf> {
        match &self.path {
            Some(path) => Some(path.clone()),
            None => Some(PathBuf::from(DEFAULT_SOURCE)).filter(|p| Path::is_file(p)),
        }
    }

    /// Whether to skip the window.
    pub fn headless(&self) -> bool {
        self.summary || self.json
    }
}
