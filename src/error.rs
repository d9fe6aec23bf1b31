//! Load-time error taxonomy.
//!
//! Compute-time problems (division by zero in the percentage views) are not
//! errors: they surface as `None` in the [`crate::data::aggregate::Summary`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning a source file into a [`crate::data::model::Dataset`].
///
/// Every variant is fatal to the session: nothing can be rendered without a
/// dataset, so the UI shows the message instead of an empty dashboard.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file does not exist.
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// A required column is absent after header normalization.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Two headers normalize to the same name.
    #[error("Column '{0}' appears more than once after normalization")]
    DuplicateColumn(String),

    /// The source has a header but no data rows.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// File extension we have no reader for.
    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON input that parses but is not an array of flat objects.
    #[error("Invalid JSON records: {0}")]
    JsonShape(String),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

pub type LoadResult<T> = Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_column() {
        let err = LoadError::MissingColumn("WAGE".into());
        assert_eq!(err.to_string(), "Missing required column: WAGE");

        let err = LoadError::DuplicateColumn("DATE".into());
        assert!(err.to_string().contains("DATE"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: LoadError = io.into();
        assert!(matches!(err, LoadError::Io(_)));
        assert!(err.to_string().contains("nope"));
    }
}
