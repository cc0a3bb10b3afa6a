use std::path::PathBuf;

use thiserror::Error;

use super::model::Column;

/// Failure to turn a file on disk into a [`Table`](super::model::Table).
///
/// Always fatal for the load that produced it; there is no retry.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("failed to read {}: {cause:#}", path.display())]
    Read { path: PathBuf, cause: anyhow::Error },
}

/// A query named a column the table cannot serve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidColumnError {
    #[error("unknown column '{0}'")]
    Unknown(String),

    #[error("column '{0}' is not numeric")]
    NotNumeric(Column),
}
