use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort an import run.
///
/// Row-level data problems (short rows, empty make/model, unparsable
/// numbers) are deliberately not represented here; they are recovered
/// locally by skipping the row.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("CSV file not found: {}", .0.display())]
    SourceMissing(PathBuf),
    #[error("required columns not found in CSV file: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("storage error: {0}")]
    Storage(#[from] rocket_db_pools::sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
