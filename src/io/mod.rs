pub mod read;
pub mod export;

pub use read::*;
pub use export::*;

/// Error type for the thin file-facing layer. The analysis pipeline itself
/// never performs I/O.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("file contains no data rows")]
    Empty,

    #[error("could not locate the required depth and qc columns")]
    MissingColumns,

    #[error("file must have at least two columns (depth, qc)")]
    TooFewColumns,

    #[error("line {line}: could not parse '{field}' as a number")]
    Parse { line: usize, field: String },
}
