/// Errors that can occur while writing output artifacts
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error writing delimited text
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error serializing the run summary
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Output location cannot be used
    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
