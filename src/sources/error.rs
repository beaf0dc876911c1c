/// Errors that can occur while reading spectra and ancillary files
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error reading a file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File content does not have the expected shape
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Ancillary table name is not `<Category>_<date>`
    #[error("Invalid ancillary table name '{0}': expected <Category>_<YYYYMMDD>")]
    InvalidTableKey(String),
}
