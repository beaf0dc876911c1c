/// Errors reported by a spectral database client
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The service refused to store a spectral file
    #[error("Insert rejected: {0}")]
    InsertRejected(String),

    /// The service has no campaign with the given id
    #[error("Unknown campaign id: {0}")]
    UnknownCampaign(i32),

    /// I/O error talking to the backing store
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}
