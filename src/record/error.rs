use crate::dummy::PlaceholderError;
use crate::keymap::KeyMapError;
use crate::resolver::ResolveError;
use crate::service::ServiceError;
use crate::sources::SourceError;

/// File-level errors that stop one upload
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// A mapped attribute name is missing from the service dictionary
    #[error("Attribute '{name}' (mapped from '{key}') is not known to the service")]
    UnknownAttributeName {
        /// Source field key
        key: String,
        /// Mapped attribute name
        name: String,
    },

    /// A key in the key set has no single-name mapping
    #[error("Field key '{0}' has no attribute mapping")]
    UnmappedKey(String),

    /// The hierarchy node could not be resolved under the campaign
    #[error("Hierarchy '{name}' not found in campaign '{campaign}'")]
    MissingHierarchy {
        /// Campaign name
        campaign: String,
        /// Hierarchy node name
        name: String,
    },

    /// Creating or looking up the campaign failed
    #[error("Failed to set up campaign '{name}': {source}")]
    Campaign {
        /// Campaign name
        name: String,
        /// Service failure
        #[source]
        source: ServiceError,
    },

    /// The service refused the record
    #[error("Insert of '{filename}' failed: {source}")]
    InsertFailure {
        /// Spectral file name of the rejected record
        filename: String,
        /// Service failure
        #[source]
        source: ServiceError,
    },

    /// Ancillary category with no key map entry
    #[error("Unknown ancillary category: {0}")]
    UnknownCategory(String),

    /// Ancillary category whose mapping is empty, under the reject policy
    #[error("Ancillary category '{0}' has no attribute mapping")]
    UnsupportedCategory(String),

    /// Reading the source file failed
    #[error("Source error: {0}")]
    SourceError(#[from] SourceError),

    /// The service failed outside of an insert
    #[error("Service error: {0}")]
    ServiceError(#[from] ServiceError),

    /// A placeholder spectrum could not be synthesized
    #[error("Placeholder error: {0}")]
    PlaceholderError(#[from] PlaceholderError),

    /// I/O error outside of a source or placeholder
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ResolveError> for UploadError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::UnmappedKey(key) => UploadError::UnmappedKey(key),
            ResolveError::UnknownAttributeName { key, name } => UploadError::UnknownAttributeName { key, name },
        }
    }
}

impl From<KeyMapError> for UploadError {
    fn from(err: KeyMapError) -> Self {
        match err {
            KeyMapError::UnknownCategory(category) => UploadError::UnknownCategory(category),
        }
    }
}
