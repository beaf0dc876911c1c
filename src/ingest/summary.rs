use crate::record::{SpectralRecord, UploadError};

/// Confirmation of one successful insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Spectral file name
    pub filename: String,
    /// Spectra in the file
    pub spectrum_count: usize,
    /// Metadata entries across all spectra
    pub metadata_entries: usize,
}

impl UploadReceipt {
    pub(crate) fn for_record(record: &SpectralRecord) -> Self {
        Self {
            filename: record.identity().filename.clone(),
            spectrum_count: record.spectrum_count(),
            metadata_entries: record.metadata_entry_count(),
        }
    }
}

/// A file, table or placeholder that could not be uploaded
#[derive(Debug)]
pub struct FileFailure {
    /// File name, table key or placeholder key
    pub name: String,
    /// Why it failed
    pub error: UploadError,
}

/// Outcome of uploading several spectra files
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Files inserted, in upload order
    pub uploaded: Vec<UploadReceipt>,
    /// Files that failed
    pub failures: Vec<FileFailure>,
}

impl BatchSummary {
    /// True if no file failed
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Files attempted
    pub fn total(&self) -> usize {
        self.uploaded.len() + self.failures.len()
    }
}

/// Outcome of an ancillary upload run
#[derive(Debug, Default)]
pub struct AncillarySummary {
    /// Placeholders inserted, in key order
    pub uploaded: Vec<UploadReceipt>,
    /// Tables skipped because their category has no mapping
    pub skipped_categories: Vec<String>,
    /// Tables and placeholders that failed
    pub failures: Vec<FileFailure>,
    /// Distinct placeholders touched by the run
    pub placeholders: usize,
}

impl AncillarySummary {
    /// True if nothing failed
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
