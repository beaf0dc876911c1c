//! # Spectra and Ancillary Sources
//!
//! Parsers sit behind two traits so the mapping pipeline never depends on a
//! concrete file format:
//!
//! - [`SpectraSource`]: pixels and per-spectrum metadata of one spectra file
//! - [`AncillarySource`]: per-category field measurement tables
//!
//! Adapters shipped with the crate:
//!
//! | Type | Input |
//! |------|-------|
//! | [`PicoFile`] | PICO JSON (`{"Spectra": [{"Metadata": {..}, "Pixels": [..]}]}`) |
//! | [`CsvSpectra`] | `spectra.csv` (wavelength column + one column per spectrum) and a transposed `metadata.csv` |
//! | [`AncillaryDirectory`] | a directory tree of `<Category>_<date>.csv` tables |

mod ancillary;
mod csv_spectra;
mod error;
mod pico;

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use ancillary::{AncillaryDirectory, AncillaryRow, AncillaryTable, AncillaryTableKey};
pub use csv_spectra::CsvSpectra;
pub use error::SourceError;
pub use pico::PicoFile;

use crate::metadata::FieldRecord;

/// Directory and file name of a spectra file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileLocation {
    /// Directory holding the file
    pub directory: PathBuf,
    /// Bare file name
    pub filename: String,
}

impl FileLocation {
    /// Location of `filename` inside `directory`
    pub fn new<P: AsRef<Path>>(directory: P, filename: &str) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            filename: filename.to_string(),
        }
    }

    /// Split a file path into directory and file name
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| SourceError::InvalidFormat(format!("not a file path: {}", path.display())))?;
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self { directory, filename })
    }

    /// Full path of the file
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// On-disk format of a spectra file, which selects the metadata key map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// PICO JSON spectra
    Pico,
    /// Test-CSV spectra with a transposed metadata table
    Csv,
}

/// A parsed spectra file
pub trait SpectraSource {
    /// Where the file lives
    fn location(&self) -> &FileLocation;

    /// Format of the file
    fn format(&self) -> SourceFormat;

    /// Number of spectra in the file
    fn spectra_count(&self) -> usize;

    /// Pixel values of spectrum `index`; empty when the index is out of range
    fn spectrum_pixels(&self, index: usize) -> &[f64];

    /// Per-spectrum metadata records, indexed like the spectra
    fn metadata(&self) -> &[FieldRecord];

    /// Metadata of spectrum `index`
    fn spectrum_metadata(&self, index: usize) -> Option<&FieldRecord> {
        self.metadata().get(index)
    }

    /// Calibrated wavelength axis shared by all spectra, when the file has one
    fn wavelengths(&self) -> Option<&[f64]> {
        None
    }
}

/// Tables of ancillary field measurements keyed by category and date
pub type AncillaryTables = BTreeMap<AncillaryTableKey, AncillaryTable>;

/// Tables read from an ancillary source, and the table files that could not
/// be read
#[derive(Debug, Default)]
pub struct AncillaryExtraction {
    /// Tables keyed by category and date
    pub tables: AncillaryTables,
    /// Table files that failed to parse, in walk order
    pub failures: Vec<(PathBuf, SourceError)>,
}

impl From<AncillaryTables> for AncillaryExtraction {
    fn from(tables: AncillaryTables) -> Self {
        Self {
            tables,
            failures: Vec::new(),
        }
    }
}

/// Parser of ancillary field measurement data
pub trait AncillarySource {
    /// Extract every table found under `directory`.
    ///
    /// A table that cannot be read is reported in
    /// [`AncillaryExtraction::failures`]; only a failure to list `directory`
    /// itself is an error.
    fn extract_tables(&self, directory: &Path) -> Result<AncillaryExtraction, SourceError>;
}
