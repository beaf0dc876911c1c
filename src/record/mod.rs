//! # Spectral Record Builder
//!
//! A [`SpectralRecord`] is the unit handed to a single
//! [`SpectralDatabase::insert_spectral_file`](crate::service::SpectralDatabase::insert_spectral_file)
//! call: the file identity, one filename and wavelength axis per spectrum, a
//! rectangular zero-padded measurement matrix, and one
//! [`MetadataCollection`] per spectrum.
//!
//! ## Building
//!
//! [`RecordBuilder::build`] works the same way for every [`SpectraSource`]:
//!
//! 1. every key of the key map is resolved once up front, so a dictionary
//!    mismatch fails the file before any spectrum is touched;
//! 2. the matrix is sized spectra × bins, with bins taken from the source's
//!    own wavelength axis when it has one and from the configured
//!    [`WavelengthCalibration`] otherwise;
//! 3. each spectrum's pixels are copied into its row (short rows keep
//!    trailing zeros) and its metadata is assembled field by field.
//!
//! [`SpectraSource`]: crate::sources::SpectraSource

mod builder;
mod error;
mod identity;
mod matrix;
mod wavelength;

#[cfg(test)]
mod tests;

use serde::Serialize;

pub use builder::RecordBuilder;
pub use error::UploadError;
pub use identity::SpectraFileIdentity;
pub use matrix::{MeasurementMatrix, RowFill};
pub use wavelength::{WavelengthCalibration, DEFAULT_BINS};

use crate::metadata::MetadataCollection;

/// One spectral file ready for upload.
///
/// Read-only once built; the insert call consumes it.
#[derive(Debug, Clone, Serialize)]
pub struct SpectralRecord {
    identity: SpectraFileIdentity,
    spectrum_count: usize,
    spectrum_filenames: Vec<String>,
    wavelengths: Vec<Vec<f32>>,
    measurements: MeasurementMatrix,
    metadata: Vec<MetadataCollection>,
}

impl SpectralRecord {
    /// Identity of the source file
    pub fn identity(&self) -> &SpectraFileIdentity {
        &self.identity
    }

    /// Number of spectra
    pub fn spectrum_count(&self) -> usize {
        self.spectrum_count
    }

    /// Per-spectrum names, `<filename><index>`
    pub fn spectrum_filenames(&self) -> &[String] {
        &self.spectrum_filenames
    }

    /// Per-spectrum wavelength axes
    pub fn wavelengths(&self) -> &[Vec<f32>] {
        &self.wavelengths
    }

    /// Spectra × bins measurement matrix
    pub fn measurements(&self) -> &MeasurementMatrix {
        &self.measurements
    }

    /// Per-spectrum metadata, indexed like the spectra
    pub fn metadata(&self) -> &[MetadataCollection] {
        &self.metadata
    }

    /// Total metadata entries across all spectra
    pub fn metadata_entry_count(&self) -> usize {
        self.metadata.iter().map(MetadataCollection::len).sum()
    }
}
