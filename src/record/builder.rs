use log::{debug, warn};

use super::{MeasurementMatrix, SpectraFileIdentity, SpectralRecord, UploadError, WavelengthCalibration};
use crate::assembler::MetadataAssembler;
use crate::keymap::MetadataKeyMap;
use crate::metadata::MetadataCollection;
use crate::resolver::AttributeResolver;
use crate::service::AttributeDictionary;
use crate::sources::SpectraSource;

/// Builds [`SpectralRecord`]s against one attribute dictionary
#[derive(Clone, Copy)]
pub struct RecordBuilder<'a> {
    calibration: &'a WavelengthCalibration,
    dictionary: &'a dyn AttributeDictionary,
}

impl<'a> RecordBuilder<'a> {
    /// Create a builder using `calibration` for sources without a wavelength
    /// axis and `dictionary` for attribute lookups
    pub fn new(calibration: &'a WavelengthCalibration, dictionary: &'a dyn AttributeDictionary) -> Self {
        Self {
            calibration,
            dictionary,
        }
    }

    /// Assemble the upload record for `source`, reading metadata through
    /// `key_map`.
    ///
    /// Field-level problems are logged and skipped; only a key map that does
    /// not resolve against the dictionary fails the build.
    pub fn build(
        &self,
        identity: SpectraFileIdentity,
        source: &dyn SpectraSource,
        key_map: &MetadataKeyMap,
    ) -> Result<SpectralRecord, UploadError> {
        let resolver = AttributeResolver::new(key_map, self.dictionary);
        resolver.verify(key_map.keys())?;

        let spectrum_count = source.spectra_count();
        let axis: Vec<f32> = match source.wavelengths() {
            Some(wavelengths) => wavelengths.iter().map(|&w| w as f32).collect(),
            None => self.calibration.wavelengths().into_iter().map(|w| w as f32).collect(),
        };
        let bins = axis.len();

        let assembler = MetadataAssembler::new(resolver);
        let mut measurements = MeasurementMatrix::zeros(spectrum_count, bins);
        let mut spectrum_filenames = Vec::with_capacity(spectrum_count);
        let mut wavelengths = Vec::with_capacity(spectrum_count);
        let mut metadata = Vec::with_capacity(spectrum_count);

        for index in 0..spectrum_count {
            let fill = measurements.fill_row(index, source.spectrum_pixels(index));
            if fill.truncated > 0 {
                warn!(
                    "{} spectrum {}: dropped {} pixels beyond {} bins",
                    identity.filename, index, fill.truncated, bins
                );
            }

            let mut collection = MetadataCollection::new();
            let report = assembler.assemble(&mut collection, source.metadata(), index, key_map.keys());
            debug!(
                "{} spectrum {}: {} pixels, {}/{} metadata fields",
                identity.filename,
                index,
                fill.copied,
                report.added(),
                report.outcomes.len()
            );

            spectrum_filenames.push(identity.spectrum_filename(index));
            wavelengths.push(axis.clone());
            metadata.push(collection);
        }

        Ok(SpectralRecord {
            identity,
            spectrum_count,
            spectrum_filenames,
            wavelengths,
            measurements,
            metadata,
        })
    }
}
