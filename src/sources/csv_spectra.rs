use log::warn;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{FileLocation, SourceError, SourceFormat, SpectraSource};
use crate::metadata::{FieldRecord, SourceValue};

/// Metadata table looked up next to the spectra file when none is given
pub const DEFAULT_METADATA_FILE: &str = "metadata.csv";

/// Test-CSV spectra.
///
/// `spectra.csv` has no header; column 0 is the wavelength axis and every
/// further column is one spectrum. `metadata.csv` is stored transposed: each
/// row is `<field name>,<value for spectrum 0>,<value for spectrum 1>,...`.
#[derive(Debug, Clone)]
pub struct CsvSpectra {
    location: FileLocation,
    wavelengths: Vec<f64>,
    spectra: Vec<Vec<f64>>,
    metadata: Vec<FieldRecord>,
}

impl CsvSpectra {
    /// Read spectra and metadata from disk.
    ///
    /// Without an explicit `metadata_path`, `metadata.csv` in the spectra
    /// file's directory is used when present.
    pub fn open<P: AsRef<Path>>(spectra_path: P, metadata_path: Option<&Path>) -> Result<Self, SourceError> {
        let location = FileLocation::from_path(&spectra_path)?;
        let spectra = BufReader::new(File::open(&spectra_path)?);

        let metadata = match metadata_path {
            Some(path) => Some(BufReader::new(File::open(path)?)),
            None => {
                let default = location.directory.join(DEFAULT_METADATA_FILE);
                if default.exists() {
                    Some(BufReader::new(File::open(default)?))
                } else {
                    warn!("No {} next to {}; spectra carry no metadata", DEFAULT_METADATA_FILE, location.filename);
                    None
                }
            }
        };

        Self::from_readers(spectra, metadata, location)
    }

    /// Parse spectra and optional metadata from readers
    pub fn from_readers<R: Read, M: Read>(
        spectra: R,
        metadata: Option<M>,
        location: FileLocation,
    ) -> Result<Self, SourceError> {
        let (wavelengths, spectra) = read_spectra(spectra)?;
        let metadata = match metadata {
            Some(reader) => read_transposed_metadata(reader, spectra.len())?,
            None => vec![FieldRecord::new(); spectra.len()],
        };

        Ok(Self {
            location,
            wavelengths,
            spectra,
            metadata,
        })
    }
}

fn read_spectra<R: Read>(reader: R) -> Result<(Vec<f64>, Vec<Vec<f64>>), SourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut wavelengths = Vec::new();
    let mut columns: Vec<Vec<f64>> = Vec::new();

    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let values = record
            .iter()
            .map(|cell| {
                cell.parse::<f64>().map_err(|_| {
                    SourceError::InvalidFormat(format!("row {}: '{}' is not a number", row + 1, cell))
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let Some((&wavelength, intensities)) = values.split_first() else {
            continue;
        };
        if columns.is_empty() {
            columns = vec![Vec::new(); intensities.len()];
        }
        wavelengths.push(wavelength);
        for (column, &value) in columns.iter_mut().zip(intensities) {
            column.push(value);
        }
    }

    if columns.is_empty() {
        return Err(SourceError::InvalidFormat(
            "spectra table needs a wavelength column and at least one spectrum column".to_string(),
        ));
    }

    Ok((wavelengths, columns))
}

fn read_transposed_metadata<R: Read>(reader: R, spectra_count: usize) -> Result<Vec<FieldRecord>, SourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut metadata = vec![FieldRecord::new(); spectra_count];

    for record in csv_reader.records() {
        let record = record?;
        let mut cells = record.iter();
        let Some(name) = cells.next().map(str::trim).filter(|n| !n.is_empty()) else {
            continue;
        };

        for (fields, cell) in metadata.iter_mut().zip(cells) {
            if let Some(value) = SourceValue::from_cell(cell) {
                fields.insert(name.to_string(), value);
            }
        }
    }

    Ok(metadata)
}

impl SpectraSource for CsvSpectra {
    fn location(&self) -> &FileLocation {
        &self.location
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::Csv
    }

    fn spectra_count(&self) -> usize {
        self.spectra.len()
    }

    fn spectrum_pixels(&self, index: usize) -> &[f64] {
        self.spectra.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    fn metadata(&self) -> &[FieldRecord] {
        &self.metadata
    }

    fn wavelengths(&self) -> Option<&[f64]> {
        Some(&self.wavelengths)
    }
}
