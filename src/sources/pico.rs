use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use super::{FileLocation, SourceError, SourceFormat, SpectraSource};
use crate::metadata::{FieldRecord, SourceValue};

#[derive(Debug, Default, Serialize, Deserialize)]
struct PicoDocument {
    #[serde(rename = "Spectra", default)]
    spectra: Vec<PicoSpectrum>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PicoSpectrum {
    #[serde(rename = "Metadata", default)]
    metadata: Map<String, Value>,
    // Saturated or dropped pixels are written as null
    #[serde(rename = "Pixels", default)]
    pixels: Vec<Option<f64>>,
}

/// A PICO JSON spectra file.
///
/// A PICO file holds several spectra (typically two upwelling and two
/// downwelling), each with its own metadata dictionary and pixel vector.
/// Pixel vectors need not share a length.
#[derive(Debug, Clone)]
pub struct PicoFile {
    location: FileLocation,
    pixels: Vec<Vec<f64>>,
    metadata: Vec<FieldRecord>,
}

impl PicoFile {
    /// Read a PICO file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let location = FileLocation::from_path(&path)?;
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), location)
    }

    /// Parse PICO JSON from a reader
    pub fn from_reader<R: Read>(reader: R, location: FileLocation) -> Result<Self, SourceError> {
        let document: PicoDocument = serde_json::from_reader(reader)?;
        if document.spectra.is_empty() {
            return Err(SourceError::InvalidFormat(format!(
                "{} contains no spectra",
                location.filename
            )));
        }

        let (pixels, metadata): (Vec<Vec<f64>>, Vec<FieldRecord>) = document
            .spectra
            .into_iter()
            .map(|spectrum| {
                let pixels: Vec<f64> = spectrum.pixels.into_iter().map(|p| p.unwrap_or(0.0)).collect();
                let fields: FieldRecord = spectrum
                    .metadata
                    .into_iter()
                    .map(|(key, value)| (key, SourceValue::from(value)))
                    .collect();
                (pixels, fields)
            })
            .unzip();

        Ok(Self {
            location,
            pixels,
            metadata,
        })
    }

    /// Write a measurement-free PICO document with one spectrum whose only
    /// metadata is its `name`.
    pub fn write_placeholder<W: Write>(writer: W, name: &str) -> Result<(), serde_json::Error> {
        let mut metadata = Map::new();
        metadata.insert("name".to_string(), Value::String(name.to_string()));
        let document = PicoDocument {
            spectra: vec![PicoSpectrum {
                metadata,
                pixels: Vec::new(),
            }],
        };
        serde_json::to_writer_pretty(writer, &document)
    }
}

impl SpectraSource for PicoFile {
    fn location(&self) -> &FileLocation {
        &self.location
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::Pico
    }

    fn spectra_count(&self) -> usize {
        self.pixels.len()
    }

    fn spectrum_pixels(&self, index: usize) -> &[f64] {
        self.pixels.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    fn metadata(&self) -> &[FieldRecord] {
        &self.metadata
    }
}
