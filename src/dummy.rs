//! # Dummy-Spectrum Synthesis
//!
//! Ancillary measurements are attached to spectra in the service, but most
//! plot/date pairs in the ancillary tables have no physical scan. For those a
//! measurement-free placeholder PICO file named `<plotId>_<date>.pico` is
//! written once to the placeholder directory and reused on later runs; the
//! file itself is the de-duplication key across runs.

use log::{debug, info};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::metadata::FieldRecord;
use crate::sources::{FileLocation, PicoFile, SourceFormat, SpectraSource};

/// Extension of placeholder files
pub const PLACEHOLDER_EXTENSION: &str = "pico";

/// Errors raised while synthesizing a placeholder
#[derive(Debug, thiserror::Error)]
pub enum PlaceholderError {
    /// Two distinct plot ids produce the same placeholder key
    #[error("Plot '{plot_id}' maps to placeholder '{key}', already used by plot '{existing}'")]
    KeyCollision {
        /// Placeholder key
        key: String,
        /// Plot id being registered
        plot_id: String,
        /// Plot id that registered the key first
        existing: String,
    },

    /// I/O error writing the placeholder file
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Where a placeholder spectrum lives and which plot/date it stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderIdentity {
    /// Plot identifier
    pub plot_id: String,
    /// Measurement date label (`%Y%m%d`)
    pub date: String,
    /// Composite key `<plotId>_<date>`
    pub key: String,
    /// Placeholder file location
    pub location: FileLocation,
}

/// Placeholder keys seen in one ancillary upload run, with the plot id that
/// registered each key
#[derive(Debug, Clone)]
pub struct PlotDummyRegistry {
    directory: PathBuf,
    keys: BTreeMap<String, String>,
}

impl PlotDummyRegistry {
    /// Registry writing placeholders into `directory`
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            keys: BTreeMap::new(),
        }
    }

    /// Placeholder directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Composite key for a plot and date. Path separators are replaced so the
    /// key is always a plain file name.
    pub fn placeholder_key(plot_id: &str, date: &str) -> String {
        let clean = |s: &str| s.trim().replace(['/', '\\'], "-");
        format!("{}_{}", clean(plot_id), clean(date))
    }

    /// True if `key` was registered in this run
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Registered keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// Number of registered keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True if nothing was registered yet
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Make sure a placeholder for `plot_id` on `date` exists on disk and is
    /// registered.
    ///
    /// An existing `<key>.pico` is reused untouched; a new one is written to
    /// a temporary file in the same directory and renamed into place. A plot
    /// id whose key was already registered by a different plot id in this
    /// run is refused with [`PlaceholderError::KeyCollision`].
    pub fn synthesize_if_absent(&mut self, plot_id: &str, date: &str) -> Result<PlaceholderIdentity, PlaceholderError> {
        let key = Self::placeholder_key(plot_id, date);
        let plot_id = plot_id.trim();
        if let Some(existing) = self.keys.get(&key) {
            if existing != plot_id {
                return Err(PlaceholderError::KeyCollision {
                    key,
                    plot_id: plot_id.to_string(),
                    existing: existing.clone(),
                });
            }
        }
        let filename = format!("{}.{}", key, PLACEHOLDER_EXTENSION);
        let path = self.directory.join(&filename);

        if path.exists() {
            debug!("Reusing placeholder {}", path.display());
        } else {
            fs::create_dir_all(&self.directory)?;
            let mut file = NamedTempFile::new_in(&self.directory)?;
            {
                let mut writer = BufWriter::new(&mut file);
                PicoFile::write_placeholder(&mut writer, &key)?;
                writer.flush()?;
            }
            file.persist(&path).map_err(|e| e.error)?;
            info!("Wrote placeholder {}", path.display());
        }

        self.keys.insert(key.clone(), plot_id.to_string());
        Ok(PlaceholderIdentity {
            plot_id: plot_id.to_string(),
            date: date.to_string(),
            key,
            location: FileLocation::new(&self.directory, &filename),
        })
    }
}

/// One-spectrum, pixel-free source carrying a placeholder's merged
/// ancillary fields
#[derive(Debug, Clone)]
pub struct PlaceholderSpectra {
    location: FileLocation,
    metadata: Vec<FieldRecord>,
}

impl PlaceholderSpectra {
    /// Source for `placeholder` with `fields` as its spectrum's metadata
    pub fn new(placeholder: &PlaceholderIdentity, fields: FieldRecord) -> Self {
        Self {
            location: placeholder.location.clone(),
            metadata: vec![fields],
        }
    }
}

impl SpectraSource for PlaceholderSpectra {
    fn location(&self) -> &FileLocation {
        &self.location
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::Pico
    }

    fn spectra_count(&self) -> usize {
        1
    }

    fn spectrum_pixels(&self, _index: usize) -> &[f64] {
        &[]
    }

    fn metadata(&self) -> &[FieldRecord] {
        &self.metadata
    }
}
