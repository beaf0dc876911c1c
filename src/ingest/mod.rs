//! # Upload Sessions
//!
//! [`SpectraUploader`] ties the pipeline to a [`SpectralDatabase`]:
//!
//! 1. **Connect**: create (or look up) the campaign.
//! 2. **Identify**: resolve the hierarchy node for each file and build its
//!    [`SpectraFileIdentity`].
//! 3. **Build & insert**: assemble the [`SpectralRecord`](crate::record::SpectralRecord)
//!    and hand it to a single insert call. Inserts are never retried.
//!
//! Batch uploads keep going after a failed file; the failure is recorded in
//! the returned summary.
//!
//! ## Ancillary runs
//!
//! [`SpectraUploader::upload_ancillary`] reads every `<Category>_<date>`
//! table, synthesizes one placeholder spectrum per plot and date, merges the
//! rows of all categories that share a placeholder, and uploads each
//! placeholder once with the merged columns.

mod config;
mod summary;


use log::{debug, info, warn};
use std::collections::hash_map::Entry;
use std::collections::BTreeMap;
use std::path::Path;

pub use config::{CategoryPolicy, UploadConfig};
pub use summary::{AncillarySummary, BatchSummary, FileFailure, UploadReceipt};

use crate::dummy::{PlaceholderIdentity, PlaceholderSpectra, PlotDummyRegistry};
use crate::keymap::{KeyMaps, MetadataKeyMap};
use crate::metadata::FieldRecord;
use crate::record::{RecordBuilder, SpectraFileIdentity, UploadError, WavelengthCalibration};
use crate::service::{Campaign, HierarchyId, SpectralDatabase};
use crate::sources::{AncillarySource, FileLocation, PicoFile, SpectraSource};

/// Upload session bound to one database and one campaign
pub struct SpectraUploader<D: SpectralDatabase> {
    database: D,
    config: UploadConfig,
    key_maps: KeyMaps,
    campaign: Campaign,
}

impl<D: SpectralDatabase> SpectraUploader<D> {
    /// Open a session, creating the configured campaign if needed
    pub fn connect(mut database: D, config: UploadConfig) -> Result<Self, UploadError> {
        let name = config.campaign_name.clone();
        let id = database
            .insert_campaign(&name)
            .map_err(|source| UploadError::Campaign {
                name: name.clone(),
                source,
            })?;
        info!("Uploading into campaign '{}' (id {})", name, id.0);

        Ok(Self {
            database,
            config,
            key_maps: KeyMaps::default(),
            campaign: Campaign { id, name },
        })
    }

    /// Replace the default key maps
    pub fn with_key_maps(mut self, key_maps: KeyMaps) -> Self {
        self.key_maps = key_maps;
        self
    }

    /// The session's campaign
    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    /// Session settings
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Key maps in use
    pub fn key_maps(&self) -> &KeyMaps {
        &self.key_maps
    }

    /// The underlying database
    pub fn database(&self) -> &D {
        &self.database
    }

    /// Close the session and return the database
    pub fn into_database(self) -> D {
        self.database
    }

    /// Identity of the file at `location` under the configured hierarchy
    pub fn file_identity(&mut self, location: &FileLocation) -> Result<SpectraFileIdentity, UploadError> {
        let hierarchy = self
            .database
            .sub_hierarchy_id(&self.campaign, &self.config.hierarchy, HierarchyId::ROOT)?
            .ok_or_else(|| UploadError::MissingHierarchy {
                campaign: self.campaign.name.clone(),
                name: self.config.hierarchy.clone(),
            })?;

        Ok(SpectraFileIdentity::new(
            location,
            &self.config.company,
            &self.campaign,
            hierarchy,
        ))
    }

    /// Upload one spectra file with the key map for its format
    pub fn upload(&mut self, source: &dyn SpectraSource) -> Result<UploadReceipt, UploadError> {
        let identity = self.file_identity(source.location())?;
        let key_map = self.key_maps.for_format(source.format());
        Self::insert(&mut self.database, &self.config.calibration, identity, source, key_map)
    }

    /// Upload one spectra file reading its metadata through `key_map`
    pub fn upload_with_key_map(
        &mut self,
        source: &dyn SpectraSource,
        key_map: &MetadataKeyMap,
    ) -> Result<UploadReceipt, UploadError> {
        let identity = self.file_identity(source.location())?;
        Self::insert(&mut self.database, &self.config.calibration, identity, source, key_map)
    }

    /// Upload several parsed files; a failed file does not stop the rest
    pub fn upload_batch<'s, I>(&mut self, sources: I) -> BatchSummary
    where
        I: IntoIterator<Item = &'s dyn SpectraSource>,
    {
        let mut summary = BatchSummary::default();
        for source in sources {
            match self.upload(source) {
                Ok(receipt) => summary.uploaded.push(receipt),
                Err(error) => {
                    warn!("Upload of {} failed: {}", source.location().filename, error);
                    summary.failures.push(FileFailure {
                        name: source.location().filename.clone(),
                        error,
                    });
                }
            }
        }
        summary
    }

    /// Read and upload PICO files; unreadable files are reported like
    /// failed uploads
    pub fn upload_pico_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for path in paths {
            let path = path.as_ref();
            let name = path.display().to_string();
            let result = PicoFile::open(path)
                .map_err(UploadError::from)
                .and_then(|pico| self.upload(&pico));
            match result {
                Ok(receipt) => summary.uploaded.push(receipt),
                Err(error) => {
                    warn!("Upload of {} failed: {}", name, error);
                    summary.failures.push(FileFailure { name, error });
                }
            }
        }
        summary
    }

    /// Upload ancillary tables found under `directory` onto placeholder
    /// spectra.
    ///
    /// Only a failure to read the directory aborts the run; per-table and
    /// per-placeholder failures are collected in the summary.
    pub fn upload_ancillary(
        &mut self,
        source: &dyn AncillarySource,
        directory: &Path,
    ) -> Result<AncillarySummary, UploadError> {
        let extraction = source.extract_tables(directory)?;
        let mut registry = PlotDummyRegistry::new(&self.config.placeholder_dir);
        let mut pending: BTreeMap<String, PendingPlaceholder> = BTreeMap::new();
        let mut summary = AncillarySummary::default();

        for (path, error) in extraction.failures {
            summary.failures.push(FileFailure {
                name: path.display().to_string(),
                error: error.into(),
            });
        }

        for (key, table) in &extraction.tables {
            let mapped = match self.key_maps.ancillary.category_columns(&key.category) {
                Ok(Some(columns)) => columns,
                Ok(None) => match self.config.category_policy {
                    CategoryPolicy::Skip => {
                        info!("Skipping {}: category '{}' has no attribute mapping", key, key.category);
                        summary.skipped_categories.push(key.to_string());
                        continue;
                    }
                    CategoryPolicy::Reject => {
                        warn!("Rejecting {}: category '{}' has no attribute mapping", key, key.category);
                        summary.failures.push(FileFailure {
                            name: key.to_string(),
                            error: UploadError::UnsupportedCategory(key.category.clone()),
                        });
                        continue;
                    }
                },
                Err(e) => {
                    warn!("Skipping {}: {}", key, e);
                    summary.failures.push(FileFailure {
                        name: key.to_string(),
                        error: e.into(),
                    });
                    continue;
                }
            };

            let key_set = category_key_set(table.columns(), mapped);
            let date = key.date_label();
            debug!("{}: {} rows, {} mapped columns", key, table.len(), key_set.len());

            for row in table.rows() {
                let placeholder = match registry.synthesize_if_absent(row.plot_id(), &date) {
                    Ok(placeholder) => placeholder,
                    Err(e) => {
                        warn!("Placeholder for plot {} on {} failed: {}", row.plot_id(), date, e);
                        summary.failures.push(FileFailure {
                            name: PlotDummyRegistry::placeholder_key(row.plot_id(), &date),
                            error: e.into(),
                        });
                        continue;
                    }
                };
                pending
                    .entry(placeholder.key.clone())
                    .or_insert_with(|| PendingPlaceholder::new(placeholder))
                    .merge(&key_set, row.fields(), &key.to_string());
            }
        }

        summary.placeholders = registry.len();
        for (key, placeholder) in pending {
            match self.upload_placeholder(placeholder) {
                Ok(receipt) => summary.uploaded.push(receipt),
                Err(error) => {
                    warn!("Upload of placeholder {} failed: {}", key, error);
                    summary.failures.push(FileFailure { name: key, error });
                }
            }
        }

        Ok(summary)
    }

    fn upload_placeholder(&mut self, placeholder: PendingPlaceholder) -> Result<UploadReceipt, UploadError> {
        let key_map = MetadataKeyMap::identity(&placeholder.columns);
        let source = PlaceholderSpectra::new(&placeholder.identity, placeholder.fields);
        self.upload_with_key_map(&source, &key_map)
    }

    fn insert(
        database: &mut D,
        calibration: &WavelengthCalibration,
        identity: SpectraFileIdentity,
        source: &dyn SpectraSource,
        key_map: &MetadataKeyMap,
    ) -> Result<UploadReceipt, UploadError> {
        let record = RecordBuilder::new(calibration, database.attributes()).build(identity, source, key_map)?;
        let receipt = UploadReceipt::for_record(&record);

        database
            .insert_spectral_file(record)
            .map_err(|source| UploadError::InsertFailure {
                filename: receipt.filename.clone(),
                source,
            })?;

        info!(
            "Uploaded {} ({} spectra, {} metadata entries)",
            receipt.filename, receipt.spectrum_count, receipt.metadata_entries
        );
        Ok(receipt)
    }
}

/// Merged ancillary fields waiting to be uploaded onto one placeholder
#[derive(Debug)]
struct PendingPlaceholder {
    identity: PlaceholderIdentity,
    columns: Vec<String>,
    fields: FieldRecord,
}

impl PendingPlaceholder {
    fn new(identity: PlaceholderIdentity) -> Self {
        Self {
            identity,
            columns: Vec::new(),
            fields: FieldRecord::new(),
        }
    }

    /// First occurrence of a column keeps its position and value; a later
    /// value for the same column is dropped with a warning. Returns the
    /// number of dropped values.
    fn merge(&mut self, key_set: &[String], fields: &FieldRecord, table: &str) -> usize {
        let mut dropped = 0;
        for column in key_set {
            if !self.columns.contains(column) {
                self.columns.push(column.clone());
            }
            let Some(value) = fields.get(column) else {
                continue;
            };
            match self.fields.entry(column.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(value.clone());
                }
                Entry::Occupied(kept) => {
                    warn!(
                        "{}: dropping {} = {} from {}, keeping earlier value {}",
                        self.identity.key,
                        column,
                        value,
                        table,
                        kept.get()
                    );
                    dropped += 1;
                }
            }
        }
        dropped
    }
}

/// Mapped columns in table order, followed by mapped columns the table lacks
fn category_key_set(table_columns: &[String], mapped: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::with_capacity(mapped.len());
    for column in table_columns.iter().chain(mapped) {
        if mapped.contains(column) && !keys.contains(column) {
            keys.push(column.clone());
        }
    }
    keys
}
