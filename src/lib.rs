//! # spectra-ingest - Field Spectra Metadata Mapping and Upload
//!
//! `spectra-ingest` maps field spectrometer output and ancillary plot
//! measurements onto the attribute model of a spectral database service, and
//! assembles one upload record per spectra file.
//!
//! ## Key Features
//!
//! - **Three Vocabularies Reconciled**: Instrument field keys, ancillary
//!   column names and the service's attribute dictionary are joined through
//!   immutable key maps and an injected dictionary.
//!
//! - **Per-Field Failure Isolation**: A missing field, a rejected type or an
//!   unknown attribute skips exactly that field, with a warning, and never the
//!   rest of the spectrum.
//!
//! - **Rectangular Upload Units**: Every spectrum of a file is zero-padded into
//!   one spectra × bins matrix and submitted in a single insert call.
//!
//! - **Placeholder Spectra**: Ancillary rows without a physical scan are
//!   attached to measurement-free placeholder PICO files, written once per
//!   plot and date and reused across runs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spectra_ingest::ingest::{SpectraUploader, UploadConfig};
//! use spectra_ingest::service::{AttributeCatalog, InMemoryDatabase};
//! use spectra_ingest::sources::PicoFile;
//!
//! let catalog = AttributeCatalog::from_json_file("attributes.json")?;
//! let database = InMemoryDatabase::new(catalog);
//! let mut uploader = SpectraUploader::connect(database, UploadConfig::for_campaign("Wheat 2017"))?;
//!
//! let pico = PicoFile::open("plot12.pico")?;
//! let receipt = uploader.upload(&pico)?;
//! println!("{} spectra, {} metadata entries", receipt.spectrum_count, receipt.metadata_entries);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules, leaves first:
//!
//! - [`service`]: database and dictionary traits, identifiers, in-memory database
//! - [`metadata`]: source values, typed service values, metadata collections
//! - [`keymap`]: instrument, test-CSV and ancillary key maps
//! - [`resolver`]: field key → attribute handle
//! - [`assembler`]: per-spectrum metadata assembly with per-field outcomes
//! - [`sources`]: PICO, test-CSV and ancillary table readers
//! - [`record`]: upload record builder
//! - [`dummy`]: placeholder spectra for ancillary rows
//! - [`ingest`]: upload sessions, batches and ancillary runs
//!
//! ## Data Flow
//!
//! ```text
//! files ──► sources ──► key maps ──► resolver ──► assembler ──► record builder ──► insert
//!                                        ▲
//!                              attribute dictionary
//! ```

// Documentation lints
#![warn(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod assembler;
pub mod dummy;
pub mod ingest;
pub mod keymap;
pub mod metadata;
pub mod record;
pub mod resolver;
pub mod service;
pub mod sources;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::assembler::{AssemblyReport, FieldOutcome, MetadataAssembler};
    pub use crate::dummy::{PlaceholderError, PlaceholderIdentity, PlaceholderSpectra, PlotDummyRegistry};
    pub use crate::ingest::{
        AncillarySummary, BatchSummary, CategoryPolicy, FileFailure, SpectraUploader, UploadConfig,
        UploadReceipt,
    };
    pub use crate::keymap::{
        ancillary_category_map, csv_spectra_map, pico_instrument_map, AttributeMapping, KeyMaps,
        MetadataKeyMap,
    };
    pub use crate::metadata::{
        FieldRecord, MetadataCollection, MetadataEntry, MetadataValue, SourceValue, ValueRejected,
    };
    pub use crate::record::{
        MeasurementMatrix, RecordBuilder, SpectraFileIdentity, SpectralRecord, UploadError,
        WavelengthCalibration,
    };
    pub use crate::resolver::{AttributeHandle, AttributeResolver, ResolveError};
    pub use crate::service::{
        AttributeCatalog, AttributeDescriptor, AttributeDictionary, AttributeId, Campaign,
        CampaignId, HierarchyId, InMemoryDatabase, ServiceError, SpectralDatabase, ValueKind,
    };
    pub use crate::sources::{
        AncillaryDirectory, AncillaryExtraction, AncillarySource, AncillaryTable, AncillaryTableKey, CsvSpectra,
        FileLocation, PicoFile, SourceError, SourceFormat, SpectraSource,
    };
}

pub use record::UploadError;
