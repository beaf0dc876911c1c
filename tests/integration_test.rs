//! Integration tests for spectra-ingest
//!
//! These tests drive the full pipeline from files on disk to records held by
//! the in-memory database.

use spectra_ingest::ingest::{SpectraUploader, UploadConfig};
use spectra_ingest::keymap::ancillary_category_map;
use spectra_ingest::metadata::MetadataValue;
use spectra_ingest::record::{SpectralRecord, UploadError};
use spectra_ingest::service::{
    AttributeCatalog, AttributeDescriptor, AttributeDictionary, Campaign, CampaignId, HierarchyId,
    InMemoryDatabase, ServiceError, SpectralDatabase, ValueKind,
};
use spectra_ingest::sources::{AncillaryDirectory, CsvSpectra, PicoFile};
use std::cell::Cell;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Catalog covering every PICO instrument attribute, stored as text
fn pico_catalog() -> AttributeCatalog {
    let map = spectra_ingest::keymap::pico_instrument_map();
    let mut catalog = AttributeCatalog::new();
    for (i, name) in map.attribute_names().into_iter().enumerate() {
        catalog.insert(name, i as i32 + 1, ValueKind::Text);
    }
    catalog
}

/// Catalog covering every ancillary column
fn ancillary_catalog() -> AttributeCatalog {
    let map = ancillary_category_map();
    let mut catalog = AttributeCatalog::new();
    for (i, name) in map.attribute_names().into_iter().enumerate() {
        let kind = if name == "Fertiliser_level" { ValueKind::Text } else { ValueKind::Double };
        catalog.insert(name, 100 + i as i32, kind);
    }
    catalog
}

fn config_in(dir: &Path) -> UploadConfig {
    UploadConfig {
        placeholder_dir: dir.join("picotest"),
        ..UploadConfig::for_campaign("Wheat 2017")
    }
}

/// A PICO document with two upwelling and two downwelling spectra
fn write_pico(dir: &Path, name: &str, pixels: usize) -> std::path::PathBuf {
    let spectra: Vec<serde_json::Value> = ["Upwelling", "Upwelling", "Downwelling", "Downwelling"]
        .iter()
        .enumerate()
        .map(|(i, direction)| {
            serde_json::json!({
                "Metadata": {
                    "Batch": 1,
                    "Direction": direction,
                    "IntegrationTime": 120.5,
                    "Run": i,
                    "SerialNumber": "QEP01234",
                    "name": format!("{}_{}", name, i),
                },
                "Pixels": (0..pixels).map(|p| (p + i) as f64).collect::<Vec<_>>(),
            })
        })
        .collect();

    let path = dir.join(name);
    fs::write(&path, serde_json::json!({ "Spectra": spectra }).to_string()).unwrap();
    path
}

// ============================================================================
// Counting doubles
// ============================================================================

/// Dictionary that counts every lookup
struct CountingDictionary {
    catalog: AttributeCatalog,
    lookups: Cell<usize>,
}

impl AttributeDictionary for CountingDictionary {
    fn lookup(&self, name: &str) -> Option<AttributeDescriptor> {
        self.lookups.set(self.lookups.get() + 1);
        self.catalog.lookup(name)
    }
}

/// In-memory database whose attribute lookups are counted
struct CountingDatabase {
    inner: InMemoryDatabase,
    dictionary: CountingDictionary,
}

impl CountingDatabase {
    fn new(catalog: AttributeCatalog) -> Self {
        Self {
            inner: InMemoryDatabase::new(AttributeCatalog::new()),
            dictionary: CountingDictionary {
                catalog,
                lookups: Cell::new(0),
            },
        }
    }
}

impl SpectralDatabase for CountingDatabase {
    fn insert_campaign(&mut self, name: &str) -> Result<CampaignId, ServiceError> {
        self.inner.insert_campaign(name)
    }

    fn sub_hierarchy_id(
        &mut self,
        campaign: &Campaign,
        name: &str,
        parent: HierarchyId,
    ) -> Result<Option<HierarchyId>, ServiceError> {
        self.inner.sub_hierarchy_id(campaign, name, parent)
    }

    fn attributes(&self) -> &dyn AttributeDictionary {
        &self.dictionary
    }

    fn insert_spectral_file(&mut self, record: SpectralRecord) -> Result<(), ServiceError> {
        self.inner.insert_spectral_file(record)
    }
}

fn ancillary_dir(root: &TempDir) -> std::path::PathBuf {
    let dir = root.path().join("ancillary");
    fs::create_dir_all(&dir).unwrap();
    dir
}

// ============================================================================
// PICO uploads
// ============================================================================

/// A four-spectrum PICO file becomes one 4 × 2048 record
#[test]
fn test_pico_file_upload() {
    let dir = tempdir().unwrap();
    let path = write_pico(dir.path(), "plot12.pico", 2040);

    let database = InMemoryDatabase::new(pico_catalog());
    let mut uploader = SpectraUploader::connect(database, config_in(dir.path())).unwrap();

    let receipt = uploader.upload(&PicoFile::open(&path).unwrap()).unwrap();
    assert_eq!(receipt.filename, "plot12.pico");
    assert_eq!(receipt.spectrum_count, 4);

    let database = uploader.into_database();
    assert_eq!(database.inserted().len(), 1);

    let record = &database.inserted()[0];
    assert_eq!(record.spectrum_count(), 4);
    assert_eq!(record.measurements().rows(), 4);
    assert_eq!(record.measurements().bins(), 2048);
    assert_eq!(record.metadata().len(), 4);
    assert!(record.metadata().iter().all(|collection| !collection.is_empty()));
    assert_eq!(
        record.spectrum_filenames(),
        &["plot12.pico0", "plot12.pico1", "plot12.pico2", "plot12.pico3"]
    );

    // Short pixel vectors are zero-padded up to the bin count
    let last = record.measurements().row(3);
    assert_eq!(last[2039], 2042.0);
    assert!(last[2040..].iter().all(|&v| v == 0.0));

    assert_eq!(
        record.metadata()[2].get("Direction").unwrap().value,
        MetadataValue::Text("Downwelling".to_string())
    );
}

/// One file the service rejects does not stop the rest of the batch
#[test]
fn test_batch_isolates_insert_failure() {
    let dir = tempdir().unwrap();
    let paths = vec![
        write_pico(dir.path(), "plot12.pico", 16),
        write_pico(dir.path(), "plot13.pico", 16),
        write_pico(dir.path(), "plot14.pico", 16),
    ];

    let database = InMemoryDatabase::new(pico_catalog()).reject_inserts_for("plot13.pico");
    let mut uploader = SpectraUploader::connect(database, config_in(dir.path())).unwrap();

    let summary = uploader.upload_pico_files(&paths);

    assert!(!summary.is_success());
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.uploaded.len(), 2);
    assert_eq!(summary.failures.len(), 1);
    assert!(matches!(
        summary.failures[0].error,
        UploadError::InsertFailure { ref filename, .. } if filename == "plot13.pico"
    ));

    let database = uploader.into_database();
    let names: Vec<&str> = database
        .inserted()
        .iter()
        .map(|r| r.identity().filename.as_str())
        .collect();
    assert_eq!(names, vec!["plot12.pico", "plot14.pico"]);
}

/// A file that cannot be read fails alone
#[test]
fn test_batch_reports_unreadable_file() {
    let dir = tempdir().unwrap();
    let good = write_pico(dir.path(), "plot12.pico", 16);
    let broken = dir.path().join("broken.pico");
    fs::write(&broken, "{ not json").unwrap();

    let database = InMemoryDatabase::new(pico_catalog());
    let mut uploader = SpectraUploader::connect(database, config_in(dir.path())).unwrap();

    let summary = uploader.upload_pico_files(&[good, broken]);

    assert_eq!(summary.uploaded.len(), 1);
    assert_eq!(summary.failures.len(), 1);
    assert!(matches!(summary.failures[0].error, UploadError::SourceError(_)));
}

/// An attribute missing from the dictionary fails the whole file
#[test]
fn test_missing_attribute_fails_file() {
    let dir = tempdir().unwrap();
    let path = write_pico(dir.path(), "plot12.pico", 16);

    let catalog = AttributeCatalog::new().with("Batch", 1, ValueKind::Integer);
    let database = InMemoryDatabase::new(catalog);
    let mut uploader = SpectraUploader::connect(database, config_in(dir.path())).unwrap();

    let result = uploader.upload(&PicoFile::open(&path).unwrap());

    assert!(matches!(result, Err(UploadError::UnknownAttributeName { .. })));
    assert!(uploader.database().inserted().is_empty());
}

/// Inserted records are exported as JSON upload bundles
#[test]
fn test_export_writes_record_json() {
    let dir = tempdir().unwrap();
    let path = write_pico(dir.path(), "plot12.pico", 8);
    let export = dir.path().join("export");

    let database = InMemoryDatabase::new(pico_catalog()).with_export_dir(&export);
    let mut uploader = SpectraUploader::connect(database, config_in(dir.path())).unwrap();
    uploader.upload(&PicoFile::open(&path).unwrap()).unwrap();

    let text = fs::read_to_string(export.join("plot12.pico.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json["spectrum_count"], 4);
    assert_eq!(json["identity"]["company"], "UoE");
    assert_eq!(json["measurements"].as_array().unwrap().len(), 4);
    assert_eq!(json["measurements"][0].as_array().unwrap().len(), 2048);
}

// ============================================================================
// Test-CSV uploads
// ============================================================================

#[test]
fn test_csv_upload_uses_file_wavelengths() {
    let dir = tempdir().unwrap();
    let spectra_path = dir.path().join("spectra.csv");
    fs::write(&spectra_path, "400,0.1,0.2\n401,0.3,0.4\n402,0.5,0.6\n").unwrap();
    fs::write(
        dir.path().join("metadata.csv"),
        "Plot,12,13\nNitrate Nitrogen Mg/Kg,4.5,5.0\nPhosphorus %,NA,0.3\n",
    )
    .unwrap();

    let catalog = AttributeCatalog::new()
        .with("Target ID", 1, ValueKind::Text)
        .with("Nitrate Nitrogen", 2, ValueKind::Double)
        .with("Phosphorus", 3, ValueKind::Double);
    let database = InMemoryDatabase::new(catalog);
    let mut uploader = SpectraUploader::connect(database, config_in(dir.path())).unwrap();

    let source = CsvSpectra::open(&spectra_path, None).unwrap();
    let receipt = uploader.upload(&source).unwrap();
    assert_eq!(receipt.spectrum_count, 2);

    let database = uploader.into_database();
    let record = &database.inserted()[0];
    assert_eq!(record.measurements().bins(), 3);
    assert_eq!(record.measurements().row(1), &[0.2, 0.4, 0.6]);
    assert_eq!(record.wavelengths()[0], vec![400.0_f32, 401.0, 402.0]);

    // Column 1 of the metadata table belongs to spectrum 0
    assert_eq!(
        record.metadata()[0].get("Target ID").unwrap().value,
        MetadataValue::Text("12".to_string())
    );
    // NA is skipped for that spectrum only
    assert!(record.metadata()[0].get("Phosphorus").is_none());
    assert_eq!(
        record.metadata()[1].get("Phosphorus").unwrap().value,
        MetadataValue::Double(0.3)
    );
}

// ============================================================================
// Ancillary uploads
// ============================================================================

/// A Height row yields one entry per mapped column, in column order
#[test]
fn test_height_row_entries_follow_column_order() {
    let root = tempdir().unwrap();
    let tables = ancillary_dir(&root);
    fs::write(
        tables.join("Height_20170608.csv"),
        "Plot,Fertiliser_level,Height1,Height2,Height3,Height4,Height5,Plot_height\n\
         12,N1,80.5,81.0,79.5,80.0,82.5,80.7\n",
    )
    .unwrap();

    let database = InMemoryDatabase::new(ancillary_catalog());
    let mut uploader = SpectraUploader::connect(database, config_in(root.path())).unwrap();

    let summary = uploader.upload_ancillary(&AncillaryDirectory::new(), &tables).unwrap();
    assert!(summary.is_success());
    assert_eq!(summary.placeholders, 1);

    let database = uploader.into_database();
    let record = &database.inserted()[0];
    assert_eq!(record.identity().filename, "12_20170608.pico");

    let names: Vec<&str> = record.metadata()[0].names().collect();
    assert_eq!(
        names,
        vec!["Fertiliser_level", "Height1", "Height2", "Height3", "Height4", "Height5", "Plot_height"]
    );
    assert_eq!(
        record.metadata()[0].get("Plot_height").unwrap().value,
        MetadataValue::Double(80.7)
    );
}

/// A category without attribute counterparts is skipped before any lookup
#[test]
fn test_lai_table_makes_no_lookups() {
    let root = tempdir().unwrap();
    let tables = ancillary_dir(&root);
    fs::write(tables.join("LAI_20170608.csv"), "Plot,LAI\n12,3.1\n13,2.9\n").unwrap();

    let database = CountingDatabase::new(ancillary_catalog());
    let mut uploader = SpectraUploader::connect(database, config_in(root.path())).unwrap();

    let summary = uploader.upload_ancillary(&AncillaryDirectory::new(), &tables).unwrap();

    assert_eq!(summary.skipped_categories, vec!["LAI_20170608".to_string()]);
    assert_eq!(summary.placeholders, 0);
    assert!(summary.uploaded.is_empty());

    let database = uploader.into_database();
    assert_eq!(database.dictionary.lookups.get(), 0);
    assert!(database.inner.inserted().is_empty());
    assert!(!root.path().join("picotest/12_20170608.pico").exists());
}

/// The same plot and date in two categories share one placeholder upload
#[test]
fn test_categories_merge_onto_one_placeholder() {
    let root = tempdir().unwrap();
    let tables = ancillary_dir(&root);
    fs::write(tables.join("GS_20170608.csv"), "Plot,Fertiliser_level,GS\n12,N1,31\n").unwrap();
    fs::write(tables.join("pH_2017-06-08.csv"), "Plot,Fertiliser_level,pH\n12,N1,6.8\n").unwrap();

    let database = InMemoryDatabase::new(ancillary_catalog());
    let mut uploader = SpectraUploader::connect(database, config_in(root.path())).unwrap();

    let summary = uploader.upload_ancillary(&AncillaryDirectory::new(), &tables).unwrap();
    assert!(summary.is_success());
    assert_eq!(summary.placeholders, 1);
    assert_eq!(summary.uploaded.len(), 1);

    let database = uploader.into_database();
    let record = &database.inserted()[0];
    let names: Vec<&str> = record.metadata()[0].names().collect();
    assert_eq!(names, vec!["Fertiliser_level", "GS", "pH"]);
    assert_eq!(
        record.metadata()[0].get("GS").unwrap().value,
        MetadataValue::Double(31.0)
    );
}

/// Placeholders written by an earlier run are reused, not rewritten
#[test]
fn test_second_run_reuses_placeholders() {
    let root = tempdir().unwrap();
    let tables = ancillary_dir(&root);
    fs::write(tables.join("SPAD_20170608.csv"), "Plot,SPAD1\n12,41.2\n").unwrap();
    let placeholder = root.path().join("picotest/12_20170608.pico");

    let database = InMemoryDatabase::new(ancillary_catalog());
    let mut uploader = SpectraUploader::connect(database, config_in(root.path())).unwrap();
    uploader.upload_ancillary(&AncillaryDirectory::new(), &tables).unwrap();
    let first = fs::read_to_string(&placeholder).unwrap();

    let summary = uploader.upload_ancillary(&AncillaryDirectory::new(), &tables).unwrap();

    assert!(summary.is_success());
    assert_eq!(fs::read_to_string(&placeholder).unwrap(), first);
    assert_eq!(uploader.database().inserted().len(), 2);
    assert_eq!(fs::read_dir(root.path().join("picotest")).unwrap().count(), 1);
}
