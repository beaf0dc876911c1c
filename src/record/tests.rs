use super::*;
use crate::keymap::{csv_spectra_map, pico_instrument_map, MetadataKeyMap};
use crate::metadata::MetadataValue;
use crate::service::{AttributeCatalog, Campaign, CampaignId, HierarchyId, ValueKind};
use crate::sources::{CsvSpectra, FileLocation, PicoFile};
use proptest::prelude::*;

fn campaign() -> Campaign {
    Campaign {
        id: CampaignId(1),
        name: "Wheat 2017".to_string(),
    }
}

fn identity(filename: &str) -> SpectraFileIdentity {
    let location = FileLocation::new("/data/pico", filename);
    SpectraFileIdentity::new(&location, "UoE", &campaign(), HierarchyId(3))
}

fn text_catalog(map: &MetadataKeyMap) -> AttributeCatalog {
    let mut catalog = AttributeCatalog::new();
    for (i, name) in map.attribute_names().into_iter().enumerate() {
        catalog.insert(name, i as i32 + 1, ValueKind::Text);
    }
    catalog
}

fn pico(json: &str) -> PicoFile {
    PicoFile::from_reader(json.as_bytes(), FileLocation::new("/data/pico", "plot12.pico")).unwrap()
}

// ============================================================================
// Measurement matrix
// ============================================================================

#[test]
fn test_matrix_starts_zeroed() {
    let matrix = MeasurementMatrix::zeros(2, 4);
    assert_eq!(matrix.rows(), 2);
    assert_eq!(matrix.bins(), 4);
    assert!(matrix.row(1).iter().all(|&v| v == 0.0));
}

#[test]
fn test_row_of_bins_minus_one_pads_last_bin() {
    let bins = 8;
    let mut matrix = MeasurementMatrix::zeros(1, bins);
    let pixels: Vec<f64> = (1..bins).map(|i| i as f64).collect();

    let fill = matrix.fill_row(0, &pixels);

    assert_eq!(fill, RowFill { copied: bins - 1, padded: 1, truncated: 0 });
    assert_eq!(matrix.row(0)[bins - 1], 0.0);
    assert_eq!(&matrix.row(0)[..bins - 1], pixels.as_slice());
}

#[test]
fn test_row_of_exactly_bins_needs_no_padding() {
    let bins = 8;
    let mut matrix = MeasurementMatrix::zeros(1, bins);
    let pixels = vec![2.5; bins];

    let fill = matrix.fill_row(0, &pixels);

    assert_eq!(fill, RowFill { copied: bins, padded: 0, truncated: 0 });
    assert_eq!(matrix.row(0), pixels.as_slice());
}

#[test]
fn test_long_row_is_truncated() {
    let mut matrix = MeasurementMatrix::zeros(1, 3);
    let fill = matrix.fill_row(0, &[1.0, 2.0, 3.0, 4.0, 5.0]);

    assert_eq!(fill.truncated, 2);
    assert_eq!(matrix.row(0), &[1.0, 2.0, 3.0]);
}

#[test]
fn test_matrix_serializes_as_f32_rows() {
    let mut matrix = MeasurementMatrix::zeros(2, 2);
    matrix.fill_row(0, &[0.5, 1.5]);

    let json = serde_json::to_value(&matrix).unwrap();
    assert_eq!(json, serde_json::json!([[0.5, 1.5], [0.0, 0.0]]));
}

mod property_tests {
    use super::*;

    proptest! {
        /// Bins past a short pixel vector are exactly zero and the rest is copied unchanged
        #[test]
        fn test_short_rows_are_zero_padded(
            bins in 1usize..256,
            pixels in prop::collection::vec(-1.0e6f64..1.0e6, 0..256),
        ) {
            let mut matrix = MeasurementMatrix::zeros(2, bins);
            let fill = matrix.fill_row(1, &pixels);
            let row = matrix.row(1);

            let copied = pixels.len().min(bins);
            prop_assert_eq!(fill.copied, copied);
            prop_assert_eq!(fill.copied + fill.padded, bins);
            prop_assert_eq!(&row[..copied], &pixels[..copied]);
            prop_assert!(row[copied..].iter().all(|&v| v == 0.0));
            prop_assert!(matrix.row(0).iter().all(|&v| v == 0.0));
        }
    }
}

// ============================================================================
// Wavelength calibration
// ============================================================================

#[test]
fn test_default_calibration_is_placeholder_linspace() {
    let calibration = WavelengthCalibration::default();
    let axis = calibration.wavelengths();

    assert_eq!(calibration.bins(), DEFAULT_BINS);
    assert_eq!(axis.len(), 2048);
    assert_eq!(axis[0], 1.0);
    assert_eq!(axis[1], 2.0);
    assert_eq!(axis[2047], 2048.0);
}

#[test]
fn test_calibration_deserializes_by_mode() {
    let explicit: WavelengthCalibration =
        serde_json::from_str(r#"{"mode": "explicit", "wavelengths": [400.0, 400.5]}"#).unwrap();
    assert_eq!(explicit.bins(), 2);

    let synthetic: WavelengthCalibration =
        serde_json::from_str(r#"{"mode": "synthetic", "first": 350.0, "last": 1000.0, "bins": 1}"#).unwrap();
    assert_eq!(synthetic.wavelengths(), vec![350.0]);
}

// ============================================================================
// Record builder
// ============================================================================

const FOUR_SPECTRA: &str = r#"{"Spectra": [
    {"Metadata": {"Batch": 1, "Direction": "Upwelling", "Dark": false}, "Pixels": [1.0, 2.0]},
    {"Metadata": {"Batch": 1, "Direction": "Upwelling", "Dark": true}, "Pixels": [3.0]},
    {"Metadata": {"Batch": 1, "Direction": "Downwelling", "Dark": false}, "Pixels": []},
    {"Metadata": {"Batch": 1, "Direction": "Downwelling", "Dark": true}, "Pixels": [4.0, 5.0, 6.0]}
]}"#;

#[test]
fn test_build_pico_record() {
    let map = pico_instrument_map();
    let catalog = text_catalog(&map);
    let calibration = WavelengthCalibration::default();
    let source = pico(FOUR_SPECTRA);

    let record = RecordBuilder::new(&calibration, &catalog)
        .build(identity("plot12.pico"), &source, &map)
        .unwrap();

    assert_eq!(record.spectrum_count(), 4);
    assert_eq!(record.measurements().rows(), 4);
    assert_eq!(record.measurements().bins(), 2048);
    assert_eq!(record.measurements().row(3)[..4], [4.0, 5.0, 6.0, 0.0]);
    assert_eq!(
        record.spectrum_filenames(),
        &["plot12.pico0", "plot12.pico1", "plot12.pico2", "plot12.pico3"]
    );
    assert!(record.wavelengths().iter().all(|w| w.len() == 2048));
    assert_eq!(record.metadata().len(), 4);
    assert!(record.metadata().iter().all(|c| !c.is_empty()));
}

#[test]
fn test_metadata_follows_its_spectrum() {
    let map = pico_instrument_map();
    let catalog = text_catalog(&map);
    let calibration = WavelengthCalibration::default();
    let source = pico(FOUR_SPECTRA);

    let record = RecordBuilder::new(&calibration, &catalog)
        .build(identity("plot12.pico"), &source, &map)
        .unwrap();

    let direction = |i: usize| {
        record.metadata()[i]
            .get(map.attribute_name("Direction").unwrap())
            .map(|e| e.value.clone())
    };
    assert_eq!(direction(0), Some(MetadataValue::Text("Upwelling".to_string())));
    assert_eq!(direction(3), Some(MetadataValue::Text("Downwelling".to_string())));
}

#[test]
fn test_unknown_attribute_name_fails_the_file() {
    let map = pico_instrument_map();
    let catalog = AttributeCatalog::new().with("Batch", 1, ValueKind::Integer);
    let calibration = WavelengthCalibration::default();
    let source = pico(FOUR_SPECTRA);

    let result = RecordBuilder::new(&calibration, &catalog).build(identity("plot12.pico"), &source, &map);

    assert!(matches!(result, Err(UploadError::UnknownAttributeName { .. })));
}

#[test]
fn test_explicit_calibration_sets_bins() {
    let map = MetadataKeyMap::identity(["Batch"]);
    let catalog = AttributeCatalog::new().with("Batch", 1, ValueKind::Integer);
    let calibration = WavelengthCalibration::Explicit {
        wavelengths: vec![400.0, 401.0, 402.0],
    };
    let source = pico(FOUR_SPECTRA);

    let record = RecordBuilder::new(&calibration, &catalog)
        .build(identity("plot12.pico"), &source, &map)
        .unwrap();

    assert_eq!(record.measurements().bins(), 3);
    assert_eq!(record.measurements().row(0), &[1.0, 2.0, 0.0]);
    assert_eq!(record.measurements().row(3), &[4.0, 5.0, 6.0]);
    assert_eq!(record.wavelengths()[0], vec![400.0f32, 401.0, 402.0]);
}

#[test]
fn test_csv_source_wavelengths_take_precedence() {
    let spectra = "400.0,0.1,0.2\n401.0,0.3,0.4\n";
    let metadata = "Plot,7,8\nPhosphorus %,0.31,0.35\n";
    let source = CsvSpectra::from_readers(
        spectra.as_bytes(),
        Some(metadata.as_bytes()),
        FileLocation::new("/data/test", "spectra.csv"),
    )
    .unwrap();

    let map = csv_spectra_map();
    let catalog = AttributeCatalog::new()
        .with("Target ID", 1, ValueKind::Text)
        .with("Nitrate Nitrogen", 2, ValueKind::Double)
        .with("Phosphorus", 3, ValueKind::Double);
    let calibration = WavelengthCalibration::default();

    let record = RecordBuilder::new(&calibration, &catalog)
        .build(identity("spectra.csv"), &source, &map)
        .unwrap();

    assert_eq!(record.spectrum_count(), 2);
    assert_eq!(record.measurements().bins(), 2);
    assert_eq!(record.wavelengths()[1], vec![400.0f32, 401.0]);

    let first = &record.metadata()[0];
    assert_eq!(first.get("Target ID").unwrap().value, MetadataValue::Text("7".to_string()));
    assert_eq!(first.get("Phosphorus").unwrap().value, MetadataValue::Double(0.31));
    assert!(first.get("Nitrate Nitrogen").is_none());
    assert_eq!(record.metadata_entry_count(), 4);
}

#[test]
fn test_record_json_shape() {
    let map = MetadataKeyMap::identity(["Batch"]);
    let catalog = AttributeCatalog::new().with("Batch", 5, ValueKind::Integer);
    let calibration = WavelengthCalibration::Synthetic {
        first: 1.0,
        last: 2.0,
        bins: 2,
    };
    let source = pico(r#"{"Spectra": [{"Metadata": {"Batch": 4}, "Pixels": [9.0]}]}"#);

    let record = RecordBuilder::new(&calibration, &catalog)
        .build(identity("plot12.pico"), &source, &map)
        .unwrap();
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["identity"]["company"], "UoE");
    assert_eq!(json["identity"]["campaign_id"], 1);
    assert_eq!(json["identity"]["hierarchy_id"], 3);
    assert_eq!(json["measurements"], serde_json::json!([[9.0, 0.0]]));
    assert_eq!(json["metadata"][0][0]["attribute"], 5);
    assert_eq!(json["metadata"][0][0]["value"]["kind"], "integer");
}
