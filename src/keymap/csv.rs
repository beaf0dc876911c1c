use super::{AttributeMapping, MetadataKeyMap};

/// Key map for the row labels of a test-CSV `metadata.csv`
pub fn csv_spectra_map() -> MetadataKeyMap {
    [
        ("Plot", "Target ID"),
        ("Nitrate Nitrogen Mg/Kg", "Nitrate Nitrogen"),
        ("Phosphorus %", "Phosphorus"),
    ]
    .into_iter()
    .map(|(key, name)| (key, AttributeMapping::single(name)))
    .collect()
}
