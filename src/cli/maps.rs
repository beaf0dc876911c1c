use anyhow::Result;
use std::path::PathBuf;

use spectra_ingest::keymap::{AttributeMapping, KeyMaps, MetadataKeyMap};

use super::session;

/// Print the built-in key maps, and the mapped names a catalog lacks
pub fn run(attributes: Option<PathBuf>) -> Result<()> {
    let key_maps = KeyMaps::default();
    let catalog = match attributes {
        Some(path) => Some(session::load_catalog(Some(&path))?),
        None => None,
    };

    print_map("PICO instrument fields", &key_maps.instrument);
    print_map("Test-CSV fields", &key_maps.csv);
    print_map("Ancillary categories", &key_maps.ancillary);

    if let Some(catalog) = catalog {
        let mut missing = 0;
        println!("Catalog check:");
        for map in [&key_maps.instrument, &key_maps.csv, &key_maps.ancillary] {
            for name in map.attribute_names() {
                if !catalog.contains(name) {
                    println!("  missing: {}", name);
                    missing += 1;
                }
            }
        }
        if missing == 0 {
            println!("  every mapped attribute is in the catalog");
        }
    }

    Ok(())
}

fn print_map(title: &str, map: &MetadataKeyMap) {
    println!("{} ({} keys):", title, map.len());
    for (key, mapping) in map.iter() {
        match mapping {
            AttributeMapping::Single(name) => println!("  {:40} -> {}", key, name),
            AttributeMapping::Columns(names) => println!("  {:40} -> [{}]", key, names.join(", ")),
            AttributeMapping::Unsupported => println!("  {:40} -> (not supported)", key),
        }
    }
    println!();
}
