use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{AttributeDescriptor, AttributeDictionary, AttributeId, ServiceError, ValueKind};

/// Catalog entry as stored in an attribute catalog JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogEntry {
    id: i32,
    kind: ValueKind,
}

/// Attribute dictionary held in memory.
///
/// The on-disk form is a JSON object keyed by attribute name:
///
/// ```json
/// {
///   "Integration Time": { "id": 12, "kind": "double" },
///   "Instrument Serial Number": { "id": 31, "kind": "text" }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AttributeCatalog {
    attributes: HashMap<String, AttributeDescriptor>,
}

impl AttributeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an attribute, replacing any previous entry with the same name
    pub fn insert(&mut self, name: &str, id: i32, kind: ValueKind) {
        self.attributes.insert(
            name.to_string(),
            AttributeDescriptor {
                id: AttributeId(id),
                name: name.to_string(),
                kind,
            },
        );
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, name: &str, id: i32, kind: ValueKind) -> Self {
        self.insert(name, id, kind);
        self
    }

    /// Number of attributes in the catalog
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// True if the catalog has no attributes
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// True if the catalog knows `name`
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Load a catalog from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ServiceError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a catalog from any JSON reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ServiceError> {
        let entries: BTreeMap<String, CatalogEntry> = serde_json::from_reader(reader)?;
        let mut catalog = Self::new();
        for (name, entry) in entries {
            catalog.insert(&name, entry.id, entry.kind);
        }
        Ok(catalog)
    }

    /// Serialize to the JSON catalog form, sorted by attribute name
    pub fn to_json(&self) -> Result<String, ServiceError> {
        let entries: BTreeMap<&str, CatalogEntry> = self
            .attributes
            .values()
            .map(|d| {
                (
                    d.name.as_str(),
                    CatalogEntry {
                        id: d.id.0,
                        kind: d.kind,
                    },
                )
            })
            .collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }
}

impl AttributeDictionary for AttributeCatalog {
    fn lookup(&self, name: &str) -> Option<AttributeDescriptor> {
        self.attributes.get(name).cloned()
    }
}
