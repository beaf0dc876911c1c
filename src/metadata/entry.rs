use serde::Serialize;

use super::MetadataValue;
use crate::service::AttributeId;

/// One attribute value attached to one spectrum
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataEntry {
    /// Service attribute identifier
    pub attribute: AttributeId,
    /// Canonical attribute name, kept for logs and exports
    pub name: String,
    /// Typed value
    pub value: MetadataValue,
}

/// Ordered, append-only metadata for exactly one spectrum
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetadataCollection {
    entries: Vec<MetadataEntry>,
}

impl MetadataCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn add_entry(&mut self, entry: MetadataEntry) {
        self.entries.push(entry);
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[MetadataEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been appended
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry for the named attribute
    pub fn get(&self, name: &str) -> Option<&MetadataEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Attribute names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}
