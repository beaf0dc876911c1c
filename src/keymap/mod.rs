//! # Metadata Key Maps
//!
//! Static translations from source vocabularies to service attribute names:
//!
//! - [`pico_instrument_map`]: PICO instrument field key → attribute name
//! - [`ancillary_category_map`]: ancillary category → ordered column tuple
//! - [`csv_spectra_map`]: test-CSV metadata row label → attribute name
//!
//! A mapping value is an [`AttributeMapping`], a tagged union of a single
//! name, an ordered tuple of names, or the empty mapping ("not supported").

mod ancillary;
mod csv;
mod instrument;


use std::collections::HashMap;

pub use ancillary::{ancillary_category_map, category};
pub use self::csv::csv_spectra_map;
pub use instrument::pico_instrument_map;

use crate::sources::SourceFormat;

/// Errors raised by key map lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyMapError {
    /// Ancillary category with no entry in the category map
    #[error("Unknown ancillary category: {0}")]
    UnknownCategory(String),
}

/// What one source key maps to in the service vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeMapping {
    /// A single attribute name
    Single(String),
    /// An ordered tuple of attribute names (multi-column ancillary category)
    Columns(Vec<String>),
    /// Empty mapping: the key is known but has no attribute counterpart yet
    Unsupported,
}

impl AttributeMapping {
    /// Mapping to one attribute name
    pub fn single(name: &str) -> Self {
        AttributeMapping::Single(name.to_string())
    }

    /// Mapping to an ordered column tuple. An empty tuple is the empty mapping.
    pub fn columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            AttributeMapping::Unsupported
        } else {
            AttributeMapping::Columns(names)
        }
    }

    /// Attribute names covered by this mapping, in order
    pub fn names(&self) -> &[String] {
        match self {
            AttributeMapping::Single(name) => std::slice::from_ref(name),
            AttributeMapping::Columns(names) => names,
            AttributeMapping::Unsupported => &[],
        }
    }

    /// True for the empty mapping
    pub fn is_unsupported(&self) -> bool {
        matches!(self, AttributeMapping::Unsupported)
    }
}

/// Ordered, immutable map from source key to [`AttributeMapping`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataKeyMap {
    entries: Vec<(String, AttributeMapping)>,
    index: HashMap<String, usize>,
}

impl MetadataKeyMap {
    /// Map where every column maps to an attribute of the same name.
    ///
    /// Ancillary column headers already use the service vocabulary, so a
    /// category's columns are resolved through an identity map.
    pub fn identity<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        columns
            .into_iter()
            .map(|c| {
                let c = c.as_ref();
                (c.to_string(), AttributeMapping::single(c))
            })
            .collect()
    }

    /// Mapping for `key`
    pub fn get(&self, key: &str) -> Option<&AttributeMapping> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// The single attribute name for `key`, if `key` maps to exactly one name
    pub fn attribute_name(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            AttributeMapping::Single(name) => Some(name),
            _ => None,
        }
    }

    /// True if `key` has an entry
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Source keys in map order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// (source key, mapping) pairs in map order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeMapping)> {
        self.entries.iter().map(|(k, m)| (k.as_str(), m))
    }

    /// Number of source keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the map has no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ordered column tuple of an ancillary category.
    ///
    /// `Ok(None)` for the empty mapping, an error for a category the map does
    /// not know at all.
    pub fn category_columns(&self, category: &str) -> Result<Option<&[String]>, KeyMapError> {
        match self.get(category) {
            None => Err(KeyMapError::UnknownCategory(category.to_string())),
            Some(AttributeMapping::Unsupported) => Ok(None),
            Some(mapping) => Ok(Some(mapping.names())),
        }
    }

    /// Every attribute name referenced by the map, in map order, without repeats
    pub fn attribute_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (_, mapping) in &self.entries {
            for name in mapping.names() {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }
}

impl<K: Into<String>> FromIterator<(K, AttributeMapping)> for MetadataKeyMap {
    /// Later duplicates of a key replace the earlier mapping in place.
    fn from_iter<T: IntoIterator<Item = (K, AttributeMapping)>>(iter: T) -> Self {
        let mut map = MetadataKeyMap::default();
        for (key, mapping) in iter {
            let key = key.into();
            match map.index.get(&key) {
                Some(&i) => map.entries[i].1 = mapping,
                None => {
                    map.index.insert(key.clone(), map.entries.len());
                    map.entries.push((key, mapping));
                }
            }
        }
        map
    }
}

/// The full set of key maps an upload session works with
#[derive(Debug, Clone)]
pub struct KeyMaps {
    /// PICO instrument field map
    pub instrument: MetadataKeyMap,
    /// Test-CSV metadata map
    pub csv: MetadataKeyMap,
    /// Ancillary category map
    pub ancillary: MetadataKeyMap,
}

impl Default for KeyMaps {
    fn default() -> Self {
        Self {
            instrument: pico_instrument_map(),
            csv: csv_spectra_map(),
            ancillary: ancillary_category_map(),
        }
    }
}

impl KeyMaps {
    /// Key map used for spectra files of the given format
    pub fn for_format(&self, format: SourceFormat) -> &MetadataKeyMap {
        match format {
            SourceFormat::Pico => &self.instrument,
            SourceFormat::Csv => &self.csv,
        }
    }
}
