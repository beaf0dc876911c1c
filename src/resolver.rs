//! # Attribute Resolver
//!
//! Turns a source field key into a handle on the service attribute it maps
//! to: key → attribute name through the active [`MetadataKeyMap`], then
//! name → [`AttributeDescriptor`] through the injected
//! [`AttributeDictionary`].

use crate::keymap::MetadataKeyMap;
use crate::metadata::{MetadataEntry, MetadataValue, SourceValue, ValueRejected};
use crate::service::{AttributeDescriptor, AttributeDictionary, AttributeId, ValueKind};

/// Errors raised while resolving a field key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The key has no single-name entry in the active key map
    #[error("Field key '{0}' has no attribute mapping")]
    UnmappedKey(String),

    /// The service dictionary has no attribute with the mapped name
    #[error("Attribute '{name}' (mapped from '{key}') is not known to the service")]
    UnknownAttributeName {
        /// Source field key
        key: String,
        /// Mapped attribute name missing from the dictionary
        name: String,
    },
}

/// Metadata entry shell bound to one service attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeHandle {
    descriptor: AttributeDescriptor,
}

impl AttributeHandle {
    /// Attribute identifier this handle is bound to
    pub fn id(&self) -> AttributeId {
        self.descriptor.id
    }

    /// Canonical attribute name
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Value kind the service stores for this attribute
    pub fn kind(&self) -> ValueKind {
        self.descriptor.kind
    }

    /// Set the handle's value from a native source value.
    pub fn entry(&self, value: &SourceValue) -> Result<MetadataEntry, ValueRejected> {
        let value = MetadataValue::coerce(&self.descriptor.name, self.descriptor.kind, value)?;
        Ok(MetadataEntry {
            attribute: self.descriptor.id,
            name: self.descriptor.name.clone(),
            value,
        })
    }
}

/// Resolves field keys against one key map and one attribute dictionary
#[derive(Clone, Copy)]
pub struct AttributeResolver<'a> {
    key_map: &'a MetadataKeyMap,
    dictionary: &'a dyn AttributeDictionary,
}

impl<'a> AttributeResolver<'a> {
    /// Create a resolver for `key_map` backed by `dictionary`
    pub fn new(key_map: &'a MetadataKeyMap, dictionary: &'a dyn AttributeDictionary) -> Self {
        Self { key_map, dictionary }
    }

    /// The key map this resolver translates with
    pub fn key_map(&self) -> &'a MetadataKeyMap {
        self.key_map
    }

    /// Resolve `field_key` to a handle on its service attribute
    pub fn resolve(&self, field_key: &str) -> Result<AttributeHandle, ResolveError> {
        let name = self
            .key_map
            .attribute_name(field_key)
            .ok_or_else(|| ResolveError::UnmappedKey(field_key.to_string()))?;

        let descriptor = self
            .dictionary
            .lookup(name)
            .ok_or_else(|| ResolveError::UnknownAttributeName {
                key: field_key.to_string(),
                name: name.to_string(),
            })?;

        Ok(AttributeHandle { descriptor })
    }

    /// Resolve every key once, stopping at the first failure.
    pub fn verify<I, K>(&self, keys: I) -> Result<(), ResolveError>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for key in keys {
            self.resolve(key.as_ref())?;
        }
        Ok(())
    }
}
