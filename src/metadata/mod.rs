//! # Metadata Values and Collections
//!
//! Source metadata arrives in two vocabularies (PICO instrument keys and
//! ancillary table columns) as loosely typed [`SourceValue`]s. The service
//! stores typed [`MetadataValue`]s. This module holds both value models, the
//! coercion rules between them, and the per-spectrum containers:
//!
//! - [`MetadataEntry`]: one (attribute id, typed value) pair
//! - [`MetadataCollection`]: ordered, append-only entries for one spectrum
//! - [`FieldRecord`]: one spectrum's (or one table row's) source fields

mod entry;
mod error;
mod value;


use std::collections::HashMap;

pub use entry::{MetadataCollection, MetadataEntry};
pub use error::ValueRejected;
pub use value::{MetadataValue, SourceValue};

/// Source fields for one spectrum or one ancillary table row, keyed by the
/// source vocabulary's field key.
pub type FieldRecord = HashMap<String, SourceValue>;
