//! # Per-Spectrum Metadata Assembler
//!
//! Builds one spectrum's [`MetadataCollection`] from its source fields. Each
//! key in the key set ends in exactly one [`FieldOutcome`]; a failed field is
//! logged and skipped and never stops the remaining keys.

use log::{debug, warn};

use crate::metadata::{FieldRecord, MetadataCollection, SourceValue, ValueRejected};
use crate::resolver::AttributeResolver;
use crate::service::AttributeId;

/// What happened to one field key during assembly
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    /// Value stored in its native type
    Added {
        /// Source field key
        key: String,
        /// Attribute the entry was bound to
        attribute: AttributeId,
    },
    /// Native type rejected; stored from its string form on the retry
    AddedAsText {
        /// Source field key
        key: String,
        /// Attribute the entry was bound to
        attribute: AttributeId,
        /// Rejection of the native value
        rejected: ValueRejected,
    },
    /// Key absent from this spectrum's source record
    MissingField {
        /// Source field key
        key: String,
    },
    /// Native and string forms both rejected
    TypeCoercion {
        /// Source field key
        key: String,
        /// Rejection of the string retry
        error: ValueRejected,
    },
    /// Null source value, or the attribute could not be looked up
    AttributeNull {
        /// Source field key
        key: String,
        /// Human-readable cause
        reason: String,
    },
}

impl FieldOutcome {
    /// Source field key this outcome is about
    pub fn key(&self) -> &str {
        match self {
            FieldOutcome::Added { key, .. }
            | FieldOutcome::AddedAsText { key, .. }
            | FieldOutcome::MissingField { key }
            | FieldOutcome::TypeCoercion { key, .. }
            | FieldOutcome::AttributeNull { key, .. } => key,
        }
    }

    /// True if an entry was appended for this key
    pub fn is_added(&self) -> bool {
        matches!(self, FieldOutcome::Added { .. } | FieldOutcome::AddedAsText { .. })
    }
}

/// Per-field outcomes for one spectrum
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssemblyReport {
    /// Spectrum index the report belongs to
    pub spectrum_index: usize,
    /// One outcome per key, in key set order
    pub outcomes: Vec<FieldOutcome>,
}

impl AssemblyReport {
    /// Number of entries appended
    pub fn added(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_added()).count()
    }

    /// Outcomes of the keys that were skipped
    pub fn skipped(&self) -> impl Iterator<Item = &FieldOutcome> {
        self.outcomes.iter().filter(|o| !o.is_added())
    }
}

/// Assembles per-spectrum metadata through an [`AttributeResolver`]
#[derive(Clone, Copy)]
pub struct MetadataAssembler<'a> {
    resolver: AttributeResolver<'a>,
}

impl<'a> MetadataAssembler<'a> {
    /// Create an assembler resolving through `resolver`
    pub fn new(resolver: AttributeResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Append entries for `key_set` read from `records[spectrum_index]`.
    ///
    /// Every key is attempted; failures are reported, never returned.
    pub fn assemble<I, K>(
        &self,
        collection: &mut MetadataCollection,
        records: &[FieldRecord],
        spectrum_index: usize,
        key_set: I,
    ) -> AssemblyReport
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let record = records.get(spectrum_index);
        let outcomes = key_set
            .into_iter()
            .map(|key| {
                let outcome = self.assemble_field(collection, record, key.as_ref());
                log_outcome(spectrum_index, &outcome);
                outcome
            })
            .collect();

        AssemblyReport {
            spectrum_index,
            outcomes,
        }
    }

    fn assemble_field(
        &self,
        collection: &mut MetadataCollection,
        record: Option<&FieldRecord>,
        key: &str,
    ) -> FieldOutcome {
        let Some(value) = record.and_then(|r| r.get(key)) else {
            return FieldOutcome::MissingField { key: key.to_string() };
        };

        let handle = match self.resolver.resolve(key) {
            Ok(handle) => handle,
            Err(err) => {
                return FieldOutcome::AttributeNull {
                    key: key.to_string(),
                    reason: err.to_string(),
                }
            }
        };

        match handle.entry(value) {
            Ok(entry) => {
                collection.add_entry(entry);
                FieldOutcome::Added {
                    key: key.to_string(),
                    attribute: handle.id(),
                }
            }
            Err(rejected @ ValueRejected::Null { .. }) => FieldOutcome::AttributeNull {
                key: key.to_string(),
                reason: rejected.to_string(),
            },
            Err(rejected) => {
                let text = SourceValue::Text(value.to_string());
                match handle.entry(&text) {
                    Ok(entry) => {
                        collection.add_entry(entry);
                        FieldOutcome::AddedAsText {
                            key: key.to_string(),
                            attribute: handle.id(),
                            rejected,
                        }
                    }
                    Err(error) => FieldOutcome::TypeCoercion {
                        key: key.to_string(),
                        error,
                    },
                }
            }
        }
    }
}

fn log_outcome(spectrum_index: usize, outcome: &FieldOutcome) {
    match outcome {
        FieldOutcome::Added { .. } => {}
        FieldOutcome::AddedAsText { key, rejected, .. } => {
            debug!("Spectrum {}: stored '{}' as text ({})", spectrum_index, key, rejected);
        }
        FieldOutcome::MissingField { key } => {
            warn!("Spectrum {}: key '{}' is not in the metadata for this spectrum", spectrum_index, key);
        }
        FieldOutcome::TypeCoercion { key, error } => {
            warn!("Spectrum {}: skipped '{}', string conversion also failed: {}", spectrum_index, key, error);
        }
        FieldOutcome::AttributeNull { key, reason } => {
            warn!("Spectrum {}: skipped '{}': {}", spectrum_index, key, reason);
        }
    }
}
