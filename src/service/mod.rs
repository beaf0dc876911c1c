//! # Spectral Database Service Interface
//!
//! The external spectral database is reached through two traits:
//!
//! - [`AttributeDictionary`]: the service's read-only name → attribute
//!   identifier dictionary, queried by every resolver call.
//! - [`SpectralDatabase`]: campaign creation, sub-hierarchy lookup and the
//!   single-shot spectral file insert.
//!
//! Connection, authentication and transport belong to the implementor. The
//! crate ships [`InMemoryDatabase`], which satisfies both traits locally and
//! can export every inserted record as a JSON upload bundle.

mod catalog;
mod error;
mod memory;

pub use catalog::AttributeCatalog;
pub use error::ServiceError;
pub use memory::InMemoryDatabase;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::SpectralRecord;

/// Service-side identifier of a metadata attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeId(pub i32);

/// Service-side identifier of a campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(pub i32);

/// Service-side identifier of a hierarchy node inside a campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HierarchyId(pub i32);

impl HierarchyId {
    /// Parent id meaning "no parent": the hierarchy hangs off the campaign root.
    pub const ROOT: HierarchyId = HierarchyId(0);
}

/// Storage kind the service expects for an attribute's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Whole numbers
    Integer,
    /// Floating point numbers
    Double,
    /// Free text
    Text,
    /// Calendar date and time
    #[serde(alias = "datetime")]
    DateTime,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Integer => "integer",
            ValueKind::Double => "double",
            ValueKind::Text => "text",
            ValueKind::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

/// Dictionary answer for one attribute name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Attribute identifier
    pub id: AttributeId,
    /// Canonical attribute name
    pub name: String,
    /// Value kind the service stores for this attribute
    pub kind: ValueKind,
}

/// A campaign whose identifier has been resolved by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Campaign {
    /// Campaign identifier
    pub id: CampaignId,
    /// Campaign name
    pub name: String,
}

/// Read-only attribute name → identifier dictionary of the service.
pub trait AttributeDictionary {
    /// Look up an attribute by its canonical name. `None` when the service
    /// schema has no such attribute.
    fn lookup(&self, name: &str) -> Option<AttributeDescriptor>;
}

/// Client operations the ingest pipeline needs from the spectral database.
///
/// All calls are synchronous. Implementations must not retry internally;
/// failures surface to the caller unchanged.
pub trait SpectralDatabase {
    /// Create the named campaign, or return its id if it already exists.
    fn insert_campaign(&mut self, name: &str) -> Result<CampaignId, ServiceError>;

    /// Id of the sub-hierarchy `name` under `parent` in `campaign`.
    ///
    /// Returns `Ok(None)` when the service cannot provide the hierarchy.
    fn sub_hierarchy_id(
        &mut self,
        campaign: &Campaign,
        name: &str,
        parent: HierarchyId,
    ) -> Result<Option<HierarchyId>, ServiceError>;

    /// The service's attribute dictionary.
    fn attributes(&self) -> &dyn AttributeDictionary;

    /// Persist one spectral file. The record is consumed: a record is
    /// submitted at most once.
    fn insert_spectral_file(&mut self, record: SpectralRecord) -> Result<(), ServiceError>;
}
