use serde::Serialize;
use std::path::PathBuf;

use crate::service::{Campaign, CampaignId, HierarchyId};
use crate::sources::FileLocation;

/// Where a spectral file belongs in the service.
///
/// Only constructible from a resolved campaign and hierarchy node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpectraFileIdentity {
    /// Directory holding the source file
    pub path: PathBuf,
    /// Source file name
    pub filename: String,
    /// Owning organization
    pub company: String,
    /// Campaign the file is uploaded into
    pub campaign_id: CampaignId,
    /// Hierarchy node the file is filed under
    pub hierarchy_id: HierarchyId,
}

impl SpectraFileIdentity {
    /// Identity of the file at `location` in `campaign` under `hierarchy`
    pub fn new(location: &FileLocation, company: &str, campaign: &Campaign, hierarchy: HierarchyId) -> Self {
        Self {
            path: location.directory.clone(),
            filename: location.filename.clone(),
            company: company.to_string(),
            campaign_id: campaign.id,
            hierarchy_id: hierarchy,
        }
    }

    /// Name of spectrum `index` within this file: `<filename><index>`
    pub fn spectrum_filename(&self, index: usize) -> String {
        format!("{}{}", self.filename, index)
    }
}
