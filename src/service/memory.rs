use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{
    AttributeCatalog, AttributeDictionary, Campaign, CampaignId, HierarchyId, ServiceError,
    SpectralDatabase,
};
use crate::record::SpectralRecord;

/// Local stand-in for the spectral database.
///
/// Campaigns and hierarchies are numbered in creation order, attribute
/// lookups go to an [`AttributeCatalog`], and inserted records are kept in
/// memory. With an export directory set, every inserted record is also
/// written as `<export_dir>/<filename>.json`; a later record with the same
/// file name is written as `<filename>.<n>.json` instead of overwriting.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    catalog: AttributeCatalog,
    campaigns: Vec<Campaign>,
    hierarchies: HashMap<(CampaignId, String, HierarchyId), HierarchyId>,
    inserted: Vec<SpectralRecord>,
    rejected_filenames: HashSet<String>,
    export_dir: Option<PathBuf>,
    exported_names: HashMap<String, usize>,
}

impl InMemoryDatabase {
    /// Create a database answering attribute lookups from `catalog`
    pub fn new(catalog: AttributeCatalog) -> Self {
        Self {
            catalog,
            ..Default::default()
        }
    }

    /// Also write each inserted record as pretty JSON into `dir`
    pub fn with_export_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.export_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Refuse inserts of the spectral file named `filename`
    pub fn reject_inserts_for(mut self, filename: &str) -> Self {
        self.rejected_filenames.insert(filename.to_string());
        self
    }

    /// Records stored so far, in insertion order
    pub fn inserted(&self) -> &[SpectralRecord] {
        &self.inserted
    }

    /// Campaigns created so far
    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    /// Number of hierarchy nodes created so far
    pub fn hierarchy_count(&self) -> usize {
        self.hierarchies.len()
    }

    /// Bundle name for `filename`, unique among the bundles this database wrote
    fn export_name(&mut self, filename: &str) -> String {
        let count = self.exported_names.entry(filename.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            format!("{}.json", filename)
        } else {
            warn!("{} was already exported, writing bundle number {}", filename, count);
            format!("{}.{}.json", filename, count)
        }
    }

    fn export(dir: &Path, name: &str, record: &SpectralRecord) -> Result<PathBuf, ServiceError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(name);
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, record)?;
        writer.flush()?;
        Ok(path)
    }
}

impl SpectralDatabase for InMemoryDatabase {
    fn insert_campaign(&mut self, name: &str) -> Result<CampaignId, ServiceError> {
        if let Some(existing) = self.campaigns.iter().find(|c| c.name == name) {
            return Ok(existing.id);
        }
        let id = CampaignId(self.campaigns.len() as i32 + 1);
        self.campaigns.push(Campaign {
            id,
            name: name.to_string(),
        });
        debug!("Created campaign '{}' with id {}", name, id.0);
        Ok(id)
    }

    fn sub_hierarchy_id(
        &mut self,
        campaign: &Campaign,
        name: &str,
        parent: HierarchyId,
    ) -> Result<Option<HierarchyId>, ServiceError> {
        if !self.campaigns.iter().any(|c| c.id == campaign.id) {
            return Err(ServiceError::UnknownCampaign(campaign.id.0));
        }
        if name.trim().is_empty() {
            return Ok(None);
        }

        let next = HierarchyId(self.hierarchies.len() as i32 + 1);
        let id = *self
            .hierarchies
            .entry((campaign.id, name.to_string(), parent))
            .or_insert(next);
        Ok(Some(id))
    }

    fn attributes(&self) -> &dyn AttributeDictionary {
        &self.catalog
    }

    fn insert_spectral_file(&mut self, record: SpectralRecord) -> Result<(), ServiceError> {
        if self.rejected_filenames.contains(&record.identity().filename) {
            return Err(ServiceError::InsertRejected(format!(
                "spectral file '{}' refused by the database",
                record.identity().filename
            )));
        }

        if let Some(dir) = self.export_dir.clone() {
            let name = self.export_name(&record.identity().filename);
            let path = Self::export(&dir, &name, &record)?;
            info!("Exported {}", path.display());
        }

        self.inserted.push(record);
        Ok(())
    }
}
