use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::record::WavelengthCalibration;

/// What to do with an ancillary category whose mapping is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryPolicy {
    /// Log and skip the category's tables
    #[default]
    Skip,
    /// Report each of the category's tables as a failure
    Reject,
}

/// Settings of an upload session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Campaign the files are uploaded into; created if missing
    pub campaign_name: String,

    /// Owning organization recorded on every file
    pub company: String,

    /// Hierarchy node under the campaign root that files are filed under
    pub hierarchy: String,

    /// Wavelength axis for sources without their own calibration
    pub calibration: WavelengthCalibration,

    /// Directory holding placeholder PICO files
    pub placeholder_dir: PathBuf,

    /// Handling of ancillary categories with an empty mapping
    pub category_policy: CategoryPolicy,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            campaign_name: "spectra-ingest".to_string(),
            company: "UoE".to_string(),
            hierarchy: "PlotData".to_string(),
            calibration: WavelengthCalibration::default(),
            placeholder_dir: PathBuf::from("./picotest/"),
            category_policy: CategoryPolicy::Skip,
        }
    }
}

impl UploadConfig {
    /// Default settings for `campaign_name`
    pub fn for_campaign(campaign_name: &str) -> Self {
        Self {
            campaign_name: campaign_name.to_string(),
            ..Default::default()
        }
    }
}
