//! TOML configuration file support.
//!
//! Session settings that rarely change between runs can live in a file
//! instead of on the command line:
//!
//! ```toml
//! # spectra-ingest.toml
//! [upload]
//! campaign_name = "Wheat 2017"
//! company = "UoE"
//! hierarchy = "PlotData"
//! placeholder_dir = "./picotest/"
//! category_policy = "skip"
//!
//! [upload.calibration]
//! mode = "synthetic"
//! first = 1.0
//! last = 2048.0
//! bins = 2048
//!
//! [service]
//! attributes = "attributes.json"
//! export_dir = "upload-bundles"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use spectra_ingest::ingest::UploadConfig;

/// Root configuration structure for spectra-ingest.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Upload session settings.
    #[serde(default)]
    pub upload: UploadConfig,

    /// Local service settings.
    #[serde(default)]
    pub service: ServiceConfig,
}

/// Where the local stand-in for the database reads and writes.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceConfig {
    /// Attribute catalog JSON file.
    pub attributes: Option<PathBuf>,

    /// Directory receiving one JSON bundle per inserted record.
    pub export_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
