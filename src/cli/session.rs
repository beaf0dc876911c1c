use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use spectra_ingest::ingest::SpectraUploader;
use spectra_ingest::service::{AttributeCatalog, InMemoryDatabase};

use super::config::Config;
use super::ServiceArgs;

/// Load the config file, if any, and apply command-line overrides.
pub fn load_config(args: &ServiceArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(campaign) = &args.campaign {
        config.upload.campaign_name = campaign.clone();
    }
    if let Some(attributes) = &args.attributes {
        config.service.attributes = Some(attributes.clone());
    }
    if let Some(export) = &args.export {
        config.service.export_dir = Some(export.clone());
    }

    Ok(config)
}

/// Read the attribute catalog named by the config.
pub fn load_catalog(attributes: Option<&PathBuf>) -> Result<AttributeCatalog> {
    let path = attributes
        .context("No attribute catalog given; pass --attributes or set [service] attributes")?;
    let catalog = AttributeCatalog::from_json_file(path)
        .with_context(|| format!("Failed to load attribute catalog: {}", path.display()))?;
    info!("Loaded {} attributes from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Open an upload session against the local database.
pub fn open(config: Config) -> Result<SpectraUploader<InMemoryDatabase>> {
    let catalog = load_catalog(config.service.attributes.as_ref())?;

    let mut database = InMemoryDatabase::new(catalog);
    if let Some(dir) = &config.service.export_dir {
        info!("Exporting upload bundles to {}", dir.display());
        database = database.with_export_dir(dir);
    }

    let campaign = config.upload.campaign_name.clone();
    SpectraUploader::connect(database, config.upload)
        .with_context(|| format!("Failed to open campaign '{}'", campaign))
}
