use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use spectra_ingest::sources::AncillaryDirectory;

use super::{session, ServiceArgs};

/// Upload ancillary tables onto placeholder spectra
pub fn run(directory: PathBuf, placeholder_dir: Option<PathBuf>, service: ServiceArgs) -> Result<()> {
    if !directory.is_dir() {
        anyhow::bail!("Ancillary directory does not exist: {}", directory.display());
    }

    let mut config = session::load_config(&service)?;
    if let Some(dir) = placeholder_dir {
        config.upload.placeholder_dir = dir;
    }
    info!("Placeholder directory: {}", config.upload.placeholder_dir.display());

    let mut uploader = session::open(config)?;
    let summary = uploader
        .upload_ancillary(&AncillaryDirectory::new(), &directory)
        .with_context(|| format!("Failed to read ancillary tables from {}", directory.display()))?;

    println!("Ancillary Upload Summary");
    println!("========================");
    println!("Placeholders: {}", summary.placeholders);
    println!("Uploaded:     {}", summary.uploaded.len());
    for table in &summary.skipped_categories {
        println!("  SKIP  {} (no attribute mapping)", table);
    }
    for failure in &summary.failures {
        println!("  FAIL  {}: {}", failure.name, failure.error);
    }

    if !summary.is_success() {
        anyhow::bail!("{} tables or placeholders failed", summary.failures.len());
    }
    Ok(())
}
