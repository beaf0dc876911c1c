use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use spectra_ingest::ingest::BatchSummary;
use spectra_ingest::sources::CsvSpectra;

use super::{session, ServiceArgs};

/// Upload PICO JSON spectra files
pub fn run_pico(files: Vec<PathBuf>, service: ServiceArgs) -> Result<()> {
    let config = session::load_config(&service)?;
    let mut uploader = session::open(config)?;

    info!("Uploading {} PICO files into '{}'", files.len(), uploader.campaign().name);
    let summary = uploader.upload_pico_files(&files);

    report(&summary)
}

/// Upload a test-CSV spectra file
pub fn run_csv(spectra: PathBuf, metadata: Option<PathBuf>, service: ServiceArgs) -> Result<()> {
    if !spectra.exists() {
        anyhow::bail!("Input file does not exist: {}", spectra.display());
    }

    let config = session::load_config(&service)?;
    let mut uploader = session::open(config)?;

    let source = CsvSpectra::open(&spectra, metadata.as_deref())
        .with_context(|| format!("Failed to read {}", spectra.display()))?;
    let receipt = uploader
        .upload(&source)
        .with_context(|| format!("Upload of {} failed", spectra.display()))?;

    println!(
        "Uploaded {}: {} spectra, {} metadata entries",
        receipt.filename, receipt.spectrum_count, receipt.metadata_entries
    );
    Ok(())
}

fn report(summary: &BatchSummary) -> Result<()> {
    println!("Upload Summary");
    println!("==============");
    for receipt in &summary.uploaded {
        println!(
            "  OK    {} ({} spectra, {} metadata entries)",
            receipt.filename, receipt.spectrum_count, receipt.metadata_entries
        );
    }
    for failure in &summary.failures {
        println!("  FAIL  {}: {}", failure.name, failure.error);
    }
    println!();
    println!("{} of {} files uploaded", summary.uploaded.len(), summary.total());

    if !summary.is_success() {
        anyhow::bail!("{} files failed to upload", summary.failures.len());
    }
    Ok(())
}
