//! # spectra-ingest
//!
//! Command-line uploader for field spectrometer data.
//!
//! ## Usage
//!
//! ```bash
//! # Upload PICO spectra
//! spectra-ingest pico --attributes attributes.json plot12.pico plot13.pico
//!
//! # Upload a test-CSV file with its transposed metadata table
//! spectra-ingest csv spectra.csv --metadata metadata.csv --attributes attributes.json
//!
//! # Attach ancillary tables to placeholder spectra
//! spectra-ingest ancillary ./ancillary --config spectra-ingest.toml
//!
//! # Show the key maps and check them against a catalog
//! spectra-ingest maps --attributes attributes.json
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
