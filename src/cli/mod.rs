use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod ancillary;
mod config;
mod maps;
mod session;
mod upload;

/// spectra-ingest - Field Spectra and Ancillary Metadata Uploader
#[derive(Parser)]
#[command(name = "spectra-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Session options shared by the upload commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ServiceArgs {
    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Attribute catalog JSON file (name -> { id, kind })
    #[arg(long, value_name = "FILE")]
    attributes: Option<PathBuf>,

    /// Write each inserted record as JSON into this directory
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// Campaign to upload into (overrides the config file)
    #[arg(long, value_name = "NAME")]
    campaign: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload PICO JSON spectra files
    Pico {
        /// PICO files to upload
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Upload a test-CSV spectra file
    Csv {
        /// Spectra table (wavelength column followed by one column per spectrum)
        #[arg(value_name = "SPECTRA_CSV")]
        spectra: PathBuf,

        /// Transposed metadata table (defaults to metadata.csv next to the spectra)
        #[arg(long, value_name = "FILE")]
        metadata: Option<PathBuf>,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Upload ancillary tables onto placeholder spectra
    Ancillary {
        /// Directory searched recursively for <Category>_<date>.csv tables
        #[arg(value_name = "DIR")]
        directory: PathBuf,

        /// Directory for placeholder PICO files (overrides the config file)
        #[arg(long, value_name = "DIR")]
        placeholder_dir: Option<PathBuf>,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Print the key maps and check them against an attribute catalog
    Maps {
        /// Attribute catalog JSON file to check the maps against
        #[arg(long, value_name = "FILE")]
        attributes: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Pico { files, service } => upload::run_pico(files, service),
        Commands::Csv {
            spectra,
            metadata,
            service,
        } => upload::run_csv(spectra, metadata, service),
        Commands::Ancillary {
            directory,
            placeholder_dir,
            service,
        } => ancillary::run(directory, placeholder_dir, service),
        Commands::Maps { attributes } => maps::run(attributes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pico_command() {
        let cli = Cli::try_parse_from([
            "spectra-ingest",
            "-vv",
            "pico",
            "a.pico",
            "b.pico",
            "--attributes",
            "attributes.json",
            "--campaign",
            "Wheat 2017",
        ])
        .unwrap();

        assert_eq!(cli.verbosity(), 2);
        match cli.command {
            Commands::Pico { files, service } => {
                assert_eq!(files, vec![PathBuf::from("a.pico"), PathBuf::from("b.pico")]);
                assert_eq!(service.attributes, Some(PathBuf::from("attributes.json")));
                assert_eq!(service.campaign.as_deref(), Some("Wheat 2017"));
            }
            _ => panic!("expected the pico command"),
        }
    }

    #[test]
    fn test_pico_requires_files() {
        assert!(Cli::try_parse_from(["spectra-ingest", "pico"]).is_err());
    }

    #[test]
    fn test_command_line_overrides_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("spectra-ingest.toml");
        std::fs::write(
            &path,
            "[upload]\ncampaign_name = \"From file\"\n[service]\nattributes = \"file.json\"\n",
        )
        .unwrap();

        let args = ServiceArgs {
            config: Some(path),
            campaign: Some("From flag".to_string()),
            ..Default::default()
        };
        let config = session::load_config(&args).unwrap();

        assert_eq!(config.upload.campaign_name, "From flag");
        assert_eq!(config.service.attributes, Some(PathBuf::from("file.json")));
    }
}
