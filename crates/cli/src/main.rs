// flightcheck - drone survey flight accuracy checks

mod assess;
mod console;
mod exit_codes;
mod prepare;
mod summary;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use flightcheck_geo::{Crs, GeoError};
use flightcheck_recon::SurveyError;

use exit_codes::{exit_code_for, EXIT_ERROR, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "flightcheck")]
#[command(about = "Check captured drone imagery against the planned flight")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract mission waypoints into a planned point table
    #[command(after_help = "\
Examples:
  flightcheck plan PreCoordinates.kmz
  flightcheck plan mission.kml -o PreCoordinates.csv --crs EPSG:32630")]
    Plan {
        /// KMZ archive or KML document
        mission: PathBuf,

        /// Output CSV (default: mission path with .csv extension)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Target grid
        #[arg(long, default_value = "EPSG:27700", env = "FLIGHTCHECK_CRS")]
        crs: Crs,
    },

    /// Add Easting/Northing/Geometry to a Name,Latitude,Longitude table
    #[command(after_help = "\
Examples:
  flightcheck project PostCoordinates.csv
  flightcheck project gps.csv -o PostCoordinates.csv")]
    Project {
        /// Input CSV
        input: PathBuf,

        /// Output CSV (default: rewrite the input)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Target grid
        #[arg(long, default_value = "EPSG:27700", env = "FLIGHTCHECK_CRS")]
        crs: Crs,
    },

    /// Rename images to 1.jpg, 2.jpg, ... in order of capture time
    #[command(after_help = "\
Examples:
  flightcheck rename ./images
  flightcheck rename ./images --batch B7")]
    Rename {
        /// Directory holding the images
        dir: PathBuf,

        /// Prefix names as <batch>#<n>
        #[arg(long)]
        batch: Option<String>,
    },

    /// Reconcile planned and captured points, then assess accuracy
    #[command(after_help = "\
Examples:
  flightcheck assess field7.flightcheck.toml
  flightcheck assess field7.flightcheck.toml --json
  flightcheck assess field7.flightcheck.toml --output accuracy.json

Answer 'abort' (or 'quit', 'q') at any prompt to stop.")]
    Assess {
        /// Path to the .flightcheck.toml config file
        config: PathBuf,

        /// Output JSON to stdout in addition to the human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a config without running
    Validate {
        /// Path to the .flightcheck.toml config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan { mission, output, crs } => prepare::cmd_plan(mission, output, crs),
        Commands::Project { input, output, crs } => prepare::cmd_project(input, output, crs),
        Commands::Rename { dir, batch } => prepare::cmd_rename(dir, batch),
        Commands::Assess { config, json, output } => assess::cmd_assess(config, json, output),
        Commands::Validate { config } => assess::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    pub fn from_geo(err: GeoError) -> Self {
        match err {
            GeoError::Io(msg) => Self::io(msg),
            other => Self::parse(other.to_string()),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<SurveyError> for CliError {
    fn from(err: SurveyError) -> Self {
        let code = exit_code_for(&err);
        let hint = match &err {
            SurveyError::MissingColumn { .. } => {
                Some("point tables need Name plus Easting/Northing, Geometry or Latitude/Longitude")
            }
            SurveyError::InvalidName { .. } | SurveyError::DuplicateName { .. } => {
                Some("point names are the waypoint/image sequence numbers 1, 2, 3, ...")
            }
            _ => None,
        };
        let err = Self { code, message: err.to_string(), hint: None };
        match hint {
            Some(h) => err.with_hint(h),
            None => err,
        }
    }
}
