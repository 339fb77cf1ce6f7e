//! Command-line interface components.

use crate::config::{CleanerConfig, ReportFormat};
use crate::error::{CleanerError, Result};
use crate::models::{CornerMode, MatchMode};
use crate::processor::CleanerPaths;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug, Clone)]
#[command(name = "coord-cleaner")]
#[command(
    about = "Split occurrence records into good and bad localities",
    long_about = "Parses locality data (name, latitude, longitude, ...; comma or tab delimited, \
                  no header) and writes records to a \"good\" and a \"bad\" output file. Records \
                  are excluded when their coordinates add no information beyond the first \
                  decimal digit, or when they fall in a 0.01 degree grid cell containing a \
                  political centroid or major herbarium listed in the bad-coordinate file. \
                  Duplicate records are not removed."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Locality file: name, latitude, longitude, other fields (comma or tab delimited)
    #[arg(value_name = "INFILE")]
    pub localities: PathBuf,

    /// Bad coordinates: corners of 0.01 degree grid cells, one "lat,lon" per line
    #[arg(value_name = "BAD_COORDS")]
    pub bad_coordinates: PathBuf,

    /// Output file for good localities
    #[arg(value_name = "OUT_GOOD")]
    pub good_output: PathBuf,

    /// Output file for bad localities
    #[arg(value_name = "OUT_BAD")]
    pub bad_output: PathBuf,

    /// Method used to match localities to bad coordinates [default: string-only]
    #[arg(value_enum, value_name = "MODE")]
    pub mode: Option<MatchMode>,

    /// Use every bad-coordinate line, or collapse groups of four to the south-west corner
    #[arg(long, value_enum, value_name = "CORNERS")]
    pub corners: Option<CornerMode>,

    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Summary report format
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Do not show the progress spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// File locations for the cleaner
    pub fn paths(&self) -> CleanerPaths {
        CleanerPaths {
            localities: self.localities.clone(),
            bad_coordinates: self.bad_coordinates.clone(),
            good_output: self.good_output.clone(),
            bad_output: self.bad_output.clone(),
        }
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }

    /// Validate output locations before any file is opened
    pub fn validate(&self) -> Result<()> {
        for output in [&self.good_output, &self.bad_output] {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() && !parent.is_dir() {
                    return Err(CleanerError::configuration(format!(
                        "Output directory does not exist: {}",
                        parent.display()
                    )));
                }
            }
        }

        if self.good_output == self.bad_output {
            return Err(CleanerError::configuration(
                "Good and bad output files must differ",
            ));
        }

        for output in [&self.good_output, &self.bad_output] {
            if output == &self.localities || output == &self.bad_coordinates {
                return Err(CleanerError::configuration(format!(
                    "Output file would overwrite an input file: {}",
                    output.display()
                )));
            }
        }

        Ok(())
    }

    /// Load configuration using layered approach (file -> args)
    pub fn load_config(&self) -> Result<CleanerConfig> {
        if let Some(path) = &self.config {
            info!("Using config file: {}", path.display());
        }

        let mut config = CleanerConfig::load_layered(self.config.as_deref())?;
        self.apply_overrides(&mut config);
        config.validate()?;

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    pub fn apply_overrides(&self, config: &mut CleanerConfig) {
        if let Some(mode) = self.mode {
            config.matching.mode = mode;
        }
        if let Some(corners) = self.corners {
            config.matching.corners = corners;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if !self.show_progress() {
            config.output.show_progress = false;
        }
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("coord_cleaner={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}
