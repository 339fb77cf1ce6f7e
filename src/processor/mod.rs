//! Main cleaning engine with a streaming pipeline.
//!
//! Builds the bad-coordinate set once, then streams the locality file one
//! line at a time through the record classifier, routing every record to the
//! good or bad output and tallying exclusion reasons. Memory use is bounded
//! by the bad-coordinate set, not by the size of the locality file.

pub mod classify;
pub mod progress;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{classify::RecordClassifier, progress::ProgressReporter, writer::OutputSink};

use crate::bad_coords::{BadCoordinateSet, load_bad_coordinates};
use crate::config::{CleanerConfig, ReportFormat};
use crate::error::{CleanerError, Result};
use crate::models::{CleaningStats, is_blank};
use crate::reader::LineReader;

use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs::File;
use tokio::io::BufReader;
use tracing::{debug, info, warn};

/// Input and output locations of a cleaning run
#[derive(Debug, Clone, PartialEq)]
pub struct CleanerPaths {
    /// Locality records (name, latitude, longitude, ...)
    pub localities: PathBuf,
    /// Bad coordinates, one cell corner per line
    pub bad_coordinates: PathBuf,
    /// Output for retained records
    pub good_output: PathBuf,
    /// Output for excluded records
    pub bad_output: PathBuf,
}

/// Orchestrates a complete cleaning run
#[derive(Debug)]
pub struct CoordinateCleaner {
    paths: CleanerPaths,
    config: CleanerConfig,
}

impl CoordinateCleaner {
    /// Create a cleaner, checking that the required input files exist
    pub fn new(paths: CleanerPaths, config: CleanerConfig) -> Result<Self> {
        config.validate()?;

        if !paths.localities.exists() {
            return Err(CleanerError::FileNotFound {
                path: paths.localities,
            });
        }

        // The bad-coordinate file is never opened in mode 'neither'
        if config.matching.mode.needs_bad_coordinates() && !paths.bad_coordinates.exists() {
            return Err(CleanerError::FileNotFound {
                path: paths.bad_coordinates,
            });
        }

        Ok(Self { paths, config })
    }

    /// Main processing entry point
    pub async fn run(&self) -> Result<CleaningStats> {
        let start_time = Instant::now();
        let mode = self.config.matching.mode;
        let mut stats = CleaningStats::new(mode);

        if self.shows_banner() {
            self.print_banner();
        }

        // Step 1: Build the bad-coordinate set
        let bad_coordinates = if mode.needs_bad_coordinates() {
            let (set, build_stats) = load_bad_coordinates(
                &self.paths.bad_coordinates,
                mode,
                self.config.matching.corners,
            )
            .await?;
            stats.bad_coordinate_lines_skipped = build_stats.skipped;
            if set.is_empty() {
                warn!(
                    "No bad coordinates loaded from {}; only precision will exclude records",
                    self.paths.bad_coordinates.display()
                );
            }
            set
        } else {
            info!("No bad coordinates used in mode '{}'", mode);
            BadCoordinateSet::empty()
        };
        stats.bad_coordinates_loaded = bad_coordinates.len();

        let classifier = RecordClassifier::new(
            mode,
            self.config.precision.min_decimal_digits,
            bad_coordinates,
        );

        // Step 2: Stream the locality file
        self.classify_localities(&classifier, &mut stats).await?;

        stats.processing_time = start_time.elapsed();
        info!("{}", stats.summary());
        Ok(stats)
    }

    async fn classify_localities(
        &self,
        classifier: &RecordClassifier,
        stats: &mut CleaningStats,
    ) -> Result<()> {
        let input_path = &self.paths.localities;
        info!("Classifying localities from {}", input_path.display());

        let input = File::open(input_path)
            .await
            .map_err(|e| CleanerError::file_access(input_path, e))?;
        let mut lines = LineReader::new(BufReader::new(input));
        let mut sink = OutputSink::create(&self.paths.good_output, &self.paths.bad_output).await?;
        let mut progress =
            ProgressReporter::new(self.config.output.progress_interval, self.config.output.show_progress);

        let mut line_number = 0;
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    // Keep what was already classified
                    if let Err(flush_error) = sink.finish().await {
                        warn!("Could not flush outputs: {}", flush_error);
                    }
                    return Err(CleanerError::file_access(input_path, e));
                }
            };
            line_number += 1;
            if is_blank(&line) {
                continue;
            }

            match classifier.classify_line(line_number, &line) {
                Ok((record, verdict)) => {
                    if verdict.rounding_match || verdict.string_match {
                        let reasons: Vec<String> =
                            verdict.reasons().iter().map(ToString::to_string).collect();
                        debug!("Excluded ({}): {}", reasons.join(", "), record.display_line());
                    }
                    sink.write(&record, &verdict).await?;
                    stats.record(&verdict);
                    progress.tick(stats.records_processed);
                }
                Err(e) if !e.is_fatal() => {
                    warn!("Skipping {}", e);
                    stats.add_error(&e);
                }
                Err(e) => return Err(e),
            }
        }

        sink.finish().await?;
        progress.finish(stats.records_processed);
        Ok(())
    }

    fn shows_banner(&self) -> bool {
        self.config.output.show_progress && self.config.output.format == ReportFormat::Human
    }

    /// Print the input files and active inclusion criteria
    fn print_banner(&self) {
        let mode = self.config.matching.mode;

        println!("\n{}", "Cleaning of coordinate data".bright_green().bold());
        println!("\n{}", "Running with these data:".bright_yellow());
        println!(
            "  {} {}",
            "Infile localities:      ".bright_cyan(),
            file_name(&self.paths.localities)
        );
        println!(
            "  {} {}",
            "Infile bad coordinates: ".bright_cyan(),
            file_name(&self.paths.bad_coordinates)
        );
        println!(
            "  {} {}",
            "Outfile good localities:".bright_cyan(),
            file_name(&self.paths.good_output)
        );
        println!(
            "  {} {}",
            "Outfile bad localities: ".bright_cyan(),
            file_name(&self.paths.bad_output)
        );

        println!("\n{}", "Inclusion criteria:".bright_yellow());
        println!(
            "  - At least {} decimal digits on one axis (minute-based values count as 1)",
            self.config.precision.min_decimal_digits
        );
        if mode.uses_string_matching() {
            println!(
                "  - Not within a 0.01 degree grid cell of a political centroid or herbarium (string matching)"
            );
        }
        if mode.uses_rounding() {
            println!(
                "  - Not within a 0.01 degree grid cell of a political centroid or herbarium (number rounding)"
            );
        }
        if !mode.needs_bad_coordinates() {
            println!("  {}", "No \"bad\" coordinates specified.".bright_black());
        }
        println!();
    }
}

/// Final path component for display
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
