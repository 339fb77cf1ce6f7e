//! Integration tests for the processor module
//!
//! Runs the complete cleaning pipeline against small locality and
//! bad-coordinate files written to a temporary directory.

pub mod modes;
pub mod routing;

use crate::config::CleanerConfig;
use crate::models::MatchMode;
use crate::processor::CleanerPaths;
use std::fs;
use tempfile::TempDir;

/// Write the two input files and return paths for a run
pub fn create_run_files(temp_dir: &TempDir, localities: &str, bad_coordinates: &str) -> CleanerPaths {
    let localities_path = temp_dir.path().join("localities.txt");
    let bad_path = temp_dir.path().join("badcoords.txt");
    fs::write(&localities_path, localities).unwrap();
    fs::write(&bad_path, bad_coordinates).unwrap();

    CleanerPaths {
        localities: localities_path,
        bad_coordinates: bad_path,
        good_output: temp_dir.path().join("good.txt"),
        bad_output: temp_dir.path().join("bad.txt"),
    }
}

/// Quiet configuration for the given mode
pub fn test_config(mode: MatchMode) -> CleanerConfig {
    CleanerConfig::default().with_mode(mode).without_progress()
}

/// Lines of an output file
pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
