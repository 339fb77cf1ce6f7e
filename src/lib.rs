//! Coordinate Cleaner Library
//!
//! Splits species occurrence records into "good" and "bad" localities.
//! A record is excluded when its coordinates carry too few meaningful
//! decimal digits, or when they fall in a 0.01 degree grid cell that
//! contains a political centroid or a major herbarium.
//!
//! This library provides tools for:
//! - Classifying coordinate precision, including minute-to-decimal artifacts
//! - Building a bad-coordinate set from grid-cell corners
//! - Matching localities by zero-padded string containment or by rounding
//! - Streaming large locality files into good and bad outputs

pub mod bad_coords;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod matcher;
pub mod models;
pub mod precision;
pub mod processor;
pub mod reader;
pub mod report;

// Re-export commonly used types
pub use bad_coords::{BadCoordinateSet, load_bad_coordinates};
pub use config::CleanerConfig;
pub use error::{CleanerError, Result};
pub use models::{CleaningStats, CornerMode, MatchMode, Verdict};
pub use processor::{CleanerPaths, CoordinateCleaner};
