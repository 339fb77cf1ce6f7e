//! Bad-coordinate set construction
//!
//! Reads reference coordinates (political centroids, major herbaria), one
//! grid-cell corner per line, and normalises them into an immutable,
//! deduplicated lookup set for the [`crate::matcher`] strategies.
//!
//! When string matching is enabled, non-negative latitude and longitude
//! strings are zero-padded to a three-digit integer part so that, for
//! example, `0.83` cannot be found inside `10.83`.

use crate::constants::{BAD_COORD_MIN_FIELDS, CELL_CORNER_COUNT};
use crate::error::{CleanerError, Result};
use crate::matcher::{pad_integer_part, rounded_key};
use crate::models::{
    CornerMode, DecimalDegree, MatchMode, is_blank, parse_degree_field, split_fields,
    strip_line_terminators,
};
use crate::reader::LineReader;
use std::collections::HashSet;
use std::path::Path;
use tokio::fs::File;
use tokio::io::BufReader;
use tracing::{debug, info, warn};

/// One normalised bad coordinate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadCoordinate {
    latitude: String,
    longitude: String,
    rounded_latitude: i64,
    rounded_longitude: i64,
}

impl BadCoordinate {
    fn new(latitude: &DecimalDegree, longitude: &DecimalDegree, pad: bool) -> Self {
        let (lat_text, lon_text) = if pad {
            (
                pad_integer_part(latitude.text()),
                pad_integer_part(longitude.text()),
            )
        } else {
            (latitude.text().to_string(), longitude.text().to_string())
        };

        Self {
            latitude: lat_text,
            longitude: lon_text,
            rounded_latitude: rounded_key(latitude.value()),
            rounded_longitude: rounded_key(longitude.value()),
        }
    }

    /// Normalised latitude string
    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    /// Normalised longitude string
    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    pub fn rounded_latitude(&self) -> i64 {
        self.rounded_latitude
    }

    pub fn rounded_longitude(&self) -> i64 {
        self.rounded_longitude
    }
}

/// Immutable, deduplicated collection of bad coordinates
#[derive(Debug, Clone, Default)]
pub struct BadCoordinateSet {
    entries: Vec<BadCoordinate>,
}

impl BadCoordinateSet {
    /// Set with no entries, used when no matching strategy is enabled
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start building a set normalised for the given mode
    pub fn builder(mode: MatchMode, corners: CornerMode) -> BadCoordinateSetBuilder {
        BadCoordinateSetBuilder::new(mode, corners)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BadCoordinate> {
        self.entries.iter()
    }

}

#[cfg(test)]
impl BadCoordinateSet {
    /// Whether the set holds exactly this normalised pair
    pub fn contains_pair(&self, latitude: &str, longitude: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.latitude == latitude && entry.longitude == longitude)
    }
}

/// Counters collected while building the set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Non-blank lines read
    pub lines_read: usize,
    /// Lines skipped for missing fields or non-numeric values
    pub skipped: usize,
    /// Entries dropped because an identical pair was already present
    pub duplicates: usize,
    /// Corner lines left over after the last complete cell (south-west mode)
    pub incomplete_corners: usize,
}

/// Accumulates bad-coordinate lines into a [`BadCoordinateSet`]
#[derive(Debug)]
pub struct BadCoordinateSetBuilder {
    pad: bool,
    corners: CornerMode,
    seen: HashSet<(String, String)>,
    entries: Vec<BadCoordinate>,
    pending_corners: Vec<(f64, f64)>,
    line_number: usize,
    stats: BuildStats,
}

impl BadCoordinateSetBuilder {
    fn new(mode: MatchMode, corners: CornerMode) -> Self {
        Self {
            pad: mode.uses_string_matching(),
            corners,
            seen: HashSet::new(),
            entries: Vec::new(),
            pending_corners: Vec::with_capacity(CELL_CORNER_COUNT),
            line_number: 0,
            stats: BuildStats::default(),
        }
    }

    /// Add one line of the bad-coordinate file
    pub fn add_line(&mut self, line: impl AsRef<[u8]>) {
        self.line_number += 1;
        let line = strip_line_terminators(line.as_ref());
        if is_blank(line) {
            return;
        }
        self.stats.lines_read += 1;

        let Some((latitude, longitude)) = self.parse_line(line) else {
            self.stats.skipped += 1;
            return;
        };

        match self.corners {
            CornerMode::All => self.insert(&latitude, &longitude),
            CornerMode::SouthWest => {
                self.pending_corners
                    .push((latitude.value(), longitude.value()));
                if self.pending_corners.len() == CELL_CORNER_COUNT {
                    self.collapse_cell();
                }
            }
        }
    }

    fn parse_line(&self, line: &[u8]) -> Option<(DecimalDegree, DecimalDegree)> {
        let fields = split_fields(line);
        if fields.len() < BAD_COORD_MIN_FIELDS {
            warn!(
                "Skipping bad-coordinate line {}: expected {} fields, found {}",
                self.line_number,
                BAD_COORD_MIN_FIELDS,
                fields.len()
            );
            return None;
        }

        let latitude = parse_degree_field(fields[0]);
        let longitude = parse_degree_field(fields[1]);
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some((latitude, longitude)),
            _ => {
                warn!(
                    "Skipping bad-coordinate line {}: non-numeric coordinate '{}'",
                    self.line_number,
                    String::from_utf8_lossy(line)
                );
                None
            }
        }
    }

    /// Reduce four pending corners to their south-west corner
    fn collapse_cell(&mut self) {
        let min_lat = self
            .pending_corners
            .iter()
            .map(|(lat, _)| *lat)
            .fold(f64::INFINITY, f64::min);
        let min_lon = self
            .pending_corners
            .iter()
            .map(|(_, lon)| *lon)
            .fold(f64::INFINITY, f64::min);
        self.pending_corners.clear();

        let latitude = DecimalDegree::parse(&format_decimal(min_lat));
        let longitude = DecimalDegree::parse(&format_decimal(min_lon));
        if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
            self.insert(&latitude, &longitude);
        }
    }

    fn insert(&mut self, latitude: &DecimalDegree, longitude: &DecimalDegree) {
        let entry = BadCoordinate::new(latitude, longitude, self.pad);
        let key = (entry.latitude.clone(), entry.longitude.clone());
        if self.seen.insert(key) {
            self.entries.push(entry);
        } else {
            self.stats.duplicates += 1;
        }
    }

    /// Finish building; leftover corners of an incomplete cell are dropped
    pub fn finish(mut self) -> (BadCoordinateSet, BuildStats) {
        if !self.pending_corners.is_empty() {
            warn!(
                "Dropping {} trailing bad-coordinate lines that do not form a complete cell",
                self.pending_corners.len()
            );
            self.stats.incomplete_corners = self.pending_corners.len();
        }

        debug!(
            "Bad-coordinate set built: {} entries from {} lines ({} duplicates, {} skipped)",
            self.entries.len(),
            self.stats.lines_read,
            self.stats.duplicates,
            self.stats.skipped
        );

        (
            BadCoordinateSet {
                entries: self.entries,
            },
            self.stats,
        )
    }
}

/// Render a value as a decimal string that always contains a decimal point
pub fn format_decimal(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

/// Load and normalise the bad-coordinate file
pub async fn load_bad_coordinates(
    path: &Path,
    mode: MatchMode,
    corners: CornerMode,
) -> Result<(BadCoordinateSet, BuildStats)> {
    info!("Loading bad coordinates from {}", path.display());

    let file = File::open(path)
        .await
        .map_err(|e| CleanerError::file_access(path, e))?;
    let mut lines = LineReader::new(BufReader::new(file));

    let mut builder = BadCoordinateSet::builder(mode, corners);
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| CleanerError::file_access(path, e))?
    {
        builder.add_line(&line);
    }

    let (set, stats) = builder.finish();
    info!(
        "Loaded {} bad coordinates ({} lines, {} skipped)",
        set.len(),
        stats.lines_read,
        stats.skipped
    );
    Ok((set, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn build(mode: MatchMode, corners: CornerMode, lines: &[&str]) -> (BadCoordinateSet, BuildStats) {
        let mut builder = BadCoordinateSet::builder(mode, corners);
        for line in lines {
            builder.add_line(line);
        }
        builder.finish()
    }

    fn build_bytes(lines: &[&[u8]]) -> (BadCoordinateSet, BuildStats) {
        let mut builder = BadCoordinateSet::builder(MatchMode::StringOnly, CornerMode::All);
        for line in lines {
            builder.add_line(line);
        }
        builder.finish()
    }

    #[test]
    fn test_string_mode_pads_non_negative_values() {
        let (set, _) = build(
            MatchMode::StringOnly,
            CornerMode::All,
            &["1.12,45.67", "-6.48\t106.85", "40.86,-73.87"],
        );

        assert_eq!(set.len(), 3);
        assert!(set.contains_pair("001.12", "045.67"));
        assert!(set.contains_pair("-6.48", "106.85"));
        assert!(set.contains_pair("040.86", "-73.87"));
    }

    #[test]
    fn test_rounding_mode_keeps_raw_strings() {
        let (set, _) = build(MatchMode::RoundingOnly, CornerMode::All, &["1.12,45.67"]);
        assert!(set.contains_pair("1.12", "45.67"));

        let entry = set.iter().next().unwrap();
        assert_eq!(entry.rounded_latitude(), 112);
        assert_eq!(entry.rounded_longitude(), 4567);
    }

    #[test]
    fn test_duplicates_are_removed() {
        let (set, stats) = build(
            MatchMode::StringOnly,
            CornerMode::All,
            &["1.12,45.67", "1.12,45.67\r", "001.12,045.67"],
        );

        assert_eq!(set.len(), 1);
        assert_eq!(stats.duplicates, 2);
        assert_eq!(stats.lines_read, 3);
    }

    #[test]
    fn test_grouping_is_not_assumed() {
        // Five corners, not a multiple of four, all kept
        let (set, stats) = build(
            MatchMode::StringOnly,
            CornerMode::All,
            &["1.12,1.10", "1.13,1.10", "1.12,1.11", "1.13,1.11", "2.50,3.50"],
        );
        assert_eq!(set.len(), 5);
        assert_eq!(stats.incomplete_corners, 0);
    }

    #[test]
    fn test_malformed_and_blank_lines() {
        let (set, stats) = build(
            MatchMode::StringOnly,
            CornerMode::All,
            &["", "lat,lon", "12.5", "12.34,45.67"],
        );

        assert_eq!(set.len(), 1);
        assert_eq!(stats.lines_read, 3);
        assert_eq!(stats.skipped, 2);
    }

    #[test]
    fn test_south_west_corner_derivation() {
        let (set, stats) = build(
            MatchMode::StringOnly,
            CornerMode::SouthWest,
            &[
                "40.87,-73.87",
                "40.86,-73.87",
                "40.87,-73.88",
                "40.86,-73.88",
                "1,2",
                "1,3",
                "2,2",
                "2,3",
                "9.99,9.99",
            ],
        );

        assert_eq!(set.len(), 2);
        assert!(set.contains_pair("040.86", "-73.88"));
        assert!(set.contains_pair("001.0", "002.0"));
        assert_eq!(stats.incomplete_corners, 1);
    }

    #[test]
    fn test_non_utf8_line_is_skipped() {
        let (set, stats) = build_bytes(&[
            &b"12.34,45.67"[..],
            &b"1\xb02,45.67"[..],
            &b"12.35,45.67"[..],
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(12.0), "12.0");
        assert_eq!(format_decimal(-73.88), "-73.88");
        assert_eq!(format_decimal(0.5), "0.5");
    }

    #[tokio::test]
    async fn test_load_bad_coordinates_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("badcoords.txt");
        std::fs::write(&path, "12.34,45.67\n12.35\t45.67\r\n12.34,45.67\n").unwrap();

        let (set, stats) = load_bad_coordinates(&path, MatchMode::Both, CornerMode::All)
            .await
            .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(stats.duplicates, 1);
        assert!(set.contains_pair("012.35", "045.67"));
    }

    #[tokio::test]
    async fn test_load_carriage_return_only_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("badcoords.txt");
        std::fs::write(&path, "12.34,45.67\r12.35,45.67\r-6.48,106.85\r").unwrap();

        let (set, stats) = load_bad_coordinates(&path, MatchMode::StringOnly, CornerMode::All)
            .await
            .unwrap();

        assert_eq!(stats.lines_read, 3);
        assert_eq!(set.len(), 3);
        assert!(set.contains_pair("-6.48", "106.85"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_bad_coordinates(
            Path::new("/nonexistent/badcoords.txt"),
            MatchMode::StringOnly,
            CornerMode::All,
        )
        .await;

        assert!(matches!(result, Err(CleanerError::FileNotFound { .. })));
    }
}
