//! Core data structures for coordinate cleaning.
//!
//! Defines the matching modes, coordinate and locality record types,
//! per-record verdicts and the running statistics threaded through the
//! classification pipeline.

use crate::constants::{
    FIELD_DELIMITER, LATITUDE_FIELD, LOCALITY_MIN_FIELDS, LONGITUDE_FIELD, MAX_RETAINED_ERRORS,
};
use crate::error::{CleanerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Strategy used to match localities against bad coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Zero-padded string containment only
    #[default]
    #[value(alias = "BadByString")]
    #[serde(alias = "BadByString")]
    StringOnly,
    /// Equality after rounding to two decimals only
    #[value(alias = "BadByNumber")]
    #[serde(alias = "BadByNumber")]
    RoundingOnly,
    /// Both strategies, a match by either excludes the record
    #[value(alias = "BadByBoth")]
    #[serde(alias = "BadByBoth")]
    Both,
    /// No bad-coordinate matching, exclude on imprecision only
    #[value(alias = "BadByNone")]
    #[serde(alias = "BadByNone")]
    Neither,
}

impl MatchMode {
    /// Whether the string-containment strategy is enabled
    pub fn uses_string_matching(&self) -> bool {
        matches!(self, MatchMode::StringOnly | MatchMode::Both)
    }

    /// Whether the rounding strategy is enabled
    pub fn uses_rounding(&self) -> bool {
        matches!(self, MatchMode::RoundingOnly | MatchMode::Both)
    }

    /// Whether the bad-coordinate file needs to be read at all
    pub fn needs_bad_coordinates(&self) -> bool {
        self.uses_string_matching() || self.uses_rounding()
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchMode::StringOnly => "string-only",
            MatchMode::RoundingOnly => "rounding-only",
            MatchMode::Both => "both",
            MatchMode::Neither => "neither",
        };
        f.write_str(name)
    }
}

/// How bad-coordinate lines are turned into set entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CornerMode {
    /// Every line is one entry; the caller lists all four corners of each cell
    #[default]
    All,
    /// Each group of four lines collapses to its south-west corner
    SouthWest,
}

/// One axis of a coordinate, kept as both its decimal text and numeric value
#[derive(Debug, Clone, PartialEq)]
pub struct DecimalDegree {
    text: String,
    value: f64,
}

impl DecimalDegree {
    /// Parse a decimal-degree string, rejecting non-numeric and non-finite values
    ///
    /// Surrounding whitespace is trimmed first, and the trimmed text is what
    /// precision and string matching see. `" 12.3456"` therefore behaves like
    /// `"12.3456"`: it is padded to `"012.3456"` and can string-match.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let value: f64 = text.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            value,
        })
    }

    /// Original decimal-string form
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Numeric value in degrees
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Latitude/longitude pair
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub latitude: DecimalDegree,
    pub longitude: DecimalDegree,
}

impl Coordinate {
    /// Parse a coordinate from its latitude and longitude strings
    pub fn parse(latitude: &str, longitude: &str) -> Option<Self> {
        Some(Self {
            latitude: DecimalDegree::parse(latitude)?,
            longitude: DecimalDegree::parse(longitude)?,
        })
    }
}

/// Split a comma- or tab-delimited line into fields
pub fn split_fields(line: &[u8]) -> Vec<&[u8]> {
    line.split(|&byte| byte == FIELD_DELIMITER || byte == b'\t')
        .collect()
}

/// Strip trailing line terminators, leaving the rest of the line verbatim
pub fn strip_line_terminators(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|&byte| byte != b'\n' && byte != b'\r')
        .map_or(0, |last| last + 1);
    &line[..end]
}

/// Whether a line holds nothing but whitespace
pub fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

/// Parse one coordinate field; the field must be UTF-8
pub fn parse_degree_field(field: &[u8]) -> Option<DecimalDegree> {
    std::str::from_utf8(field).ok().and_then(DecimalDegree::parse)
}

/// One occurrence record from the locality file
///
/// Only latitude and longitude are interpreted. The line is kept as raw
/// bytes so it can be written out exactly as received, whatever the
/// encoding of the other fields.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalityRecord {
    pub line_number: usize,
    pub line: Vec<u8>,
    pub coordinate: Coordinate,
}

impl LocalityRecord {
    /// Parse a locality line (name, latitude, longitude, payload...)
    pub fn parse(line_number: usize, line: impl AsRef<[u8]>) -> Result<Self> {
        let line = strip_line_terminators(line.as_ref());
        let fields = split_fields(line);

        if fields.len() < LOCALITY_MIN_FIELDS {
            return Err(CleanerError::malformed(
                line_number,
                format!(
                    "expected at least {} fields, found {}",
                    LOCALITY_MIN_FIELDS,
                    fields.len()
                ),
            ));
        }

        let latitude = parse_degree_field(fields[LATITUDE_FIELD]).ok_or_else(|| {
            CleanerError::malformed(
                line_number,
                format!(
                    "non-numeric latitude '{}'",
                    String::from_utf8_lossy(fields[LATITUDE_FIELD])
                ),
            )
        })?;
        let longitude = parse_degree_field(fields[LONGITUDE_FIELD]).ok_or_else(|| {
            CleanerError::malformed(
                line_number,
                format!(
                    "non-numeric longitude '{}'",
                    String::from_utf8_lossy(fields[LONGITUDE_FIELD])
                ),
            )
        })?;

        Ok(Self {
            line_number,
            line: line.to_vec(),
            coordinate: Coordinate {
                latitude,
                longitude,
            },
        })
    }

    /// Line for log messages, with invalid UTF-8 replaced
    pub fn display_line(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.line)
    }
}

/// Reason a record was excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExclusionReason {
    Imprecise,
    RoundingMatch,
    StringMatch,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExclusionReason::Imprecise => "imprecise",
            ExclusionReason::RoundingMatch => "rounding-match",
            ExclusionReason::StringMatch => "string-match",
        };
        f.write_str(name)
    }
}

/// Outcome of classifying one record
///
/// All checks run independently, so several reasons can hold at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verdict {
    pub precision: usize,
    pub imprecise: bool,
    pub rounding_match: bool,
    pub string_match: bool,
}

impl Verdict {
    /// True when no exclusion reason triggered
    pub fn is_good(&self) -> bool {
        !(self.imprecise || self.rounding_match || self.string_match)
    }

    /// All reasons that triggered, in pipeline order
    pub fn reasons(&self) -> Vec<ExclusionReason> {
        let mut reasons = Vec::new();
        if self.imprecise {
            reasons.push(ExclusionReason::Imprecise);
        }
        if self.rounding_match {
            reasons.push(ExclusionReason::RoundingMatch);
        }
        if self.string_match {
            reasons.push(ExclusionReason::StringMatch);
        }
        reasons
    }
}

/// Running totals for a cleaning run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningStats {
    /// Matching mode the run used
    pub mode: MatchMode,
    /// Records successfully parsed and classified
    pub records_processed: usize,
    /// Records written to the good output
    pub retained: usize,
    /// Records written to the bad output
    pub excluded: usize,
    /// Records excluded for insufficient precision
    pub imprecise: usize,
    /// Records matched by the rounding strategy
    pub rounding_matches: usize,
    /// Records matched by the string-containment strategy
    pub string_matches: usize,
    /// Lines skipped because they could not be parsed
    pub malformed: usize,
    /// Entries in the bad-coordinate set
    pub bad_coordinates_loaded: usize,
    /// Bad-coordinate lines skipped while building the set
    pub bad_coordinate_lines_skipped: usize,
    /// Wall-clock time of the run
    pub processing_time: Duration,
    /// First malformed-record messages, for reporting
    pub error_messages: Vec<String>,
}

impl CleaningStats {
    /// Create empty statistics for a run in the given mode
    pub fn new(mode: MatchMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Tally a classified record
    pub fn record(&mut self, verdict: &Verdict) {
        self.records_processed += 1;
        if verdict.imprecise {
            self.imprecise += 1;
        }
        if verdict.rounding_match {
            self.rounding_matches += 1;
        }
        if verdict.string_match {
            self.string_matches += 1;
        }
        if verdict.is_good() {
            self.retained += 1;
        } else {
            self.excluded += 1;
        }
    }

    /// Tally a skipped line, keeping the first few messages
    pub fn add_error(&mut self, error: &CleanerError) {
        self.malformed += 1;
        if self.error_messages.len() < MAX_RETAINED_ERRORS {
            self.error_messages.push(error.to_string());
        }
    }

    /// Exclusions by either matching strategy (a record matched by both counts twice)
    pub fn coordinate_matches(&self) -> usize {
        self.rounding_matches + self.string_matches
    }

    /// Percentage of processed records that were retained
    pub fn retention_rate(&self) -> f64 {
        if self.records_processed == 0 {
            0.0
        } else {
            (self.retained as f64 / self.records_processed as f64) * 100.0
        }
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Cleaning Summary: {} records -> {} retained, {} excluded ({:.1}% retained) | \
             Imprecise: {} | Rounding: {} | String: {} | Malformed: {}",
            self.records_processed,
            self.retained,
            self.excluded,
            self.retention_rate(),
            self.imprecise,
            self.rounding_matches,
            self.string_matches,
            self.malformed
        )
    }
}
