//! Per-record classification
//!
//! Combines the precision classifier and the enabled matching strategies into
//! a single [`Verdict`]. Every check runs independently of the others, so an
//! imprecise record that also sits on a bad coordinate increments both tallies.

use crate::bad_coords::BadCoordinateSet;
use crate::error::Result;
use crate::matcher::Matcher;
use crate::models::{Coordinate, ExclusionReason, LocalityRecord, MatchMode, Verdict};
use crate::precision::PrecisionClassifier;

/// Immutable classification state shared by every record of a run
#[derive(Debug)]
pub struct RecordClassifier {
    precision: PrecisionClassifier,
    matcher: Matcher,
    bad_coordinates: BadCoordinateSet,
}

impl RecordClassifier {
    pub fn new(
        mode: MatchMode,
        min_precision: usize,
        bad_coordinates: BadCoordinateSet,
    ) -> Self {
        Self {
            precision: PrecisionClassifier::new(min_precision),
            matcher: Matcher::for_mode(mode),
            bad_coordinates,
        }
    }

    /// Classify a parsed coordinate
    pub fn classify(&self, coordinate: &Coordinate) -> Verdict {
        let (precision, imprecise) = self.precision.classify(coordinate);
        let mut verdict = Verdict {
            precision,
            imprecise,
            ..Default::default()
        };

        for reason in self.matcher.find_matches(coordinate, &self.bad_coordinates) {
            match reason {
                ExclusionReason::RoundingMatch => verdict.rounding_match = true,
                ExclusionReason::StringMatch => verdict.string_match = true,
                ExclusionReason::Imprecise => verdict.imprecise = true,
            }
        }

        verdict
    }

    /// Parse and classify one raw locality line
    pub fn classify_line(
        &self,
        line_number: usize,
        line: &[u8],
    ) -> Result<(LocalityRecord, Verdict)> {
        let record = LocalityRecord::parse(line_number, line)?;
        let verdict = self.classify(&record.coordinate);
        Ok((record, verdict))
    }
}
