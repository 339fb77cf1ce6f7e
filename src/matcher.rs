//! Matching of locality coordinates against the bad-coordinate set
//!
//! Two strategies are available and may be combined:
//! - [`StringContainment`] - zero-padded decimal strings of the bad coordinate
//!   must appear inside the query's strings on both axes. Because bad
//!   coordinates are 0.01 degree grid corners, this amounts to truncating the
//!   query to the bad coordinate's digits and comparing.
//! - [`RoundingMatch`] - both axes must agree after rounding to two decimals,
//!   i.e. the query lies in the 0.01 degree cell centred on the bad coordinate.
//!
//! The two are deliberately not equivalent; listing all four corners of a
//! cell as bad coordinates makes either one cover the whole cell.

use crate::bad_coords::{BadCoordinate, BadCoordinateSet};
use crate::constants::{INTEGER_PAD_WIDTH, ROUNDING_DECIMALS};
use crate::models::{Coordinate, ExclusionReason, MatchMode};

/// Zero-pad the integer part of a non-negative coordinate string to three digits
///
/// Negative values are returned unchanged. Padding an already padded (or
/// wider) integer part is a no-op.
pub fn pad_integer_part(text: &str) -> String {
    if text.contains('-') {
        return text.to_string();
    }

    let integer_len = text.split('.').next().map_or(0, |part| part.chars().count());
    let missing = INTEGER_PAD_WIDTH.saturating_sub(integer_len);
    format!("{}{}", "0".repeat(missing), text)
}

/// Integer key of a value rounded to two decimals
///
/// Rounds the exact binary value, so `1.115` (stored as `1.11499..`) gives
/// `111`. Only values that lie exactly halfway, such as `0.125`, are rounded
/// away from zero.
pub fn rounded_key(value: f64) -> i64 {
    let scale = 10f64.powi(ROUNDING_DECIMALS as i32);
    if is_exact_tie(value) {
        // Exact halves are dyadic, so scaling them is exact
        return (value * scale).round() as i64;
    }

    format!("{:.*}", ROUNDING_DECIMALS, value)
        .replace('.', "")
        .parse()
        .unwrap_or_else(|_| (value * scale).round() as i64)
}

/// Whether the exact binary value sits halfway between two rounding steps
///
/// A halfway value `(2k + 1) / (2 * 10^d)` is representable in binary only
/// when it is an odd multiple of `2^-(d + 1)`.
fn is_exact_tie(value: f64) -> bool {
    let steps = value * 2f64.powi(ROUNDING_DECIMALS as i32 + 1);
    steps.fract() == 0.0 && steps % 2.0 != 0.0
}

/// A way of deciding whether a query coordinate hits a bad coordinate
pub trait MatchStrategy: std::fmt::Debug {
    /// Reason recorded when this strategy excludes a record
    fn reason(&self) -> ExclusionReason;

    /// Whether the query coordinate matches any entry of the set
    fn matches(&self, query: &Coordinate, bad_coordinates: &BadCoordinateSet) -> bool;
}

/// Substring containment on zero-padded decimal strings
#[derive(Debug, Clone, Copy, Default)]
pub struct StringContainment;

impl StringContainment {
    /// Test one padded query pair against one bad entry
    pub fn contains(query_lat: &str, query_lon: &str, bad: &BadCoordinate) -> bool {
        query_lat.contains(bad.latitude()) && query_lon.contains(bad.longitude())
    }
}

impl MatchStrategy for StringContainment {
    fn reason(&self) -> ExclusionReason {
        ExclusionReason::StringMatch
    }

    fn matches(&self, query: &Coordinate, bad_coordinates: &BadCoordinateSet) -> bool {
        let query_lat = pad_integer_part(query.latitude.text());
        let query_lon = pad_integer_part(query.longitude.text());

        bad_coordinates
            .iter()
            .any(|bad| Self::contains(&query_lat, &query_lon, bad))
    }
}

/// Equality after rounding both coordinates to two decimals
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundingMatch;

impl MatchStrategy for RoundingMatch {
    fn reason(&self) -> ExclusionReason {
        ExclusionReason::RoundingMatch
    }

    fn matches(&self, query: &Coordinate, bad_coordinates: &BadCoordinateSet) -> bool {
        let lat_key = rounded_key(query.latitude.value());
        let lon_key = rounded_key(query.longitude.value());

        bad_coordinates
            .iter()
            .any(|bad| bad.rounded_latitude() == lat_key && bad.rounded_longitude() == lon_key)
    }
}

/// The strategies enabled for a run, consulted in pipeline order
#[derive(Debug)]
pub struct Matcher {
    strategies: Vec<Box<dyn MatchStrategy + Send + Sync>>,
}

impl Matcher {
    /// Build the matcher for a mode: rounding first, then string containment
    pub fn for_mode(mode: MatchMode) -> Self {
        let mut strategies: Vec<Box<dyn MatchStrategy + Send + Sync>> = Vec::new();
        if mode.uses_rounding() {
            strategies.push(Box::new(RoundingMatch));
        }
        if mode.uses_string_matching() {
            strategies.push(Box::new(StringContainment));
        }
        Self { strategies }
    }

    /// Run every enabled strategy; all are consulted even after a hit
    pub fn find_matches(
        &self,
        query: &Coordinate,
        bad_coordinates: &BadCoordinateSet,
    ) -> Vec<ExclusionReason> {
        self.strategies
            .iter()
            .filter(|strategy| strategy.matches(query, bad_coordinates))
            .map(|strategy| strategy.reason())
            .collect()
    }

}
