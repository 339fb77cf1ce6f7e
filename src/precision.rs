//! Precision classification of decimal-degree coordinates
//!
//! A coordinate's precision is the number of digits after its decimal point,
//! except that values whose fractional part starts with a repeating-decimal
//! minute signature are treated as precise to one digit only.

use crate::constants::{MINUTE_ARTIFACT_PRECISION, MINUTE_SIGNATURES, MINUTE_SIGNATURE_LENGTH};
use crate::models::Coordinate;

/// Precision score of one axis given its decimal-string form
///
/// - no decimal point (or more than one) -> 0
/// - fractional part starting with a minute signature -> 1
/// - otherwise the number of characters after the point
pub fn axis_precision(text: &str) -> usize {
    let mut parts = text.split('.');
    let (Some(_), Some(fraction), None) = (parts.next(), parts.next(), parts.next()) else {
        return 0;
    };

    if is_minute_artifact(fraction) {
        MINUTE_ARTIFACT_PRECISION
    } else {
        fraction.chars().count()
    }
}

/// Whether the leading fractional digits match a coarse-minute signature
pub fn is_minute_artifact(fraction: &str) -> bool {
    fraction
        .get(..MINUTE_SIGNATURE_LENGTH)
        .is_some_and(|prefix| MINUTE_SIGNATURES.contains(&prefix))
}

/// Record precision: the better of the two axes
pub fn coordinate_precision(coordinate: &Coordinate) -> usize {
    axis_precision(coordinate.latitude.text()).max(axis_precision(coordinate.longitude.text()))
}

/// Classifies records against a minimum precision
#[derive(Debug, Clone, Copy)]
pub struct PrecisionClassifier {
    min_precision: usize,
}

impl PrecisionClassifier {
    pub fn new(min_precision: usize) -> Self {
        Self { min_precision }
    }

    /// Returns the record precision and whether it falls below the minimum
    pub fn classify(&self, coordinate: &Coordinate) -> (usize, bool) {
        let precision = coordinate_precision(coordinate);
        (precision, precision < self.min_precision)
    }
}

impl Default for PrecisionClassifier {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_MIN_PRECISION)
    }
}
