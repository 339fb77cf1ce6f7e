//! Application constants for the coordinate cleaner
//!
//! Fixed thresholds, signatures and widths used by the precision classifier,
//! the bad-coordinate set builder and the matcher.

// =============================================================================
// Precision Classification
// =============================================================================

/// Minimum number of meaningful decimal digits a record needs on at least one axis
pub const DEFAULT_MIN_PRECISION: usize = 2;

/// Precision assigned to coordinates that encode a whole number of coarse arc-minutes
pub const MINUTE_ARTIFACT_PRECISION: usize = 1;

/// Number of leading fractional digits compared against the minute signatures
pub const MINUTE_SIGNATURE_LENGTH: usize = 6;

/// Repeating-decimal renderings of coarse minute readings
///
/// A coordinate whose fractional part starts with one of these looks precise
/// but was recorded in whole arc-minutes:
/// - `166666` = 10 min
/// - `333333` = 20 min
/// - `666666` = 40 min
/// - `833333` = 50 min
pub const MINUTE_SIGNATURES: &[&str] = &["166666", "333333", "666666", "833333"];

// =============================================================================
// Coordinate Matching
// =============================================================================

/// Width of the zero-padded integer part of non-negative coordinate strings
pub const INTEGER_PAD_WIDTH: usize = 3;

/// Decimal places used by the rounding strategy (0.01 degree cells)
pub const ROUNDING_DECIMALS: usize = 2;

/// Number of bad-coordinate lines describing one exclusion cell
pub const CELL_CORNER_COUNT: usize = 4;

// =============================================================================
// Input Format
// =============================================================================

/// Minimum number of fields in a locality line (name, latitude, longitude)
pub const LOCALITY_MIN_FIELDS: usize = 3;

/// Minimum number of fields in a bad-coordinate line (latitude, longitude)
pub const BAD_COORD_MIN_FIELDS: usize = 2;

/// Zero-based field index of the latitude in a locality line
pub const LATITUDE_FIELD: usize = 1;

/// Zero-based field index of the longitude in a locality line
pub const LONGITUDE_FIELD: usize = 2;

/// Field delimiter; tabs also separate fields
pub const FIELD_DELIMITER: u8 = b',';

// =============================================================================
// Progress and Reporting
// =============================================================================

/// Records between progress updates
pub const DEFAULT_PROGRESS_INTERVAL: usize = 500;

/// Records parsed before the runtime projection is logged
pub const RUNTIME_PROJECTION_SAMPLE: usize = 200;

/// Maximum number of malformed-record messages retained in the statistics
pub const MAX_RETAINED_ERRORS: usize = 20;

/// Directory name under the user config dir holding `config.toml`
pub const CONFIG_DIR_NAME: &str = "coord-cleaner";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";
