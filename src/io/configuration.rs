//! Optimizer constants and runtime configuration defaults

/// Target pixel count per segment when the template does not override it
pub const DEFAULT_TARGET_AREA: usize = 200;

/// Target inverse circularity (a perfect disc)
pub const TARGET_CIRCULARITY: f64 = 0.0;

// Empty and single-pixel segments must always dominate the area error
/// Multiple of the target area charged for a segment with area <= 1
pub const AREA_PENALTY_FACTOR: f64 = 100.0;

/// Inverse circularity reported for a segment without border pixels
pub const DEGENERATE_INV_CIRCULARITY: f64 = 100.0;

// Fitted on the wing template
/// Weight of the circularity error in the combined error
pub const CIRCULARITY_WEIGHT: f64 = 300.0;
/// Scale applied to per-point errors so regions of any size compare
pub const ERROR_NORMALIZATION: f64 = 169.0;

/// Number of nearest seeds a candidate segment is resolved against
pub const NEIGHBOR_CANDIDATES: usize = 4;

/// Signed perturbation distances before error-dependent shrinking
pub const PERTURBATION_DISTANCES: [f64; 10] =
    [-64.0, -32.0, -16.0, -8.0, -4.0, 4.0, 8.0, 16.0, 32.0, 64.0];

// A zero sigma selects the single-point updater
/// Gaussian falloff radii before error-dependent shrinking
pub const FALLOFF_SIGMAS: [f64; 5] = [40.0, 20.0, 10.0, 5.0, 0.0];

/// Segments per neighborhood when computing the balance value
pub const NEIGHBORHOOD_DIVISOR: usize = 15;

// Fixed seeds for reproducible runs
/// Seed for the initial constrained random placement
pub const DEFAULT_PLACEMENT_SEED: u64 = 35_235;
/// Seed for the per-region hill-climbing search
pub const DEFAULT_SEARCH_SEED: u64 = 1_353;

/// Rounds between two checkpoint writes
pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 1000;

/// Rounds run by the command-line driver unless overridden
pub const DEFAULT_ROUNDS: usize = 10_000;

// Template directory layout
/// File holding image width and height, one per line
pub const DIMENSIONS_FILE: &str = "templatedims.txt";
/// File holding the target segment area
pub const TARGET_AREA_FILE: &str = "targetarea.txt";
/// Suffix of region boundary files
pub const POLYGON_SUFFIX: &str = ".polygon.txt";

// Output naming
/// Prefix of per-region checkpoint and log files
pub const SEGMENT_FILE_PREFIX: &str = "segment_";
/// Suffix of per-region checkpoint files
pub const CHECKPOINT_SUFFIX: &str = ".points.txt";
/// Prefix of per-region state logs
pub const LOG_FILE_PREFIX: &str = "log_segment_";

/// Width of the round progress bar in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
