//! Error types and context management for tessellation operations

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all tessellation operations
#[derive(Debug)]
pub enum TessellationError {
    /// Template directory is missing or incomplete
    TemplateLoad {
        /// Path of the directory or file that could not be used
        path: PathBuf,
        /// Description of what is missing
        reason: String,
    },

    /// A plain-text input file contains a malformed line
    Parse {
        /// File being parsed
        path: PathBuf,
        /// One-based line number of the offending line
        line: usize,
        /// Description of the problem
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Checkpoint holds a different number of seeds than the region requires
    ///
    /// The expected count is derived from the region's mask area and target
    /// area, so a mismatch means the checkpoint belongs to another region or
    /// another target area. Never truncated or padded.
    SeedCountMismatch {
        /// Checkpoint file
        path: PathBuf,
        /// Seed count implied by mask and target area
        expected: usize,
        /// Seed count found in the file
        found: usize,
    },

    /// Checkpoint lists the same segment id twice
    DuplicateSeed {
        /// Checkpoint file
        path: PathBuf,
        /// Repeated segment id
        id: usize,
    },

    /// Region mask cannot hold a single segment of the target area
    RegionTooSmall {
        /// Region index
        region: usize,
        /// Number of pixels inside the region boundary
        mask_area: usize,
        /// Requested area per segment
        target_area: usize,
    },

    /// Workers reported different iteration counters at the start of a round
    IterationDesync {
        /// Coordinator round that detected the mismatch
        round: usize,
        /// Iteration counter of the first region
        expected: usize,
        /// Region whose counter differs
        region: usize,
        /// Counter reported by that region
        found: usize,
    },

    /// A region worker thread could not be started, vanished, or panicked
    Worker {
        /// Region index
        region: usize,
        /// Description of the failure
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to save a raster image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },
}

impl fmt::Display for TessellationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TemplateLoad { path, reason } => {
                write!(f, "Failed to load template '{}': {reason}", path.display())
            }
            Self::Parse { path, line, reason } => {
                write!(f, "Malformed line {line} in '{}': {reason}", path.display())
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::SeedCountMismatch {
                path,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Wrong number of seed points in '{}': expected {expected}, found {found}",
                    path.display()
                )
            }
            Self::DuplicateSeed { path, id } => {
                write!(f, "Segment id {id} appears twice in '{}'", path.display())
            }
            Self::RegionTooSmall {
                region,
                mask_area,
                target_area,
            } => {
                write!(
                    f,
                    "Region {region} has {mask_area} pixels, too few for target area {target_area}"
                )
            }
            Self::IterationDesync {
                round,
                expected,
                region,
                found,
            } => {
                write!(
                    f,
                    "Iterations out of sync in round {round}: region {region} is at iteration {found}, expected {expected}"
                )
            }
            Self::Worker { region, reason } => {
                write!(f, "Worker for region {region} failed: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for TessellationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for tessellation results
pub type Result<T> = std::result::Result<T, TessellationError>;

impl From<std::io::Error> for TessellationError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Attaches the path and operation to raw I/O failures
pub trait WithPath<T> {
    /// Convert an I/O error into [`TessellationError::FileSystem`]
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path and operation applied
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T> WithPath<T> for std::io::Result<T> {
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|source| TessellationError::FileSystem {
            path: path.to_path_buf(),
            operation,
            source,
        })
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> TessellationError {
    TessellationError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a parse error for a one-based line number
pub fn parse_error(path: &Path, line: usize, reason: &impl ToString) -> TessellationError {
    TessellationError::Parse {
        path: path.to_path_buf(),
        line,
        reason: reason.to_string(),
    }
}
