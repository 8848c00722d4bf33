//! Area- and shape-balanced tessellation of template regions
//!
//! Each region of a template is split into segments by nearest-seed assignment
//! of its pixels. A per-region hill climber moves the seeds until every
//! segment is close to a target area and close to circular, while a
//! coordinator drives all regions in lockstep on their own threads and
//! checkpoints the seeds so a run can be resumed.

#![forbid(unsafe_code)]

/// Region boundaries, pixel masks and nearest-neighbor search
pub mod geometry;
/// File formats, configuration, error handling and the command-line driver
pub mod io;
/// Gaussian falloff kernels and step size schedules
pub mod math;
/// Segments, error metrics, the optimizer and the coordinator
pub mod tessellation;

pub use io::error::{Result, TessellationError};
