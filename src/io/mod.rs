//! File formats, configuration and the command-line driver

/// Seed checkpoint files
pub mod checkpoint;
/// Command-line argument parsing and the tessellation runner
pub mod cli;
/// Optimizer constants and defaults
pub mod configuration;
/// Error types and result aliases
pub mod error;
/// Per-region state logs
pub mod log;
/// Round progress display
pub mod progress;
/// Output rasters and PNG export
pub mod raster;
/// Template directory loading
pub mod template;
