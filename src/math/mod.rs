//! Mathematical utilities for the optimizer

/// Discretized Gaussian kernels for neighborhood falloff
pub mod gaussian;
/// Error-dependent step size schedule
pub mod schedule;
