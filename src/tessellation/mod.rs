//! Seed-based tessellation of region masks and its concurrent driver

/// Barrier-synchronized multi-region loop
pub mod coordinator;
/// Spatial index mapping seeds to mask pixels
pub mod index;
/// Area and circularity error functions
pub mod metric;
/// Per-region hill-climbing optimizer
pub mod optimizer;
/// Segment cells and seed points
pub mod segment;
/// Candidate segment heuristics
pub mod selection;
/// Seed displacement strategies
pub mod update;
/// Region worker threads
pub mod worker;
