//! Planar geometry: region boundaries, pixel masks and nearest-neighbor search

/// Two-dimensional k-d tree for nearest-seed queries
pub mod kdtree;
/// Boundary polygons and the pixel masks rasterized from them
pub mod polygon;

pub use kdtree::KdTree;
pub use polygon::{Mask, Polygon};
