//! Nearest-seed partition of a region mask

use crate::geometry::kdtree::KdTree;
use crate::geometry::polygon::Mask;
use crate::io::error::{Result, invalid_parameter};
use crate::tessellation::segment::Segment;

/// Maps seed positions to the segments they define
///
/// Segment `i` is owned by seed `i`. The k-d tree is never patched: every
/// seed displacement is followed by [`SpatialIndex::update`], which rebuilds
/// it from scratch.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    segments: Vec<Segment>,
    tree: KdTree,
    /// Segment index per mask pixel, in mask scan order
    ownership: Vec<usize>,
}

impl SpatialIndex {
    /// Index `segments` at the given seed positions
    ///
    /// # Errors
    ///
    /// Returns an error if there are no segments or the seed count differs
    /// from the segment count
    pub fn new(segments: Vec<Segment>, seeds: &[[f64; 2]]) -> Result<Self> {
        if segments.is_empty() {
            return Err(invalid_parameter(
                "segments",
                &0,
                &"an index needs at least one segment",
            ));
        }
        if segments.len() != seeds.len() {
            return Err(invalid_parameter(
                "seeds",
                &seeds.len(),
                &format!("expected one seed per segment ({})", segments.len()),
            ));
        }

        Ok(Self {
            segments,
            tree: KdTree::build(seeds),
            ownership: Vec::new(),
        })
    }

    /// Rebuild the tree over moved seeds
    ///
    /// Leaves segment areas and pixels as they were; call
    /// [`SpatialIndex::rasterize`] afterwards.
    pub fn update(&mut self, seeds: &[[f64; 2]]) {
        self.tree = KdTree::build(seeds);
    }

    /// Assign every mask pixel to the segment of its nearest seed
    ///
    /// Clears all segments first, so afterwards the areas sum to the mask's
    /// pixel count.
    pub fn rasterize(&mut self, mask: &Mask) {
        for segment in &mut self.segments {
            segment.clear();
        }
        self.ownership.clear();
        self.ownership.reserve(mask.len());

        for &pixel in mask.pixels() {
            let location = [f64::from(pixel[0]), f64::from(pixel[1])];
            if let Some(owner) = self.tree.nearest(location)
                && let Some(segment) = self.segments.get_mut(owner)
            {
                segment.assign(pixel);
                self.ownership.push(owner);
            }
        }
    }

    /// Segment index owning the seed nearest to `location`
    pub fn nearest(&self, location: [f64; 2]) -> Option<usize> {
        self.tree.nearest(location)
    }

    /// Segment indices of the `k` seeds nearest to `location`, nearest first
    pub fn k_nearest(&self, location: [f64; 2], k: usize) -> Vec<usize> {
        self.tree.k_nearest(location, k)
    }

    /// Indexed segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Mutable segments, for setting values
    pub fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    /// Segment index per mask pixel from the last rasterization
    pub fn ownership(&self) -> &[usize] {
        &self.ownership
    }
}
