//! Tessellation cells and the seed points that define them

use crate::io::configuration::DEGENERATE_INV_CIRCULARITY;
use bitvec::prelude::*;
use std::f64::consts::PI;

/// One cell of a region's tessellation
///
/// `area` and `pixels` are transient: both are cleared and rebuilt by every
/// index rasterization and are never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    id: usize,
    area: usize,
    value: f64,
    pixels: Vec<[i32; 2]>,
}

impl Segment {
    /// Create an empty segment with a stable id
    pub const fn new(id: usize) -> Self {
        Self {
            id,
            area: 0,
            value: 0.0,
            pixels: Vec::new(),
        }
    }

    /// Stable id, unique within a region
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Number of pixels currently assigned
    pub const fn area(&self) -> usize {
        self.area
    }

    /// Overwrite the pixel count
    pub const fn set_area(&mut self, area: usize) {
        self.area = area;
    }

    /// Increment the pixel count by one
    pub const fn inc_area(&mut self) {
        self.area += 1;
    }

    /// Application-defined scalar
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Set the application-defined scalar
    pub const fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Pixels owned by this segment
    pub fn pixels(&self) -> &[[i32; 2]] {
        &self.pixels
    }

    /// Mutable pixel list, filled by index rasterization
    pub const fn pixels_mut(&mut self) -> &mut Vec<[i32; 2]> {
        &mut self.pixels
    }

    /// Drop all pixels and reset the area to zero
    pub fn clear(&mut self) {
        self.area = 0;
        self.pixels.clear();
    }

    /// Take ownership of one pixel
    pub fn assign(&mut self, pixel: [i32; 2]) {
        self.inc_area();
        self.pixels.push(pixel);
    }

    /// Count owned pixels with a 4-neighbor outside the segment
    ///
    /// Works on a raster spanning the segment's bounding box plus a one-pixel
    /// empty border, so the cost scales with the segment, not the image.
    pub fn border_pixels(&self) -> usize {
        let Some(&first) = self.pixels.first() else {
            return 0;
        };

        let (mut min, mut max) = (first, first);
        for p in &self.pixels {
            min = [min[0].min(p[0]), min[1].min(p[1])];
            max = [max[0].max(p[0]), max[1].max(p[1])];
        }

        let width = (max[0] - min[0] + 3) as usize;
        let height = (max[1] - min[1] + 3) as usize;
        let cell = |x: i32, y: i32| ((y - min[1] + 1) as usize) * width + (x - min[0] + 1) as usize;

        let mut raster = bitvec![0; width * height];
        for p in &self.pixels {
            raster.set(cell(p[0], p[1]), true);
        }

        let owned = |x: i32, y: i32| raster.get(cell(x, y)).is_some_and(|bit| *bit);

        self.pixels
            .iter()
            .filter(|p| {
                let [x, y] = **p;
                !owned(x - 1, y) || !owned(x + 1, y) || !owned(x, y - 1) || !owned(x, y + 1)
            })
            .count()
    }

    /// Inverse circularity `perimeter^2 * 2 / (4 * pi * area)`
    ///
    /// Larger values mean less circular. A segment without border pixels
    /// (no pixels at all) reports [`DEGENERATE_INV_CIRCULARITY`].
    pub fn inv_circularity(&self) -> f64 {
        let perimeter = self.border_pixels() as f64;
        if perimeter <= 0.0 {
            return DEGENERATE_INV_CIRCULARITY;
        }
        (perimeter * perimeter * 2.0) / (4.0 * PI * self.area as f64)
    }

    /// Mean pixel position, `None` for an empty segment
    pub fn center_of_mass(&self) -> Option<[f64; 2]> {
        if self.pixels.is_empty() {
            return None;
        }
        let (sx, sy) = self
            .pixels
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + f64::from(p[0]), sy + f64::from(p[1])));
        let n = self.pixels.len() as f64;
        Some([sx / n, sy / n])
    }
}

/// Continuous seed position bound to a segment id
///
/// The only per-segment state written to checkpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedPoint {
    /// Id of the segment this seed defines
    pub id: usize,
    /// Position in template pixel coordinates
    pub position: [f64; 2],
}
