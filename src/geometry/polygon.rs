//! Region boundaries and the pixel masks derived from them
//!
//! A [`Polygon`] is the closed boundary of one anatomical region in template
//! coordinates. Rasterizing it over the template extent gives a [`Mask`]: the
//! immutable list of integer pixels the region's segments partition.

use crate::io::error::{Result, invalid_parameter};
use rand::Rng;
use std::collections::HashSet;

/// Closed polygon with real-valued vertices
///
/// The closing edge from the last vertex back to the first is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<[f64; 2]>,
}

impl Polygon {
    /// Create a polygon from at least three finite vertices
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than three vertices are given or any
    /// coordinate is not finite
    pub fn new(vertices: Vec<[f64; 2]>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(invalid_parameter(
                "vertices",
                &vertices.len(),
                &"a polygon needs at least 3 vertices",
            ));
        }
        if let Some(bad) = vertices
            .iter()
            .find(|v| !v[0].is_finite() || !v[1].is_finite())
        {
            return Err(invalid_parameter(
                "vertices",
                &format!("{bad:?}"),
                &"vertex coordinates must be finite",
            ));
        }
        Ok(Self { vertices })
    }

    /// Axis-aligned rectangle covering `[x, x + width) x [y, y + height)` pixels
    ///
    /// # Errors
    ///
    /// Returns an error if either extent is zero
    pub fn rectangle(x: i32, y: i32, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(invalid_parameter(
                "rectangle",
                &format!("{width}x{height}"),
                &"extent must be positive",
            ));
        }
        let (x0, y0) = (f64::from(x), f64::from(y));
        let (x1, y1) = (x0 + f64::from(width), y0 + f64::from(height));
        Self::new(vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]])
    }

    /// Boundary vertices in order
    pub fn vertices(&self) -> &[[f64; 2]] {
        &self.vertices
    }

    /// Even-odd containment test
    ///
    /// Points on a left or top edge count as inside, points on a right or
    /// bottom edge as outside, so adjacent polygons never share a pixel.
    pub fn contains(&self, point: [f64; 2]) -> bool {
        let [px, py] = point;
        let mut inside = false;
        let mut previous = self.vertices.last().copied().unwrap_or([0.0, 0.0]);

        for &current in &self.vertices {
            let [xi, yi] = current;
            let [xj, yj] = previous;
            if (yi > py) != (yj > py) {
                let crossing = (xj - xi) * (py - yi) / (yj - yi) + xi;
                if px < crossing {
                    inside = !inside;
                }
            }
            previous = current;
        }

        inside
    }

    /// Integer pixel bounds `(min, max)` inclusive of every vertex
    pub fn pixel_bounds(&self) -> ([i32; 2], [i32; 2]) {
        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];
        for v in &self.vertices {
            min = [min[0].min(v[0]), min[1].min(v[1])];
            max = [max[0].max(v[0]), max[1].max(v[1])];
        }
        (
            [min[0].floor() as i32, min[1].floor() as i32],
            [max[0].ceil() as i32, max[1].ceil() as i32],
        )
    }
}

/// Immutable set of pixels inside a region boundary
///
/// Pixels are stored in row-major scan order (y outer, x inner), which fixes
/// the order segments are rasterized in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    pixels: Vec<[i32; 2]>,
}

impl Mask {
    /// Rasterize a polygon over a `width x height` image
    ///
    /// Only pixels inside both the image and the polygon are kept.
    pub fn from_polygon(polygon: &Polygon, width: usize, height: usize) -> Self {
        let (min, max) = polygon.pixel_bounds();
        let x_range = min[0].max(0)..=max[0].min(width as i32 - 1);
        let y_range = min[1].max(0)..=max[1].min(height as i32 - 1);

        let mut pixels = Vec::new();
        for y in y_range {
            for x in x_range.clone() {
                if polygon.contains([f64::from(x), f64::from(y)]) {
                    pixels.push([x, y]);
                }
            }
        }

        Self { pixels }
    }

    /// Wrap an explicit pixel list, dropping duplicates and sorting to scan order
    pub fn from_pixels(pixels: Vec<[i32; 2]>) -> Self {
        let mut pixels = pixels;
        pixels.sort_by_key(|p| (p[1], p[0]));
        pixels.dedup();
        Self { pixels }
    }

    /// Pixels in scan order
    pub fn pixels(&self) -> &[[i32; 2]] {
        &self.pixels
    }

    /// Number of pixels in the region
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Test if the region covers no pixels
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Draw `count` distinct pixel positions uniformly from the mask
    ///
    /// Deterministic for a given RNG state.
    ///
    /// # Errors
    ///
    /// Returns an error if `count` exceeds the number of pixels
    pub fn sample_points<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<[f64; 2]>> {
        if count > self.pixels.len() {
            return Err(invalid_parameter(
                "count",
                &count,
                &format!("mask holds only {} pixels", self.pixels.len()),
            ));
        }

        let mut taken = HashSet::with_capacity(count);
        let mut points = Vec::with_capacity(count);
        while points.len() < count {
            let index = rng.random_range(0..self.pixels.len());
            if let Some(&pixel) = self.pixels.get(index)
                && taken.insert(pixel)
            {
                points.push([f64::from(pixel[0]), f64::from(pixel[1])]);
            }
        }

        Ok(points)
    }
}
