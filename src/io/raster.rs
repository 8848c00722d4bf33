//! Shared output rasters and their PNG export
//!
//! The coordinator paints each updated region into three template-sized
//! rasters: segment area, segment id and segment value. Pixels outside every
//! region stay zero.

use crate::geometry::polygon::Mask;
use crate::io::error::{Result, TessellationError, WithPath, invalid_parameter};
use crate::tessellation::optimizer::RegionSnapshot;
use image::{ImageBuffer, Luma};
use ndarray::Array2;
use num_traits::ToPrimitive;
use std::path::Path;

/// Area, id and value rasters indexed `[row, col]` (`[y, x]`)
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRasters {
    /// Area of the segment owning each pixel
    pub area: Array2<u32>,
    /// Id of the owning segment, optionally divided by the region's max id
    pub id: Array2<f64>,
    /// Value of the owning segment
    pub value: Array2<f64>,
}

impl OutputRasters {
    /// Zeroed rasters of the template size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            area: Array2::zeros((height, width)),
            id: Array2::zeros((height, width)),
            value: Array2::zeros((height, width)),
        }
    }

    /// Template width in pixels
    pub fn width(&self) -> usize {
        self.area.ncols()
    }

    /// Template height in pixels
    pub fn height(&self) -> usize {
        self.area.nrows()
    }

    /// Overwrite a region's pixels from a snapshot
    ///
    /// `snapshot.ownership` must follow the mask's pixel order. Pixels outside
    /// the rasters are skipped.
    pub fn paint(&mut self, mask: &Mask, snapshot: &RegionSnapshot, normalize_ids: bool) {
        let max_id = snapshot.max_id().max(1) as f64;

        for (&pixel, &owner) in mask.pixels().iter().zip(&snapshot.ownership) {
            let (Ok(col), Ok(row)) = (usize::try_from(pixel[0]), usize::try_from(pixel[1])) else {
                continue;
            };
            let area = snapshot.areas.get(owner).copied().unwrap_or(0);
            let id = snapshot.ids.get(owner).copied().unwrap_or(0) as f64;
            let value = snapshot.values.get(owner).copied().unwrap_or(0.0);

            if let Some(slot) = self.area.get_mut([row, col]) {
                *slot = u32::try_from(area).unwrap_or(u32::MAX);
            }
            if let Some(slot) = self.id.get_mut([row, col]) {
                *slot = if normalize_ids { id / max_id } else { id };
            }
            if let Some(slot) = self.value.get_mut([row, col]) {
                *slot = value;
            }
        }
    }

    /// Write `area.png`, `id.png` and `value.png` into `dir`
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or an image
    /// cannot be saved
    pub fn export(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir).with_path(dir, "create directory")?;
        export_png(&self.area, &dir.join("area.png"))?;
        export_png(&self.id, &dir.join("id.png"))?;
        export_png(&self.value, &dir.join("value.png"))
    }
}

/// Save a raster as a 16-bit grayscale PNG
///
/// Values are stretched linearly so the raster's minimum maps to black and
/// its maximum to white. A constant raster exports as black.
///
/// # Errors
///
/// Returns an error if the raster is larger than a PNG allows or the file
/// cannot be written
pub fn export_png<T: ToPrimitive + Copy>(raster: &Array2<T>, path: &Path) -> Result<()> {
    let (rows, cols) = raster.dim();
    let (Ok(width), Ok(height)) = (u32::try_from(cols), u32::try_from(rows)) else {
        return Err(invalid_parameter(
            "raster",
            &format!("{cols}x{rows}"),
            &"too large for PNG export",
        ));
    };

    let values: Vec<f64> = raster
        .iter()
        .map(|v| v.to_f64().filter(|v| v.is_finite()).unwrap_or(0.0))
        .collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let mut img = ImageBuffer::<Luma<u16>, Vec<u16>>::new(width, height);
    for (pixel, &value) in img.pixels_mut().zip(&values) {
        let level = if span > 0.0 {
            ((value - min) / span * f64::from(u16::MAX)).round()
        } else {
            0.0
        };
        *pixel = Luma([level as u16]);
    }

    img.save(path).map_err(|source| TessellationError::ImageExport {
        path: path.to_path_buf(),
        source,
    })
}
