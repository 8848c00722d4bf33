//! Tests for painting region snapshots and exporting 16-bit PNGs

#[cfg(test)]
mod tests {
    use ndarray::Array2;
    use tempfile::TempDir;
    use tessellate::geometry::polygon::Mask;
    use tessellate::io::raster::{OutputRasters, export_png};
    use tessellate::tessellation::optimizer::RegionSnapshot;

    fn snapshot() -> (Mask, RegionSnapshot) {
        let mask = Mask::from_pixels(vec![[0, 0], [1, 0], [0, 1], [1, 1]]);
        let snapshot = RegionSnapshot {
            ownership: vec![0, 0, 1, 1],
            ids: vec![2, 4],
            areas: vec![2, 2],
            values: vec![-1.5, 1.5],
        };
        (mask, snapshot)
    }

    // Tests new rasters are zeroed with the template shape
    // Verified by swapping rows and columns
    #[test]
    fn test_new_shape() {
        let rasters = OutputRasters::new(5, 3);
        assert_eq!(rasters.width(), 5);
        assert_eq!(rasters.height(), 3);
        assert_eq!(rasters.area.dim(), (3, 5));
        assert!(rasters.value.iter().all(|&v| v == 0.0));
    }

    // Tests painting writes segment data at each pixel
    // Verified by indexing rasters as [x, y]
    #[test]
    fn test_paint_values() {
        let (mask, snapshot) = snapshot();
        let mut rasters = OutputRasters::new(3, 2);
        rasters.paint(&mask, &snapshot, false);

        assert_eq!(rasters.area[[0, 1]], 2);
        assert!((rasters.id[[1, 0]] - 4.0).abs() < f64::EPSILON);
        assert!((rasters.value[[0, 0]] + 1.5).abs() < f64::EPSILON);
        assert!((rasters.value[[1, 1]] - 1.5).abs() < f64::EPSILON);
        assert_eq!(rasters.area[[0, 2]], 0);
    }

    // Tests id normalization by the largest id
    // Verified by normalizing by the segment count
    #[test]
    fn test_paint_normalized_ids() {
        let (mask, snapshot) = snapshot();
        let mut rasters = OutputRasters::new(2, 2);
        rasters.paint(&mask, &snapshot, true);

        assert!((rasters.id[[0, 0]] - 0.5).abs() < f64::EPSILON);
        assert!((rasters.id[[1, 0]] - 1.0).abs() < f64::EPSILON);
    }

    // Tests pixels outside the rasters are skipped
    // Verified by clamping coordinates into range
    #[test]
    fn test_paint_out_of_bounds() {
        let mask = Mask::from_pixels(vec![[-1, 0], [5, 5]]);
        let snapshot = RegionSnapshot {
            ownership: vec![0, 0],
            ids: vec![1],
            areas: vec![2],
            values: vec![1.0],
        };
        let mut rasters = OutputRasters::new(2, 2);
        rasters.paint(&mask, &snapshot, false);
        assert!(rasters.area.iter().all(|&a| a == 0));
    }

    // Tests PNG export stretches values to 16 bits
    // Verified by exporting 8-bit images
    #[test]
    fn test_export_png_16_bit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("raster.png");
        let raster = Array2::from_shape_vec((2, 2), vec![0.0_f64, 1.0, 2.0, 4.0]).unwrap();
        export_png(&raster, &path).unwrap();

        let image = image::open(&path).unwrap().into_luma16();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(0, 0)[0], 0);
        assert_eq!(image.get_pixel(1, 1)[0], u16::MAX);
        assert_eq!(image.get_pixel(0, 1)[0], 32_768);
    }

    // Tests exporting all three rasters
    // Verified by skipping directory creation
    #[test]
    fn test_export_all() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested");
        let (mask, snapshot) = snapshot();
        let mut rasters = OutputRasters::new(2, 2);
        rasters.paint(&mask, &snapshot, true);

        rasters.export(&out).unwrap();
        for name in ["area.png", "id.png", "value.png"] {
            assert!(out.join(name).is_file());
        }
    }
}
