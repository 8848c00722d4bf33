//! Tests for single-seed and distance-weighted seed displacement

#[cfg(test)]
mod tests {
    use tessellate::tessellation::update::PointUpdater;

    // Tests zero sigma selects the single-seed updater
    // Verified by building a kernel for zero sigma
    #[test]
    fn test_for_sigma() {
        assert_eq!(PointUpdater::for_sigma(0.0), PointUpdater::Simple);
        assert!(PointUpdater::for_sigma(0.0).sigma().abs() < f64::EPSILON);

        let updater = PointUpdater::for_sigma(2.0);
        assert!(matches!(updater, PointUpdater::Distance { .. }));
        assert!((updater.sigma() - 2.0).abs() < f64::EPSILON);
    }

    // Tests the simple updater moves only the target
    // Verified by moving every point
    #[test]
    fn test_simple_moves_target_only() {
        let mut points = vec![[0.0, 0.0], [1.0, 0.0], [5.0, 5.0]];
        PointUpdater::Simple.update_points(1, &mut points, 2.0, -1.0);
        assert_eq!(points, vec![[0.0, 0.0], [3.0, -1.0], [5.0, 5.0]]);
    }

    // Tests out-of-range targets change nothing
    // Verified by clamping the target index
    #[test]
    fn test_out_of_range_target() {
        let mut points = vec![[0.0, 0.0], [1.0, 0.0]];
        PointUpdater::Simple.update_points(5, &mut points, 2.0, 2.0);
        PointUpdater::for_sigma(3.0).update_points(5, &mut points, 2.0, 2.0);
        assert_eq!(points, vec![[0.0, 0.0], [1.0, 0.0]]);
    }

    // Tests neighbors move by their falloff weight
    // Verified by measuring distance from the moved target
    #[test]
    fn test_distance_weights_from_original_position() {
        let mut points = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 2.0], [10.0, 10.0]];
        PointUpdater::for_sigma(1.0).update_points(0, &mut points, 1.0, 0.0);

        assert!((points[0][0] - 1.0).abs() < 1e-12);
        assert!((points[1][0] - (1.0 + (-0.5_f64).exp())).abs() < 1e-12);
        assert!((points[2][0] - (-2.0_f64).exp()).abs() < 1e-12);
        assert!((points[2][1] - 2.0).abs() < 1e-12);
        assert_eq!(points[3], [10.0, 10.0]);
    }

    // Tests points beyond the kernel keep their position
    // Verified by extending weights with the last value
    #[test]
    fn test_distance_outside_kernel() {
        let mut points = vec![[0.0, 0.0], [4.0, 0.0]];
        PointUpdater::for_sigma(1.0).update_points(0, &mut points, 0.0, 3.0);
        assert!((points[0][1] - 3.0).abs() < 1e-12);
        assert_eq!(points[1], [4.0, 0.0]);
    }
}
