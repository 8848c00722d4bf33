//! Tests for the error factor curve and the shrinking step tables

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tessellate::io::configuration::{FALLOFF_SIGMAS, PERTURBATION_DISTANCES};
    use tessellate::math::schedule::{StepSchedule, error_factor};

    // Tests factor value at the curve pivot
    // Verified by dropping the slow exponential term
    #[test]
    fn test_error_factor_at_pivot() {
        let pivot = 10_f64.powf(5.243_47);
        let expected = -0.239_48 + 13.883_49 + 2.691_44;
        assert!((error_factor(pivot) - expected).abs() < 1e-9);
    }

    // Tests smaller errors give larger factors
    // Verified by flipping the exponent sign
    #[test]
    fn test_error_factor_monotone() {
        let errors = [1e9, 1e7, 1e6, 1e5, 1e4, 1e3];
        let factors: Vec<f64> = errors.iter().map(|&e| error_factor(e)).collect();
        assert!(factors.windows(2).all(|pair| pair[1] > pair[0]));
    }

    // Tests zero error gives an infinite factor
    // Verified by evaluating the curve at log10(0)
    #[test]
    fn test_error_factor_zero_error() {
        assert!(error_factor(0.0).is_infinite());
        assert!(error_factor(-1.0).is_infinite());
    }

    // Tests large errors hit the distance divisor floor
    // Verified by removing the 0.1 floor
    #[test]
    fn test_schedule_large_error_uses_floor() {
        let schedule = StepSchedule::for_error(&PERTURBATION_DISTANCES, &FALLOFF_SIGMAS, 1e9);
        assert!(schedule.factor() < 0.1);
        assert!((schedule.distances()[0] + 640.0).abs() < 1e-9);
        assert!((schedule.distances()[9] - 640.0).abs() < 1e-9);
        assert_eq!(schedule.sigmas(), &FALLOFF_SIGMAS);
    }

    // Tests small errors shrink both tables
    // Verified by dividing sigmas by the raw factor
    #[test]
    fn test_schedule_small_error_shrinks() {
        let schedule = StepSchedule::for_error(&PERTURBATION_DISTANCES, &FALLOFF_SIGMAS, 1e4);
        let factor = schedule.factor();
        assert!(factor > 1.0);
        assert!((schedule.distances()[9] - 64.0 / factor).abs() < 1e-9);
        assert!((schedule.sigmas()[0] - 40.0 / (10.0 * factor)).abs() < 1e-9);
        assert!(schedule.sigmas()[4].abs() < 1e-12);
    }

    // Tests zero error collapses all steps to zero
    // Verified by skipping the infinite factor guard
    #[test]
    fn test_schedule_zero_error() {
        let schedule = StepSchedule::for_error(&PERTURBATION_DISTANCES, &FALLOFF_SIGMAS, 0.0);
        assert!(schedule.distances().iter().all(|d| d.abs() < 1e-12));
        assert!(schedule.sigmas().iter().all(|s| s.abs() < 1e-12));
    }

    // Tests sigma draws come from the table
    // Verified by drawing from a fixed index range
    #[test]
    fn test_pick_sigma() {
        let schedule = StepSchedule::for_error(&PERTURBATION_DISTANCES, &FALLOFF_SIGMAS, 1e9);
        let mut rng = StdRng::seed_from_u64(1_353);
        for _ in 0..50 {
            let sigma = schedule.pick_sigma(&mut rng);
            assert!(FALLOFF_SIGMAS.contains(&sigma));
        }

        let empty = StepSchedule::for_error(&[1.0], &[], 1e9);
        assert!(empty.pick_sigma(&mut rng).abs() < 1e-12);
    }
}
