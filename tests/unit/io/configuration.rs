//! Tests for optimizer constants and naming conventions

#[cfg(test)]
mod tests {
    use tessellate::io::configuration::{
        CHECKPOINT_SUFFIX, FALLOFF_SIGMAS, LOG_FILE_PREFIX, NEIGHBORHOOD_DIVISOR,
        PERTURBATION_DISTANCES, SEGMENT_FILE_PREFIX,
    };

    // Tests perturbation distances are symmetric and never zero
    // Verified by adding a zero distance
    #[test]
    fn test_distances_symmetric() {
        assert!(PERTURBATION_DISTANCES.iter().all(|&d| d != 0.0));
        for d in PERTURBATION_DISTANCES {
            assert!(PERTURBATION_DISTANCES.contains(&-d));
        }
    }

    // Tests the falloff table ends with the single-point updater
    // Verified by removing the zero sigma
    #[test]
    fn test_sigmas_descending() {
        assert!(FALLOFF_SIGMAS.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(FALLOFF_SIGMAS.last(), Some(&0.0));
    }

    // Tests per-region file names stay distinguishable
    // Verified by sharing the checkpoint and log prefix
    #[test]
    fn test_file_naming() {
        assert_ne!(SEGMENT_FILE_PREFIX, LOG_FILE_PREFIX);
        assert!(CHECKPOINT_SUFFIX.ends_with(".txt"));
        assert!(NEIGHBORHOOD_DIVISOR > 0);
    }
}
