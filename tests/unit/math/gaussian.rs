//! Tests for the discretized Gaussian kernel and one-sided falloff weights

#[cfg(test)]
mod tests {
    use tessellate::math::gaussian::{falloff_weights, gaussian_kernel_1d};

    // Tests non-positive sigma yields the identity kernel
    // Verified by returning an empty kernel for zero sigma
    #[test]
    fn test_zero_sigma_kernel() {
        assert_eq!(gaussian_kernel_1d(0.0), vec![0.0, 1.0, 0.0]);
        assert_eq!(gaussian_kernel_1d(-2.0), vec![0.0, 1.0, 0.0]);
        assert_eq!(gaussian_kernel_1d(f64::NAN), vec![0.0, 1.0, 0.0]);
    }

    // Tests kernel length and peak for sigma 1
    // Verified by normalizing the kernel to unit sum
    #[test]
    fn test_kernel_shape() {
        let kernel = gaussian_kernel_1d(1.0);
        assert_eq!(kernel.len(), 7);
        assert!((kernel[3] - 1.0).abs() < 1e-12);
        assert!((kernel[4] - (-0.5_f64).exp()).abs() < 1e-12);
        assert!((kernel[2] - kernel[4]).abs() < 1e-12);
        assert!((kernel[0] - (-4.5_f64).exp()).abs() < 1e-12);
    }

    // Tests tiny sigma keeps the minimum length of three
    // Verified by removing the minimum size clamp
    #[test]
    fn test_small_sigma_minimum_size() {
        let kernel = gaussian_kernel_1d(0.1);
        assert_eq!(kernel.len(), 3);
        assert!((kernel[1] - 1.0).abs() < 1e-12);
    }

    // Tests falloff weights start at one and decrease
    // Verified by taking the left half of the kernel
    #[test]
    fn test_falloff_weights_decreasing() {
        let weights = falloff_weights(5.0);
        assert_eq!(weights.len(), 16);
        assert!((weights[0] - 1.0).abs() < 1e-12);
        assert!(weights.windows(2).all(|pair| pair[1] < pair[0]));
    }

    // Tests the falloff of a zero sigma reaches only the center
    // Verified by returning the full kernel
    #[test]
    fn test_falloff_weights_zero_sigma() {
        assert_eq!(falloff_weights(0.0), vec![1.0, 0.0]);
    }
}
