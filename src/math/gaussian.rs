//! Discretized Gaussian kernels for smooth neighborhood falloff

/// Symmetric, unnormalized 1D Gaussian kernel
///
/// The kernel has odd length `max(3, 2 * round(3 * sigma) + 1)` with the
/// peak value 1.0 at the center. A non-positive sigma yields `[0, 1, 0]`.
pub fn gaussian_kernel_1d(sigma: f64) -> Vec<f64> {
    if sigma.is_nan() || sigma <= 0.0 {
        return vec![0.0, 1.0, 0.0];
    }

    let half = 3.0_f64.mul_add(sigma, 0.5).floor() as usize;
    let size = (2 * half + 1).max(3);
    let center = size / 2;
    let two_sq_sigma = 2.0 * sigma * sigma;

    let mut kernel = vec![0.0; size];
    for offset in 0..=center {
        let distance = offset as f64;
        let value = (-(distance * distance) / two_sq_sigma).exp();
        if let Some(slot) = kernel.get_mut(center - offset) {
            *slot = value;
        }
        if let Some(slot) = kernel.get_mut(center + offset) {
            *slot = value;
        }
    }

    kernel
}

/// One-sided falloff weights indexed by integer distance
///
/// Index 0 holds the full weight 1.0; weights decrease toward the kernel
/// tail. Distances beyond the returned length carry no weight.
pub fn falloff_weights(sigma: f64) -> Vec<f64> {
    let kernel = gaussian_kernel_1d(sigma);
    let center = kernel.len() / 2;
    kernel.get(center..).map(<[f64]>::to_vec).unwrap_or_default()
}
