//! Error-dependent shrinking of perturbation distances and falloff radii
//!
//! The hill climber takes large steps while a region is far from balanced and
//! progressively smaller ones as it converges. The divisor is an exponential
//! curve fitted over `log10(error)`; it grows as the error falls.

use rand::Rng;

// Fitted curve parameters
const OFFSET: f64 = -0.239_48;
const FAST_AMPLITUDE: f64 = 13.883_49;
const FAST_DECAY: f64 = 0.054_11;
const SLOW_AMPLITUDE: f64 = 2.691_44;
const SLOW_DECAY: f64 = 0.446_34;
const PIVOT: f64 = 5.243_47;

/// Floor applied to the factor before dividing distances
pub const MIN_DISTANCE_DIVISOR: f64 = 0.1;
/// Floor applied to ten times the factor before dividing sigmas
pub const MIN_SIGMA_DIVISOR: f64 = 1.0;

/// Step shrink factor for a combined error value
///
/// Monotone: a smaller error gives a larger factor. Errors at or below zero
/// give an infinite factor, shrinking every step to zero.
pub fn error_factor(error: f64) -> f64 {
    if error <= 0.0 {
        return f64::INFINITY;
    }
    let exponent = error.log10() - PIVOT;
    SLOW_AMPLITUDE.mul_add(
        (-exponent / SLOW_DECAY).exp(),
        FAST_AMPLITUDE.mul_add((-exponent / FAST_DECAY).exp(), OFFSET),
    )
}

/// Perturbation menu for one hill-climbing iteration
#[derive(Debug, Clone, PartialEq)]
pub struct StepSchedule {
    distances: Vec<f64>,
    sigmas: Vec<f64>,
    factor: f64,
}

impl StepSchedule {
    /// Shrink the base tables according to the current error
    pub fn for_error(base_distances: &[f64], base_sigmas: &[f64], error: f64) -> Self {
        let factor = error_factor(error);
        let distance_divisor = factor.max(MIN_DISTANCE_DIVISOR);
        let sigma_divisor = (factor * 10.0).max(MIN_SIGMA_DIVISOR);

        Self {
            distances: base_distances
                .iter()
                .map(|distance| distance / distance_divisor)
                .collect(),
            sigmas: base_sigmas
                .iter()
                .map(|sigma| sigma / sigma_divisor)
                .collect(),
            factor,
        }
    }

    /// Signed distances to try along each axis
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Candidate falloff radii
    pub fn sigmas(&self) -> &[f64] {
        &self.sigmas
    }

    /// Raw factor the tables were divided by
    pub const fn factor(&self) -> f64 {
        self.factor
    }

    /// Draw one falloff radius uniformly at random
    ///
    /// Returns 0.0 (single-point moves) when the sigma table is empty.
    pub fn pick_sigma<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.sigmas.is_empty() {
            return 0.0;
        }
        let index = rng.random_range(0..self.sigmas.len());
        self.sigmas.get(index).copied().unwrap_or(0.0)
    }
}
