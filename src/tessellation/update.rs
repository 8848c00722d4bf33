//! Seed displacement strategies
//!
//! A move shifts the chosen seed by a delta. The distance-weighted variant
//! drags nearby seeds along with a Gaussian falloff.

use crate::geometry::kdtree::distance_squared;
use crate::math::gaussian::falloff_weights;

/// How a perturbation propagates from the moved seed to its neighbors
#[derive(Debug, Clone, PartialEq)]
pub enum PointUpdater {
    /// Move only the target seed
    Simple,
    /// Move every seed within the kernel radius, scaled by its falloff weight
    Distance {
        /// Weight by rounded distance from the target, `weights[0] == 1`
        weights: Vec<f64>,
        /// Gaussian radius the weights were computed for
        sigma: f64,
    },
}

impl PointUpdater {
    /// Pick the updater for a falloff radius
    ///
    /// A zero (or negative) sigma selects [`PointUpdater::Simple`].
    pub fn for_sigma(sigma: f64) -> Self {
        if sigma > 0.0 {
            Self::Distance {
                weights: falloff_weights(sigma),
                sigma,
            }
        } else {
            Self::Simple
        }
    }

    /// Falloff radius, zero for single-seed moves
    pub const fn sigma(&self) -> f64 {
        match self {
            Self::Simple => 0.0,
            Self::Distance { sigma, .. } => *sigma,
        }
    }

    /// Displace seeds around `points[target]` by `(dx, dy)`
    ///
    /// Distances are measured from the target's position before the move.
    /// An out-of-range target leaves every point untouched.
    pub fn update_points(&self, target: usize, points: &mut [[f64; 2]], dx: f64, dy: f64) {
        match self {
            Self::Simple => {
                if let Some(point) = points.get_mut(target) {
                    point[0] += dx;
                    point[1] += dy;
                }
            }
            Self::Distance { weights, .. } => {
                let Some(&reference) = points.get(target) else {
                    return;
                };
                for point in points.iter_mut() {
                    let distance = distance_squared(*point, reference).sqrt().round() as usize;
                    if let Some(&weight) = weights.get(distance) {
                        point[0] = dx.mul_add(weight, point[0]);
                        point[1] = dy.mul_add(weight, point[1]);
                    }
                }
            }
        }
    }
}
