//! Scalar error functions over a region's segments

use crate::tessellation::segment::Segment;

/// Error function evaluated over all segments of a region
///
/// Both variants sum squared deviations, so the error is non-negative and
/// zero exactly when every segment meets its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorMetric {
    /// Squared deviation of each segment's area from the target area
    Area {
        /// Multiple of the target charged for segments with area <= 1
        penalty_factor: f64,
    },
    /// Squared deviation of each segment's inverse circularity from the target
    Circularity,
}

impl ErrorMetric {
    /// Raw, unnormalized error of `segments` against `target`
    pub fn compute_error(&self, segments: &[Segment], target: f64) -> f64 {
        match *self {
            Self::Area { penalty_factor } => segments
                .iter()
                .map(|segment| {
                    if segment.area() <= 1 {
                        let penalty = penalty_factor * target;
                        penalty * penalty
                    } else {
                        let diff = segment.area() as f64 - target;
                        diff * diff
                    }
                })
                .sum(),
            Self::Circularity => segments
                .iter()
                .map(|segment| {
                    let diff = segment.inv_circularity() - target;
                    diff * diff
                })
                .sum(),
        }
    }
}
