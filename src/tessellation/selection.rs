//! Choice of the seed to perturb in each iteration
//!
//! The heuristic rotates with the iteration counter between random picks and
//! the worst cells. The chosen cell is then swapped for one of its nearest
//! neighbors.

use crate::tessellation::index::SpatialIndex;
use crate::tessellation::segment::Segment;
use rand::Rng;

/// Rule for picking the candidate segment of one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateHeuristic {
    /// Uniformly random segment
    Random,
    /// Segment with the fewest pixels
    SmallestArea,
    /// Segment with the most pixels
    LargestArea,
    /// Segment with the highest inverse circularity
    WorstCircularity,
}

impl CandidateHeuristic {
    /// Heuristic used by the given (one-based) iteration
    ///
    /// Cycles random, smallest, largest, random, worst circularity with
    /// `iteration % 5`.
    pub const fn for_iteration(iteration: usize) -> Self {
        match iteration % 5 {
            1 => Self::SmallestArea,
            2 => Self::LargestArea,
            4 => Self::WorstCircularity,
            _ => Self::Random,
        }
    }

    /// Apply the heuristic to a segment list
    ///
    /// Returns `None` only for an empty list.
    pub fn select<R: Rng + ?Sized>(self, segments: &[Segment], rng: &mut R) -> Option<usize> {
        match self {
            Self::Random => random_segment(segments.len(), rng),
            Self::SmallestArea => smallest_segment(segments),
            Self::LargestArea => largest_segment(segments),
            Self::WorstCircularity => worst_circularity_segment(segments),
        }
    }
}

/// Index of a uniformly random segment
pub fn random_segment<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Option<usize> {
    (count > 0).then(|| rng.random_range(0..count))
}

/// First segment with the smallest area
pub fn smallest_segment(segments: &[Segment]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, segment) in segments.iter().enumerate() {
        if best.is_none_or(|(_, area)| segment.area() < area) {
            best = Some((index, segment.area()));
        }
    }
    best.map(|(index, _)| index)
}

/// First segment with the largest area
pub fn largest_segment(segments: &[Segment]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, segment) in segments.iter().enumerate() {
        if best.is_none_or(|(_, area)| segment.area() > area) {
            best = Some((index, segment.area()));
        }
    }
    best.map(|(index, _)| index)
}

/// First segment with the highest inverse circularity
pub fn worst_circularity_segment(segments: &[Segment]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, segment) in segments.iter().enumerate() {
        let score = segment.inv_circularity();
        if best.is_none_or(|(_, worst)| score > worst) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}

/// One of the `k` segments nearest to `location`, uniformly at random
///
/// The segment whose seed sits at `location` is among the candidates.
pub fn neighbor_segment<R: Rng + ?Sized>(
    index: &SpatialIndex,
    location: [f64; 2],
    k: usize,
    rng: &mut R,
) -> Option<usize> {
    let neighbors = index.k_nearest(location, k.max(1));
    let pick = random_segment(neighbors.len(), rng)?;
    neighbors.get(pick).copied()
}

/// Pick the segment to perturb in the given iteration
///
/// Applies the iteration's heuristic, then resolves the result to one of its
/// `k` nearest neighbors.
pub fn select_candidate<R: Rng + ?Sized>(
    index: &SpatialIndex,
    seeds: &[[f64; 2]],
    iteration: usize,
    k: usize,
    rng: &mut R,
) -> Option<usize> {
    let candidate = CandidateHeuristic::for_iteration(iteration).select(index.segments(), rng)?;
    let location = seeds.get(candidate).copied()?;
    neighbor_segment(index, location, k, rng)
}
