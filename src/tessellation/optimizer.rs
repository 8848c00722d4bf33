//! Per-region hill climber over seed positions
//!
//! Each iteration picks one seed, tries every distance of the current step
//! schedule along both axes, and keeps only the single move that lowers the
//! combined error the most. Every trial rebuilds the spatial index and
//! re-rasterizes the whole mask, so a trial's error is exact.

use crate::geometry::polygon::Mask;
use crate::io::checkpoint::{load_seeds, write_seeds};
use crate::io::configuration::{
    AREA_PENALTY_FACTOR, CIRCULARITY_WEIGHT, DEFAULT_PLACEMENT_SEED, DEFAULT_SEARCH_SEED,
    DEFAULT_TARGET_AREA, ERROR_NORMALIZATION, FALLOFF_SIGMAS, NEIGHBOR_CANDIDATES,
    NEIGHBORHOOD_DIVISOR, PERTURBATION_DISTANCES, TARGET_CIRCULARITY,
};
use crate::io::error::{Result, TessellationError, invalid_parameter};
use crate::math::schedule::StepSchedule;
use crate::tessellation::index::SpatialIndex;
use crate::tessellation::metric::ErrorMetric;
use crate::tessellation::segment::{SeedPoint, Segment};
use crate::tessellation::selection::select_candidate;
use crate::tessellation::update::PointUpdater;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Tunable parameters of the hill climber
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    /// Target pixel count per segment
    pub target_area: usize,
    /// Target inverse circularity
    pub target_circularity: f64,
    /// Weight of the circularity error in the combined error
    pub circularity_weight: f64,
    /// Scale applied to per-point errors
    pub error_normalization: f64,
    /// Multiple of the target area charged for degenerate segments
    pub area_penalty_factor: f64,
    /// Nearest neighbors a candidate is resolved against
    pub neighbor_candidates: usize,
    /// Signed base step distances
    pub distances: Vec<f64>,
    /// Base falloff radii, zero meaning single-seed moves
    pub sigmas: Vec<f64>,
    /// Seed of the search RNG
    pub search_seed: u64,
    /// Seed of the initial placement RNG
    pub placement_seed: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            target_area: DEFAULT_TARGET_AREA,
            target_circularity: TARGET_CIRCULARITY,
            circularity_weight: CIRCULARITY_WEIGHT,
            error_normalization: ERROR_NORMALIZATION,
            area_penalty_factor: AREA_PENALTY_FACTOR,
            neighbor_candidates: NEIGHBOR_CANDIDATES,
            distances: PERTURBATION_DISTANCES.to_vec(),
            sigmas: FALLOFF_SIGMAS.to_vec(),
            search_seed: DEFAULT_SEARCH_SEED,
            placement_seed: DEFAULT_PLACEMENT_SEED,
        }
    }
}

impl OptimizerConfig {
    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns an error if the target area is zero, a weight is negative or
    /// not finite, or no neighbor candidates are allowed
    pub fn validate(&self) -> Result<()> {
        if self.target_area == 0 {
            return Err(invalid_parameter(
                "target_area",
                &self.target_area,
                &"must be positive",
            ));
        }
        if !self.error_normalization.is_finite() || self.error_normalization <= 0.0 {
            return Err(invalid_parameter(
                "error_normalization",
                &self.error_normalization,
                &"must be positive and finite",
            ));
        }
        if !self.circularity_weight.is_finite() || self.circularity_weight < 0.0 {
            return Err(invalid_parameter(
                "circularity_weight",
                &self.circularity_weight,
                &"must be non-negative and finite",
            ));
        }
        if self.neighbor_candidates == 0 {
            return Err(invalid_parameter(
                "neighbor_candidates",
                &self.neighbor_candidates,
                &"must be at least 1",
            ));
        }
        Ok(())
    }

    /// Number of seeds a mask of `mask_area` pixels is split into
    pub const fn seed_count(&self, mask_area: usize) -> usize {
        if self.target_area == 0 {
            0
        } else {
            mask_area / self.target_area
        }
    }
}

/// Coordinate axis a perturbation moves along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal
    X,
    /// Vertical
    Y,
}

impl Axis {
    /// Both axes in trial order
    pub const ALL: [Self; 2] = [Self::X, Self::Y];

    /// Displacement vector for a signed distance along this axis
    pub const fn delta(self, distance: f64) -> (f64, f64) {
        match self {
            Self::X => (distance, 0.0),
            Self::Y => (0.0, distance),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

/// The move applied by an updating iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perturbation {
    /// Signed step distance
    pub distance: f64,
    /// Axis of the step
    pub axis: Axis,
    /// Falloff radius, zero for a single-seed move
    pub sigma: f64,
    /// Segment index of the moved seed
    pub target: usize,
}

/// Normalized errors of a region's current partition
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ErrorSummary {
    /// Normalized area error
    pub area: f64,
    /// Normalized circularity error
    pub circularity: f64,
    /// `area + circularity_weight * circularity`
    pub combined: f64,
}

/// Area statistics of a region's current partition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStatistics {
    /// Number of seeds
    pub point_count: usize,
    /// Area of the smallest segment
    pub smallest_area: usize,
    /// Area of the largest segment
    pub largest_area: usize,
    /// Mean segment area
    pub mean_area: f64,
}

/// Per-pixel data needed to paint a region onto the output rasters
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSnapshot {
    /// Segment index per mask pixel, in mask scan order
    pub ownership: Vec<usize>,
    /// Segment ids by segment index
    pub ids: Vec<usize>,
    /// Segment areas by segment index
    pub areas: Vec<usize>,
    /// Segment values by segment index
    pub values: Vec<f64>,
}

impl RegionSnapshot {
    /// Largest segment id, zero for an empty snapshot
    pub fn max_id(&self) -> usize {
        self.ids.iter().copied().max().unwrap_or(0)
    }
}

/// Hill-climbing state of one region
#[derive(Debug)]
pub struct RegionOptimizer {
    region: usize,
    mask: Arc<Mask>,
    positions: Vec<[f64; 2]>,
    index: SpatialIndex,
    rng: StdRng,
    config: OptimizerConfig,
    errors: ErrorSummary,
    iteration: usize,
    last_move: Option<Perturbation>,
}

impl RegionOptimizer {
    /// Place `mask_area / target_area` seeds at distinct random mask pixels
    ///
    /// Placement uses its own RNG seeded with `config.placement_seed`, so the
    /// same mask and config always give the same start.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the mask is smaller than
    /// one target area
    pub fn new(region: usize, mask: Arc<Mask>, config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        let count = config.seed_count(mask.len());
        if count == 0 {
            return Err(TessellationError::RegionTooSmall {
                region,
                mask_area: mask.len(),
                target_area: config.target_area,
            });
        }

        let mut placement = StdRng::seed_from_u64(config.placement_seed);
        let seeds = mask
            .sample_points(count, &mut placement)?
            .into_iter()
            .enumerate()
            .map(|(id, position)| SeedPoint { id, position })
            .collect();

        Self::with_seeds(region, mask, seeds, config)
    }

    /// Start from explicit seed positions
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or no seeds are given
    pub fn with_seeds(
        region: usize,
        mask: Arc<Mask>,
        seeds: Vec<SeedPoint>,
        config: OptimizerConfig,
    ) -> Result<Self> {
        config.validate()?;
        if seeds.is_empty() {
            return Err(TessellationError::RegionTooSmall {
                region,
                mask_area: mask.len(),
                target_area: config.target_area,
            });
        }

        let segments = seeds.iter().map(|seed| Segment::new(seed.id)).collect();
        let positions: Vec<[f64; 2]> = seeds.iter().map(|seed| seed.position).collect();
        let index = SpatialIndex::new(segments, &positions)?;

        let mut optimizer = Self {
            region,
            mask,
            positions,
            index,
            rng: StdRng::seed_from_u64(config.search_seed),
            config,
            errors: ErrorSummary::default(),
            iteration: 0,
            last_move: None,
        };
        optimizer.errors = optimizer.measure();
        Ok(optimizer)
    }

    /// Resume from a checkpoint file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds a
    /// seed count other than `mask_area / target_area`
    pub fn from_checkpoint(
        region: usize,
        mask: Arc<Mask>,
        path: &Path,
        config: OptimizerConfig,
    ) -> Result<Self> {
        config.validate()?;
        let seeds = load_seeds(path, config.seed_count(mask.len()))?;
        debug!(
            "Region {region}: resumed {} seeds from {}",
            seeds.len(),
            path.display()
        );
        Self::with_seeds(region, mask, seeds, config)
    }

    /// Run one hill-climbing iteration
    ///
    /// Returns whether a move was applied. A stall (no trial beat the current
    /// error) leaves the seeds unchanged.
    pub fn run_iteration(&mut self) -> bool {
        self.iteration += 1;

        let Some(target) = select_candidate(
            &self.index,
            &self.positions,
            self.iteration,
            self.config.neighbor_candidates,
            &mut self.rng,
        ) else {
            return false;
        };

        let backup = self.positions.clone();
        let schedule = StepSchedule::for_error(
            &self.config.distances,
            &self.config.sigmas,
            self.errors.combined,
        );
        let sigma = schedule.pick_sigma(&mut self.rng);
        let updater = PointUpdater::for_sigma(sigma);

        let mut best: Option<Perturbation> = None;
        let mut best_error = self.errors.combined;
        for &distance in schedule.distances() {
            for axis in Axis::ALL {
                let (dx, dy) = axis.delta(distance);
                updater.update_points(target, &mut self.positions, dx, dy);
                let trial = self.measure();
                if trial.combined < best_error {
                    best_error = trial.combined;
                    best = Some(Perturbation {
                        distance,
                        axis,
                        sigma,
                        target,
                    });
                }
                self.positions.clone_from(&backup);
            }
        }

        if let Some(step) = best {
            let (dx, dy) = step.axis.delta(step.distance);
            updater.update_points(step.target, &mut self.positions, dx, dy);
            self.last_move = Some(step);
        }
        self.errors = self.measure();

        best.is_some()
    }

    /// Run until the area error reaches zero or `max_iterations` have run
    ///
    /// Returns the number of iterations run.
    pub fn optimize(&mut self, max_iterations: usize) -> usize {
        let mut count = 0;
        while count < max_iterations && self.errors.area > 0.0 {
            self.run_iteration();
            count += 1;
        }
        count
    }

    /// Jitter every seed by up to `amount` on each axis
    pub fn shake(&mut self, amount: f64) {
        for position in &mut self.positions {
            position[0] += (self.rng.random::<f64>() - 0.5) * 2.0 * amount;
            position[1] += (self.rng.random::<f64>() - 0.5) * 2.0 * amount;
        }
        self.errors = self.measure();
    }

    /// Neighborhood size used for the balance value
    pub fn neighborhood_size(&self) -> usize {
        (self.positions.len() / NEIGHBORHOOD_DIVISOR).max(1)
    }

    /// Set each segment's value to the mean area surplus of its neighborhood
    ///
    /// The neighborhood is the `k` segments nearest to the segment's seed,
    /// itself included. Returns the mean absolute value over all segments.
    pub fn update_neighborhood_values(&mut self, k: usize) -> f64 {
        let target = self.config.target_area as f64;
        let values: Vec<f64> = self
            .positions
            .iter()
            .map(|&location| {
                let neighbors = self.index.k_nearest(location, k.max(1));
                let surplus: f64 = neighbors
                    .iter()
                    .filter_map(|&n| self.index.segments().get(n))
                    .map(|segment| segment.area() as f64 - target)
                    .sum();
                surplus / neighbors.len().max(1) as f64
            })
            .collect();

        for (segment, &value) in self.index.segments_mut().iter_mut().zip(&values) {
            segment.set_value(value);
        }

        values.iter().map(|value| value.abs()).sum::<f64>() / values.len().max(1) as f64
    }

    /// Area statistics of the current partition
    pub fn statistics(&self) -> RegionStatistics {
        let segments = self.index.segments();
        let smallest_area = segments.iter().map(Segment::area).min().unwrap_or(0);
        let largest_area = segments.iter().map(Segment::area).max().unwrap_or(0);
        let total: usize = segments.iter().map(Segment::area).sum();

        RegionStatistics {
            point_count: self.positions.len(),
            smallest_area,
            largest_area,
            mean_area: total as f64 / segments.len().max(1) as f64,
        }
    }

    /// Copy of the current partition for raster painting
    pub fn snapshot(&self) -> RegionSnapshot {
        let segments = self.index.segments();
        RegionSnapshot {
            ownership: self.index.ownership().to_vec(),
            ids: segments.iter().map(Segment::id).collect(),
            areas: segments.iter().map(Segment::area).collect(),
            values: segments.iter().map(Segment::value).collect(),
        }
    }

    /// Current seeds with their segment ids
    pub fn seeds(&self) -> Vec<SeedPoint> {
        self.index
            .segments()
            .iter()
            .zip(&self.positions)
            .map(|(segment, &position)| SeedPoint {
                id: segment.id(),
                position,
            })
            .collect()
    }

    /// Write the current seeds to a checkpoint file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn write_checkpoint(&self, path: &Path) -> Result<()> {
        write_seeds(path, &self.seeds())
    }

    /// Region index
    pub const fn region(&self) -> usize {
        self.region
    }

    /// Number of iterations run so far
    pub const fn iteration(&self) -> usize {
        self.iteration
    }

    /// Errors of the current partition
    pub const fn errors(&self) -> ErrorSummary {
        self.errors
    }

    /// Move applied by the most recent updating iteration
    pub const fn last_move(&self) -> Option<Perturbation> {
        self.last_move
    }

    /// Seed positions by segment index
    pub fn positions(&self) -> &[[f64; 2]] {
        &self.positions
    }

    /// Segments of the current partition
    pub fn segments(&self) -> &[Segment] {
        self.index.segments()
    }

    /// Region mask
    pub const fn mask(&self) -> &Arc<Mask> {
        &self.mask
    }

    /// Optimizer parameters
    pub const fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Rebuild the index over the current seeds and evaluate the partition
    fn measure(&mut self) -> ErrorSummary {
        self.index.update(&self.positions);
        self.index.rasterize(&self.mask);
        self.evaluate()
    }

    fn evaluate(&self) -> ErrorSummary {
        let segments = self.index.segments();
        let scale = self.config.error_normalization / segments.len().max(1) as f64;

        let area = ErrorMetric::Area {
            penalty_factor: self.config.area_penalty_factor,
        }
        .compute_error(segments, self.config.target_area as f64)
            * scale;
        let circularity = ErrorMetric::Circularity
            .compute_error(segments, self.config.target_circularity)
            * scale;

        ErrorSummary {
            area,
            circularity,
            combined: self.config.circularity_weight.mul_add(circularity, area),
        }
    }
}
