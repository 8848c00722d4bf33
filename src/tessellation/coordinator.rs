//! Barrier-synchronized driver for all regions
//!
//! A round sends one iteration request to every worker and then blocks until
//! every worker has reported, so no region starts round `i + 1` before all
//! regions finished round `i`. Only the coordinating thread touches the
//! output rasters and the state logs.

use crate::geometry::polygon::Mask;
use crate::io::checkpoint::checkpoint_path;
use crate::io::configuration::DEFAULT_CHECKPOINT_INTERVAL;
use crate::io::error::{Result, TessellationError, WithPath, invalid_parameter};
use crate::io::log::{RegionLog, state_line};
use crate::io::raster::OutputRasters;
use crate::tessellation::optimizer::{ErrorSummary, RegionOptimizer};
use crate::tessellation::worker::{
    IterationReport, WorkerCommand, WorkerHandle, WorkerPhase, WorkerReply,
};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

/// Interval at which a blocked fan-in checks for dead workers
const LIVENESS_POLL: Duration = Duration::from_millis(200);

/// Coordinator behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Rounds between checkpoint writes, zero to checkpoint only at shutdown
    pub checkpoint_interval: usize,
    /// Directory for seed checkpoints, `None` disables them
    pub checkpoint_dir: Option<PathBuf>,
    /// Directory for state logs, `None` disables them
    pub log_dir: Option<PathBuf>,
    /// Divide painted ids by the region's largest id
    pub normalize_ids: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            checkpoint_dir: None,
            log_dir: None,
            normalize_ids: false,
        }
    }
}

/// What happened in one round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    /// One-based round number
    pub round: usize,
    /// Iteration counter shared by all regions after the round
    pub iteration: usize,
    /// Regions whose iteration applied a move
    pub updated: usize,
    /// Errors per region after the round
    pub errors: Vec<ErrorSummary>,
    /// Whether checkpoints were written after this round
    pub checkpointed: bool,
}

impl RoundSummary {
    /// Mean combined error over all regions
    pub fn mean_error(&self) -> f64 {
        if self.errors.is_empty() {
            return 0.0;
        }
        self.errors.iter().map(|e| e.combined).sum::<f64>() / self.errors.len() as f64
    }
}

/// Owns the region workers and the shared output rasters
#[derive(Debug)]
pub struct Coordinator {
    workers: Vec<WorkerHandle>,
    masks: Vec<Arc<Mask>>,
    logs: Vec<Option<RegionLog>>,
    replies: Receiver<WorkerReply>,
    rasters: OutputRasters,
    config: CoordinatorConfig,
    errors: Vec<ErrorSummary>,
    round: usize,
}

impl Coordinator {
    /// Paint the starting partitions and spawn one worker per region
    ///
    /// The optimizer at position `i` must own region `i`. Each region's
    /// log, if enabled, starts with a line describing its initial state.
    ///
    /// # Errors
    ///
    /// Returns an error if no optimizers are given, a region index does not
    /// match its position, a log file cannot be created, or a worker thread
    /// cannot be spawned
    pub fn start(
        optimizers: Vec<RegionOptimizer>,
        width: usize,
        height: usize,
        config: CoordinatorConfig,
    ) -> Result<Self> {
        if optimizers.is_empty() {
            return Err(invalid_parameter(
                "optimizers",
                &0,
                &"at least one region is required",
            ));
        }
        if let Some((position, optimizer)) = optimizers
            .iter()
            .enumerate()
            .find(|(position, optimizer)| optimizer.region() != *position)
        {
            return Err(invalid_parameter(
                "region",
                &optimizer.region(),
                &format!("expected region {position} at this position"),
            ));
        }
        if let Some(dir) = &config.checkpoint_dir {
            std::fs::create_dir_all(dir).with_path(dir, "create checkpoint directory")?;
        }

        let (sender, replies) = mpsc::channel();
        let mut rasters = OutputRasters::new(width, height);
        let mut workers = Vec::with_capacity(optimizers.len());
        let mut masks = Vec::with_capacity(optimizers.len());
        let mut logs = Vec::with_capacity(optimizers.len());
        let mut errors = Vec::with_capacity(optimizers.len());

        for mut optimizer in optimizers {
            let k = optimizer.neighborhood_size();
            optimizer.update_neighborhood_values(k);
            rasters.paint(optimizer.mask(), &optimizer.snapshot(), config.normalize_ids);

            let log = match &config.log_dir {
                Some(dir) => {
                    let mut log = RegionLog::create(dir, optimizer.region())?;
                    log.append(&state_line(
                        optimizer.iteration(),
                        &optimizer.errors(),
                        &optimizer.statistics(),
                        optimizer.last_move().as_ref(),
                    ))?;
                    Some(log)
                }
                None => None,
            };

            masks.push(Arc::clone(optimizer.mask()));
            errors.push(optimizer.errors());
            logs.push(log);
            workers.push(WorkerHandle::spawn(optimizer, sender.clone())?);
        }

        info!("Started {} region workers", workers.len());

        Ok(Self {
            workers,
            masks,
            logs,
            replies,
            rasters,
            config,
            errors,
            round: 0,
        })
    }

    /// Run one synchronized round
    ///
    /// # Errors
    ///
    /// Returns [`TessellationError::IterationDesync`] without touching any
    /// raster if the regions disagree on their iteration counter, and a
    /// worker, log or checkpoint error if any of those fail
    pub fn run_round(&mut self) -> Result<RoundSummary> {
        let round = self.round + 1;
        self.check_synchronized(round)?;

        for worker in &mut self.workers {
            worker.request_iteration()?;
        }

        let mut reports = self.collect_reports()?;
        reports.sort_by_key(|report| report.region);

        for report in &reports {
            if let Some(worker) = self.workers.get_mut(report.region) {
                worker.complete(report);
            }
            if let Some(slot) = self.errors.get_mut(report.region) {
                *slot = report.errors;
            }
        }

        let mut updated = 0;
        for report in &reports {
            let region = report.region;
            let Some(snapshot) = &report.snapshot else {
                continue;
            };
            updated += 1;
            if let Some(mask) = self.masks.get(region) {
                self.rasters.paint(mask, snapshot, self.config.normalize_ids);
            }
            if let Some(Some(log)) = self.logs.get_mut(region) {
                log.append(&state_line(
                    report.iteration,
                    &report.errors,
                    &report.statistics,
                    report.last_move.as_ref(),
                ))?;
            }
        }

        self.round = round;
        let checkpointed = self.config.checkpoint_interval > 0
            && round.is_multiple_of(self.config.checkpoint_interval);
        if checkpointed {
            self.checkpoint()?;
        }

        let iteration = reports.first().map_or(0, |report| report.iteration);
        debug!("Round {round}: {updated} of {} regions updated", reports.len());

        Ok(RoundSummary {
            round,
            iteration,
            updated,
            errors: self.errors.clone(),
            checkpointed,
        })
    }

    /// Run rounds until `stop` is set or `max_rounds` rounds have run
    ///
    /// The stop flag is checked between rounds; a round in flight always
    /// completes. Returns the number of rounds run.
    ///
    /// # Errors
    ///
    /// Returns the first round error
    pub fn run(
        &mut self,
        stop: &AtomicBool,
        max_rounds: Option<usize>,
        mut on_round: impl FnMut(&RoundSummary),
    ) -> Result<usize> {
        let mut rounds = 0;
        while !stop.load(Ordering::Relaxed) && max_rounds.is_none_or(|max| rounds < max) {
            let summary = self.run_round()?;
            on_round(&summary);
            rounds += 1;
        }
        Ok(rounds)
    }

    /// Write every region's checkpoint and flush every log
    ///
    /// Waits until all workers confirmed their write.
    ///
    /// # Errors
    ///
    /// Returns the first write or flush failure
    pub fn checkpoint(&mut self) -> Result<()> {
        for log in self.logs.iter_mut().flatten() {
            log.flush()?;
        }

        let Some(dir) = self.config.checkpoint_dir.clone() else {
            return Ok(());
        };

        for worker in &self.workers {
            worker.send(WorkerCommand::Checkpoint {
                path: checkpoint_path(&dir, worker.region()),
            })?;
        }

        let mut first_error = None;
        let mut pending = self.workers.len();
        while pending > 0 {
            match self.next_reply()? {
                WorkerReply::Checkpointed { region, result } => {
                    pending -= 1;
                    if let Err(error) = result {
                        warn!("Region {region}: checkpoint failed: {error}");
                        first_error.get_or_insert(error);
                    }
                }
                WorkerReply::Iteration(report) => {
                    warn!(
                        "Region {}: unexpected iteration report during checkpoint",
                        report.region
                    );
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => {
                info!("Round {}: checkpoints written to {}", self.round, dir.display());
                Ok(())
            }
        }
    }

    /// Write final checkpoints, stop every worker and return the optimizers
    ///
    /// # Errors
    ///
    /// Returns an error if the final checkpoint fails or a worker panicked
    pub fn shutdown(mut self) -> Result<Vec<RegionOptimizer>> {
        self.checkpoint()?;
        let optimizers = self
            .workers
            .iter_mut()
            .map(WorkerHandle::shutdown)
            .collect::<Result<Vec<_>>>()?;
        info!("Stopped {} region workers after {} rounds", optimizers.len(), self.round);
        Ok(optimizers)
    }

    /// Shared output rasters
    pub const fn rasters(&self) -> &OutputRasters {
        &self.rasters
    }

    /// Completed rounds
    pub const fn round(&self) -> usize {
        self.round
    }

    /// Number of regions
    pub fn region_count(&self) -> usize {
        self.workers.len()
    }

    /// Lifecycle phase of every worker, by region
    pub fn phases(&self) -> Vec<WorkerPhase> {
        self.workers.iter().map(WorkerHandle::phase).collect()
    }

    /// Latest errors per region
    pub fn errors(&self) -> &[ErrorSummary] {
        &self.errors
    }

    fn check_synchronized(&self, round: usize) -> Result<()> {
        let Some(first) = self.workers.first() else {
            return Ok(());
        };
        let expected = first.iteration();
        if let Some(worker) = self.workers.iter().find(|w| w.iteration() != expected) {
            return Err(TessellationError::IterationDesync {
                round,
                expected,
                region: worker.region(),
                found: worker.iteration(),
            });
        }
        Ok(())
    }

    fn collect_reports(&self) -> Result<Vec<IterationReport>> {
        let mut reports = Vec::with_capacity(self.workers.len());
        while reports.len() < self.workers.len() {
            match self.next_reply()? {
                WorkerReply::Iteration(report) => reports.push(*report),
                WorkerReply::Checkpointed { region, .. } => {
                    warn!("Region {region}: unexpected checkpoint reply during round");
                }
            }
        }
        Ok(reports)
    }

    /// Block for the next reply, failing if a worker died meanwhile
    fn next_reply(&self) -> Result<WorkerReply> {
        loop {
            match self.replies.recv_timeout(LIVENESS_POLL) {
                Ok(reply) => return Ok(reply),
                Err(RecvTimeoutError::Timeout) => {
                    if let Some(dead) = self.workers.iter().find(|w| w.is_finished()) {
                        return Err(TessellationError::Worker {
                            region: dead.region(),
                            reason: "worker thread exited during a round".to_string(),
                        });
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(TessellationError::Worker {
                        region: 0,
                        reason: "all worker threads disconnected".to_string(),
                    });
                }
            }
        }
    }
}
