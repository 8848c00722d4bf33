//! Region worker threads
//!
//! Each region's optimizer lives on its own thread and is driven by commands
//! over a private channel. Replies from all workers share one channel back to
//! the coordinator, which turns a round into a fan-out followed by a fan-in.

use crate::io::error::{Result, TessellationError};
use crate::tessellation::optimizer::{
    ErrorSummary, Perturbation, RegionOptimizer, RegionSnapshot, RegionStatistics,
};
use log::{debug, trace};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Instruction sent to a worker thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerCommand {
    /// Run exactly one hill-climbing iteration and report
    RunIteration,
    /// Write the current seeds to the given checkpoint file
    Checkpoint {
        /// Destination file, overwritten
        path: PathBuf,
    },
    /// Leave the command loop and hand the optimizer back
    Shutdown,
}

/// Outcome of one iteration on one region
#[derive(Debug, Clone)]
pub struct IterationReport {
    /// Region index
    pub region: usize,
    /// Iteration counter after the iteration
    pub iteration: usize,
    /// Whether a move was applied
    pub updated: bool,
    /// Errors after the iteration
    pub errors: ErrorSummary,
    /// Area statistics after the iteration
    pub statistics: RegionStatistics,
    /// Most recent applied move
    pub last_move: Option<Perturbation>,
    /// Partition to paint, present only when `updated`
    pub snapshot: Option<RegionSnapshot>,
}

impl IterationReport {
    /// Describe the optimizer's current state
    ///
    /// A snapshot is taken only for updated iterations.
    pub fn from_optimizer(optimizer: &RegionOptimizer, updated: bool) -> Self {
        Self {
            region: optimizer.region(),
            iteration: optimizer.iteration(),
            updated,
            errors: optimizer.errors(),
            statistics: optimizer.statistics(),
            last_move: optimizer.last_move(),
            snapshot: updated.then(|| optimizer.snapshot()),
        }
    }
}

/// Message sent from a worker back to the coordinator
#[derive(Debug)]
pub enum WorkerReply {
    /// Answer to [`WorkerCommand::RunIteration`]
    Iteration(Box<IterationReport>),
    /// Answer to [`WorkerCommand::Checkpoint`]
    Checkpointed {
        /// Region index
        region: usize,
        /// Result of the write
        result: Result<()>,
    },
}

/// Lifecycle of a worker as seen from the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    /// Spawned, no iteration requested yet
    Initialized,
    /// Iteration requested, report outstanding
    IterationRequested,
    /// Last requested iteration reported
    IterationComplete,
    /// Thread joined
    Stopped,
}

/// Run one iteration, refreshing the neighborhood values when it updated
pub fn step(optimizer: &mut RegionOptimizer) -> IterationReport {
    let updated = optimizer.run_iteration();
    if updated {
        let k = optimizer.neighborhood_size();
        optimizer.update_neighborhood_values(k);
    }
    IterationReport::from_optimizer(optimizer, updated)
}

fn command_loop(
    mut optimizer: RegionOptimizer,
    commands: &Receiver<WorkerCommand>,
    replies: &Sender<WorkerReply>,
) -> RegionOptimizer {
    let region = optimizer.region();
    while let Ok(command) = commands.recv() {
        let reply = match command {
            WorkerCommand::RunIteration => WorkerReply::Iteration(Box::new(step(&mut optimizer))),
            WorkerCommand::Checkpoint { path } => WorkerReply::Checkpointed {
                region,
                result: optimizer.write_checkpoint(&path),
            },
            WorkerCommand::Shutdown => break,
        };
        if replies.send(reply).is_err() {
            trace!("Region {region}: coordinator gone, stopping worker");
            break;
        }
    }
    optimizer
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause")
}

/// Coordinator-side handle of one worker thread
#[derive(Debug)]
pub struct WorkerHandle {
    region: usize,
    commands: Sender<WorkerCommand>,
    thread: Option<JoinHandle<RegionOptimizer>>,
    phase: WorkerPhase,
    iteration: usize,
}

impl WorkerHandle {
    /// Move `optimizer` onto a new named thread
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned
    pub fn spawn(optimizer: RegionOptimizer, replies: Sender<WorkerReply>) -> Result<Self> {
        let region = optimizer.region();
        let iteration = optimizer.iteration();
        let (commands, inbox) = mpsc::channel();

        let thread = thread::Builder::new()
            .name(format!("region-{region}"))
            .spawn(move || command_loop(optimizer, &inbox, &replies))
            .map_err(|error| TessellationError::Worker {
                region,
                reason: error.to_string(),
            })?;
        debug!("Region {region}: worker started at iteration {iteration}");

        Ok(Self {
            region,
            commands,
            thread: Some(thread),
            phase: WorkerPhase::Initialized,
            iteration,
        })
    }

    /// Region index
    pub const fn region(&self) -> usize {
        self.region
    }

    /// Current lifecycle phase
    pub const fn phase(&self) -> WorkerPhase {
        self.phase
    }

    /// Iteration counter from the most recent report
    pub const fn iteration(&self) -> usize {
        self.iteration
    }

    /// Test if the thread has exited
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Send a command
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread is gone
    pub fn send(&self, command: WorkerCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|error| TessellationError::Worker {
                region: self.region,
                reason: format!("worker thread disconnected ({error})"),
            })
    }

    /// Ask the worker for one iteration
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread is gone
    pub fn request_iteration(&mut self) -> Result<()> {
        self.send(WorkerCommand::RunIteration)?;
        self.phase = WorkerPhase::IterationRequested;
        Ok(())
    }

    /// Record a report received for this worker
    pub const fn complete(&mut self, report: &IterationReport) {
        self.iteration = report.iteration;
        self.phase = WorkerPhase::IterationComplete;
    }

    /// Stop the thread and take back its optimizer
    ///
    /// # Errors
    ///
    /// Returns an error if the thread panicked or was already joined
    pub fn shutdown(&mut self) -> Result<RegionOptimizer> {
        // A dead worker has already left its loop
        let _ = self.commands.send(WorkerCommand::Shutdown);
        let thread = self.thread.take().ok_or_else(|| TessellationError::Worker {
            region: self.region,
            reason: "worker already stopped".to_string(),
        })?;
        let optimizer = thread
            .join()
            .map_err(|panic| TessellationError::Worker {
                region: self.region,
                reason: format!("worker thread panicked: {}", panic_message(panic.as_ref())),
            })?;
        self.phase = WorkerPhase::Stopped;
        debug!(
            "Region {}: worker stopped at iteration {}",
            self.region,
            optimizer.iteration()
        );
        Ok(optimizer)
    }
}
