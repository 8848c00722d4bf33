//! Command-line interface for tessellating a template directory

use crate::io::checkpoint::find_checkpoints;
use crate::io::configuration::{DEFAULT_CHECKPOINT_INTERVAL, DEFAULT_ROUNDS, DEFAULT_SEARCH_SEED};
use crate::io::error::{Result, WithPath};
use crate::io::progress::ProgressManager;
use crate::io::template::{Template, load_template};
use crate::tessellation::coordinator::{Coordinator, CoordinatorConfig};
use crate::tessellation::optimizer::{OptimizerConfig, RegionOptimizer};
use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "tessellate")]
#[command(
    author,
    version,
    about = "Split template regions into area- and shape-balanced segments"
)]
/// Command-line arguments for the tessellation tool
pub struct Cli {
    /// Template directory with dimensions, target area and region polygons
    #[arg(value_name = "TEMPLATE_DIR")]
    pub template: PathBuf,

    /// Directory for seed checkpoints (resumed from when complete)
    #[arg(short, long)]
    pub checkpoint_dir: Option<PathBuf>,

    /// Directory for output rasters and state logs
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Number of synchronized rounds to run
    #[arg(short, long, default_value_t = DEFAULT_ROUNDS)]
    pub rounds: usize,

    /// Rounds between checkpoint writes
    #[arg(short = 'i', long, default_value_t = DEFAULT_CHECKPOINT_INTERVAL)]
    pub checkpoint_interval: usize,

    /// Override the template's target segment area
    #[arg(short, long)]
    pub target_area: Option<usize>,

    /// Random seed for the hill-climbing search
    #[arg(short, long, default_value_t = DEFAULT_SEARCH_SEED)]
    pub seed: u64,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log per-round details
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level for the diagnostic logger
    pub const fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Directory for rasters and logs, the template directory by default
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.template)
    }
}

/// Install the stderr logger at the given level
///
/// Returns `None` if a logger is already installed or the level is invalid;
/// the run continues without diagnostics in that case.
pub fn init_logging(level: &str) -> Option<LoggerHandle> {
    Logger::try_with_str(level)
        .ok()?
        .log_to_stderr()
        .start()
        .ok()
}

/// Runs a tessellation from command-line arguments
pub struct TessellationRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl TessellationRunner {
    /// Create a runner for the given arguments
    pub fn new(cli: Cli) -> Self {
        let rounds = cli.rounds;
        let progress_manager = cli
            .should_show_progress()
            .then(|| ProgressManager::new(rounds));

        Self {
            cli,
            progress_manager,
        }
    }

    /// Load the template, run the requested rounds and write all outputs
    ///
    /// # Errors
    ///
    /// Returns an error if the template or a checkpoint cannot be loaded, a
    /// round fails, or outputs cannot be written
    pub fn process(&mut self) -> Result<()> {
        let start_time = Instant::now();
        let template = load_template(&self.cli.template)?;
        let output_dir = self.cli.output_dir().to_path_buf();
        std::fs::create_dir_all(&output_dir).with_path(&output_dir, "create output directory")?;

        let optimizers = self.build_optimizers(&template)?;
        let config = CoordinatorConfig {
            checkpoint_interval: self.cli.checkpoint_interval,
            checkpoint_dir: self.cli.checkpoint_dir.clone(),
            log_dir: Some(output_dir.clone()),
            normalize_ids: true,
        };

        let mut coordinator =
            Coordinator::start(optimizers, template.width, template.height, config)?;
        let rounds = self.cli.rounds;
        for _ in 0..rounds {
            let summary = coordinator.run_round()?;
            if let Some(ref pm) = self.progress_manager {
                pm.update(&summary);
            }
        }

        coordinator.rasters().export(&output_dir)?;
        let optimizers = coordinator.shutdown()?;

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        for optimizer in &optimizers {
            let errors = optimizer.errors();
            info!(
                "Region {}: {} iterations, area error {:.4}, circularity error {:.4}",
                optimizer.region(),
                optimizer.iteration(),
                errors.area,
                errors.circularity
            );
        }
        info!(
            "Finished {rounds} rounds in {:.1}s",
            start_time.elapsed().as_secs_f64()
        );

        Ok(())
    }

    fn build_optimizers(&self, template: &Template) -> Result<Vec<RegionOptimizer>> {
        let config = OptimizerConfig {
            target_area: self.cli.target_area.unwrap_or(template.target_area),
            search_seed: self.cli.seed,
            ..OptimizerConfig::default()
        };
        let masks = template.masks();

        let checkpoints = self
            .cli
            .checkpoint_dir
            .as_deref()
            .and_then(|dir| find_checkpoints(dir, masks.len()));

        match checkpoints {
            Some(paths) => {
                info!("Resuming {} regions from checkpoints", paths.len());
                masks
                    .into_iter()
                    .zip(&paths)
                    .enumerate()
                    .map(|(region, (mask, path))| {
                        RegionOptimizer::from_checkpoint(region, mask, path, config.clone())
                    })
                    .collect()
            }
            None => masks
                .into_iter()
                .enumerate()
                .map(|(region, mask)| RegionOptimizer::new(region, mask, config.clone()))
                .collect(),
        }
    }
}
