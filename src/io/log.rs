//! Per-region state logs
//!
//! Every updated iteration appends one tab-separated line: iteration, area
//! error, circularity error, combined error, smallest area, largest area,
//! then distance, axis and sigma of the last applied move.

use crate::io::configuration::LOG_FILE_PREFIX;
use crate::io::error::{Result, WithPath};
use crate::tessellation::optimizer::{ErrorSummary, Perturbation, RegionStatistics};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// First unused log path for a region
///
/// `log_segment_<region>.txt` if free, otherwise the lowest free
/// `log_segment_<region>_<n>.txt`, so earlier runs are never overwritten.
pub fn free_log_path(dir: &Path, region: usize) -> PathBuf {
    let base = dir.join(format!("{LOG_FILE_PREFIX}{region}.txt"));
    if !base.exists() {
        return base;
    }
    (1..)
        .map(|n| dir.join(format!("{LOG_FILE_PREFIX}{region}_{n}.txt")))
        .find(|path| !path.exists())
        .unwrap_or(base)
}

/// Format one state line (without trailing newline)
pub fn state_line(
    iteration: usize,
    errors: &ErrorSummary,
    statistics: &RegionStatistics,
    last_move: Option<&Perturbation>,
) -> String {
    let (distance, axis, sigma) = last_move.map_or_else(
        || (0.0, "-".to_string(), 0.0),
        |step| (step.distance, step.axis.to_string(), step.sigma),
    );
    format!(
        "{iteration}\t{}\t{}\t{}\t{}\t{}\t{distance}\t{axis}\t{sigma}",
        errors.area,
        errors.circularity,
        errors.combined,
        statistics.smallest_area,
        statistics.largest_area,
    )
}

/// Buffered, append-only log file of one region
#[derive(Debug)]
pub struct RegionLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl RegionLog {
    /// Create the region's log in `dir` under the first free name
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created
    pub fn create(dir: &Path, region: usize) -> Result<Self> {
        let path = free_log_path(dir, region);
        let file = File::create(&path).with_path(&path, "create log")?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    /// Append one line
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails
    pub fn append(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}").with_path(&self.path, "write log")
    }

    /// Push buffered lines to disk
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().with_path(&self.path, "flush log")
    }

    /// Location of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
