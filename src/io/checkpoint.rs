//! Seed checkpoint files
//!
//! One plain-text file per region, one `id<TAB>x<TAB>y` line per seed.
//! Coordinates use Rust's shortest round-trip float formatting, so reloading
//! a checkpoint reproduces the exact positions and therefore the exact
//! partition.

use crate::io::configuration::{CHECKPOINT_SUFFIX, SEGMENT_FILE_PREFIX};
use crate::io::error::{Result, TessellationError, WithPath, parse_error};
use crate::tessellation::segment::SeedPoint;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Checkpoint file of a region inside `dir`
pub fn checkpoint_path(dir: &Path, region: usize) -> PathBuf {
    dir.join(format!("{SEGMENT_FILE_PREFIX}{region}{CHECKPOINT_SUFFIX}"))
}

/// Checkpoint files for regions `0..region_count`, if every one exists
///
/// A partial set is treated as absent so a run never mixes resumed and
/// freshly placed regions.
pub fn find_checkpoints(dir: &Path, region_count: usize) -> Option<Vec<PathBuf>> {
    let paths: Vec<PathBuf> = (0..region_count)
        .map(|region| checkpoint_path(dir, region))
        .collect();
    (region_count > 0 && paths.iter().all(|path| path.is_file())).then_some(paths)
}

/// Read seeds and require exactly `expected` of them
///
/// Blank lines are skipped. Fields may be separated by tabs or spaces.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a line is malformed, an id
/// repeats, or the seed count differs from `expected`
pub fn load_seeds(path: &Path, expected: usize) -> Result<Vec<SeedPoint>> {
    let content = fs::read_to_string(path).with_path(path, "read checkpoint")?;

    let mut seeds = Vec::with_capacity(expected);
    let mut ids = HashSet::with_capacity(expected);
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let seed = parse_seed(line).map_err(|reason| parse_error(path, number + 1, &reason))?;
        if !ids.insert(seed.id) {
            return Err(TessellationError::DuplicateSeed {
                path: path.to_path_buf(),
                id: seed.id,
            });
        }
        seeds.push(seed);
    }

    if seeds.len() != expected {
        return Err(TessellationError::SeedCountMismatch {
            path: path.to_path_buf(),
            expected,
            found: seeds.len(),
        });
    }

    Ok(seeds)
}

fn parse_seed(line: &str) -> std::result::Result<SeedPoint, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [id, x, y] = fields.as_slice() else {
        return Err(format!("expected 3 fields, found {}", fields.len()));
    };

    let id = id
        .parse::<usize>()
        .map_err(|error| format!("invalid id '{id}': {error}"))?;
    let x = parse_coordinate(x)?;
    let y = parse_coordinate(y)?;

    Ok(SeedPoint {
        id,
        position: [x, y],
    })
}

fn parse_coordinate(field: &str) -> std::result::Result<f64, String> {
    let value = field
        .parse::<f64>()
        .map_err(|error| format!("invalid coordinate '{field}': {error}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("coordinate '{field}' is not finite"))
    }
}

/// Overwrite `path` with the given seeds
///
/// # Errors
///
/// Returns an error if the file cannot be created or written
pub fn write_seeds(path: &Path, seeds: &[SeedPoint]) -> Result<()> {
    let file = File::create(path).with_path(path, "create checkpoint")?;
    let mut writer = BufWriter::new(file);
    for seed in seeds {
        writeln!(
            writer,
            "{}\t{}\t{}",
            seed.id, seed.position[0], seed.position[1]
        )
        .with_path(path, "write checkpoint")?;
    }
    writer.flush().with_path(path, "write checkpoint")
}
