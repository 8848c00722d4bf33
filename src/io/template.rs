//! Template directory loading
//!
//! A template directory holds the image extent, the target segment area and
//! one boundary polygon per region. Regions are numbered by the sorted file
//! names of their polygons. Loading fails on the first missing or malformed
//! file.

use crate::geometry::polygon::{Mask, Polygon};
use crate::io::configuration::{DIMENSIONS_FILE, POLYGON_SUFFIX, TARGET_AREA_FILE};
use crate::io::error::{Result, TessellationError, WithPath, parse_error};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Named boundary of one region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBoundary {
    /// File stem of the polygon file
    pub name: String,
    /// Closed boundary in template pixel coordinates
    pub polygon: Polygon,
}

/// Everything read from a template directory
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
    /// Target pixel count per segment
    pub target_area: usize,
    /// Regions in index order
    pub regions: Vec<RegionBoundary>,
}

impl Template {
    /// Rasterize every region boundary over the template extent
    pub fn masks(&self) -> Vec<Arc<Mask>> {
        self.regions
            .iter()
            .map(|region| Arc::new(Mask::from_polygon(&region.polygon, self.width, self.height)))
            .collect()
    }
}

/// Load a complete template directory
///
/// # Errors
///
/// Returns an error if the directory, the dimensions file, the target-area
/// file or every polygon file is missing, or any of them is malformed
pub fn load_template(dir: &Path) -> Result<Template> {
    if !dir.is_dir() {
        return Err(TessellationError::TemplateLoad {
            path: dir.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    let (width, height) = load_dimensions(&dir.join(DIMENSIONS_FILE))?;
    let target_area = load_target_area(&dir.join(TARGET_AREA_FILE))?;

    let files = polygon_files(dir)?;
    if files.is_empty() {
        return Err(TessellationError::TemplateLoad {
            path: dir.to_path_buf(),
            reason: format!("no '*{POLYGON_SUFFIX}' region files"),
        });
    }

    let regions = files
        .iter()
        .map(|path| {
            Ok(RegionBoundary {
                name: region_name(path),
                polygon: load_polygon(path)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Loaded template {}: {width}x{height}, target area {target_area}, {} regions",
        dir.display(),
        regions.len()
    );

    Ok(Template {
        width,
        height,
        target_area,
        regions,
    })
}

/// Read the image extent: width on the first line, height on the second
///
/// # Errors
///
/// Returns an error if the file is missing, has fewer than two values, or
/// either value is not a positive integer
pub fn load_dimensions(path: &Path) -> Result<(usize, usize)> {
    let values = read_values(path)?;
    let mut positive = values
        .iter()
        .map(|(line, value)| parse_positive(path, *line, value));

    let width = positive
        .next()
        .ok_or_else(|| parse_error(path, 1, &"missing width"))??;
    let height = positive
        .next()
        .ok_or_else(|| parse_error(path, 2, &"missing height"))??;
    Ok((width, height))
}

/// Read the single positive target area
///
/// # Errors
///
/// Returns an error if the file is missing, empty, or does not hold a
/// positive integer
pub fn load_target_area(path: &Path) -> Result<usize> {
    let values = read_values(path)?;
    let (line, value) = values
        .first()
        .ok_or_else(|| parse_error(path, 1, &"missing target area"))?;
    parse_positive(path, *line, value)
}

fn parse_positive(path: &Path, line: usize, value: &str) -> Result<usize> {
    value
        .parse::<usize>()
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| parse_error(path, line, &format!("'{value}' is not a positive integer")))
}

/// Read a boundary polygon, one `x y` vertex per line
///
/// Blank lines and lines starting with `#` are ignored.
///
/// # Errors
///
/// Returns an error if the file is missing, a line does not hold two finite
/// numbers, or fewer than three vertices remain
pub fn load_polygon(path: &Path) -> Result<Polygon> {
    let content = fs::read_to_string(path).with_path(path, "read polygon")?;

    let mut vertices = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [x, y] = fields.as_slice() else {
            return Err(parse_error(
                path,
                number + 1,
                &format!("expected 2 coordinates, found {}", fields.len()),
            ));
        };
        let coordinate = |field: &str| {
            field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    parse_error(path, number + 1, &format!("invalid coordinate '{field}'"))
                })
        };
        vertices.push([coordinate(*x)?, coordinate(*y)?]);
    }

    Polygon::new(vertices).map_err(|error| TessellationError::TemplateLoad {
        path: path.to_path_buf(),
        reason: error.to_string(),
    })
}

/// Polygon files of a template directory, sorted by file name
///
/// # Errors
///
/// Returns an error if the directory cannot be listed
pub fn polygon_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_path(dir, "list template")? {
        let path = entry.with_path(dir, "list template")?.path();
        let is_polygon = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(POLYGON_SUFFIX));
        if is_polygon && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn region_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.strip_suffix(POLYGON_SUFFIX)
        .map_or_else(|| name.clone(), str::to_string)
}

/// Non-empty trimmed lines with their one-based line numbers
fn read_values(path: &Path) -> Result<Vec<(usize, String)>> {
    if !path.is_file() {
        return Err(TessellationError::TemplateLoad {
            path: path.to_path_buf(),
            reason: "file not found".to_string(),
        });
    }
    let content = fs::read_to_string(path).with_path(path, "read template")?;
    Ok(content
        .lines()
        .enumerate()
        .map(|(number, line)| (number + 1, line.trim().to_string()))
        .filter(|(_, line)| !line.is_empty())
        .collect())
}
