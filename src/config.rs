//! Run configuration for grid generation.
//!
//! A [`GridConfig`] is built once per run (from defaults or a JSON file),
//! validated, and then only borrowed by the builders and the writer.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DELZ0, DEFAULT_FDELZ, DEFAULT_GRID_DIR, DEFAULT_MAX_PASSES, DEFAULT_MAX_POINTS,
    DEFAULT_NX0, DEFAULT_THRESHOLDS, DEFAULT_XA, DEFAULT_XB, DEFAULT_ZDEPTH,
};
use crate::error::{GridError, Result};
use crate::grid::WriterOptions;
use crate::math_utils::linspace;
use crate::topography::TopographySource;

/// Refinement sensitivities; larger values produce denser grids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Elevation change between neighboring points
    pub value: f64,
    /// First derivative
    pub slope: f64,
    /// Second derivative
    pub curvature: f64,
}

impl Thresholds {
    pub fn new(value: f64, slope: f64, curvature: f64) -> Self {
        Thresholds {
            value,
            slope,
            curvature,
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, g) in [
            ("value", self.value),
            ("slope", self.slope),
            ("curvature", self.curvature),
        ] {
            if !(g > 0.0) || !g.is_finite() {
                return Err(GridError::InvalidConfig(format!(
                    "{} threshold must be positive and finite, got {}",
                    name, g
                )));
            }
        }
        Ok(())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        let [value, slope, curvature] = DEFAULT_THRESHOLDS;
        Thresholds::new(value, slope, curvature)
    }
}

/// Horizontal domain and refinement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizontalConfig {
    /// Number of evenly spaced starting points
    pub nx0: usize,
    pub xa: f64,
    pub xb: f64,
    pub thresholds: Thresholds,
    /// Elevation range the value criterion is scaled by; the vertical
    /// domain depth when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zrange: Option<f64>,
    /// Limit neighboring cell width ratios to about 2
    pub smooth: bool,
    pub max_passes: usize,
    pub max_points: usize,
}

impl Default for HorizontalConfig {
    fn default() -> Self {
        HorizontalConfig {
            nx0: DEFAULT_NX0,
            xa: DEFAULT_XA,
            xb: DEFAULT_XB,
            thresholds: Thresholds::default(),
            zrange: None,
            smooth: true,
            max_passes: DEFAULT_MAX_PASSES,
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

impl HorizontalConfig {
    pub fn width(&self) -> f64 {
        self.xb - self.xa
    }

    /// Gap between the first two points of the evenly spaced starting
    /// grid, or the whole width when that grid has fewer than two points.
    pub fn initial_spacing(&self) -> f64 {
        let x = linspace(self.xa, self.xb, self.nx0);
        match x.as_slice() {
            [x0, x1, ..] => x1 - x0,
            _ => self.width(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.nx0 < 2 {
            return Err(GridError::InvalidConfig(format!(
                "nx0 must be at least 2, got {}",
                self.nx0
            )));
        }
        if !self.xa.is_finite() || !self.xb.is_finite() || self.xa >= self.xb {
            return Err(GridError::InvalidConfig(format!(
                "horizontal domain must satisfy xa < xb (xa={}, xb={})",
                self.xa, self.xb
            )));
        }
        self.thresholds.validate()?;
        if let Some(zrange) = self.zrange {
            if !(zrange > 0.0) || !zrange.is_finite() {
                return Err(GridError::InvalidConfig(format!(
                    "zrange must be positive and finite, got {}",
                    zrange
                )));
            }
        }
        if self.max_passes == 0 {
            return Err(GridError::InvalidConfig("max_passes must be positive".to_string()));
        }
        if self.max_points < self.nx0 {
            return Err(GridError::InvalidConfig(format!(
                "max_points ({}) is smaller than nx0 ({})",
                self.max_points, self.nx0
            )));
        }
        Ok(())
    }
}

/// Geometric depth grid settings; z runs over `[-zdepth, 0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerticalConfig {
    pub zdepth: f64,
    /// Width of the surface cell
    pub delz0: f64,
    /// Width growth factor per cell with depth
    pub fdelz: f64,
}

impl Default for VerticalConfig {
    fn default() -> Self {
        VerticalConfig {
            zdepth: DEFAULT_ZDEPTH,
            delz0: DEFAULT_DELZ0,
            fdelz: DEFAULT_FDELZ,
        }
    }
}

impl VerticalConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.zdepth > 0.0) || !self.zdepth.is_finite() {
            return Err(GridError::InvalidConfig(format!(
                "zdepth must be positive and finite, got {}",
                self.zdepth
            )));
        }
        if !(self.delz0 > 0.0) || self.delz0 > self.zdepth {
            return Err(GridError::InvalidConfig(format!(
                "delz0 must be in (0, zdepth], got {} with zdepth={}",
                self.delz0, self.zdepth
            )));
        }
        if !(self.fdelz > 1.0) || !self.fdelz.is_finite() {
            return Err(GridError::InvalidConfig(format!(
                "fdelz must be greater than 1, got {}",
                self.fdelz
            )));
        }
        Ok(())
    }
}

/// Complete configuration for one grid generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub grid_dir: PathBuf,
    /// Remove existing grid files (except `.`/`_` prefixed) before writing
    pub clear_dir: bool,
    pub horizontal: HorizontalConfig,
    pub vertical: VerticalConfig,
    pub topography: TopographySource,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            grid_dir: PathBuf::from(DEFAULT_GRID_DIR),
            clear_dir: true,
            horizontal: HorizontalConfig::default(),
            vertical: VerticalConfig::default(),
            topography: TopographySource::default(),
        }
    }
}

impl GridConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| GridError::io(path, e))?;
        let config: GridConfig =
            serde_json::from_str(&content).map_err(|source| GridError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.horizontal.validate()?;
        self.vertical.validate()?;
        if self.grid_dir.as_os_str().is_empty() {
            return Err(GridError::InvalidConfig("grid_dir must not be empty".to_string()));
        }
        Ok(())
    }

    /// Elevation range for the value criterion.
    pub fn zrange(&self) -> f64 {
        self.horizontal.zrange.unwrap_or(self.vertical.zdepth)
    }

    pub fn writer_options(&self) -> WriterOptions {
        WriterOptions {
            dir: self.grid_dir.clone(),
            clear: self.clear_dir,
        }
    }
}
