mod analytic;
mod tabulated;

use std::path::PathBuf;

use log::info;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TOPO_X_FILE, DEFAULT_TOPO_Z_FILE};
use crate::error::Result;

pub use analytic::{AnalyticProfile, ShapeParams};
pub use tabulated::{Extrapolation, Interpolation, TabulatedTopography};

/// Surface elevation as a function of horizontal position.
///
/// Implementations must be pure: the refinement engine queries the same
/// coordinate many times, including at `x ± h` for finite differences,
/// and expects the same answer every time.
pub trait Topography {
    fn elevation(&self, x: f64) -> f64;

    /// Elevation at every coordinate in `xs`.
    fn elevations(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.elevation(x)).collect()
    }
}

impl<F> Topography for F
where
    F: Fn(f64) -> f64,
{
    fn elevation(&self, x: f64) -> f64 {
        self(x)
    }
}

/// Where the topography for a run comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TopographySource {
    /// Two raw float64 files: sample coordinates and elevations
    Tabulated {
        x_file: PathBuf,
        z_file: PathBuf,
        #[serde(default)]
        interpolation: Interpolation,
        #[serde(default)]
        extrapolation: Extrapolation,
    },
    Analytic { profile: AnalyticProfile },
}

impl Default for TopographySource {
    fn default() -> Self {
        TopographySource::Tabulated {
            x_file: PathBuf::from(DEFAULT_TOPO_X_FILE),
            z_file: PathBuf::from(DEFAULT_TOPO_Z_FILE),
            interpolation: Interpolation::default(),
            extrapolation: Extrapolation::default(),
        }
    }
}

impl TopographySource {
    /// Build the provider, reading sample files when tabulated.
    pub fn load(&self) -> Result<Box<dyn Topography>> {
        match self {
            TopographySource::Tabulated {
                x_file,
                z_file,
                interpolation,
                extrapolation,
            } => {
                let topo = TabulatedTopography::from_files(x_file, z_file)?
                    .with_interpolation(*interpolation)
                    .with_extrapolation(*extrapolation);
                info!(
                    "loaded {} topography samples from {} / {}",
                    topo.len(),
                    x_file.display(),
                    z_file.display()
                );
                Ok(Box::new(topo))
            }
            TopographySource::Analytic { profile } => {
                info!("using analytic topography {}", profile.name());
                Ok(Box::new(*profile))
            }
        }
    }
}
