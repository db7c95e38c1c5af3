use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use super::Topography;
use crate::error::{GridError, Result};
use crate::raw_array::read_f64_file;

/// How elevation is estimated between two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    #[default]
    Linear,
    Nearest,
    /// Value of the sample at or before x
    Previous,
    /// Value of the sample at or after x
    Next,
}

/// What happens outside the sampled range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extrapolation {
    /// Continue the boundary segment
    #[default]
    Extrapolate,
    /// Hold the boundary sample
    Clamp,
    /// Constant elevation everywhere outside the samples
    Fill(f64),
}

/// Topography interpolated over tabulated `(x, z)` samples.
#[derive(Debug, Clone)]
pub struct TabulatedTopography {
    x: Vec<f64>,
    z: Vec<f64>,
    interpolation: Interpolation,
    extrapolation: Extrapolation,
}

impl TabulatedTopography {
    /// Build from paired samples using linear interpolation and linear
    /// extrapolation. Samples out of order are sorted by x.
    ///
    /// # Errors
    /// - `SampleLengthMismatch` if the arrays differ in length
    /// - `TooFewSamples` with fewer than two samples
    /// - `NonFiniteSample` for NaN or infinite values
    /// - `DuplicateSample` if two samples share an x coordinate
    pub fn new(x: Vec<f64>, z: Vec<f64>) -> Result<Self> {
        if x.len() != z.len() {
            return Err(GridError::SampleLengthMismatch {
                x_len: x.len(),
                z_len: z.len(),
            });
        }
        if x.len() < 2 {
            return Err(GridError::TooFewSamples { len: x.len() });
        }
        if let Some(index) = (0..x.len()).find(|&i| !x[i].is_finite() || !z[i].is_finite()) {
            return Err(GridError::NonFiniteSample { index });
        }

        let (x, z) = if x.windows(2).all(|w| w[0] <= w[1]) {
            (x, z)
        } else {
            warn!("topography samples are not in increasing order, sorting {} samples", x.len());
            let mut order: Vec<usize> = (0..x.len()).collect();
            order.sort_by(|&a, &b| x[a].total_cmp(&x[b]));
            (
                order.iter().map(|&i| x[i]).collect(),
                order.iter().map(|&i| z[i]).collect(),
            )
        };

        if let Some(w) = x.windows(2).find(|w| w[0] == w[1]) {
            return Err(GridError::DuplicateSample { x: w[0] });
        }

        Ok(TabulatedTopography {
            x,
            z,
            interpolation: Interpolation::default(),
            extrapolation: Extrapolation::default(),
        })
    }

    /// Load samples from two raw float64 files.
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(x_file: P, z_file: Q) -> Result<Self> {
        let x = read_f64_file(x_file)?;
        let z = read_f64_file(z_file)?;
        Self::new(x, z)
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Sampled coordinate range `(first, last)`.
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// Index of the segment `[x[lo], x[lo+1]]` used for `x`; boundary
    /// segments cover everything outside the samples.
    fn segment(&self, x: f64) -> usize {
        let last_segment = self.x.len() - 2;
        match self.x.partition_point(|&xi| xi <= x) {
            0 => 0,
            p => (p - 1).min(last_segment),
        }
    }
}

impl Topography for TabulatedTopography {
    fn elevation(&self, x: f64) -> f64 {
        let (first, last) = self.domain();
        if x < first || x > last {
            match self.extrapolation {
                Extrapolation::Extrapolate => {}
                Extrapolation::Clamp => {
                    return if x < first { self.z[0] } else { self.z[self.z.len() - 1] };
                }
                Extrapolation::Fill(value) => return value,
            }
        }

        let lo = self.segment(x);
        let (x_lo, x_hi) = (self.x[lo], self.x[lo + 1]);
        let (z_lo, z_hi) = (self.z[lo], self.z[lo + 1]);

        match self.interpolation {
            Interpolation::Linear => {
                let slope = (z_hi - z_lo) / (x_hi - x_lo);
                slope * (x - x_lo) + z_lo
            }
            Interpolation::Nearest => {
                if x - x_lo <= x_hi - x {
                    z_lo
                } else {
                    z_hi
                }
            }
            Interpolation::Previous => {
                if x >= x_hi {
                    z_hi
                } else {
                    z_lo
                }
            }
            Interpolation::Next => {
                if x <= x_lo {
                    z_lo
                } else {
                    z_hi
                }
            }
        }
    }
}
