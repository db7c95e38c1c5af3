//! Adaptive horizontal refinement.
//!
//! Starting from an evenly spaced grid, every cell is tested against three
//! density criteria at its midpoint: local point density relative to the
//! elevation change across the cell, to the slope, and to the curvature.
//! Cells failing any criterion are split at their midpoint, all in one
//! batch per pass, until a pass splits nothing.

use log::debug;

use crate::config::{HorizontalConfig, Thresholds};
use crate::constants::{CURVATURE_STEP_DIVISOR, SLOPE_STEP_DIVISOR};
use crate::error::{GridError, Result};
use crate::math_utils::{div_or_inf, first_difference, linspace, midpoint, second_difference};
use crate::topography::Topography;

/// Density criteria for one cell. A criterion whose feature magnitude is
/// exactly zero is `+inf` and can never trigger a split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Criteria {
    pub value: f64,
    pub slope: f64,
    pub curvature: f64,
}

impl Criteria {
    pub fn violates(&self, thresholds: &Thresholds) -> bool {
        self.value < thresholds.value
            || self.slope < thresholds.slope
            || self.curvature < thresholds.curvature
    }
}

/// Converged refinement output.
#[derive(Debug, Clone)]
pub struct Refined {
    pub edges: Vec<f64>,
    pub elevations: Vec<f64>,
    /// Passes run, including the final one that inserted nothing
    pub passes: usize,
    pub inserted: usize,
}

pub struct Refiner<'a, T: Topography + ?Sized> {
    topography: &'a T,
    xa: f64,
    xb: f64,
    nx0: usize,
    zrange: f64,
    thresholds: Thresholds,
    slope_step: f64,
    curvature_step: f64,
    max_passes: usize,
    max_points: usize,
}

impl<'a, T: Topography + ?Sized> Refiner<'a, T> {
    /// The slope step is a fixed fraction of the whole domain, while the
    /// curvature step is tied to the initial coarse spacing so curvature is
    /// always probed at the scale of the starting grid.
    pub fn new(topography: &'a T, config: &HorizontalConfig, zrange: f64) -> Self {
        Refiner {
            topography,
            xa: config.xa,
            xb: config.xb,
            nx0: config.nx0,
            zrange,
            thresholds: config.thresholds,
            slope_step: config.width() / SLOPE_STEP_DIVISOR,
            curvature_step: config.initial_spacing() / CURVATURE_STEP_DIVISOR,
            max_passes: config.max_passes,
            max_points: config.max_points,
        }
    }

    pub fn slope_step(&self) -> f64 {
        self.slope_step
    }

    pub fn curvature_step(&self) -> f64 {
        self.curvature_step
    }

    pub fn initial_edges(&self) -> Vec<f64> {
        linspace(self.xa, self.xb, self.nx0)
    }

    /// Criteria for the cell `[x0, x1]` with edge elevations `z0`, `z1`.
    pub fn criteria(&self, x0: f64, x1: f64, z0: f64, z1: f64) -> Criteria {
        let f = |x: f64| self.topography.elevation(x);
        let xmid = midpoint(x0, x1);
        let rho = 1.0 / (x1 - x0);
        Criteria {
            value: div_or_inf(rho * self.zrange, (z1 - z0).abs()),
            slope: div_or_inf(rho, first_difference(f, xmid, self.slope_step).abs()),
            curvature: div_or_inf(rho, second_difference(f, xmid, self.curvature_step).abs()),
        }
    }

    /// One pass: returns the merged edges and elevations with every flagged
    /// midpoint inserted, plus the number inserted.
    fn pass(&self, x: &[f64], z: &[f64]) -> Result<(Vec<f64>, Vec<f64>, usize)> {
        let mut next_x = Vec::with_capacity(2 * x.len());
        let mut next_z = Vec::with_capacity(2 * x.len());
        let mut inserted = 0;

        for i in 0..x.len() - 1 {
            next_x.push(x[i]);
            next_z.push(z[i]);
            if self.criteria(x[i], x[i + 1], z[i], z[i + 1]).violates(&self.thresholds) {
                let xmid = midpoint(x[i], x[i + 1]);
                if !(xmid > x[i] && xmid < x[i + 1]) {
                    // floating point resolution exhausted
                    return Err(GridError::RefinementDiverged {
                        passes: 0,
                        points: x.len() + inserted,
                    });
                }
                next_x.push(xmid);
                next_z.push(self.topography.elevation(xmid));
                inserted += 1;
            }
        }
        next_x.push(x[x.len() - 1]);
        next_z.push(z[z.len() - 1]);

        Ok((next_x, next_z, inserted))
    }

    /// Refine from the evenly spaced starting grid.
    pub fn refine(&self) -> Result<Refined> {
        self.refine_from(self.initial_edges())
    }

    /// Refine an arbitrary strictly increasing edge set with this
    /// refiner's criteria.
    pub fn refine_from(&self, edges: Vec<f64>) -> Result<Refined> {
        if edges.len() < 2 {
            return Err(GridError::InvalidConfig(format!(
                "refinement needs at least two edges, got {}",
                edges.len()
            )));
        }
        let mut x = edges;
        let mut z = self.topography.elevations(&x);
        let mut passes = 0;
        let mut total = 0;

        loop {
            if passes >= self.max_passes {
                return Err(GridError::RefinementDiverged {
                    passes,
                    points: x.len(),
                });
            }
            let (next_x, next_z, inserted) = self.pass(&x, &z).map_err(|e| match e {
                GridError::RefinementDiverged { points, .. } => {
                    GridError::RefinementDiverged { passes, points }
                }
                other => other,
            })?;
            passes += 1;
            if inserted == 0 {
                break;
            }
            if next_x.len() > self.max_points {
                return Err(GridError::RefinementDiverged {
                    passes,
                    points: next_x.len(),
                });
            }
            total += inserted;
            debug!(
                "refinement pass {}: inserted {} points, {} total",
                passes,
                inserted,
                next_x.len()
            );
            x = next_x;
            z = next_z;
        }

        Ok(Refined {
            edges: x,
            elevations: z,
            passes,
            inserted: total,
        })
    }
}
