mod io;
pub mod refine;
pub mod smooth;
mod vertical;

pub use io::WriterOptions;
pub use refine::{Criteria, Refined, Refiner};
pub use smooth::{max_width_ratio, smooth, Smoothed};
pub use vertical::VerticalGrid;

use crate::math_utils::{centers, diffs, min_value};
use crate::topography::Topography;

/// Horizontal grid with topography sampled at edges and centers.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalGrid {
    pub edges: Vec<f64>,
    pub centers: Vec<f64>,
    pub widths: Vec<f64>,
    pub edge_elevations: Vec<f64>,
    /// Evaluated at the centers, not averaged from the edges
    pub center_elevations: Vec<f64>,
}

impl HorizontalGrid {
    pub fn from_edges<T: Topography + ?Sized>(edges: Vec<f64>, topography: &T) -> Self {
        let centers = centers(&edges);
        let widths = diffs(&edges);
        let edge_elevations = topography.elevations(&edges);
        let center_elevations = topography.elevations(&centers);
        HorizontalGrid {
            edges,
            centers,
            widths,
            edge_elevations,
            center_elevations,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.widths.len()
    }

    /// `(xa, xb)`
    pub fn bounds(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.edges.len() - 1])
    }

    /// Thinnest cell as a fraction of the domain width.
    pub fn min_spacing_fraction(&self) -> f64 {
        let (xa, xb) = self.bounds();
        min_value(&self.widths).unwrap_or(f64::NAN) / (xb - xa)
    }

    /// Edge elevations relative to the lowest edge.
    pub fn heights_above_min(&self) -> Vec<f64> {
        let lowest = min_value(&self.edge_elevations).unwrap_or(0.0);
        self.edge_elevations.iter().map(|z| z - lowest).collect()
    }
}

/// Both grids of one run, as written to and read from a grid directory.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSet {
    pub horizontal: HorizontalGrid,
    pub vertical: VerticalGrid,
}
