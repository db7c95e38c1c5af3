use crate::config::VerticalConfig;
use crate::error::Result;
use crate::math_utils::diffs;

/// Depth grid over `[-zdepth, 0]` whose cells grow geometrically with depth.
#[derive(Debug, Clone, PartialEq)]
pub struct VerticalGrid {
    /// Increasing from `-zdepth` (bottom) to `0` (surface)
    pub edges: Vec<f64>,
    pub centers: Vec<f64>,
    pub widths: Vec<f64>,
}

impl VerticalGrid {
    /// Build the grid: the surface cell is exactly `delz0` wide, each cell
    /// below it is `fdelz` times wider than the one above, and the deepest
    /// cell is cut off at exactly `zdepth`.
    pub fn build(config: &VerticalConfig) -> Result<Self> {
        config.validate()?;
        let VerticalConfig {
            zdepth,
            delz0,
            fdelz,
        } = *config;

        let mut depths = vec![0.0, delz0];
        while depths[depths.len() - 1] < zdepth {
            let n = depths.len();
            depths.push(depths[n - 1] + fdelz * (depths[n - 1] - depths[n - 2]));
        }
        let last = depths.len() - 1;
        depths[last] = zdepth;

        let edges: Vec<f64> = depths.iter().rev().map(|d| -d).collect();
        Ok(Self::from_edges(edges))
    }

    /// Derive widths and centers from edges.
    pub fn from_edges(edges: Vec<f64>) -> Self {
        let widths = diffs(&edges);
        let centers = edges.iter().zip(&widths).map(|(z, dz)| z + dz / 2.0).collect();
        VerticalGrid {
            edges,
            centers,
            widths,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.widths.len()
    }

    pub fn depth(&self) -> f64 {
        -self.edges[0]
    }

    /// Thinnest cell as a fraction of the total depth.
    pub fn min_spacing_fraction(&self) -> f64 {
        self.widths.iter().copied().fold(f64::INFINITY, f64::min) / self.depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_deviation;
    use crate::error::GridError;
    use crate::math_utils::is_strictly_increasing;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use more_asserts::{assert_gt, assert_le};

    fn reference() -> VerticalGrid {
        VerticalGrid::build(&VerticalConfig {
            zdepth: 2000.0,
            delz0: 0.3,
            fdelz: 1.01,
        })
        .unwrap()
    }

    #[test]
    fn ends_and_surface_cell_are_exact() {
        let grid = reference();
        let n = grid.cell_count();

        assert_eq!(grid.edges[0], -2000.0);
        assert_eq!(grid.edges[n], 0.0);
        assert_eq!(grid.widths[n - 1], 0.3);
        assert_eq!(grid.depth(), 2000.0);
        assert!(is_strictly_increasing(&grid.edges));
    }

    #[test]
    fn widths_grow_geometrically_toward_the_bottom() {
        let grid = reference();
        let n = grid.cell_count();

        // widths[0] is the clamped bottom cell
        for k in 1..n - 1 {
            assert_relative_eq!(grid.widths[k] / grid.widths[k + 1], 1.01, max_relative = 1e-9);
        }
        assert_gt!(grid.widths[0], 0.0);
        assert_le!(grid.widths[0], 1.01 * grid.widths[1] * (1.0 + 1e-12));
    }

    #[test]
    fn cell_count_matches_geometric_series() {
        let grid = reference();
        // 30 * (1.01^n - 1) >= 2000 first holds at n = 424
        assert_eq!(grid.cell_count(), 424);
        assert_eq!(grid.edges.len(), 425);
        assert_eq!(grid.centers.len(), 424);
        assert_deviation!(grid.widths.iter().sum::<f64>(), 2000.0, 1e-9);
    }

    #[test]
    fn centers_sit_halfway() {
        let grid = reference();
        for k in 0..grid.cell_count() {
            assert_abs_diff_eq!(
                grid.centers[k],
                (grid.edges[k] + grid.edges[k + 1]) / 2.0,
                epsilon = 1e-9
            );
        }
        assert_abs_diff_eq!(grid.min_spacing_fraction(), 0.3 / 2000.0, epsilon = 1e-15);
    }

    #[test]
    fn surface_cell_spanning_the_depth_gives_one_cell() {
        let grid = VerticalGrid::build(&VerticalConfig {
            zdepth: 5.0,
            delz0: 5.0,
            fdelz: 1.2,
        })
        .unwrap();
        assert_eq!(grid.edges, vec![-5.0, 0.0]);
        assert_eq!(grid.widths, vec![5.0]);
        assert_eq!(grid.centers, vec![-2.5]);
    }

    #[test]
    fn shallow_domain_clamps_second_cell() {
        let grid = VerticalGrid::build(&VerticalConfig {
            zdepth: 1.0,
            delz0: 0.6,
            fdelz: 2.0,
        })
        .unwrap();
        assert_eq!(grid.edges, vec![-1.0, -0.6, 0.0]);
        assert_abs_diff_eq!(grid.widths[0], 0.4, epsilon = 1e-15);
        assert_eq!(grid.widths[1], 0.6);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let bad = VerticalConfig {
            zdepth: 10.0,
            delz0: 1.0,
            fdelz: 0.9,
        };
        assert!(matches!(
            VerticalGrid::build(&bad),
            Err(GridError::InvalidConfig(_))
        ));
    }
}
