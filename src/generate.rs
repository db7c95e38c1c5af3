//! One grid generation run: topography → refinement → smoothing, plus the
//! independent vertical grid.

use log::{info, warn};

use crate::config::GridConfig;
use crate::error::Result;
use crate::grid::{smooth, GridSet, HorizontalGrid, Refiner, VerticalGrid};
use crate::topography::Topography;

/// Build both grids for a configuration, loading its topography source.
pub fn generate(config: &GridConfig) -> Result<GridSet> {
    config.validate()?;
    let topography = config.topography.load()?;
    generate_with(config, topography.as_ref())
}

/// Build both grids against an already constructed topography provider.
pub fn generate_with<T: Topography + ?Sized>(config: &GridConfig, topography: &T) -> Result<GridSet> {
    config.validate()?;
    info!("generating grid...");

    let horizontal = build_horizontal(config, topography)?;
    let vertical = VerticalGrid::build(&config.vertical)?;

    let set = GridSet {
        horizontal,
        vertical,
    };
    let summary = GridSummary::of(&set);
    info!(
        "grid generated: Nx = {}, Nz = {}",
        summary.nx, summary.nz
    );
    Ok(set)
}

/// Refined (and, when enabled, smoothed) horizontal grid.
pub fn build_horizontal<T: Topography + ?Sized>(
    config: &GridConfig,
    topography: &T,
) -> Result<HorizontalGrid> {
    let refiner = Refiner::new(topography, &config.horizontal, config.zrange());
    let refined = refiner.refine()?;
    info!(
        "refinement converged after {} passes: {} points ({} inserted)",
        refined.passes,
        refined.edges.len(),
        refined.inserted
    );

    let edges = if config.horizontal.smooth {
        let smoothed = smooth(refined.edges, config.horizontal.max_points)?;
        info!("smoothing inserted {} points", smoothed.inserted);
        smoothed.edges
    } else {
        warn!("spacing smoother disabled, neighboring cell widths are unbounded");
        refined.edges
    };

    Ok(HorizontalGrid::from_edges(edges, topography))
}

/// Cell counts and resolution of a generated grid set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSummary {
    pub nx: usize,
    pub nz: usize,
    /// Thinnest horizontal cell over the domain width
    pub min_dx_fraction: f64,
    /// Thinnest vertical cell over the domain depth
    pub min_dz_fraction: f64,
}

impl GridSummary {
    pub fn of(set: &GridSet) -> Self {
        GridSummary {
            nx: set.horizontal.cell_count(),
            nz: set.vertical.cell_count(),
            min_dx_fraction: set.horizontal.min_spacing_fraction(),
            min_dz_fraction: set.vertical.min_spacing_fraction(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HorizontalConfig, Thresholds};
    use crate::topography::{AnalyticProfile, TopographySource};

    fn flat_config() -> GridConfig {
        GridConfig {
            horizontal: HorizontalConfig {
                nx0: 3,
                xa: 0.0,
                xb: 10.0,
                thresholds: Thresholds::new(1.0e9, 1.0e9, 1.0e9),
                ..HorizontalConfig::default()
            },
            topography: TopographySource::Analytic {
                profile: AnalyticProfile::Flat { elevation: 0.0 },
            },
            ..GridConfig::default()
        }
    }

    #[test]
    fn flat_run_keeps_initial_grid() {
        let set = generate(&flat_config()).unwrap();
        assert_eq!(set.horizontal.edges, vec![0.0, 5.0, 10.0]);
        assert_eq!(set.horizontal.centers, vec![2.5, 7.5]);
        assert_eq!(set.horizontal.edge_elevations, vec![0.0; 3]);
        assert_eq!(set.horizontal.center_elevations, vec![0.0; 2]);

        let summary = GridSummary::of(&set);
        assert_eq!(summary.nx, 2);
        assert_eq!(summary.nz, 424);
        assert_eq!(summary.min_dx_fraction, 0.5);
    }

    #[test]
    fn smoothing_can_be_disabled() {
        let step = |x: f64| if x < 0.3 { 0.0 } else { 1.0 };
        let mut config = flat_config();
        config.horizontal.nx0 = 2;
        config.horizontal.xb = 1.0;
        config.horizontal.zrange = Some(1.0);
        config.horizontal.thresholds = Thresholds::new(5.0, 1.0e-30, 1.0e-30);

        config.horizontal.smooth = false;
        let raw = build_horizontal(&config, &step).unwrap();
        config.horizontal.smooth = true;
        let smoothed = build_horizontal(&config, &step).unwrap();

        assert!(raw.edges.len() <= smoothed.edges.len());
        assert!(crate::grid::max_width_ratio(&smoothed.edges) <= 2.002);
        for x in &raw.edges {
            assert!(smoothed.edges.contains(x));
        }
    }

    #[test]
    fn invalid_config_fails_before_loading_topography() {
        let mut config = GridConfig::default();
        config.horizontal.nx0 = 0;
        assert!(generate(&config).is_err());
    }
}
