// Horizontal domain defaults (m)
pub const DEFAULT_NX0: usize = 100;
pub const DEFAULT_XA: f64 = -2.0e6;
pub const DEFAULT_XB: f64 = 5.0e5;

// Refinement thresholds (value change, slope, curvature).
// A prefactor of 12 gives a good density distribution across the scarp.
pub const THRESHOLD_PREFACTOR: f64 = 12.0;
pub const DEFAULT_THRESHOLDS: [f64; 3] = [
    THRESHOLD_PREFACTOR * 1.0e-4,
    THRESHOLD_PREFACTOR * 2.0e-3,
    THRESHOLD_PREFACTOR * 1.0e2,
];

// Vertical domain defaults (m), z runs over [-zdepth, 0]
pub const DEFAULT_ZDEPTH: f64 = 2.0e3;
pub const DEFAULT_DELZ0: f64 = 0.3; // surface cell width
pub const DEFAULT_FDELZ: f64 = 1.01; // width growth per cell with depth

// Finite difference steps
pub const SLOPE_STEP_DIVISOR: f64 = 1.0e6; // (xb - xa) / divisor
pub const CURVATURE_STEP_DIVISOR: f64 = 1.0e3; // (x[1] - x[0]) / divisor

// Largest width ratio allowed between neighboring cells after smoothing
pub const MAX_WIDTH_RATIO: f64 = 2.001;

// Sanity ceilings for runaway refinement
pub const DEFAULT_MAX_PASSES: usize = 200;
pub const DEFAULT_MAX_POINTS: usize = 2_000_000;

// Output layout
pub const DEFAULT_GRID_DIR: &str = "grid";
pub const DEFAULT_TOPO_X_FILE: &str = "data/gale-dichotomy-topo/y_idealized";
pub const DEFAULT_TOPO_Z_FILE: &str = "data/gale-dichotomy-topo/z_idealized";

pub const NX_FILE: &str = "Nx.txt";
pub const NZ_FILE: &str = "Nz.txt";
pub const XE_FILE: &str = "xe";
pub const XC_FILE: &str = "xc";
pub const DELX_FILE: &str = "delx";
pub const ZE_FILE: &str = "ze";
pub const ZC_FILE: &str = "zc";
pub const DELZ_FILE: &str = "delz";
pub const ZTOPE_FILE: &str = "ztope";
pub const ZTOPC_FILE: &str = "ztopc";

pub const F64_BYTES: usize = 8;
