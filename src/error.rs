//! Error type shared by every stage of grid generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building, reading, or writing a grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// File system failure with the path that caused it
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Binary float64 file whose byte length is not a multiple of 8
    #[error("{path} is not a float64 array ({len} bytes)")]
    MalformedArray { path: PathBuf, len: usize },

    #[error("topography samples differ in length (x: {x_len}, z: {z_len})")]
    SampleLengthMismatch { x_len: usize, z_len: usize },

    #[error("topography needs at least two samples, got {len}")]
    TooFewSamples { len: usize },

    #[error("topography sample {index} is not finite")]
    NonFiniteSample { index: usize },

    #[error("topography has duplicate sample coordinate x = {x}")]
    DuplicateSample { x: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Refinement hit a sanity ceiling; thresholds or domain are unreasonable
    #[error("refinement did not converge after {passes} passes ({points} points)")]
    RefinementDiverged { passes: usize, points: usize },

    #[error("smoothing did not converge after {insertions} insertions ({points} points)")]
    SmoothingDiverged { insertions: usize, points: usize },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed grid file {path}: {message}")]
    MalformedGridFile { path: PathBuf, message: String },
}

impl GridError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GridError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
