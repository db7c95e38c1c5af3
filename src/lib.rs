pub mod config;
pub mod constants;
pub mod error;
pub mod generate;
pub mod grid;
pub mod math_utils;
pub mod raw_array;
pub mod topography;

pub use config::{GridConfig, HorizontalConfig, Thresholds, VerticalConfig};
pub use error::{GridError, Result};
pub use generate::{generate, generate_with, GridSummary};
pub use grid::{GridSet, HorizontalGrid, VerticalGrid, WriterOptions};
pub use topography::{Topography, TopographySource};
