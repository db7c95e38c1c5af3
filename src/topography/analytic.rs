use serde::{Deserialize, Serialize};

use super::Topography;

/// Amplitude, width, center, and vertical offset of a closed-form feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeParams {
    pub amplitude: f64,
    pub width: f64,
    pub center: f64,
    #[serde(default)]
    pub offset: f64,
}

impl ShapeParams {
    /// Smooth step from `offset + amplitude` (far left) down to
    /// `offset - amplitude` (far right), centered on `center`.
    pub fn sigmoid(&self, x: f64) -> f64 {
        let ShapeParams {
            amplitude: a,
            width: w,
            center: c,
            offset: h,
        } = *self;
        (-a * 2.0 / (1.0 + (-(x - c) * 3.0 / w).exp()) + a) + h
    }

    /// Bell-shaped bump; `width` scales the squared distance.
    pub fn gaussian(&self, x: f64) -> f64 {
        let ShapeParams {
            amplitude: a,
            width: w,
            center: c,
            offset: h,
        } = *self;
        a * (-(x - c) * (x - c) / w).exp() + h
    }
}

/// Closed-form topography profiles selectable from a config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalyticProfile {
    Flat {
        #[serde(default)]
        elevation: f64,
    },
    Ramp {
        slope: f64,
        #[serde(default)]
        intercept: f64,
    },
    Sigmoid(ShapeParams),
    Gaussian(ShapeParams),
    /// Scarp plus bulge: the idealized basin-rim cross section
    Dichotomy { scarp: ShapeParams, bulge: ShapeParams },
}

impl AnalyticProfile {
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticProfile::Flat { .. } => "flat",
            AnalyticProfile::Ramp { .. } => "ramp",
            AnalyticProfile::Sigmoid(_) => "sigmoid",
            AnalyticProfile::Gaussian(_) => "gaussian",
            AnalyticProfile::Dichotomy { .. } => "dichotomy",
        }
    }
}

impl Default for AnalyticProfile {
    fn default() -> Self {
        AnalyticProfile::Flat { elevation: 0.0 }
    }
}

impl Topography for AnalyticProfile {
    fn elevation(&self, x: f64) -> f64 {
        match self {
            AnalyticProfile::Flat { elevation } => *elevation,
            AnalyticProfile::Ramp { slope, intercept } => slope * x + intercept,
            AnalyticProfile::Sigmoid(shape) => shape.sigmoid(x),
            AnalyticProfile::Gaussian(shape) => shape.gaussian(x),
            AnalyticProfile::Dichotomy { scarp, bulge } => scarp.sigmoid(x) + bulge.gaussian(x),
        }
    }
}
