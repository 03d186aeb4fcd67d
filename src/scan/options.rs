use crate::cascade::{Normalization, NormalizationParams};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// How window sizes above the canonical one are realised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Keep the image, scale feature rectangles. One integral image serves
    /// every level.
    #[default]
    ScaleFeatures,
    /// Keep the canonical features, downsample the image per level and build
    /// a fresh integral image for it.
    ResampleImage,
}

/// Multi-scale scan and merge configuration.
///
/// - `scale_factor`: geometric growth of the window per level (> 1).
/// - `min_window_size` / `max_window_size`: bounds on the window side in
///   original pixels; `max_window_size` defaults to the smaller image side.
/// - `step_fraction`: position stride as a fraction of the current window.
/// - `overlap_threshold`: IoU at which the merge suppresses a detection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanParams {
    pub scale_factor: f64,
    pub min_window_size: usize,
    pub max_window_size: Option<usize>,
    pub step_fraction: f64,
    pub overlap_threshold: f64,
    pub normalization: Normalization,
    pub variance_epsilon: f64,
    pub scale_mode: ScaleMode,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_window_size: 1,
            max_window_size: None,
            step_fraction: 0.1,
            overlap_threshold: 0.3,
            normalization: Normalization::Variance,
            variance_epsilon: 1e-6,
            scale_mode: ScaleMode::ScaleFeatures,
        }
    }
}

impl ScanParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scale_factor.is_finite() && self.scale_factor > 1.0) {
            return Err(invalid("scale_factor", format!("must be > 1.0, got {}", self.scale_factor)));
        }
        if self.min_window_size == 0 {
            return Err(invalid("min_window_size", "must be at least 1".to_string()));
        }
        if let Some(max) = self.max_window_size {
            if max < self.min_window_size {
                return Err(invalid(
                    "max_window_size",
                    format!("{max} is below min_window_size {}", self.min_window_size),
                ));
            }
        }
        if !in_unit_interval(self.step_fraction) {
            return Err(invalid("step_fraction", format!("must lie in (0, 1], got {}", self.step_fraction)));
        }
        if !in_unit_interval(self.overlap_threshold) {
            return Err(invalid(
                "overlap_threshold",
                format!("must lie in (0, 1], got {}", self.overlap_threshold),
            ));
        }
        if !(self.variance_epsilon.is_finite() && self.variance_epsilon >= 0.0) {
            return Err(invalid(
                "variance_epsilon",
                format!("must be finite and >= 0, got {}", self.variance_epsilon),
            ));
        }
        Ok(())
    }

    /// Largest window side for an image of the given size.
    pub fn effective_max_window(&self, width: usize, height: usize) -> usize {
        self.max_window_size.unwrap_or_else(|| width.min(height))
    }

    pub fn normalization_params(&self) -> NormalizationParams {
        NormalizationParams {
            mode: self.normalization,
            variance_epsilon: self.variance_epsilon,
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_window_bounds(mut self, min: usize, max: Option<usize>) -> Self {
        self.min_window_size = min;
        self.max_window_size = max;
        self
    }

    pub fn with_step_fraction(mut self, step_fraction: f64) -> Self {
        self.step_fraction = step_fraction;
        self
    }

    pub fn with_overlap_threshold(mut self, overlap_threshold: f64) -> Self {
        self.overlap_threshold = overlap_threshold;
        self
    }

    pub fn with_scale_mode(mut self, scale_mode: ScaleMode) -> Self {
        self.scale_mode = scale_mode;
        self
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }
}

fn in_unit_interval(v: f64) -> bool {
    v > 0.0 && v <= 1.0
}

fn invalid(name: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidParam { name, reason }
}
