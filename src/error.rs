//! Error taxonomy for loading cascades, validating inputs and running scans.
//!
//! Configuration and input problems are reported before any scanning starts.
//! Conditions that only affect a single window or scale level (flat windows,
//! levels that do not fit the image) are handled locally and never surface
//! here.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed or self-inconsistent cascade model, scan parameters or tool
/// configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cascade has no stages")]
    EmptyCascade,

    #[error("stage {stage} has no weak classifiers")]
    EmptyStage { stage: usize },

    #[error("stage {stage}, classifier {classifier}: feature template has no rectangles")]
    EmptyFeature { stage: usize, classifier: usize },

    #[error("canonical window must have positive dimensions, got {width}x{height}")]
    InvalidWindowSize { width: u32, height: u32 },

    #[error(
        "stage {stage}, classifier {classifier}, rect {rect}: \
         ({x}, {y}, {width}x{height}) lies outside the {window_width}x{window_height} window"
    )]
    RectOutOfWindow {
        stage: usize,
        classifier: usize,
        rect: usize,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        window_width: u32,
        window_height: u32,
    },

    #[error("stage {stage}, classifier {classifier}, rect {rect}: rectangle has zero area")]
    EmptyRect {
        stage: usize,
        classifier: usize,
        rect: usize,
    },

    #[error("stage {stage}, classifier {classifier}: polarity must be +1 or -1, got {polarity}")]
    InvalidPolarity {
        stage: usize,
        classifier: usize,
        polarity: i8,
    },

    #[error("{what} must be finite, got {value}")]
    NonFinite { what: String, value: f64 },

    #[error("invalid scan parameter `{name}`: {reason}")]
    InvalidParam { name: &'static str, reason: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse cascade JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Unusable pixel buffer handed to the detector.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("image dimensions are zero ({width}x{height})")]
    ZeroDimensions { width: usize, height: usize },

    #[error("stride {stride} is smaller than width {width}")]
    StrideTooSmall { stride: usize, width: usize },

    #[error("pixel buffer holds {len} bytes, {required} required")]
    BufferTooShort { len: usize, required: usize },
}

/// Top-level error returned by detection entry points.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("detection cancelled before level {level}")]
    Cancelled { level: usize },

    #[error("deadline exceeded before level {level}")]
    DeadlineExceeded { level: usize },
}

pub type Result<T, E = DetectError> = std::result::Result<T, E>;
