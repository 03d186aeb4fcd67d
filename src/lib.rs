#![doc = include_str!("../README.md")]

// Public modules
pub mod cascade;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod integral;
pub mod merge;
pub mod scan;
pub mod types;

// Tool configuration (used by the binaries).
pub mod config;

// --- High-level re-exports -------------------------------------------------

pub use crate::cascade::CascadeModel;
pub use crate::detector::{CascadeDetector, DetectorParams};
pub use crate::diagnostics::DetectionReport;
pub use crate::error::{ConfigError, DetectError, InputError, Result};
pub use crate::integral::IntegralImage;
pub use crate::scan::{CancelToken, ScaleMode, ScanParams};
pub use crate::types::{DetectionSet, DetectionWindow};

// --- Prelude ---------------------------------------------------------------

/// The handful of names needed to run a detector.
pub mod prelude {
    pub use crate::image::ImageU8;
    pub use crate::{CascadeDetector, DetectionSet, DetectionWindow, DetectorParams, ScanParams};
}
