//! Diagnostics returned by [`CascadeDetector::detect_with_diagnostics`](crate::CascadeDetector).
//!
//! Everything here is plain serializable data so reports can be dumped as
//! JSON next to the detections.

pub mod pipeline;
pub mod scan;
pub mod timing;

pub use pipeline::{DetectionReport, InputDescriptor};
pub use scan::LevelReport;
pub use timing::{StageTiming, TimingBreakdown};
