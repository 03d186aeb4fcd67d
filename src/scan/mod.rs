//! Scale-space scanning.
//!
//! Modules
//! - [`options`] – [`ScanParams`] and [`ScaleMode`].
//! - [`levels`] – planning window sizes and strides per scale level.
//! - `resample` – area-averaging downsampling used by
//!   [`ScaleMode::ResampleImage`].
//! - [`control`] – cooperative cancellation and deadlines.
//! - `scanner` – the sliding-window loop producing raw detections.

pub mod control;
pub mod levels;
pub mod options;
mod resample;
mod scanner;

pub use control::{CancelToken, ScanControl};
pub use levels::{plan_levels, LevelPlan, ScaleLevel};
pub use options::{ScaleMode, ScanParams};
pub use resample::downsample_area;
pub use scanner::{scan, ScaleSpaceScanner, ScanOutput};
