//! End-to-end detection: integral image, scale-space scan, merge.
//!
//! ```no_run
//! use cascade_detector::cascade::load_cascade;
//! use cascade_detector::image::ImageU8;
//! use cascade_detector::{CascadeDetector, DetectorParams};
//! use std::path::Path;
//!
//! # fn example(gray: ImageU8) -> Result<(), Box<dyn std::error::Error>> {
//! let cascade = load_cascade(Path::new("face.json"))?;
//! let detector = CascadeDetector::new(cascade, DetectorParams::default())?;
//! let report = detector.detect_with_diagnostics(gray)?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

use super::params::DetectorParams;
use crate::cascade::CascadeModel;
use crate::diagnostics::{DetectionReport, InputDescriptor, TimingBreakdown};
use crate::error::{ConfigError, DetectError};
use crate::image::ImageU8;
use crate::merge::merge_with_stats;
use crate::scan::{CancelToken, ScaleSpaceScanner, ScanControl, ScanParams};
use crate::types::DetectionSet;
use log::{debug, info};
use std::time::Instant;

/// A cascade plus the parameters to run it with.
///
/// The detector holds no per-call state; `detect*` take `&self` and can run
/// concurrently from several threads.
#[derive(Clone, Debug)]
pub struct CascadeDetector {
    cascade: CascadeModel,
    params: DetectorParams,
}

impl CascadeDetector {
    pub fn new(cascade: CascadeModel, params: DetectorParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { cascade, params })
    }

    pub fn cascade(&self) -> &CascadeModel {
        &self.cascade
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Replace the scan settings. On error the previous settings stay.
    pub fn set_scan_params(&mut self, scan: ScanParams) -> Result<(), ConfigError> {
        scan.validate()?;
        self.params.scan = scan;
        Ok(())
    }

    pub fn set_deadline_ms(&mut self, deadline_ms: Option<u64>) {
        self.params.deadline_ms = deadline_ms;
    }

    /// Merged detections, best score first.
    pub fn detect(&self, image: ImageU8<'_>) -> Result<DetectionSet, DetectError> {
        Ok(self.run(image, None)?.detections)
    }

    /// Like [`detect`](Self::detect) but stops with
    /// [`DetectError::Cancelled`] once `token` is cancelled.
    pub fn detect_with_cancel(
        &self,
        image: ImageU8<'_>,
        token: &CancelToken,
    ) -> Result<DetectionSet, DetectError> {
        Ok(self.run(image, Some(token))?.detections)
    }

    /// Detections together with per-level counters and timings.
    pub fn detect_with_diagnostics(&self, image: ImageU8<'_>) -> Result<DetectionReport, DetectError> {
        self.run(image, None)
    }

    fn run(&self, image: ImageU8<'_>, token: Option<&CancelToken>) -> Result<DetectionReport, DetectError> {
        let total_start = Instant::now();
        let mut control = ScanControl::none();
        if let Some(token) = token {
            control = control.with_cancel(token);
        }
        if let Some(budget) = self.params.budget() {
            control = control.with_deadline(total_start + budget);
        }

        let scanner = ScaleSpaceScanner::new(&self.cascade, &self.params.scan)?;
        let scan_start = Instant::now();
        let output = scanner.scan_with_control(image, &control)?;
        let scan_ms = scan_start.elapsed().as_secs_f64() * 1000.0;

        let merge_start = Instant::now();
        let (detections, merge) = merge_with_stats(output.detections, self.params.scan.overlap_threshold);
        let merge_ms = merge_start.elapsed().as_secs_f64() * 1000.0;

        let mut timings = TimingBreakdown::default();
        timings.push("integral", output.integral_ms);
        timings.push("scan", scan_ms - output.integral_ms);
        timings.push("merge", merge_ms);
        timings.total_ms = total_start.elapsed().as_secs_f64() * 1000.0;

        debug!(
            "detect: {} levels ({} skipped), scan {:.2} ms, merge {:.2} ms",
            output.levels.len(),
            output.skipped_levels,
            scan_ms,
            merge_ms
        );
        info!(
            "{} detections in {}x{} image ({:.2} ms)",
            detections.len(),
            image.w,
            image.h,
            timings.total_ms
        );

        Ok(DetectionReport {
            detections,
            input: InputDescriptor {
                width: image.w,
                height: image.h,
                window_width: self.cascade.window_width(),
                window_height: self.cascade.window_height(),
                stages: self.cascade.stage_count(),
            },
            levels: output.levels,
            skipped_levels: output.skipped_levels,
            merge,
            timings,
        })
    }
}
