//! Multi-scale sliding-window scan.
//!
//! The integral image of the input is built once. Every planned level then
//! either scales the cascade features onto that table or downsamples the
//! image and builds a level-local table that is dropped when the level ends.
//! Levels, and row bands inside a level, only read shared immutable state
//! and append to private buffers, so both are spread over the rayon pool
//! when the `parallel` feature is enabled. Results are concatenated in
//! level/row/column order regardless of scheduling.

use super::control::ScanControl;
use super::levels::{plan_levels, LevelPlan, ScaleLevel};
use super::options::{ScaleMode, ScanParams};
use super::resample::downsample_area;
use crate::cascade::{CascadeEvaluator, CascadeModel, CascadeState};
use crate::diagnostics::LevelReport;
use crate::error::{ConfigError, DetectError};
use crate::image::ImageU8;
use crate::integral::IntegralImage;
use crate::types::DetectionWindow;
use log::debug;
use std::time::Instant;

/// Window rows handed to one worker at a time.
const ROW_BAND: usize = 4;

/// Raw detections plus per-level diagnostics.
#[derive(Clone, Debug, Default)]
pub struct ScanOutput {
    pub detections: Vec<DetectionWindow>,
    pub levels: Vec<LevelReport>,
    pub skipped_levels: usize,
    pub integral_ms: f64,
}

#[derive(Clone, Debug, Default)]
struct Counters {
    windows: usize,
    accepted: usize,
    rejections: Vec<usize>,
    degenerate: usize,
}

impl Counters {
    fn new(stages: usize) -> Self {
        Self {
            rejections: vec![0; stages],
            ..Default::default()
        }
    }

    fn absorb(&mut self, other: Counters) {
        self.windows += other.windows;
        self.accepted += other.accepted;
        self.degenerate += other.degenerate;
        for (a, b) in self.rejections.iter_mut().zip(other.rejections) {
            *a += b;
        }
    }
}

struct BandResult {
    detections: Vec<DetectionWindow>,
    counters: Counters,
}

struct LevelOutcome {
    detections: Vec<DetectionWindow>,
    report: LevelReport,
}

/// Scans an image for one cascade under fixed parameters.
pub struct ScaleSpaceScanner<'a> {
    cascade: &'a CascadeModel,
    params: &'a ScanParams,
}

impl<'a> ScaleSpaceScanner<'a> {
    pub fn new(cascade: &'a CascadeModel, params: &'a ScanParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { cascade, params })
    }

    /// Levels this scanner would visit on a `width × height` image.
    pub fn plan(&self, width: usize, height: usize) -> LevelPlan {
        plan_levels(self.cascade, width, height, self.params)
    }

    /// Raw detections over every level, in scan order.
    pub fn scan(&self, image: ImageU8<'_>) -> Result<Vec<DetectionWindow>, DetectError> {
        Ok(self.scan_with_control(image, &ScanControl::none())?.detections)
    }

    /// Full scan honouring cancellation and deadline at level granularity.
    ///
    /// An interrupted scan returns an error rather than the levels that did
    /// finish.
    pub fn scan_with_control(
        &self,
        image: ImageU8<'_>,
        control: &ScanControl<'_>,
    ) -> Result<ScanOutput, DetectError> {
        image.validate()?;

        let integral_start = Instant::now();
        let integral = IntegralImage::build(&image)?;
        let integral_ms = integral_start.elapsed().as_secs_f64() * 1000.0;

        let plan = self.plan(image.w, image.h);
        debug!(
            "scan {}x{}: {} levels planned, {} skipped",
            image.w,
            image.h,
            plan.levels.len(),
            plan.skipped
        );

        let outcomes = self.run_levels(&plan.levels, &integral, control);
        let mut output = ScanOutput {
            skipped_levels: plan.skipped,
            integral_ms,
            ..Default::default()
        };
        for outcome in outcomes {
            let LevelOutcome { detections, report } = outcome?;
            output.detections.extend(detections);
            output.levels.push(report);
        }
        Ok(output)
    }

    #[cfg(feature = "parallel")]
    fn run_levels(
        &self,
        levels: &[ScaleLevel],
        integral: &IntegralImage,
        control: &ScanControl<'_>,
    ) -> Vec<Result<LevelOutcome, DetectError>> {
        use rayon::prelude::*;
        levels
            .par_iter()
            .map(|level| self.scan_level(level, integral, control))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn run_levels(
        &self,
        levels: &[ScaleLevel],
        integral: &IntegralImage,
        control: &ScanControl<'_>,
    ) -> Vec<Result<LevelOutcome, DetectError>> {
        let mut outcomes = Vec::with_capacity(levels.len());
        for level in levels {
            let outcome = self.scan_level(level, integral, control);
            let stop = outcome.is_err();
            outcomes.push(outcome);
            if stop {
                break;
            }
        }
        outcomes
    }

    fn scan_level(
        &self,
        level: &ScaleLevel,
        full: &IntegralImage,
        control: &ScanControl<'_>,
    ) -> Result<LevelOutcome, DetectError> {
        control.check(level.index)?;
        let start = Instant::now();
        let norm = self.params.normalization_params();

        let level_table;
        let (integral, evaluator) = match self.params.scale_mode {
            ScaleMode::ScaleFeatures => (full, CascadeEvaluator::new(self.cascade, level.scale, norm)),
            ScaleMode::ResampleImage => {
                let resized = downsample_area(full, level.image_width, level.image_height);
                level_table = IntegralImage::build(&resized)?;
                (&level_table, CascadeEvaluator::new(self.cascade, 1.0, norm))
            }
        };
        debug_assert_eq!(
            evaluator.window_size(),
            (level.scan_window_width, level.scan_window_height)
        );

        let rows: Vec<usize> = level.positions_y().collect();
        let bands = scan_bands(&rows, |band| {
            self.scan_band(band, level, integral, &evaluator, (full.width(), full.height()))
        });

        let mut detections = Vec::new();
        let mut counters = Counters::new(evaluator.stage_count());
        for band in bands {
            detections.extend(band.detections);
            counters.absorb(band.counters);
        }

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "level {} scale={:.3} window={}x{} stride={}x{}: {} windows, {} accepted, {:.2} ms",
            level.index,
            level.scale,
            level.window_width,
            level.window_height,
            level.stride_x,
            level.stride_y,
            counters.windows,
            counters.accepted,
            elapsed_ms
        );

        Ok(LevelOutcome {
            detections,
            report: LevelReport {
                level: *level,
                windows_evaluated: counters.windows,
                accepted: counters.accepted,
                rejections_by_stage: counters.rejections,
                degenerate_windows: counters.degenerate,
                elapsed_ms,
            },
        })
    }

    fn scan_band(
        &self,
        rows: &[usize],
        level: &ScaleLevel,
        integral: &IntegralImage,
        evaluator: &CascadeEvaluator,
        full_size: (usize, usize),
    ) -> BandResult {
        let mut counters = Counters::new(evaluator.stage_count());
        let mut detections = Vec::new();
        let (sx, sy) = level.to_original(full_size.0, full_size.1);
        let max_x = full_size.0 - level.window_width;
        let max_y = full_size.1 - level.window_height;

        for &y in rows {
            for x in level.positions_x() {
                let verdict = evaluator.evaluate_window(integral, x, y);
                counters.windows += 1;
                if verdict.degenerate_variance {
                    counters.degenerate += 1;
                }
                match verdict.state {
                    CascadeState::Accepted => {
                        counters.accepted += 1;
                        let ox = ((x as f64 * sx).round() as usize).min(max_x);
                        let oy = ((y as f64 * sy).round() as usize).min(max_y);
                        detections.push(DetectionWindow {
                            x: ox as u32,
                            y: oy as u32,
                            width: level.window_width as u32,
                            height: level.window_height as u32,
                            scale: level.scale,
                            score: verdict.score,
                        });
                    }
                    CascadeState::Rejected { stage } => counters.rejections[stage] += 1,
                    CascadeState::Scanning => unreachable!("evaluation always terminates"),
                }
            }
        }
        BandResult {
            detections,
            counters,
        }
    }
}

#[cfg(feature = "parallel")]
fn scan_bands<F>(rows: &[usize], f: F) -> Vec<BandResult>
where
    F: Fn(&[usize]) -> BandResult + Sync + Send,
{
    use rayon::prelude::*;
    rows.par_chunks(ROW_BAND).map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn scan_bands<F>(rows: &[usize], f: F) -> Vec<BandResult>
where
    F: Fn(&[usize]) -> BandResult,
{
    rows.chunks(ROW_BAND).map(f).collect()
}

/// Scan `image` with `cascade` and return raw (unmerged) detections.
pub fn scan(
    cascade: &CascadeModel,
    image: ImageU8<'_>,
    params: &ScanParams,
) -> Result<Vec<DetectionWindow>, DetectError> {
    ScaleSpaceScanner::new(cascade, params)?.scan(image)
}
