//! Staged early-exit evaluation of one window.
//!
//! Each window runs a small state machine: it starts in
//! [`CascadeState::Scanning`], visits the stages in cascade order and ends in
//! [`CascadeState::Rejected`] at the first failing stage or in
//! [`CascadeState::Accepted`] after the last one. Later stages are never
//! touched once a stage rejects; most background windows stop after one or
//! two cheap stages.

use super::feature::{scale_edge, NormalizationParams, ScaledFeature, WindowNorm};
use super::model::{weak_vote, CascadeModel, Rect, StageDecision};
use crate::integral::IntegralImage;
use crate::types::DetectionWindow;

/// Per-window cascade state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CascadeState {
    Scanning,
    /// Rejected by the stage at this index.
    Rejected { stage: usize },
    Accepted,
}

/// Full outcome of a window, including how far it got.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowVerdict {
    pub state: CascadeState,
    pub stages_evaluated: usize,
    /// Score of the last evaluated stage.
    pub score: f64,
    /// Variance normalization was skipped for this window.
    pub degenerate_variance: bool,
}

impl WindowVerdict {
    pub fn accepted(&self) -> bool {
        self.state == CascadeState::Accepted
    }
}

#[derive(Clone, Debug)]
struct ScaledClassifier {
    feature: ScaledFeature,
    threshold: f64,
    polarity: f64,
    weight: f64,
}

#[derive(Clone, Debug)]
struct ScaledStage {
    classifiers: Vec<ScaledClassifier>,
    threshold: f64,
}

impl ScaledStage {
    #[inline]
    fn evaluate(&self, integral: &IntegralImage, x: usize, y: usize, norm: &WindowNorm) -> StageDecision {
        let score: f64 = self
            .classifiers
            .iter()
            .map(|c| {
                let value = norm.apply(c.feature.evaluate(integral, x, y));
                weak_vote(value, c.threshold, c.polarity, c.weight)
            })
            .sum();
        StageDecision {
            accepted: score >= self.threshold,
            score,
        }
    }
}

/// A cascade prepared for one window size: every feature rectangle is scaled
/// once up front so the per-window loop only does table lookups.
#[derive(Clone, Debug)]
pub struct CascadeEvaluator {
    scale: f64,
    window_width: usize,
    window_height: usize,
    area_ratio: f64,
    normalization: NormalizationParams,
    stages: Vec<ScaledStage>,
}

impl CascadeEvaluator {
    pub fn new(cascade: &CascadeModel, scale: f64, normalization: NormalizationParams) -> Self {
        let window_width = scale_edge(cascade.window_width(), scale).max(1);
        let window_height = scale_edge(cascade.window_height(), scale).max(1);
        let canonical_area = cascade.window_width() as f64 * cascade.window_height() as f64;
        let area_ratio = (window_width * window_height) as f64 / canonical_area;
        let stages = cascade
            .stages()
            .iter()
            .map(|stage| ScaledStage {
                classifiers: stage
                    .classifiers
                    .iter()
                    .map(|c| ScaledClassifier {
                        feature: ScaledFeature::new(&c.feature, scale),
                        threshold: c.threshold,
                        polarity: c.polarity as f64,
                        weight: c.weight,
                    })
                    .collect(),
                threshold: stage.threshold,
            })
            .collect();
        Self {
            scale,
            window_width,
            window_height,
            area_ratio,
            normalization,
            stages,
        }
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Scaled window size in pixels.
    #[inline]
    pub fn window_size(&self) -> (usize, usize) {
        (self.window_width, self.window_height)
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Whether a window at `(x, y)` lies fully inside `integral`.
    #[inline]
    pub fn fits(&self, integral: &IntegralImage, x: usize, y: usize) -> bool {
        x + self.window_width <= integral.width() && y + self.window_height <= integral.height()
    }

    /// Run the cascade on the window at `(x, y)`, reporting every stage
    /// decision to `observer` in order.
    ///
    /// The caller guarantees the window fits the integral image.
    #[inline]
    pub fn evaluate_window_with<F>(
        &self,
        integral: &IntegralImage,
        x: usize,
        y: usize,
        mut observer: F,
    ) -> WindowVerdict
    where
        F: FnMut(usize, &StageDecision),
    {
        debug_assert!(self.fits(integral, x, y));
        let norm = WindowNorm::for_window(
            integral,
            x,
            y,
            self.window_width,
            self.window_height,
            self.area_ratio,
            &self.normalization,
        );
        let mut verdict = WindowVerdict {
            state: CascadeState::Scanning,
            stages_evaluated: 0,
            score: 0.0,
            degenerate_variance: norm.degenerate,
        };
        for (index, stage) in self.stages.iter().enumerate() {
            let decision = stage.evaluate(integral, x, y, &norm);
            observer(index, &decision);
            verdict.stages_evaluated += 1;
            verdict.score = decision.score;
            if !decision.accepted {
                verdict.state = CascadeState::Rejected { stage: index };
                return verdict;
            }
        }
        verdict.state = CascadeState::Accepted;
        verdict
    }

    #[inline]
    pub fn evaluate_window(&self, integral: &IntegralImage, x: usize, y: usize) -> WindowVerdict {
        self.evaluate_window_with(integral, x, y, |_, _| {})
    }

    /// Detection for the window at `(x, y)` if every stage accepts it.
    /// Coordinates are those of `integral`.
    pub fn classify(&self, integral: &IntegralImage, x: usize, y: usize) -> Option<DetectionWindow> {
        let verdict = self.evaluate_window(integral, x, y);
        verdict.accepted().then(|| DetectionWindow {
            x: x as u32,
            y: y as u32,
            width: self.window_width as u32,
            height: self.window_height as u32,
            scale: self.scale,
            score: verdict.score,
        })
    }
}

/// One-shot classification of `window` at `scale`.
///
/// `window` must have the cascade's window size at `scale` (see
/// [`CascadeEvaluator::window_size`]); any other size, or a window that does
/// not fit the integral image, returns `None`. Scanning many windows should
/// go through a reused [`CascadeEvaluator`] instead.
pub fn classify(
    cascade: &CascadeModel,
    integral: &IntegralImage,
    window: Rect,
    scale: f64,
    normalization: NormalizationParams,
) -> Option<DetectionWindow> {
    let evaluator = CascadeEvaluator::new(cascade, scale, normalization);
    let (x, y) = (window.x as usize, window.y as usize);
    if (window.width as usize, window.height as usize) != evaluator.window_size()
        || !evaluator.fits(integral, x, y)
    {
        return None;
    }
    evaluator.classify(integral, x, y)
}
