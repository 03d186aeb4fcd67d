//! Immutable cascade data model.
//!
//! Plain nested value types: a cascade is a list of stages, a stage a list of
//! weak classifiers, a weak classifier a thresholded Haar feature. The only
//! way to obtain a [`CascadeModel`] is through [`CascadeModel::new`] (or the
//! JSON loader built on it), so every instance in circulation has passed
//! validation.

use crate::error::ConfigError;
use log::warn;
use serde::{Deserialize, Serialize};

/// Axis-aligned integer rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    #[inline]
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    #[inline]
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Rectangle of a Haar template with its signed weight, relative to the
/// canonical window origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub weight: f64,
}

impl WeightedRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32, weight: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            weight,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Ordered, non-empty set of weighted rectangles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HaarFeature {
    pub rects: Vec<WeightedRect>,
}

impl HaarFeature {
    pub fn new(rects: Vec<WeightedRect>) -> Self {
        Self { rects }
    }
}

/// Thresholded feature casting a weighted vote.
///
/// The classifier votes for the object class when
/// `polarity * value < polarity * threshold`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeakClassifier {
    pub feature: HaarFeature,
    pub threshold: f64,
    pub polarity: i8,
    pub weight: f64,
}

impl WeakClassifier {
    /// Vote contributed for a feature value: `weight` or zero.
    #[inline]
    pub fn vote(&self, value: f64) -> f64 {
        weak_vote(value, self.threshold, self.polarity as f64, self.weight)
    }
}

#[inline]
pub(crate) fn weak_vote(value: f64, threshold: f64, polarity: f64, weight: f64) -> f64 {
    if polarity * value < polarity * threshold {
        weight
    } else {
        0.0
    }
}

/// One boosted stage: the window passes when the summed votes reach
/// `threshold`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub classifiers: Vec<WeakClassifier>,
    pub threshold: f64,
}

/// Outcome of a single stage on one window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageDecision {
    pub accepted: bool,
    /// Aggregate vote, reported even on rejection.
    pub score: f64,
}

impl Stage {
    /// Vote over precomputed (already normalized) feature values, one per
    /// classifier in order.
    pub fn evaluate_values(&self, values: &[f64]) -> StageDecision {
        debug_assert_eq!(values.len(), self.classifiers.len());
        let score: f64 = self
            .classifiers
            .iter()
            .zip(values)
            .map(|(c, &v)| c.vote(v))
            .sum();
        StageDecision {
            accepted: score >= self.threshold,
            score,
        }
    }

    /// Number of rectangle lookups the stage costs per window.
    pub fn complexity(&self) -> usize {
        self.classifiers.iter().map(|c| c.feature.rects.len()).sum()
    }
}

/// Validated cascade with its canonical window size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "super::loader::CascadeFile")]
pub struct CascadeModel {
    window_width: u32,
    window_height: u32,
    stages: Vec<Stage>,
}

impl CascadeModel {
    /// Validate and assemble a cascade.
    pub fn new(window_width: u32, window_height: u32, stages: Vec<Stage>) -> Result<Self, ConfigError> {
        let model = Self {
            window_width,
            window_height,
            stages,
        };
        model.validate()?;
        model.check_complexity_order();
        Ok(model)
    }

    #[inline]
    pub fn window_width(&self) -> u32 {
        self.window_width
    }

    #[inline]
    pub fn window_height(&self) -> u32 {
        self.window_height
    }

    #[inline]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let (ww, wh) = (self.window_width, self.window_height);
        if ww == 0 || wh == 0 {
            return Err(ConfigError::InvalidWindowSize {
                width: ww,
                height: wh,
            });
        }
        if self.stages.is_empty() {
            return Err(ConfigError::EmptyCascade);
        }
        for (si, stage) in self.stages.iter().enumerate() {
            if stage.classifiers.is_empty() {
                return Err(ConfigError::EmptyStage { stage: si });
            }
            finite(stage.threshold, || format!("stage {si} threshold"))?;
            for (ci, clf) in stage.classifiers.iter().enumerate() {
                if clf.polarity != 1 && clf.polarity != -1 {
                    return Err(ConfigError::InvalidPolarity {
                        stage: si,
                        classifier: ci,
                        polarity: clf.polarity,
                    });
                }
                finite(clf.threshold, || format!("stage {si}, classifier {ci} threshold"))?;
                finite(clf.weight, || format!("stage {si}, classifier {ci} weight"))?;
                if clf.feature.rects.is_empty() {
                    return Err(ConfigError::EmptyFeature {
                        stage: si,
                        classifier: ci,
                    });
                }
                for (ri, r) in clf.feature.rects.iter().enumerate() {
                    finite(r.weight, || {
                        format!("stage {si}, classifier {ci}, rect {ri} weight")
                    })?;
                    let rect = r.rect();
                    if rect.area() == 0 {
                        return Err(ConfigError::EmptyRect {
                            stage: si,
                            classifier: ci,
                            rect: ri,
                        });
                    }
                    if rect.right() > ww as u64 || rect.bottom() > wh as u64 {
                        return Err(ConfigError::RectOutOfWindow {
                            stage: si,
                            classifier: ci,
                            rect: ri,
                            x: r.x,
                            y: r.y,
                            width: r.width,
                            height: r.height,
                            window_width: ww,
                            window_height: wh,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Cheap stages are expected first; a decrease is legal but usually a
    /// packaging mistake.
    fn check_complexity_order(&self) {
        for (i, pair) in self.stages.windows(2).enumerate() {
            let (a, b) = (pair[0].complexity(), pair[1].complexity());
            if b < a {
                warn!(
                    "cascade stage {} is cheaper than stage {} ({} < {} rect lookups)",
                    i + 1,
                    i,
                    b,
                    a
                );
            }
        }
    }
}

fn finite(value: f64, what: impl FnOnce() -> String) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite {
            what: what(),
            value,
        })
    }
}
