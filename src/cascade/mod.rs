//! Haar cascade model and window classification.
//!
//! - [`model`]: immutable cascade value types and validation.
//! - [`loader`]: JSON persistence.
//! - [`feature`]: rectangle scaling, raw feature sums and per-window
//!   variance normalization.
//! - [`evaluator`]: staged early-exit evaluation of a single window.

pub mod evaluator;
pub mod feature;
pub mod loader;
pub mod model;

pub use evaluator::{classify, CascadeEvaluator, CascadeState, WindowVerdict};
pub use feature::{evaluate_feature, Normalization, NormalizationParams, ScaledFeature, WindowNorm};
pub use loader::load_cascade;
pub use model::{
    CascadeModel, HaarFeature, Rect, Stage, StageDecision, WeakClassifier, WeightedRect,
};
