//! Haar feature evaluation against an integral image.
//!
//! Rectangles are scaled by their edges, not by origin and size: both edges
//! go through the same monotonic rounding, so adjacent rectangles stay
//! adjacent and a template that fits the canonical window keeps fitting the
//! rounded scaled window.

use super::model::HaarFeature;
use crate::integral::IntegralImage;
use serde::{Deserialize, Serialize};

/// How raw feature sums are normalized per window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Divide by the window standard deviation (illumination invariance).
    #[default]
    Variance,
    /// Use sums as-is, only compensating for the window area.
    None,
}

/// Normalization settings shared by every window of a scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizationParams {
    pub mode: Normalization,
    /// Variances at or below this value skip the division.
    pub variance_epsilon: f64,
}

impl Default for NormalizationParams {
    fn default() -> Self {
        Self {
            mode: Normalization::Variance,
            variance_epsilon: 1e-6,
        }
    }
}

/// Divisor applied to every raw feature sum of one window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowNorm {
    pub divisor: f64,
    /// Variance was too small to divide by.
    pub degenerate: bool,
}

impl WindowNorm {
    /// Compute once per window. `area_ratio` is the scaled window area over
    /// the canonical window area.
    pub fn for_window(
        integral: &IntegralImage,
        x: usize,
        y: usize,
        w: usize,
        h: usize,
        area_ratio: f64,
        params: &NormalizationParams,
    ) -> Self {
        match params.mode {
            Normalization::None => Self {
                divisor: area_ratio,
                degenerate: false,
            },
            Normalization::Variance => {
                let stats = integral.window_stats(x, y, w, h);
                if stats.variance <= params.variance_epsilon {
                    Self {
                        divisor: area_ratio,
                        degenerate: true,
                    }
                } else {
                    Self {
                        divisor: area_ratio * stats.std_dev(),
                        degenerate: false,
                    }
                }
            }
        }
    }

    #[inline]
    pub fn apply(&self, raw: f64) -> f64 {
        raw / self.divisor
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ScaledRect {
    dx: usize,
    dy: usize,
    w: usize,
    h: usize,
    weight: f64,
}

/// A template with rectangles already scaled to one window size.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledFeature {
    rects: Vec<ScaledRect>,
}

/// Scale one rectangle edge coordinate.
#[inline]
pub(crate) fn scale_edge(v: u32, scale: f64) -> usize {
    (v as f64 * scale).round() as usize
}

impl ScaledFeature {
    pub fn new(feature: &HaarFeature, scale: f64) -> Self {
        let rects = feature
            .rects
            .iter()
            .map(|r| {
                let x0 = scale_edge(r.x, scale);
                let y0 = scale_edge(r.y, scale);
                let x1 = scale_edge(r.x + r.width, scale).max(x0 + 1);
                let y1 = scale_edge(r.y + r.height, scale).max(y0 + 1);
                ScaledRect {
                    dx: x0,
                    dy: y0,
                    w: x1 - x0,
                    h: y1 - y0,
                    weight: r.weight,
                }
            })
            .collect();
        Self { rects }
    }

    /// Right/bottom extent of the scaled template.
    pub fn extent(&self) -> (usize, usize) {
        self.rects.iter().fold((0, 0), |(w, h), r| {
            (w.max(r.dx + r.w), h.max(r.dy + r.h))
        })
    }

    /// Weighted rectangle sum with the window's top-left at `(x, y)`.
    /// Four table lookups per rectangle.
    #[inline]
    pub fn evaluate(&self, integral: &IntegralImage, x: usize, y: usize) -> f64 {
        self.rects
            .iter()
            .map(|r| r.weight * integral.rect_sum(x + r.dx, y + r.dy, r.w, r.h) as f64)
            .sum()
    }
}

/// Raw (unnormalized) value of `feature` scaled by `scale` and placed at
/// `origin`.
pub fn evaluate_feature(
    integral: &IntegralImage,
    origin: (usize, usize),
    scale: f64,
    feature: &HaarFeature,
) -> f64 {
    ScaledFeature::new(feature, scale).evaluate(integral, origin.0, origin.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::model::WeightedRect;
    use crate::image::GrayImageU8;

    /// Left half dark (10), right half bright (200).
    fn split_image(w: usize, h: usize) -> GrayImageU8 {
        let mut img = GrayImageU8::zeroed(w, h);
        for y in 0..h {
            for x in 0..w {
                img.set(x, y, if x < w / 2 { 10 } else { 200 });
            }
        }
        img
    }

    fn edge_feature() -> HaarFeature {
        HaarFeature::new(vec![
            WeightedRect::new(0, 0, 2, 4, -1.0),
            WeightedRect::new(2, 0, 2, 4, 1.0),
        ])
    }

    #[test]
    fn raw_value_at_unit_scale() {
        let ii = IntegralImage::build(&split_image(8, 4)).unwrap();
        // Window at x=2 covers columns 2..6: two dark, two bright.
        let v = evaluate_feature(&ii, (2, 0), 1.0, &edge_feature());
        assert_eq!(v, (200.0 - 10.0) * 8.0);
    }

    #[test]
    fn scaling_keeps_rects_adjacent() {
        let scaled = ScaledFeature::new(&edge_feature(), 1.5);
        assert_eq!(scaled.rects[0].dx + scaled.rects[0].w, scaled.rects[1].dx);
        assert_eq!(scaled.extent(), (6, 6));

        let ii = IntegralImage::build(&split_image(12, 6)).unwrap();
        let v = evaluate_feature(&ii, (3, 0), 1.5, &edge_feature());
        assert_eq!(v, (200.0 - 10.0) * 18.0);
    }

    #[test]
    fn flat_window_is_degenerate() {
        let ii = IntegralImage::build(&GrayImageU8::filled(6, 6, 77)).unwrap();
        let norm = WindowNorm::for_window(&ii, 0, 0, 6, 6, 1.0, &NormalizationParams::default());
        assert!(norm.degenerate);
        assert_eq!(norm.apply(12.5), 12.5);
    }

    #[test]
    fn variance_normalization_divides_by_std_dev() {
        let ii = IntegralImage::build(&split_image(8, 4)).unwrap();
        let norm = WindowNorm::for_window(&ii, 0, 0, 8, 4, 2.0, &NormalizationParams::default());
        // Two equal populations at 10 and 200: std dev is half the gap.
        assert!(!norm.degenerate);
        assert!((norm.divisor - 2.0 * 95.0).abs() < 1e-9);

        let none = NormalizationParams {
            mode: Normalization::None,
            ..Default::default()
        };
        let norm = WindowNorm::for_window(&ii, 0, 0, 8, 4, 2.0, &none);
        assert_eq!(norm.apply(10.0), 5.0);
    }
}
