//! Scale-level planning.
//!
//! Level `k` uses window size `round(canonical × scale_factor^k)` in
//! original pixels. Levels whose window falls below `min_window_size` are
//! skipped; planning stops at the first level exceeding `max_window_size` or
//! the image. Rounding can repeat a window size for small scale factors;
//! repeats are dropped so no position is evaluated twice.

use super::options::{ScaleMode, ScanParams};
use crate::cascade::feature::scale_edge;
use crate::cascade::CascadeModel;
use serde::Serialize;

/// Geometry of one scale level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleLevel {
    /// Exponent `k` in `scale_factor^k`.
    pub index: usize,
    pub scale: f64,
    /// Window size in original image pixels.
    pub window_width: usize,
    pub window_height: usize,
    /// Size of the image the windows slide over (original size unless
    /// resampling).
    pub image_width: usize,
    pub image_height: usize,
    /// Window size and strides in `image_*` coordinates.
    pub scan_window_width: usize,
    pub scan_window_height: usize,
    pub stride_x: usize,
    pub stride_y: usize,
}

impl ScaleLevel {
    /// Top-left corners of all window positions along each axis.
    pub fn positions_x(&self) -> impl Iterator<Item = usize> {
        (0..=self.image_width - self.scan_window_width).step_by(self.stride_x)
    }

    pub fn positions_y(&self) -> impl Iterator<Item = usize> {
        (0..=self.image_height - self.scan_window_height).step_by(self.stride_y)
    }

    pub fn position_count(&self) -> usize {
        self.positions_x().count() * self.positions_y().count()
    }

    /// Factor mapping scan coordinates back to original coordinates.
    pub fn to_original(&self, full_width: usize, full_height: usize) -> (f64, f64) {
        (
            full_width as f64 / self.image_width as f64,
            full_height as f64 / self.image_height as f64,
        )
    }
}

/// Levels to scan plus the ones dropped on the way.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelPlan {
    pub levels: Vec<ScaleLevel>,
    /// Level indices below `min_window_size` or repeating a window size.
    pub skipped: usize,
}

fn stride(window: usize, step_fraction: f64) -> usize {
    ((window as f64 * step_fraction).round() as usize).max(1)
}

/// First index after `index` at which either rounded side can exceed
/// `size`. `round(c × f^k) > s` needs `c × f^k ≥ s + 0.5`.
fn next_growth(index: usize, size: (usize, usize), canonical: (u32, u32), ln_f: f64) -> usize {
    let first_above = |side: usize, c: u32| {
        let k = (((side as f64 + 0.5) / c as f64).ln() / ln_f).ceil();
        // Saturating float-to-int cast; NaN cannot occur for f > 1.
        k as usize
    };
    first_above(size.0, canonical.0)
        .min(first_above(size.1, canonical.1))
        .max(index.saturating_add(1))
}

pub fn plan_levels(
    cascade: &CascadeModel,
    width: usize,
    height: usize,
    params: &ScanParams,
) -> LevelPlan {
    let (w0, h0) = (cascade.window_width(), cascade.window_height());
    let max_window = params.effective_max_window(width, height);
    let ln_f = params.scale_factor.ln();
    let mut plan = LevelPlan::default();
    let mut previous: Option<(usize, usize)> = None;
    let mut index = 0usize;

    // Indices that only repeat a rounded size are jumped over, so the loop
    // runs once per distinct window size even for factors very close to 1.
    loop {
        let scale = params.scale_factor.powf(index as f64);
        let window_width = scale_edge(w0, scale);
        let window_height = scale_edge(h0, scale);
        if !scale.is_finite()
            || window_width > max_window
            || window_height > max_window
            || window_width > width
            || window_height > height
        {
            break;
        }
        let size = (window_width, window_height);
        let next = next_growth(index, size, (w0, h0), ln_f);
        if window_width < params.min_window_size
            || window_height < params.min_window_size
            || previous == Some(size)
        {
            plan.skipped = plan.skipped.saturating_add(next - index);
            index = next;
            continue;
        }
        previous = Some(size);
        plan.skipped = plan.skipped.saturating_add((next - index).saturating_sub(1));

        let level = match params.scale_mode {
            ScaleMode::ScaleFeatures => ScaleLevel {
                index,
                scale,
                window_width,
                window_height,
                image_width: width,
                image_height: height,
                scan_window_width: window_width,
                scan_window_height: window_height,
                stride_x: stride(window_width, params.step_fraction),
                stride_y: stride(window_height, params.step_fraction),
            },
            ScaleMode::ResampleImage => {
                let image_width = (width as f64 / scale).round() as usize;
                let image_height = (height as f64 / scale).round() as usize;
                let (cw, ch) = (w0 as usize, h0 as usize);
                if image_width < cw || image_height < ch {
                    break;
                }
                ScaleLevel {
                    index,
                    scale,
                    window_width,
                    window_height,
                    image_width,
                    image_height,
                    scan_window_width: cw,
                    scan_window_height: ch,
                    stride_x: stride(cw, params.step_fraction),
                    stride_y: stride(ch, params.step_fraction),
                }
            }
        };
        plan.levels.push(level);
        if next == usize::MAX {
            break;
        }
        index = next;
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::{HaarFeature, Stage, WeakClassifier, WeightedRect};

    fn cascade(w: u32, h: u32) -> CascadeModel {
        let clf = WeakClassifier {
            feature: HaarFeature::new(vec![WeightedRect::new(0, 0, w, h, 1.0)]),
            threshold: 0.0,
            polarity: 1,
            weight: 1.0,
        };
        CascadeModel::new(
            w,
            h,
            vec![Stage {
                classifiers: vec![clf],
                threshold: 0.5,
            }],
        )
        .unwrap()
    }

    #[test]
    fn geometric_window_sizes_up_to_smaller_side() {
        let params = ScanParams::default().with_scale_factor(2.0);
        let plan = plan_levels(&cascade(10, 10), 100, 45, &params);
        let sizes: Vec<usize> = plan.levels.iter().map(|l| l.window_width).collect();
        assert_eq!(sizes, vec![10, 20, 40]);
        assert_eq!(plan.levels[2].stride_x, 4);
        assert_eq!(plan.levels[0].stride_x, 1);
        assert_eq!(plan.skipped, 0);
    }

    #[test]
    fn min_window_skips_small_levels() {
        let params = ScanParams::default()
            .with_scale_factor(2.0)
            .with_window_bounds(15, None);
        let plan = plan_levels(&cascade(10, 10), 100, 100, &params);
        let sizes: Vec<usize> = plan.levels.iter().map(|l| l.window_width).collect();
        assert_eq!(sizes, vec![20, 40, 80]);
        assert_eq!(plan.skipped, 1);
    }

    #[test]
    fn image_smaller_than_min_window_has_no_levels() {
        let params = ScanParams::default().with_window_bounds(32, None);
        let plan = plan_levels(&cascade(8, 8), 20, 20, &params);
        assert!(plan.levels.is_empty());
    }

    #[test]
    fn repeated_rounded_sizes_are_dropped() {
        let params = ScanParams::default().with_scale_factor(1.01);
        let plan = plan_levels(&cascade(4, 4), 6, 6, &params);
        let sizes: Vec<usize> = plan.levels.iter().map(|l| l.window_width).collect();
        assert_eq!(sizes, vec![4, 5, 6]);
        assert!(plan.skipped > 0);
    }

    #[test]
    fn resample_levels_shrink_the_image() {
        let params = ScanParams::default()
            .with_scale_factor(2.0)
            .with_scale_mode(ScaleMode::ResampleImage);
        let plan = plan_levels(&cascade(10, 10), 80, 40, &params);
        assert_eq!(plan.levels.len(), 3);
        let l2 = plan.levels[2];
        assert_eq!((l2.image_width, l2.image_height), (20, 10));
        assert_eq!((l2.scan_window_width, l2.window_width), (10, 40));
        assert_eq!(l2.to_original(80, 40), (4.0, 4.0));
        assert_eq!(l2.position_count(), 11);
    }

    #[test]
    fn factor_barely_above_one_plans_each_size_once() {
        let params = ScanParams::default().with_scale_factor(1.0 + 1e-12);
        params.validate().unwrap();
        let plan = plan_levels(&cascade(24, 24), 64, 64, &params);
        let sizes: Vec<usize> = plan.levels.iter().map(|l| l.window_width).collect();
        assert_eq!(sizes, (24..=64).collect::<Vec<_>>());
        assert_eq!(plan.levels[0].index, 0);
        assert!(plan.levels.windows(2).all(|p| p[0].index < p[1].index));
        assert!(plan.skipped > 1_000_000);
    }
}
