//! Summed-area tables for O(1) rectangle sums and window variance.
//!
//! Both tables are `(w + 1) × (h + 1)`, row-major, with row 0 and column 0
//! fixed at zero. Entry `(x, y)` of the padded table holds the sum of all
//! pixels with coordinates `< (x, y)`, so any rectangle costs exactly four
//! lookups and needs no border branches.
//!
//! Construction runs as two prefix-sum passes: a row pass (each row
//! independent) followed by a column pass (each column independent). With
//! the `parallel` feature the row pass is split by row ranges and the column
//! pass by column ranges; the second pass only starts once the first has
//! fully joined.

mod build;

use crate::error::InputError;
use crate::image::ImageView;

/// Padded prefix sums of intensities and squared intensities.
#[derive(Clone, Debug, Default)]
pub struct IntegralImage {
    width: usize,
    height: usize,
    sum: Vec<u64>,
    sq_sum: Vec<u64>,
}

/// Mean and variance of the pixels inside a window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    pub variance: f64,
}

impl WindowStats {
    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

impl IntegralImage {
    /// Build the tables for `image`. Fails only on a zero-sized image.
    pub fn build<I>(image: &I) -> Result<Self, InputError>
    where
        I: ImageView<Pixel = u8> + Sync,
    {
        let mut integral = Self::default();
        integral.build_into(image)?;
        Ok(integral)
    }

    /// Rebuild in place, reusing the existing allocations.
    pub fn build_into<I>(&mut self, image: &I) -> Result<(), InputError>
    where
        I: ImageView<Pixel = u8> + Sync,
    {
        let (w, h) = (image.width(), image.height());
        if w == 0 || h == 0 {
            return Err(InputError::ZeroDimensions {
                width: w,
                height: h,
            });
        }
        let len = (w + 1) * (h + 1);
        self.width = w;
        self.height = h;
        self.sum.clear();
        self.sum.resize(len, 0);
        self.sq_sum.clear();
        self.sq_sum.resize(len, 0);
        build::prefix_sums(image, &mut self.sum, &mut self.sq_sum);
        Ok(())
    }

    /// Width of the source image in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the source image in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Distance between rows of the padded tables (`width + 1`).
    #[inline]
    pub fn stride(&self) -> usize {
        self.width + 1
    }

    /// Padded-table entry: sum over `[0, x) × [0, y)`. `x ≤ width`, `y ≤ height`.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> u64 {
        self.sum[y * self.stride() + x]
    }

    /// Inclusive lookup in pixel coordinates: sum of every pixel `(i, j)`
    /// with `i ≤ x` and `j ≤ y`.
    #[inline]
    pub fn value_at(&self, x: usize, y: usize) -> u64 {
        self.at(x + 1, y + 1)
    }

    /// Sum of the `w × h` rectangle whose top-left pixel is `(x, y)`.
    #[inline]
    pub fn rect_sum(&self, x: usize, y: usize, w: usize, h: usize) -> u64 {
        table_rect(&self.sum, self.stride(), x, y, w, h)
    }

    /// Sum of squared intensities over the same rectangle as [`Self::rect_sum`].
    #[inline]
    pub fn rect_sq_sum(&self, x: usize, y: usize, w: usize, h: usize) -> u64 {
        table_rect(&self.sq_sum, self.stride(), x, y, w, h)
    }

    /// Mean and variance inside a `w × h` window at `(x, y)`.
    ///
    /// The variance is clamped at zero to absorb rounding.
    pub fn window_stats(&self, x: usize, y: usize, w: usize, h: usize) -> WindowStats {
        let n = (w * h) as f64;
        if n == 0.0 {
            return WindowStats {
                mean: 0.0,
                variance: 0.0,
            };
        }
        let mean = self.rect_sum(x, y, w, h) as f64 / n;
        let mean_sq = self.rect_sq_sum(x, y, w, h) as f64 / n;
        WindowStats {
            mean,
            variance: (mean_sq - mean * mean).max(0.0),
        }
    }
}

#[inline]
fn table_rect(table: &[u64], stride: usize, x: usize, y: usize, w: usize, h: usize) -> u64 {
    let top = y * stride;
    let bottom = (y + h) * stride;
    // a + d >= b + c for non-negative inputs, so this order never underflows.
    (table[bottom + x + w] + table[top + x]) - table[bottom + x] - table[top + x + w]
}
