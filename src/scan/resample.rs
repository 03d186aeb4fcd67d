//! Area-averaging downsampling for the resample scale mode.
//!
//! Each destination pixel covers a block of source pixels whose bounds come
//! from integer division, and its value is the rounded block mean read from
//! the full-resolution integral image. Averaging over the whole footprint
//! avoids the aliasing plain decimation would introduce at large factors.

use crate::image::{GrayImageU8, ImageViewMut};
use crate::integral::IntegralImage;

/// Downsample the image behind `integral` to `dst_w × dst_h`.
///
/// Both target dimensions must be in `1..=` the source dimension.
pub fn downsample_area(integral: &IntegralImage, dst_w: usize, dst_h: usize) -> GrayImageU8 {
    let (src_w, src_h) = (integral.width(), integral.height());
    debug_assert!(dst_w >= 1 && dst_w <= src_w);
    debug_assert!(dst_h >= 1 && dst_h <= src_h);

    let xs: Vec<(usize, usize)> = (0..dst_w).map(|x| block(x, src_w, dst_w)).collect();
    let mut out = GrayImageU8::zeroed(dst_w, dst_h);
    for y in 0..dst_h {
        let (y0, bh) = block(y, src_h, dst_h);
        let row = out.row_mut(y);
        for (px, &(x0, bw)) in row.iter_mut().zip(&xs) {
            let n = (bw * bh) as u64;
            let sum = integral.rect_sum(x0, y0, bw, bh);
            *px = ((sum + n / 2) / n) as u8;
        }
    }
    out
}

/// Start and length of the source block for destination index `i`.
#[inline]
fn block(i: usize, src: usize, dst: usize) -> (usize, usize) {
    let start = i * src / dst;
    let end = ((i + 1) * src / dst).max(start + 1);
    (start, end - start)
}
