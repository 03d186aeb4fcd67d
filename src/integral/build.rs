use crate::image::ImageView;

/// Below this many pixels the threaded passes cost more than they save.
#[cfg(feature = "parallel")]
const PARALLEL_MIN_PIXELS: usize = 1 << 16;

/// Fill the padded tables (already zeroed, `(w+1) × (h+1)`).
pub(super) fn prefix_sums<I>(image: &I, sum: &mut [u64], sq_sum: &mut [u64])
where
    I: ImageView<Pixel = u8> + Sync,
{
    #[cfg(feature = "parallel")]
    if image.width() * image.height() >= PARALLEL_MIN_PIXELS {
        parallel::prefix_sums(image, sum, sq_sum);
        return;
    }
    sequential_prefix_sums(image, sum, sq_sum);
}

/// Single pass: running row accumulator plus the row above as carry.
fn sequential_prefix_sums<I>(image: &I, sum: &mut [u64], sq_sum: &mut [u64])
where
    I: ImageView<Pixel = u8>,
{
    let stride = image.width() + 1;
    for (y, px_row) in image.rows().enumerate() {
        let (above, below) = sum.split_at_mut((y + 1) * stride);
        let carry = &above[y * stride..];
        let out = &mut below[..stride];
        let (above_sq, below_sq) = sq_sum.split_at_mut((y + 1) * stride);
        let carry_sq = &above_sq[y * stride..];
        let out_sq = &mut below_sq[..stride];

        let mut run = 0u64;
        let mut run_sq = 0u64;
        for (x, &p) in px_row.iter().enumerate() {
            let v = p as u64;
            run += v;
            run_sq += v * v;
            out[x + 1] = carry[x + 1] + run;
            out_sq[x + 1] = carry_sq[x + 1] + run_sq;
        }
    }
}

/// Row-wise inclusive prefix of one source row into a padded table row.
#[cfg_attr(not(feature = "parallel"), allow(dead_code))]
fn row_prefix(px_row: &[u8], out: &mut [u64], out_sq: &mut [u64]) {
    let mut run = 0u64;
    let mut run_sq = 0u64;
    for (x, &p) in px_row.iter().enumerate() {
        let v = p as u64;
        run += v;
        run_sq += v * v;
        out[x + 1] = run;
        out_sq[x + 1] = run_sq;
    }
}

/// Add every row into the one below it, top to bottom.
#[cfg_attr(not(feature = "parallel"), allow(dead_code))]
fn accumulate_down(rows: &mut [&mut [u64]]) {
    for i in 1..rows.len() {
        let (done, rest) = rows.split_at_mut(i);
        let prev = &done[i - 1];
        for (cur, &p) in rest[0].iter_mut().zip(prev.iter()) {
            *cur += p;
        }
    }
}

#[cfg(feature = "parallel")]
mod parallel {
    use super::{accumulate_down, row_prefix};
    use crate::image::ImageView;
    use rayon::prelude::*;

    pub(super) fn prefix_sums<I>(image: &I, sum: &mut [u64], sq_sum: &mut [u64])
    where
        I: ImageView<Pixel = u8> + Sync,
    {
        let stride = image.width() + 1;

        // Row pass: rows are independent.
        sum[stride..]
            .par_chunks_mut(stride)
            .zip(sq_sum[stride..].par_chunks_mut(stride))
            .enumerate()
            .for_each(|(y, (out, out_sq))| row_prefix(image.row(y), out, out_sq));

        // Column pass: columns are independent, rows must be visited in order.
        let band = stride.div_ceil(rayon::current_num_threads()).max(64);
        rayon::join(
            || column_pass(sum, stride, band),
            || column_pass(sq_sum, stride, band),
        );
    }

    fn column_pass(table: &mut [u64], stride: usize, band: usize) {
        let rows = table.len() / stride;
        let mut bands: Vec<Vec<&mut [u64]>> = Vec::new();
        for row in table.chunks_mut(stride) {
            for (b, chunk) in row.chunks_mut(band).enumerate() {
                if bands.len() <= b {
                    bands.push(Vec::with_capacity(rows));
                }
                bands[b].push(chunk);
            }
        }
        bands
            .into_par_iter()
            .for_each(|mut column_band| accumulate_down(&mut column_band));
    }
}
