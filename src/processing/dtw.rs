//! Dynamic Time Warping distances between feature sequences
//!
//! Both variants use the standard recurrence
//!
//! ```text
//! D[i][j] = |a[i-1] - b[j-1]| + min(D[i-1][j], D[i][j-1], D[i-1][j-1])
//! ```
//!
//! with `D[0][0] = 0` and every other border cell infinite, and report
//! `D[n][m] / (n + m)`. Only two rows of the table are kept in memory.
//!
//! The banded form restricts row `i` to columns `[max(1, i - w), min(m, i + w)]`.
//! The half-width `w` is always at least `|n - m| + 1`, otherwise `D[n][m]` would be
//! unreachable.

use crate::config::constants::dtw::DEFAULT_BAND_DIVISOR;
use ndarray::ArrayView1;

use super::features::FeatureSequence;

/// Sakoe-Chiba half-width for sequences of length `n` and `m`
pub fn sakoe_chiba_window(n: usize, m: usize, requested: Option<usize>, divisor: usize) -> usize {
    let base = requested.unwrap_or_else(|| n.max(m) / divisor.max(1) + 1);
    base.max(n.abs_diff(m) + 1)
}

/// Full DTW distance, O(n * m)
pub fn dtw_distance(a: &FeatureSequence, b: &FeatureSequence) -> f64 {
    let window = a.nrows().max(b.nrows());
    dtw_banded(a, b, window)
}

/// Banded DTW distance, O(n * w)
///
/// `window` overrides the default half-width of `max(n, m) / 4 + 1`; it is widened
/// to `|n - m| + 1` when narrower.
pub fn dtw_distance_fast(a: &FeatureSequence, b: &FeatureSequence, window: Option<usize>) -> f64 {
    let window = sakoe_chiba_window(a.nrows(), b.nrows(), window, DEFAULT_BAND_DIVISOR);
    dtw_banded(a, b, window)
}

/// DTW distance engine with a configured band divisor
#[derive(Debug, Clone, Copy)]
pub struct DtwEngine {
    band_divisor: usize,
}

impl Default for DtwEngine {
    fn default() -> Self {
        Self::new(DEFAULT_BAND_DIVISOR)
    }
}

impl DtwEngine {
    pub fn new(band_divisor: usize) -> Self {
        Self {
            band_divisor: band_divisor.max(1),
        }
    }

    pub fn band_divisor(&self) -> usize {
        self.band_divisor
    }

    /// Banded distance using this engine's default window
    pub fn distance(&self, a: &FeatureSequence, b: &FeatureSequence) -> f64 {
        let window = sakoe_chiba_window(a.nrows(), b.nrows(), None, self.band_divisor);
        dtw_banded(a, b, window)
    }
}

fn dtw_banded(a: &FeatureSequence, b: &FeatureSequence, window: usize) -> f64 {
    let n = a.nrows();
    let m = b.nrows();

    if n == 0 && m == 0 {
        return 0.0;
    }
    if n == 0 || m == 0 {
        return f64::INFINITY;
    }

    let mut prev = vec![f64::INFINITY; m + 1];
    let mut curr = vec![f64::INFINITY; m + 1];
    prev[0] = 0.0;

    // Inclusive column span written into each buffer
    let mut prev_span = (0, 0);
    let mut curr_span = (0, 0);

    for i in 1..=n {
        // curr still holds row i - 2
        for cell in &mut curr[curr_span.0..=curr_span.1] {
            *cell = f64::INFINITY;
        }

        let lo = i.saturating_sub(window).max(1);
        let hi = i.saturating_add(window).min(m);
        let row_a = a.row(i - 1);

        for j in lo..=hi {
            let cost = frame_distance(row_a, b.row(j - 1));
            let best = prev[j].min(curr[j - 1]).min(prev[j - 1]);
            curr[j] = cost + best;
        }

        curr_span = (lo, hi);
        std::mem::swap(&mut prev, &mut curr);
        std::mem::swap(&mut prev_span, &mut curr_span);
    }

    prev[m] / (n + m) as f64
}

/// Euclidean distance between two frames
#[inline]
pub fn frame_distance(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = (*x - *y) as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}
