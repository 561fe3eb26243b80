//! Index-selection resampling of feature sequences
//!
//! Frames are picked at evenly spaced positions over `[0, n - 1]`, rounded to the
//! nearest index. Values are never interpolated.

use ndarray::{Array2, Axis};

use super::features::FeatureSequence;

/// Evenly spaced frame indices for resampling `len` frames to `target`
pub fn resample_indices(len: usize, target: usize) -> Vec<usize> {
    if len == 0 || target == 0 {
        return Vec::new();
    }
    if target == 1 {
        return vec![0];
    }

    let last = (len - 1) as f64;
    let steps = (target - 1) as f64;
    (0..target)
        .map(|i| ((i as f64 * last / steps).round() as usize).min(len - 1))
        .collect()
}

/// Downsample to at most `target` frames; shorter sequences are returned unchanged
pub fn downsample_sequence(sequence: &FeatureSequence, target: usize) -> FeatureSequence {
    if sequence.nrows() <= target {
        return sequence.clone();
    }
    gather(sequence, &resample_indices(sequence.nrows(), target))
}

/// Resample to exactly `target` frames, repeating frames when lengthening
pub fn resample_to_length(sequence: &FeatureSequence, target: usize) -> FeatureSequence {
    if sequence.nrows() == target {
        return sequence.clone();
    }
    gather(sequence, &resample_indices(sequence.nrows(), target))
}

fn gather(sequence: &FeatureSequence, indices: &[usize]) -> FeatureSequence {
    if indices.is_empty() {
        return Array2::zeros((0, sequence.ncols()));
    }
    sequence.select(Axis(0), indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(frames: usize, width: usize) -> FeatureSequence {
        Array2::from_shape_fn((frames, width), |(i, j)| (i * 10 + j) as f32)
    }

    #[test]
    fn test_indices_cover_endpoints() {
        let indices = resample_indices(100, 20);
        assert_eq!(indices.len(), 20);
        assert_eq!(indices[0], 0);
        assert_eq!(indices[19], 99);
        assert!(indices.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_indices_round_to_nearest() {
        // 0, 1.5, 3, 4.5, 6 -> 0, 2, 3, 5, 6
        assert_eq!(resample_indices(7, 5), vec![0, 2, 3, 5, 6]);
        assert_eq!(resample_indices(5, 1), vec![0]);
        assert!(resample_indices(0, 4).is_empty());
    }

    #[test]
    fn test_downsample_short_sequence_unchanged() {
        let seq = ramp(12, 4);
        assert_eq!(downsample_sequence(&seq, 20), seq);
        assert_eq!(downsample_sequence(&seq, 12), seq);
    }

    #[test]
    fn test_downsample_gathers_rows() {
        let seq = ramp(7, 2);
        let down = downsample_sequence(&seq, 5);
        assert_eq!(down.nrows(), 5);
        assert_eq!(down.row(1), seq.row(2));
        assert_eq!(down.row(4), seq.row(6));
    }

    #[test]
    fn test_resample_lengthens_by_repetition() {
        let seq = ramp(3, 2);
        let up = resample_to_length(&seq, 5);
        assert_eq!(up.nrows(), 5);
        // positions 0, 0.5, 1, 1.5, 2 -> rows 0, 1, 1, 2, 2
        assert_eq!(up.row(1), seq.row(1));
        assert_eq!(up.row(3), seq.row(2));
    }

    #[test]
    fn test_resample_empty() {
        let seq = ramp(0, 3);
        assert_eq!(resample_to_length(&seq, 4).dim(), (0, 3));
        assert_eq!(resample_to_length(&ramp(4, 3), 0).dim(), (0, 3));
    }
}
