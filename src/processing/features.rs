//! Frame feature extraction
//!
//! Each frame becomes a 126-wide row: normalized left hand (63) followed by
//! normalized right hand (63). Absent hands contribute zeros, so one- and
//! two-handed gestures share the same feature space.

use crate::config::constants::landmarks::{FEATURES_PER_HAND, FRAME_FEATURES};
use crate::landmarks::{normalize_hand, FrameRecord, PoseArray};
use ndarray::{Array2, ArrayViewMut1};

/// Feature sequence: one row per frame, [`FRAME_FEATURES`] columns
pub type FeatureSequence = Array2<f32>;

/// Empty sequence with the standard width
pub fn empty_sequence() -> FeatureSequence {
    Array2::zeros((0, FRAME_FEATURES))
}

/// Features of a single frame
pub fn extract_frame_features(frame: &FrameRecord) -> [f32; FRAME_FEATURES] {
    let mut features = [0.0f32; FRAME_FEATURES];
    write_pose(&mut features[..FEATURES_PER_HAND], &normalize_hand(&frame.left_hand));
    write_pose(&mut features[FEATURES_PER_HAND..], &normalize_hand(&frame.right_hand));
    features
}

/// Convert a list of frames to a feature matrix (frames x 126)
pub fn sequence_to_features(frames: &[FrameRecord]) -> FeatureSequence {
    let mut sequence = Array2::zeros((frames.len(), FRAME_FEATURES));

    for (frame, row) in frames.iter().zip(sequence.rows_mut()) {
        fill_row(row, frame);
    }

    sequence
}

fn fill_row(mut row: ArrayViewMut1<f32>, frame: &FrameRecord) {
    let features = extract_frame_features(frame);
    for (dst, src) in row.iter_mut().zip(features.iter()) {
        *dst = *src;
    }
}

fn write_pose(dst: &mut [f32], pose: &PoseArray) {
    for (chunk, lm) in dst.chunks_exact_mut(3).zip(pose.iter()) {
        chunk.copy_from_slice(lm);
    }
}
