// src/landmarks/normalize.rs
//! Position and scale normalization of hand poses
//!
//! The wrist is moved to the origin and the pose is divided by the palm size
//! (wrist to middle-finger MCP). Distances computed on the result do not depend on
//! where the hand sits in the camera frame or on how large the signer's hand is.

use crate::config::constants::landmarks::{LANDMARKS_PER_HAND, MIDDLE_MCP, PALM_SIZE_EPSILON, WRIST};
use crate::landmarks::types::{HandData, HandPose, Landmark, PoseArray};

/// Pose with every coordinate zero, used for absent hands
pub const ZERO_POSE: PoseArray = [[0.0; 3]; LANDMARKS_PER_HAND];

/// Normalize a complete hand pose
pub fn normalize_pose(pose: &HandPose) -> PoseArray {
    let wrist = pose.landmarks[WRIST];
    let mut normalized = pose.landmarks;

    for lm in normalized.iter_mut() {
        lm[0] -= wrist[0];
        lm[1] -= wrist[1];
        lm[2] -= wrist[2];
    }

    let palm_size = norm(&normalized[MIDDLE_MCP]);

    // Degenerate palms stay unscaled
    if palm_size > PALM_SIZE_EPSILON {
        for lm in normalized.iter_mut() {
            lm[0] /= palm_size;
            lm[1] /= palm_size;
            lm[2] /= palm_size;
        }
    }

    normalized
}

/// Normalize a raw landmark list; fewer than 21 landmarks yields the zero pose
pub fn normalize_landmarks(landmarks: &[Landmark]) -> PoseArray {
    HandPose::from_landmarks(landmarks).map_or(ZERO_POSE, |pose| normalize_pose(&pose))
}

/// Normalize an optional hand
pub fn normalize_hand(hand: &HandData) -> PoseArray {
    match hand {
        HandData::Present(pose) => normalize_pose(pose),
        HandData::Absent => ZERO_POSE,
    }
}

/// Palm size of a raw pose
pub fn palm_size(pose: &HandPose) -> f32 {
    let wrist = pose.landmarks[WRIST];
    let mcp = pose.landmarks[MIDDLE_MCP];
    norm(&[mcp[0] - wrist[0], mcp[1] - wrist[1], mcp[2] - wrist[2]])
}

#[inline]
fn norm(v: &Landmark) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}
