// src/landmarks/mod.rs
//! Hand landmark records and their normalization

pub mod types;
pub mod normalize;

pub use types::*;
pub use normalize::{normalize_hand, normalize_landmarks, normalize_pose, palm_size, ZERO_POSE};
