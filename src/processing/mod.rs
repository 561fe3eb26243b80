//! Sequence processing: feature extraction, resampling, centroids and DTW

pub mod features;
pub mod resample;
pub mod centroid;
pub mod dtw;

pub use features::{empty_sequence, extract_frame_features, sequence_to_features, FeatureSequence};
pub use resample::{downsample_sequence, resample_indices, resample_to_length};
pub use centroid::{build_centroid, median_length};
pub use dtw::{dtw_distance, dtw_distance_fast, sakoe_chiba_window, DtwEngine};
