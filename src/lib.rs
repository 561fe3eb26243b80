//! Gesture-Core: DTW + k-NN recognition of multi-frame hand-landmark gestures
//!
//! The crate turns per-frame hand landmarks into position and scale invariant
//! feature sequences, compares whole sequences with Dynamic Time Warping and
//! classifies a query by k-nearest-neighbour voting against stored templates or
//! per-class centroids. It features:
//!
//! - Landmark normalization and 126-wide frame features
//! - Full and Sakoe-Chiba banded DTW
//! - Template and centroid k-NN with calibrated per-class probabilities
//! - Checksummed, atomically written model artifacts
//! - Corpus training with leave-one-out accuracy, batch and streaming inference
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gesture_core::config::ConfigLoader;
//! use gesture_core::inference::classify_with_model;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new().load_system_config()?;
//!     let record = classify_with_model(
//!         &config.paths.model_path(),
//!         std::path::Path::new("sequence.json"),
//!     )?;
//!     println!("{} ({:.2})", record.result.predicted_class, record.result.confidence);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod error;
pub mod landmarks;
pub mod processing;
pub mod classifier;
pub mod storage;
pub mod training;
pub mod inference;
pub mod utils;

// Re-export commonly used types for convenience
pub use classifier::{ClassificationResult, DtwClassifier, RepairOutcome};
pub use config::{ClassifierConfig, ConfigLoader, SystemConfig};
pub use error::{GestureError, GestureResult};
pub use landmarks::{FrameRecord, HandData, HandPose, SequenceRecord};
pub use processing::FeatureSequence;
pub use storage::{LoadedModel, ModelInfo, ModelStore};
pub use training::{train, TrainingSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "DTW + k-NN hand-landmark gesture recognition core".to_string(),
        features: vec![
            "Landmark normalization".to_string(),
            "Banded dynamic time warping".to_string(),
            "Centroid k-NN classification".to_string(),
            "Checksummed model artifacts".to_string(),
            "Streaming JSON inference".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}
