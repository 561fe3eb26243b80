//! DTW + k-NN classification
//!
//! ```rust
//! use gesture_core::classifier::DtwClassifier;
//! use gesture_core::config::ClassifierConfig;
//!
//! let classifier = DtwClassifier::new(&ClassifierConfig::default());
//! let result = classifier.classify(&gesture_core::processing::empty_sequence());
//! assert!(result.is_unknown());
//! ```

pub mod registry;
pub mod result;
pub mod knn;

pub use registry::ClassRegistry;
pub use result::{ClassProbabilities, ClassificationResult};
pub use knn::{DtwClassifier, RepairOutcome, Template};
