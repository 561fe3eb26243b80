//! One-shot classification of a single sequence

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::{ClassificationResult, DtwClassifier};
use crate::error::{GestureError, GestureErrorBuilder, GestureResult};
use crate::landmarks::FrameRecord;
use crate::processing::sequence_to_features;
use crate::storage::ModelStore;
use crate::training::load_sequence_file;

/// Result line written for every classified sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    #[serde(flatten)]
    pub result: ClassificationResult,
    pub frame_count: usize,
}

/// Failure line; the stream keeps going after one of these
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error: String,
}

impl ErrorRecord {
    pub fn new(error: impl ToString) -> Self {
        Self { error: error.to_string() }
    }

    /// Report a failed model load; only an absent file reads as "Model not found"
    pub fn model_load(path: &Path, error: &GestureError) -> Self {
        if path.exists() {
            Self::new(error)
        } else {
            Self::new("Model not found")
        }
    }
}

/// Classify raw frames; an empty request is rejected
pub fn classify_frames(classifier: &DtwClassifier, frames: &[FrameRecord]) -> GestureResult<ClassificationRecord> {
    if frames.is_empty() {
        return Err(GestureErrorBuilder::new("inference", "classify_frames").invalid_data("request", "no frames to classify"));
    }

    let features = sequence_to_features(frames);
    let result = classifier.classify(&features);
    debug!(frames = frames.len(), predicted = %result.predicted_class, confidence = result.confidence, "classified");

    Ok(ClassificationRecord {
        result,
        frame_count: frames.len(),
    })
}

/// Classify the sequence stored in `path`
pub fn classify_file(classifier: &DtwClassifier, path: &Path) -> GestureResult<ClassificationRecord> {
    let record = load_sequence_file(path)?;
    classify_frames(classifier, &record.frames)
}

/// Load the model, then classify one sequence file
pub fn classify_with_model(model_path: &Path, sequence_path: &Path) -> GestureResult<ClassificationRecord> {
    let model = ModelStore::load(model_path)?;
    classify_file(&model.classifier, sequence_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use crate::landmarks::{FrameRecord, HandPose};
    use crate::processing::sequence_to_features;

    fn pose(offset: f32) -> HandPose {
        let landmarks: Vec<[f32; 3]> = (0..21).map(|i| [i as f32 * 0.1 + offset, i as f32 * 0.05, 0.0]).collect();
        HandPose::from_landmarks(&landmarks).unwrap()
    }

    #[test]
    fn test_record_shape() {
        let frames: Vec<FrameRecord> = (0..8).map(|i| FrameRecord::right_only(pose(i as f32))).collect();
        let mut clf = DtwClassifier::new(&ClassifierConfig::default());
        clf.add_template("wave", &sequence_to_features(&frames)).unwrap();

        let record = classify_frames(&clf, &frames).unwrap();
        assert_eq!(record.frame_count, 8);
        assert_eq!(record.result.predicted_class, "wave");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["predicted_class"], "wave");
        assert_eq!(json["frame_count"], 8);
        assert!(json["all_probs"].is_object());
    }

    #[test]
    fn test_empty_request_rejected() {
        let clf = DtwClassifier::new(&ClassifierConfig::default());
        assert!(classify_frames(&clf, &[]).is_err());
        assert_eq!(
            serde_json::to_string(&ErrorRecord::new("Model not found")).unwrap(),
            r#"{"error":"Model not found"}"#
        );
    }
}
