//! Human-readable model metadata written next to the artifact

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::classifier::DtwClassifier;
use crate::config::constants::classifier::MODEL_TYPE;
use crate::error::{GestureError, GestureResult};
use crate::error_context;
use crate::storage::store::write_atomic;

/// Contents of `model_info.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub trained_at: String,
    pub classes: Vec<String>,
    pub trained_classes: Vec<String>,
    pub class_sample_counts: BTreeMap<String, usize>,
    pub num_classes: usize,
    pub total_samples: usize,
    pub final_accuracy: f64,
    pub model_type: String,
    pub k: usize,
    #[serde(default)]
    pub use_centroids: bool,
    #[serde(default)]
    pub downsample_length: usize,
}

impl ModelInfo {
    pub fn new(
        classifier: &DtwClassifier,
        class_sample_counts: BTreeMap<String, usize>,
        total_samples: usize,
        final_accuracy: f64,
    ) -> Self {
        let classes = classifier.class_names().to_vec();
        Self {
            trained_at: Local::now().to_rfc3339(),
            trained_classes: classes.clone(),
            num_classes: classes.len(),
            classes,
            class_sample_counts,
            total_samples,
            final_accuracy,
            model_type: MODEL_TYPE.to_string(),
            k: classifier.k(),
            use_centroids: classifier.use_centroids(),
            downsample_length: classifier.downsample_length(),
        }
    }

    pub fn save(&self, path: &Path) -> GestureResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(path, json.as_bytes())
    }

    pub fn load(path: &Path) -> GestureResult<Self> {
        let text = read_info(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Raw metadata text, as the `info` command prints it
pub fn read_info(path: &Path) -> GestureResult<String> {
    fs::read_to_string(path).map_err(|e| GestureError::io(path, e, error_context!("metadata", "read_info")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constants::landmarks::FRAME_FEATURES;
    use crate::config::ClassifierConfig;
    use ndarray::Array2;
    use tempfile::TempDir;

    #[test]
    fn test_info_written_and_read_back() {
        let mut clf = DtwClassifier::new(&ClassifierConfig::default());
        clf.add_template("wave", &Array2::zeros((5, FRAME_FEATURES))).unwrap();

        let counts = BTreeMap::from([("wave".to_string(), 1)]);
        let info = ModelInfo::new(&clf, counts, 1, 1.0);
        assert_eq!(info.model_type, "DTW_KNN");
        assert!(chrono::DateTime::parse_from_rfc3339(&info.trained_at).is_ok());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model_info.json");
        info.save(&path).unwrap();

        let loaded = ModelInfo::load(&path).unwrap();
        assert_eq!(loaded, info);
        assert!(read_info(&path).unwrap().contains("\"num_classes\": 1"));
    }

    #[test]
    fn test_missing_info_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            read_info(&dir.path().join("missing.json")),
            Err(GestureError::Io { .. })
        ));
    }
}
