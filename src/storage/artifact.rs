//! Binary model artifact
//!
//! The payload is a protobuf message derived directly with `prost`; the framing
//! (magic, version, checksum) is added by [`crate::utils::integrity`].

use ndarray::Array2;
use prost::Message;

use crate::classifier::DtwClassifier;
use crate::config::constants::artifact::FORMAT_VERSION_NO_CENTROIDS;
use crate::config::constants::dtw::DEFAULT_BAND_DIVISOR;
use crate::config::ClassifierConfig;
use crate::error::{GestureErrorBuilder, GestureResult};
use crate::processing::FeatureSequence;

/// One labeled feature sequence, flattened row-major
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SequenceProto {
    #[prost(string, tag = "1")]
    pub label: ::prost::alloc::string::String,
    #[prost(uint32, tag = "2")]
    pub frames: u32,
    #[prost(uint32, tag = "3")]
    pub width: u32,
    #[prost(float, repeated, tag = "4")]
    pub values: ::prost::alloc::vec::Vec<f32>,
}

/// Complete persisted classifier state
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModelArtifact {
    #[prost(uint32, tag = "1")]
    pub k: u32,
    #[prost(bool, tag = "2")]
    pub use_centroids: bool,
    #[prost(uint32, tag = "3")]
    pub downsample_length: u32,
    /// Templates in insertion order
    #[prost(message, repeated, tag = "4")]
    pub templates: ::prost::alloc::vec::Vec<SequenceProto>,
    #[prost(string, repeated, tag = "5")]
    pub class_names: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    /// Empty in artifacts written before centroids existed
    #[prost(message, repeated, tag = "6")]
    pub centroids: ::prost::alloc::vec::Vec<SequenceProto>,
    /// Zero means the default divisor
    #[prost(uint32, tag = "7")]
    pub band_divisor: u32,
}

impl SequenceProto {
    pub fn from_sequence(label: &str, sequence: &FeatureSequence) -> Self {
        Self {
            label: label.to_string(),
            frames: sequence.nrows() as u32,
            width: sequence.ncols() as u32,
            values: sequence.iter().copied().collect(),
        }
    }

    pub fn to_sequence(&self) -> GestureResult<FeatureSequence> {
        let shape = (self.frames as usize, self.width as usize);
        if shape.0 * shape.1 != self.values.len() {
            return Err(GestureErrorBuilder::new("artifact", "decode_sequence").mismatch(
                "sequence",
                &format!("value count for '{}'", self.label),
                shape.0 * shape.1,
                self.values.len(),
            ));
        }
        Array2::from_shape_vec(shape, self.values.clone()).map_err(|e| {
            GestureErrorBuilder::new("artifact", "decode_sequence").invalid_data("sequence", &e.to_string())
        })
    }
}

impl ModelArtifact {
    /// Snapshot a classifier; centroids are written only when built
    pub fn from_classifier(classifier: &DtwClassifier) -> Self {
        Self {
            k: classifier.k() as u32,
            use_centroids: classifier.use_centroids(),
            downsample_length: classifier.downsample_length() as u32,
            templates: classifier
                .templates()
                .map(|(label, seq)| SequenceProto::from_sequence(label, seq))
                .collect(),
            class_names: classifier.class_names().to_vec(),
            centroids: classifier
                .centroids()
                .map(|(label, seq)| SequenceProto::from_sequence(label, seq))
                .collect(),
            band_divisor: classifier.band_divisor() as u32,
        }
    }

    /// Rebuild classifier state; `version` selects which fields are honoured
    pub fn into_classifier(self, version: u16) -> GestureResult<DtwClassifier> {
        let builder = || GestureErrorBuilder::new("artifact", "into_classifier");

        if self.k == 0 || self.downsample_length == 0 {
            return Err(builder().invalid_data("artifact", "k and downsample length must be positive"));
        }

        let config = ClassifierConfig {
            k: self.k as usize,
            use_centroids: self.use_centroids,
            downsample_length: self.downsample_length as usize,
            band_divisor: if self.band_divisor == 0 {
                DEFAULT_BAND_DIVISOR
            } else {
                self.band_divisor as usize
            },
        };
        let mut classifier = DtwClassifier::new(&config);

        for name in &self.class_names {
            classifier.register_class(name);
        }

        for template in &self.templates {
            if !classifier.has_class(&template.label) {
                return Err(builder().invalid_data(
                    "template",
                    &format!("label '{}' missing from class list", template.label),
                ));
            }
            classifier.add_template(&template.label, &template.to_sequence()?)?;
        }

        if version > FORMAT_VERSION_NO_CENTROIDS {
            for centroid in &self.centroids {
                classifier.insert_centroid(&centroid.label, centroid.to_sequence()?)?;
            }
        }

        Ok(classifier)
    }

    pub fn encode_payload(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    pub fn decode_payload(payload: &[u8]) -> GestureResult<Self> {
        Self::decode(payload).map_err(|e| {
            GestureErrorBuilder::new("artifact", "decode_payload").invalid_data("artifact payload", &e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constants::artifact::FORMAT_VERSION;
    use crate::config::constants::landmarks::FRAME_FEATURES;

    fn classifier() -> DtwClassifier {
        let mut clf = DtwClassifier::new(&ClassifierConfig::default());
        clf.add_template("wave", &Array2::from_elem((12, FRAME_FEATURES), 0.5)).unwrap();
        clf.add_template("point", &Array2::from_elem((30, FRAME_FEATURES), -0.5)).unwrap();
        clf
    }

    #[test]
    fn test_classifier_survives_payload() {
        let mut clf = classifier();
        clf.build_centroids();

        let bytes = ModelArtifact::from_classifier(&clf).encode_payload();
        let restored = ModelArtifact::decode_payload(&bytes)
            .unwrap()
            .into_classifier(FORMAT_VERSION)
            .unwrap();

        assert_eq!(restored.class_names(), clf.class_names());
        assert_eq!(restored.template_count(), 2);
        assert_eq!(restored.centroid("point"), clf.centroid("point"));
        assert_eq!(restored.k(), clf.k());
    }

    #[test]
    fn test_old_version_ignores_centroids() {
        let mut clf = classifier();
        clf.build_centroids();

        let artifact = ModelArtifact::from_classifier(&clf);
        let restored = artifact.into_classifier(FORMAT_VERSION_NO_CENTROIDS).unwrap();
        assert!(!restored.has_centroids());
    }

    #[test]
    fn test_rejects_inconsistent_sequence() {
        let mut artifact = ModelArtifact::from_classifier(&classifier());
        artifact.templates[0].values.pop();
        assert!(artifact.into_classifier(FORMAT_VERSION).is_err());
    }

    #[test]
    fn test_rejects_unlisted_label() {
        let mut artifact = ModelArtifact::from_classifier(&classifier());
        artifact.class_names.retain(|name| name != "point");
        assert!(artifact.into_classifier(FORMAT_VERSION).is_err());
    }
}
