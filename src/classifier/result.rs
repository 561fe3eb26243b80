//! Classification results

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::config::constants::classifier::UNKNOWN_LABEL;

/// Per-class probabilities in class order; serialized as a JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassProbabilities(Vec<(String, f64)>);

impl ClassProbabilities {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self(entries)
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|(name, _)| name == label).map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, p)| (name.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.iter().map(|(_, p)| p).sum()
    }
}

impl Serialize for ClassProbabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, p) in &self.0 {
            map.serialize_entry(name, p)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ClassProbabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ProbVisitor;

        impl<'de> Visitor<'de> for ProbVisitor {
            type Value = ClassProbabilities;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of class name to probability")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, p)) = access.next_entry::<String, f64>()? {
                    entries.push((name, p));
                }
                Ok(ClassProbabilities(entries))
            }
        }

        deserializer.deserialize_map(ProbVisitor)
    }
}

/// Outcome of classifying one query sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub predicted_class: String,
    pub confidence: f64,
    pub all_probs: ClassProbabilities,
}

impl ClassificationResult {
    /// Sentinel result when there is nothing to compare against
    pub fn unknown() -> Self {
        Self {
            predicted_class: UNKNOWN_LABEL.to_string(),
            confidence: 0.0,
            all_probs: ClassProbabilities::default(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.predicted_class == UNKNOWN_LABEL && self.all_probs.is_empty()
    }
}
