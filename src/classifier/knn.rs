//! DTW + k-NN gesture classifier
//!
//! The classifier owns every template and centroid. Templates are downsampled on
//! insertion; centroids are derived from templates by [`DtwClassifier::build_centroids`]
//! and dropped whenever a template is added, so the two never disagree.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::classifier::registry::ClassRegistry;
use crate::classifier::result::{ClassProbabilities, ClassificationResult};
use crate::config::constants::classifier::CONFIDENCE_RANGE_EPSILON;
use crate::config::constants::landmarks::FRAME_FEATURES;
use crate::config::ClassifierConfig;
use crate::error::{GestureErrorBuilder, GestureResult};
use crate::processing::{build_centroid, downsample_sequence, DtwEngine, FeatureSequence};

/// One stored performance of a gesture
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    class_id: usize,
    sequence: FeatureSequence,
}

impl Template {
    pub fn class_id(&self) -> usize {
        self.class_id
    }

    pub fn sequence(&self) -> &FeatureSequence {
        &self.sequence
    }
}

/// Result of the post-load consistency check
#[derive(Debug, Clone, PartialEq)]
pub enum RepairOutcome {
    /// Templates and centroids were already consistent
    Intact,
    /// Centroids were missing or incomplete and have been rebuilt
    CentroidsRebuilt { classes: Vec<String> },
}

/// DTW + k-NN classifier state
#[derive(Debug, Clone)]
pub struct DtwClassifier {
    k: usize,
    use_centroids: bool,
    downsample_length: usize,
    engine: DtwEngine,
    registry: ClassRegistry,
    templates: Vec<Template>,
    /// Indexed by class id; empty until built
    centroids: Vec<Option<FeatureSequence>>,
}

impl DtwClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            k: config.k.max(1),
            use_centroids: config.use_centroids,
            downsample_length: config.downsample_length.max(1),
            engine: DtwEngine::new(config.band_divisor),
            registry: ClassRegistry::new(),
            templates: Vec::new(),
            centroids: Vec::new(),
        }
    }

    /// Empty classifier with the same hyperparameters
    pub fn empty_like(&self) -> Self {
        Self {
            k: self.k,
            use_centroids: self.use_centroids,
            downsample_length: self.downsample_length,
            engine: self.engine,
            registry: ClassRegistry::new(),
            templates: Vec::new(),
            centroids: Vec::new(),
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn use_centroids(&self) -> bool {
        self.use_centroids
    }

    pub fn downsample_length(&self) -> usize {
        self.downsample_length
    }

    pub fn band_divisor(&self) -> usize {
        self.engine.band_divisor()
    }

    pub fn class_names(&self) -> &[String] {
        self.registry.names()
    }

    pub fn has_class(&self, label: &str) -> bool {
        self.registry.contains(label)
    }

    /// Register a class without templates; keeps manifest order stable
    pub fn register_class(&mut self, label: &str) -> usize {
        self.registry.register(label)
    }

    /// Add one recorded performance; it is downsampled to the frame budget
    pub fn add_template(&mut self, label: &str, sequence: &FeatureSequence) -> GestureResult<()> {
        if sequence.nrows() == 0 {
            return Err(GestureErrorBuilder::new("classifier", "add_template")
                .invalid_data("template", "sequence has no frames"));
        }
        if sequence.ncols() != FRAME_FEATURES {
            return Err(GestureErrorBuilder::new("classifier", "add_template").mismatch(
                "template",
                "frame width",
                FRAME_FEATURES,
                sequence.ncols(),
            ));
        }

        let class_id = self.registry.register(label);
        self.templates.push(Template {
            class_id,
            sequence: downsample_sequence(sequence, self.downsample_length),
        });
        self.centroids.clear();
        Ok(())
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Templates in insertion order with their labels
    pub fn templates(&self) -> impl Iterator<Item = (&str, &FeatureSequence)> {
        self.templates
            .iter()
            .map(move |t| (self.label(t.class_id), &t.sequence))
    }

    pub fn templates_for(&self, label: &str) -> Vec<&FeatureSequence> {
        match self.registry.id(label) {
            Some(id) => self
                .templates
                .iter()
                .filter(|t| t.class_id == id)
                .map(|t| &t.sequence)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of templates per class, in class order
    pub fn class_template_counts(&self) -> Vec<(String, usize)> {
        let mut counts = vec![0usize; self.registry.len()];
        for template in &self.templates {
            counts[template.class_id] += 1;
        }
        self.registry
            .names()
            .iter()
            .cloned()
            .zip(counts)
            .collect()
    }

    pub fn has_centroids(&self) -> bool {
        self.centroids.iter().any(Option::is_some)
    }

    /// Built centroids in class order
    pub fn centroids(&self) -> impl Iterator<Item = (&str, &FeatureSequence)> {
        self.centroids
            .iter()
            .enumerate()
            .filter_map(move |(id, c)| c.as_ref().map(|seq| (self.label(id), seq)))
    }

    pub fn centroid(&self, label: &str) -> Option<&FeatureSequence> {
        let id = self.registry.id(label)?;
        self.centroids.get(id).and_then(Option::as_ref)
    }

    /// Rebuild one centroid per class that has templates
    pub fn build_centroids(&mut self) {
        let mut centroids = vec![None; self.registry.len()];
        for (id, slot) in centroids.iter_mut().enumerate() {
            *slot = build_centroid(
                self.templates
                    .iter()
                    .filter(|t| t.class_id == id)
                    .map(|t| &t.sequence),
            );
        }
        self.centroids = centroids;
        debug!(classes = self.centroids.iter().flatten().count(), "centroids built");
    }

    /// Install a stored centroid; used when reconstructing from an artifact
    pub(crate) fn insert_centroid(&mut self, label: &str, sequence: FeatureSequence) -> GestureResult<()> {
        let Some(id) = self.registry.id(label) else {
            return Err(GestureErrorBuilder::new("classifier", "insert_centroid")
                .invalid_data("centroid", &format!("class '{}' is not registered", label)));
        };
        if sequence.ncols() != FRAME_FEATURES {
            return Err(GestureErrorBuilder::new("classifier", "insert_centroid").mismatch(
                "centroid",
                "frame width",
                FRAME_FEATURES,
                sequence.ncols(),
            ));
        }
        if self.centroids.len() < self.registry.len() {
            self.centroids.resize(self.registry.len(), None);
        }
        self.centroids[id] = Some(sequence);
        Ok(())
    }

    /// Check that centroids cover exactly the classes with templates, rebuilding if not
    pub fn validate_and_repair(&mut self) -> GestureResult<RepairOutcome> {
        let mut has_templates = vec![false; self.registry.len()];
        for template in &self.templates {
            has_templates[template.class_id] = true;
        }

        for (id, centroid) in self.centroids.iter().enumerate() {
            if centroid.is_some() && !has_templates.get(id).copied().unwrap_or(false) {
                return Err(GestureErrorBuilder::new("classifier", "validate_and_repair").invalid_data(
                    "centroid",
                    &format!("centroid for '{}' has no templates", self.label(id)),
                ));
            }
        }

        let consistent = has_templates
            .iter()
            .enumerate()
            .all(|(id, &present)| !present || matches!(self.centroids.get(id), Some(Some(_))));

        if consistent {
            return Ok(RepairOutcome::Intact);
        }

        self.build_centroids();
        let classes = self.centroids().map(|(label, _)| label.to_string()).collect();
        Ok(RepairOutcome::CentroidsRebuilt { classes })
    }

    /// Copy of this classifier without the template at `index`, centroids rebuilt
    pub fn without_template(&self, index: usize) -> Self {
        let mut reduced = self.empty_like();
        for (i, template) in self.templates.iter().enumerate() {
            if i == index {
                continue;
            }
            let class_id = reduced.registry.register(self.label(template.class_id));
            reduced.templates.push(Template {
                class_id,
                sequence: template.sequence.clone(),
            });
        }
        if reduced.use_centroids {
            reduced.build_centroids();
        }
        reduced
    }

    /// Classify a query sequence
    pub fn classify(&self, query: &FeatureSequence) -> ClassificationResult {
        let use_centroids = self.use_centroids && self.has_centroids();
        if self.templates.is_empty() && !use_centroids {
            return ClassificationResult::unknown();
        }

        let query = downsample_sequence(query, self.downsample_length);
        if query.nrows() == 0 {
            return ClassificationResult::unknown();
        }

        let candidates: Vec<(usize, &FeatureSequence)> = if use_centroids {
            self.centroids
                .iter()
                .enumerate()
                .filter_map(|(id, c)| c.as_ref().map(|seq| (id, seq)))
                .collect()
        } else {
            self.templates.iter().map(|t| (t.class_id, &t.sequence)).collect()
        };

        let mut distances: Vec<(f64, usize)> = candidates
            .par_iter()
            .map(|(id, seq)| (self.engine.distance(&query, seq), *id))
            .collect();

        // Stable: equal distances keep candidate order
        distances.sort_by(|a, b| a.0.total_cmp(&b.0));
        trace!(candidates = distances.len(), nearest = ?distances.first(), "distances ranked");

        let predicted = self.vote(&distances);
        let all_probs = self.confidence_map(&distances);

        match predicted {
            Some(id) => {
                let predicted_class = self.label(id).to_string();
                let confidence = all_probs.get(&predicted_class).unwrap_or(0.0);
                ClassificationResult {
                    predicted_class,
                    confidence,
                    all_probs,
                }
            }
            None => ClassificationResult::unknown(),
        }
    }

    /// Plurality among the k nearest; ties go to the label seen first
    fn vote(&self, distances: &[(f64, usize)]) -> Option<usize> {
        let k = self.k.min(distances.len());
        let mut votes: Vec<(usize, usize)> = Vec::new();

        for &(_, id) in &distances[..k] {
            match votes.iter_mut().find(|(class_id, _)| *class_id == id) {
                Some((_, count)) => *count += 1,
                None => votes.push((id, 1)),
            }
        }

        let mut best: Option<(usize, usize)> = None;
        for (id, count) in votes {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((id, count));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Min-max rescaled, inverted, renormalized per-class similarities
    fn confidence_map(&self, distances: &[(f64, usize)]) -> ClassProbabilities {
        // Nearest candidate per class, in ranking order
        let mut per_class: Vec<(usize, f64)> = Vec::new();
        for &(dist, id) in distances {
            if !per_class.iter().any(|(class_id, _)| *class_id == id) {
                per_class.push((id, dist));
            }
        }

        let finite: Vec<f64> = per_class
            .iter()
            .map(|(_, d)| *d)
            .filter(|d| d.is_finite())
            .collect();
        if finite.is_empty() {
            return ClassProbabilities::default();
        }

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut scores: Vec<(String, f64)> = per_class
            .iter()
            .map(|&(id, dist)| {
                let score = if !dist.is_finite() {
                    0.0
                } else if max > min {
                    1.0 - (dist - min) / (max - min + CONFIDENCE_RANGE_EPSILON)
                } else {
                    1.0 / finite.len() as f64
                };
                (self.label(id).to_string(), score)
            })
            .collect();

        let total: f64 = scores.iter().map(|(_, s)| s).sum();
        if total > 0.0 {
            for (_, score) in scores.iter_mut() {
                *score /= total;
            }
        }

        ClassProbabilities::new(scores)
    }

    fn label(&self, id: usize) -> &str {
        self.registry.name(id).unwrap_or_default()
    }
}
