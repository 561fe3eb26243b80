//! Leave-one-out evaluation

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, info_span};

use crate::classifier::DtwClassifier;
use crate::training::progress::{ProgressEvent, ProgressSink};

/// Outcome of a leave-one-out pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeaveOneOutReport {
    pub correct: usize,
    pub total: usize,
    pub accuracy: f64,
}

/// Classify every template against a classifier built from all the others
///
/// Folds run in parallel over an immutable snapshot; each fold rebuilds centroids
/// when the classifier is in centroid mode.
pub fn leave_one_out(classifier: &DtwClassifier, sink: &dyn ProgressSink) -> LeaveOneOutReport {
    let _span = info_span!("leave_one_out", templates = classifier.template_count()).entered();

    let total = classifier.template_count();
    let done = AtomicUsize::new(0);

    let correct = classifier
        .templates()
        .enumerate()
        .collect::<Vec<_>>()
        .into_par_iter()
        .filter(|(index, (label, sequence))| {
            let fold = classifier.without_template(*index);
            let hit = fold.classify(sequence).predicted_class == *label;

            let completed = done.fetch_add(1, Ordering::Relaxed) + 1;
            sink.emit(
                ProgressEvent::new("Leave-one-out fold")
                    .with("fold", completed)
                    .with("total_folds", total),
            );
            hit
        })
        .count();

    let accuracy = if total > 0 { correct as f64 / total as f64 } else { 0.0 };
    debug!(correct, total, accuracy, "leave-one-out finished");

    LeaveOneOutReport { correct, total, accuracy }
}
