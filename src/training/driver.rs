//! Training flow: corpus -> templates -> artifact -> leave-one-out -> metadata

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::json;
use tracing::{info, info_span};

use crate::classifier::DtwClassifier;
use crate::config::SystemConfig;
use crate::error::{GestureErrorBuilder, GestureResult};
use crate::storage::{ModelInfo, ModelStore};
use crate::training::corpus::{discover_classes, load_class};
use crate::training::evaluation::leave_one_out;
use crate::training::progress::{ProgressEvent, ProgressSink};

/// What a finished training run produced
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    /// Classes that received at least one template, in training order
    pub classes: Vec<String>,
    /// Sequence files found per class directory
    pub class_sample_counts: BTreeMap<String, usize>,
    pub total_samples: usize,
    pub accuracy: f64,
    pub model_path: PathBuf,
    pub info_path: PathBuf,
}

/// Train from the configured corpus and persist the model and its metadata
pub fn train(config: &SystemConfig, sink: &dyn ProgressSink) -> GestureResult<TrainingSummary> {
    let _span = info_span!("train", gestures_dir = %config.paths.gestures_dir.display()).entered();
    sink.emit(ProgressEvent::new("Starting DTW + k-NN gesture model training..."));

    let classes = discover_classes(&config.paths)?;
    if classes.is_empty() {
        sink.emit(ProgressEvent::new("No classes found!"));
        return Err(GestureErrorBuilder::new("training", "train").corpus(&config.paths.gestures_dir, "no classes found"));
    }

    let mut classifier = DtwClassifier::new(&config.classifier);
    let mut class_sample_counts = BTreeMap::new();
    let mut total_samples = 0usize;

    for name in &classes {
        let Some(corpus) = load_class(&config.paths.gestures_dir, name)? else {
            sink.emit(
                ProgressEvent::new(format!("Class directory not found: {}", name)).with("class", name.as_str()),
            );
            continue;
        };

        class_sample_counts.insert(name.clone(), corpus.files_found);
        for skipped in &corpus.skipped {
            sink.emit(ProgressEvent::new(format!(
                "Error loading {}: {}",
                skipped.path.display(),
                skipped.reason
            )));
        }
        for sequence in &corpus.sequences {
            classifier.add_template(name, sequence)?;
            total_samples += 1;
        }
    }

    if total_samples == 0 {
        sink.emit(ProgressEvent::new("No training data found!"));
        return Err(GestureErrorBuilder::new("training", "train").corpus(&config.paths.gestures_dir, "no training data found"));
    }

    let trained_classes = classifier.class_names().to_vec();
    sink.emit(ProgressEvent::new(format!(
        "Loaded {} templates for {} classes",
        total_samples,
        trained_classes.len()
    )));
    sink.emit(ProgressEvent::new(format!("Classes: {:?}", trained_classes)).with("classes", json!(trained_classes)));
    sink.emit(
        ProgressEvent::new(format!("Samples per class: {:?}", class_sample_counts))
            .with("class_sample_counts", json!(class_sample_counts)),
    );

    let model_path = config.paths.model_path();
    ModelStore::save(&mut classifier, &model_path)?;
    sink.emit(ProgressEvent::new(format!("Model saved to {}", model_path.display())));

    sink.emit(ProgressEvent::new("Computing leave-one-out cross-validation accuracy..."));
    let report = leave_one_out(&classifier, sink);
    let accuracy = report.accuracy;
    sink.emit(ProgressEvent::new(format!("Leave-one-out accuracy: {:.4}", accuracy)));

    sink.emit(
        ProgressEvent::new("epoch_complete")
            .with("epoch", 1)
            .with("total_epochs", 1)
            .with("loss", 1.0 - accuracy)
            .with("accuracy", accuracy)
            .with("val_loss", 1.0 - accuracy)
            .with("val_accuracy", accuracy)
            .with("progress", 100.0),
    );

    let info_path = config.paths.info_path();
    ModelInfo::new(&classifier, class_sample_counts.clone(), total_samples, accuracy).save(&info_path)?;
    sink.emit(ProgressEvent::new("Model info saved!"));

    sink.emit(
        ProgressEvent::new("Training complete!")
            .with("final_val_accuracy", accuracy)
            .with("epochs_trained", 1),
    );
    info!(total_samples, accuracy, "training complete");

    Ok(TrainingSummary {
        classes: trained_classes,
        class_sample_counts,
        total_samples,
        accuracy,
        model_path,
        info_path,
    })
}
