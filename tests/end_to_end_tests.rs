// tests/end_to_end_tests.rs
//! Train on a synthetic wave/point corpus and classify held-out sequences

mod common;

use crossbeam::channel::unbounded;
use gesture_core::config::ClassifierConfig;
use gesture_core::inference::{classify_file, classify_with_model};
use gesture_core::storage::{ModelInfo, ModelStore};
use gesture_core::training::{train, ChannelSink, ProgressEvent};
use tempfile::TempDir;

use common::{config_in, point_sequence, rng, wave_sequence, write_sequence, write_wave_point_corpus};

#[test]
fn test_wave_vs_point_leave_one_out() {
    let root = TempDir::new().unwrap();
    let config = config_in(root.path());
    write_wave_point_corpus(&config, 5, 7);

    let (tx, rx) = unbounded();
    let summary = train(&config, &ChannelSink::new(tx)).unwrap();

    assert_eq!(summary.total_samples, 10);
    assert_eq!(summary.classes, vec!["point", "wave"]);
    assert!(summary.accuracy > 0.8, "accuracy {}", summary.accuracy);
    assert!(summary.model_path.exists());
    assert!(summary.info_path.exists());

    let events: Vec<ProgressEvent> = rx.try_iter().collect();
    assert_eq!(events.first().unwrap().message, "Starting DTW + k-NN gesture model training...");

    let epoch = events.iter().find(|e| e.message == "epoch_complete").unwrap();
    assert_eq!(epoch.get("epoch").and_then(|v| v.as_u64()), Some(1));
    assert_eq!(epoch.get("progress").and_then(|v| v.as_f64()), Some(100.0));

    let done = events.last().unwrap();
    assert_eq!(done.message, "Training complete!");
    assert_eq!(done.get("final_val_accuracy").and_then(|v| v.as_f64()), Some(summary.accuracy));

    let folds = events.iter().filter(|e| e.message == "Leave-one-out fold").count();
    assert_eq!(folds, 10);

    let info = ModelInfo::load(&summary.info_path).unwrap();
    assert_eq!(info.num_classes, 2);
    assert_eq!(info.total_samples, 10);
    assert_eq!(info.model_type, "DTW_KNN");
    assert_eq!(info.class_sample_counts.get("wave"), Some(&5));
}

#[test]
fn test_held_out_wave_predicts_wave() {
    let root = TempDir::new().unwrap();
    let config = config_in(root.path());
    write_wave_point_corpus(&config, 5, 11);
    train(&config, &gesture_core::training::NullSink).unwrap();

    let mut rng = rng(99);
    let held_out = root.path().join("held_out_wave.json");
    write_sequence(&held_out, &wave_sequence(&mut rng));

    let record = classify_with_model(&config.paths.model_path(), &held_out).unwrap();
    assert_eq!(record.result.predicted_class, "wave");
    assert!(record.result.confidence > 0.5);
    assert!((record.result.all_probs.total() - 1.0).abs() < 1e-9);

    let held_out = root.path().join("held_out_point.json");
    write_sequence(&held_out, &point_sequence(&mut rng));
    let record = classify_with_model(&config.paths.model_path(), &held_out).unwrap();
    assert_eq!(record.result.predicted_class, "point");
}

#[test]
fn test_template_mode_matches_centroid_mode() {
    let root = TempDir::new().unwrap();
    let mut config = config_in(root.path());
    config.classifier = ClassifierConfig {
        use_centroids: false,
        ..ClassifierConfig::default()
    };
    write_wave_point_corpus(&config, 5, 23);

    let summary = train(&config, &gesture_core::training::NullSink).unwrap();
    assert!(summary.accuracy > 0.8, "accuracy {}", summary.accuracy);

    let model = ModelStore::load(&config.paths.model_path()).unwrap();
    assert!(!model.classifier.use_centroids());
    // centroids are always built at save time
    assert!(model.classifier.has_centroids());

    let mut rng = rng(5);
    let held_out = root.path().join("wave.json");
    write_sequence(&held_out, &wave_sequence(&mut rng));
    let record = classify_file(&model.classifier, &held_out).unwrap();
    assert_eq!(record.result.predicted_class, "wave");
    assert_eq!(record.result.all_probs.len(), 2);
}

#[test]
fn test_manifest_controls_class_order_and_missing_dirs() {
    let root = TempDir::new().unwrap();
    let config = config_in(root.path());
    write_wave_point_corpus(&config, 3, 3);
    std::fs::write(
        &config.paths.classes_file,
        r#"{"classes": [{"name": "wave"}, {"name": "fist"}, {"name": "point"}]}"#,
    )
    .unwrap();

    let (tx, rx) = unbounded();
    let summary = train(&config, &ChannelSink::new(tx)).unwrap();
    assert_eq!(summary.classes, vec!["wave", "point"]);
    assert!(!summary.class_sample_counts.contains_key("fist"));

    let events: Vec<ProgressEvent> = rx.try_iter().collect();
    assert!(events.iter().any(|e| e.message.contains("Class directory not found: fist")));
}
