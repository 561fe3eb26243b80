//! On-disk template corpus
//!
//! Layout: `<gestures_dir>/<class>/<n>.json`, each file a [`SequenceRecord`]. Class
//! order comes from the classes manifest when present, otherwise from the sorted
//! directory names.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::constants::paths::SEQUENCE_FILE_EXTENSION;
use crate::config::PathsConfig;
use crate::error::{GestureError, GestureErrorBuilder, GestureResult};
use crate::error_context;
use crate::landmarks::SequenceRecord;
use crate::processing::{sequence_to_features, FeatureSequence};

#[derive(Debug, Deserialize)]
struct ClassManifest {
    #[serde(default)]
    classes: Vec<ClassEntry>,
}

#[derive(Debug, Deserialize)]
struct ClassEntry {
    name: String,
}

/// A file that could not be used as a template
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything loaded from one class directory
#[derive(Debug, Clone)]
pub struct ClassCorpus {
    pub name: String,
    /// Sequence files present, usable or not
    pub files_found: usize,
    pub sequences: Vec<FeatureSequence>,
    pub skipped: Vec<SkippedFile>,
}

/// Class names in training order
pub fn discover_classes(paths: &PathsConfig) -> GestureResult<Vec<String>> {
    if paths.classes_file.is_file() {
        let text = fs::read_to_string(&paths.classes_file)
            .map_err(|e| GestureError::io(&paths.classes_file, e, error_context!("corpus", "read_manifest")))?;
        let manifest: ClassManifest = serde_json::from_str(&text).map_err(|e| {
            GestureErrorBuilder::new("corpus", "read_manifest").corpus(&paths.classes_file, &e.to_string())
        })?;
        debug!(classes = manifest.classes.len(), "class manifest loaded");
        return Ok(manifest.classes.into_iter().map(|entry| entry.name).collect());
    }

    if !paths.gestures_dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(&paths.gestures_dir)
        .map_err(|e| GestureError::io(&paths.gestures_dir, e, error_context!("corpus", "discover_classes")))?;

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();
    Ok(names)
}

/// Sequence files of a class directory, sorted by file name
pub fn sequence_files(dir: &Path) -> GestureResult<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).map_err(|e| GestureError::io(dir, e, error_context!("corpus", "sequence_files")))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == SEQUENCE_FILE_EXTENSION))
        .collect();
    files.sort();
    Ok(files)
}

/// Parse one sequence file
pub fn load_sequence_file(path: &Path) -> GestureResult<SequenceRecord> {
    let text = fs::read_to_string(path).map_err(|e| GestureError::io(path, e, error_context!("corpus", "read_sequence")))?;
    Ok(serde_json::from_str(&text)?)
}

/// Load a class directory; `None` when the directory does not exist
pub fn load_class(gestures_dir: &Path, name: &str) -> GestureResult<Option<ClassCorpus>> {
    let dir = gestures_dir.join(name);
    if !dir.is_dir() {
        return Ok(None);
    }

    let files = sequence_files(&dir)?;
    let mut corpus = ClassCorpus {
        name: name.to_string(),
        files_found: files.len(),
        sequences: Vec::with_capacity(files.len()),
        skipped: Vec::new(),
    };

    for path in files {
        match load_sequence_file(&path) {
            Ok(record) if record.is_empty() => {
                corpus.skipped.push(SkippedFile {
                    path,
                    reason: "sequence has no frames".to_string(),
                });
            }
            Ok(record) => corpus.sequences.push(sequence_to_features(&record.frames)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping sequence file");
                corpus.skipped.push(SkippedFile {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    debug!(
        class = name,
        loaded = corpus.sequences.len(),
        skipped = corpus.skipped.len(),
        "class corpus loaded"
    );
    Ok(Some(corpus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths_for(root: &Path) -> PathsConfig {
        PathsConfig {
            gestures_dir: root.join("gestures"),
            classes_file: root.join("classes.json"),
            ..PathsConfig::default()
        }
    }

    #[test]
    fn test_discovery_sorted_without_manifest() {
        let root = TempDir::new().unwrap();
        let paths = paths_for(root.path());
        for name in ["wave", "point", "fist"] {
            fs::create_dir_all(paths.gestures_dir.join(name)).unwrap();
        }
        fs::write(paths.gestures_dir.join("notes.txt"), "x").unwrap();

        assert_eq!(discover_classes(&paths).unwrap(), vec!["fist", "point", "wave"]);
    }

    #[test]
    fn test_manifest_order_wins() {
        let root = TempDir::new().unwrap();
        let paths = paths_for(root.path());
        fs::write(&paths.classes_file, r#"{"classes": [{"name": "wave"}, {"name": "point"}]}"#).unwrap();

        assert_eq!(discover_classes(&paths).unwrap(), vec!["wave", "point"]);
    }

    #[test]
    fn test_missing_gestures_dir_is_empty() {
        let root = TempDir::new().unwrap();
        assert!(discover_classes(&paths_for(root.path())).unwrap().is_empty());
    }

    #[test]
    fn test_bad_manifest_is_corpus_error() {
        let root = TempDir::new().unwrap();
        let paths = paths_for(root.path());
        fs::write(&paths.classes_file, "not json").unwrap();
        assert!(matches!(discover_classes(&paths), Err(GestureError::Corpus { .. })));
    }

    #[test]
    fn test_load_class_skips_bad_files() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("wave");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("0.json"), r#"{"frames": [{"right_hand": null}, {}]}"#).unwrap();
        fs::write(dir.join("1.json"), r#"{"frames": []}"#).unwrap();
        fs::write(dir.join("2.json"), "{broken").unwrap();
        fs::write(dir.join("3.txt"), r#"{"frames": [{}]}"#).unwrap();

        let corpus = load_class(root.path(), "wave").unwrap().unwrap();
        assert_eq!(corpus.files_found, 3);
        assert_eq!(corpus.sequences.len(), 1);
        assert_eq!(corpus.sequences[0].nrows(), 2);
        assert_eq!(corpus.skipped.len(), 2);
        assert!(corpus.skipped[0].path.ends_with("1.json"));

        assert!(load_class(root.path(), "missing").unwrap().is_none());
    }
}
