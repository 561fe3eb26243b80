//! Model persistence
//!
//! Writes go to a temporary file in the destination directory and are persisted
//! over the target, so a reader never observes a partially written artifact.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, info_span, warn};

use crate::classifier::{DtwClassifier, RepairOutcome};
use crate::config::constants::artifact::{FORMAT_VERSION, MAGIC};
use crate::error::{GestureError, GestureErrorBuilder, GestureResult};
use crate::error_context;
use crate::storage::artifact::ModelArtifact;
use crate::utils::integrity::{frame_payload, unframe_payload};

/// Classifier reconstructed from disk together with what the load had to fix
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub classifier: DtwClassifier,
    pub repair: RepairOutcome,
}

/// Loads and saves classifier artifacts
pub struct ModelStore;

impl ModelStore {
    /// Build centroids, then write the artifact atomically
    pub fn save(classifier: &mut DtwClassifier, path: &Path) -> GestureResult<()> {
        let _span = info_span!("model_save", path = %path.display()).entered();

        classifier.build_centroids();
        let artifact = ModelArtifact::from_classifier(classifier);
        write_artifact(path, &artifact, FORMAT_VERSION)?;

        info!(
            templates = artifact.templates.len(),
            centroids = artifact.centroids.len(),
            "model saved"
        );
        Ok(())
    }

    /// Read, verify and reconstruct; every failure is reported as a load error
    pub fn load(path: &Path) -> GestureResult<LoadedModel> {
        let _span = info_span!("model_load", path = %path.display()).entered();
        let fail = |reason: String| GestureErrorBuilder::new("model_store", "load").model_load(path, &reason);

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(fail("model file not found".to_string())),
            Err(e) => return Err(fail(e.to_string())),
        };

        let (version, payload) =
            unframe_payload(&bytes, MAGIC, FORMAT_VERSION, "model artifact").map_err(|e| fail(e.to_string()))?;

        let mut classifier = ModelArtifact::decode_payload(payload)
            .and_then(|artifact| artifact.into_classifier(version))
            .map_err(|e| fail(e.to_string()))?;

        let repair = classifier.validate_and_repair().map_err(|e| fail(e.to_string()))?;
        if let RepairOutcome::CentroidsRebuilt { classes } = &repair {
            warn!(version, ?classes, "artifact had no usable centroids, rebuilt after load");
        }

        info!(
            version,
            classes = classifier.class_names().len(),
            templates = classifier.template_count(),
            "model loaded"
        );
        Ok(LoadedModel { classifier, repair })
    }
}

/// Frame and write an artifact with an explicit format version
pub fn write_artifact(path: &Path, artifact: &ModelArtifact, version: u16) -> GestureResult<()> {
    let framed = frame_payload(MAGIC, version, &artifact.encode_payload());
    write_atomic(path, &framed).map_err(|e| {
        GestureErrorBuilder::new("model_store", "save").model_save(path, &e.to_string())
    })
}

/// Write `bytes` to a sibling temp file and persist it over `path`
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> GestureResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let io_err = |source: std::io::Error| GestureError::io(path, source, error_context!("storage", "write_atomic"));

    fs::create_dir_all(&dir).map_err(io_err)?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.flush().map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
