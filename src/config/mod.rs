// src/config/mod.rs
//! Configuration management
//!
//! A [`SystemConfig`] is built once at startup (see [`ConfigLoader`]) and then handed
//! out by reference. Nothing in the core mutates it afterwards.

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigLoader, ConfigError};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete system configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SystemConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

/// Classifier hyperparameters
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Neighbour count for voting
    #[serde(default = "defaults::k")]
    pub k: usize,

    /// Compare against per-class centroids instead of every template
    #[serde(default = "defaults::use_centroids")]
    pub use_centroids: bool,

    /// Frame budget templates and queries are downsampled to
    #[serde(default = "defaults::downsample_length")]
    pub downsample_length: usize,

    #[serde(default = "defaults::band_divisor")]
    pub band_divisor: usize,
}

/// Filesystem layout for corpus and model
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "defaults::gestures_dir")]
    pub gestures_dir: PathBuf,

    #[serde(default = "defaults::models_dir")]
    pub models_dir: PathBuf,

    #[serde(default = "defaults::model_file")]
    pub model_file: String,

    #[serde(default = "defaults::info_file")]
    pub info_file: String,

    /// Optional manifest fixing class order
    #[serde(default = "defaults::classes_file")]
    pub classes_file: PathBuf,
}

/// Streaming protocol settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StreamConfig {
    #[serde(default = "defaults::skip_blank_lines")]
    pub skip_blank_lines: bool,

    #[serde(default = "defaults::quit_commands")]
    pub quit_commands: Vec<String>,
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::*;
    use std::path::PathBuf;

    pub fn k() -> usize { classifier::DEFAULT_K }
    pub fn use_centroids() -> bool { classifier::DEFAULT_USE_CENTROIDS }
    pub fn downsample_length() -> usize { classifier::DEFAULT_DOWNSAMPLE_LENGTH }
    pub fn band_divisor() -> usize { dtw::DEFAULT_BAND_DIVISOR }

    pub fn gestures_dir() -> PathBuf { PathBuf::from(paths::DEFAULT_GESTURES_DIR) }
    pub fn models_dir() -> PathBuf { PathBuf::from(paths::DEFAULT_MODELS_DIR) }
    pub fn model_file() -> String { paths::DEFAULT_MODEL_FILE.to_string() }
    pub fn info_file() -> String { paths::DEFAULT_INFO_FILE.to_string() }
    pub fn classes_file() -> PathBuf { PathBuf::from(paths::DEFAULT_CLASSES_FILE) }

    pub fn skip_blank_lines() -> bool { true }
    pub fn quit_commands() -> Vec<String> {
        stream::QUIT_COMMANDS.iter().map(|s| s.to_string()).collect()
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            k: defaults::k(),
            use_centroids: defaults::use_centroids(),
            downsample_length: defaults::downsample_length(),
            band_divisor: defaults::band_divisor(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            gestures_dir: defaults::gestures_dir(),
            models_dir: defaults::models_dir(),
            model_file: defaults::model_file(),
            info_file: defaults::info_file(),
            classes_file: defaults::classes_file(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            skip_blank_lines: defaults::skip_blank_lines(),
            quit_commands: defaults::quit_commands(),
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            paths: PathsConfig::default(),
            stream: StreamConfig::default(),
        }
    }
}

impl PathsConfig {
    /// Full path of the binary model artifact
    pub fn model_path(&self) -> PathBuf {
        self.models_dir.join(&self.model_file)
    }

    /// Full path of the human-readable metadata record
    pub fn info_path(&self) -> PathBuf {
        self.models_dir.join(&self.info_file)
    }
}

impl StreamConfig {
    pub fn is_quit_command(&self, line: &str) -> bool {
        self.quit_commands.iter().any(|cmd| cmd == line)
    }
}

impl SystemConfig {
    /// Validate configuration consistency
    pub fn validate_consistency(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let classifier = &self.classifier;

        if classifier.k == 0 || classifier.k > constants::classifier::MAX_K {
            errors.push(format!(
                "classifier.k must be in [1, {}], got {}",
                constants::classifier::MAX_K, classifier.k
            ));
        }

        if classifier.downsample_length == 0
            || classifier.downsample_length > constants::classifier::MAX_DOWNSAMPLE_LENGTH
        {
            errors.push(format!(
                "classifier.downsample_length must be in [1, {}], got {}",
                constants::classifier::MAX_DOWNSAMPLE_LENGTH, classifier.downsample_length
            ));
        }

        if classifier.band_divisor == 0 {
            errors.push("classifier.band_divisor must be positive".to_string());
        }

        if self.paths.model_file.is_empty() {
            errors.push("paths.model_file must not be empty".to_string());
        }

        if self.paths.info_file.is_empty() {
            errors.push("paths.info_file must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Get configuration summary
    pub fn get_summary(&self) -> ConfigSummary {
        ConfigSummary {
            k: self.classifier.k,
            use_centroids: self.classifier.use_centroids,
            downsample_length: self.classifier.downsample_length,
            model_path: self.paths.model_path(),
            gestures_dir: self.paths.gestures_dir.clone(),
        }
    }
}

/// Configuration summary for display/logging
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub k: usize,
    pub use_centroids: bool,
    pub downsample_length: usize,
    pub model_path: PathBuf,
    pub gestures_dir: PathBuf,
}
