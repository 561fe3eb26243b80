// src/config/loader.rs
//! Layered configuration loader
//!
//! Precedence, lowest first: built-in defaults, system file, user file, project
//! files, `GESTURE_<SECTION>_<KEY>` environment variables.

use crate::config::{constants::paths, SystemConfig};
use crate::error::{GestureError, GestureErrorBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Configuration loader
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    apply_env: bool,
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    FileNotFound(String),
    ParseError(String),
    ValidationError(Vec<String>),
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Configuration file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Configuration parse error: {}", msg),
            ConfigError::ValidationError(errors) => {
                write!(f, "Configuration validation errors: ")?;
                for error in errors {
                    write!(f, "\n  {}", error)?;
                }
                Ok(())
            }
            ConfigError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for GestureError {
    fn from(err: ConfigError) -> Self {
        GestureErrorBuilder::new("config_loader", "load_system_config").configuration(&err.to_string())
    }
}

impl ConfigLoader {
    /// Create new configuration loader over the standard search paths
    pub fn new() -> Self {
        Self {
            config_paths: Self::discover_config_paths(),
            apply_env: true,
        }
    }

    /// Create loader with custom paths
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            apply_env: true,
        }
    }

    /// Loader for a single explicit file; a missing file is an error here
    pub fn with_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        Ok(Self::with_paths(vec![path.to_path_buf()]))
    }

    /// Disable environment overrides
    pub fn without_env(mut self) -> Self {
        self.apply_env = false;
        self
    }

    /// Load system configuration with validation
    pub fn load_system_config(&self) -> Result<SystemConfig, ConfigError> {
        let config = self.load_and_merge_configs()?;
        debug!(summary = ?config.get_summary(), "configuration loaded");
        Ok(config)
    }

    /// Validate configuration file without loading
    pub fn validate_config_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: SystemConfig = toml::from_str(&content)?;
        config
            .validate_consistency()
            .map_err(ConfigError::ValidationError)
    }

    /// Export configuration to file
    pub fn export_config<P: AsRef<Path>>(config: &SystemConfig, path: P) -> Result<(), ConfigError> {
        let toml_content =
            toml::to_string_pretty(config).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, toml_content)?;
        Ok(())
    }

    fn load_and_merge_configs(&self) -> Result<SystemConfig, ConfigError> {
        // Start with default configuration
        let mut merged_config = toml::Value::try_from(&SystemConfig::default())
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        for config_path in &self.config_paths {
            match self.load_config_file(config_path) {
                Ok(file_config) => {
                    debug!(path = %config_path.display(), "merging configuration file");
                    merge_toml_values(&mut merged_config, file_config);
                }
                Err(ConfigError::FileNotFound(_)) => continue, // Skip missing optional files
                Err(e) => return Err(e),
            }
        }

        if self.apply_env {
            apply_environment_overrides(&mut merged_config, std::env::vars());
        }

        let config: SystemConfig = merged_config
            .try_into()
            .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

        config
            .validate_consistency()
            .map_err(ConfigError::ValidationError)?;

        Ok(config)
    }

    fn load_config_file<P: AsRef<Path>>(&self, path: P) -> Result<toml::Value, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: toml::Value = toml::from_str(&content)?;

        Ok(config)
    }

    fn discover_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(paths::SYSTEM_CONFIG_PATH)];

        if let Some(home_dir) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
            paths.push(PathBuf::from(home_dir).join(paths::USER_CONFIG_DIR).join("config.toml"));
        }

        // Local configurations (in order of precedence)
        paths.push(PathBuf::from(paths::DEFAULT_CONFIG_FILE));
        paths.push(PathBuf::from(paths::LOCAL_CONFIG_FILE));

        paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

/// `GESTURE_CLASSIFIER_USE_CENTROIDS=false` sets `classifier.use_centroids`
fn apply_environment_overrides<I>(config: &mut toml::Value, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in vars {
        let Some(rest) = key.strip_prefix(paths::ENV_PREFIX) else {
            continue;
        };
        let rest = rest.to_lowercase();
        let Some((section, field)) = rest.split_once('_') else {
            warn!(variable = %key, "ignoring environment override without a section");
            continue;
        };

        if let toml::Value::Table(root) = config {
            // Only known sections; unrelated GESTURE_* variables are left alone
            if let Some(toml::Value::Table(table)) = root.get_mut(section) {
                debug!(variable = %key, "applying environment override");
                table.insert(field.to_string(), parse_env_value(&value));
            }
        }
    }
}

fn parse_env_value(value: &str) -> toml::Value {
    if let Ok(int_val) = value.parse::<i64>() {
        toml::Value::Integer(int_val)
    } else if let Ok(float_val) = value.parse::<f64>() {
        toml::Value::Float(float_val)
    } else if let Ok(bool_val) = value.parse::<bool>() {
        toml::Value::Boolean(bool_val)
    } else {
        toml::Value::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_default_config() {
        let loader = ConfigLoader::with_paths(vec![]).without_env();
        let config = loader.load_system_config().unwrap();
        assert_eq!(config, SystemConfig::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[classifier]
k = 5
use_centroids = false

[paths]
models_dir = "/tmp/models"
        "#
        )
        .unwrap();

        let loader = ConfigLoader::with_paths(vec![temp_file.path().to_path_buf()]).without_env();
        let config = loader.load_system_config().unwrap();

        assert_eq!(config.classifier.k, 5);
        assert!(!config.classifier.use_centroids);
        assert_eq!(config.classifier.downsample_length, 20);
        assert_eq!(config.paths.models_dir, PathBuf::from("/tmp/models"));
    }

    #[test]
    fn test_invalid_config_validation() {
        let loader = ConfigLoader::with_paths(vec![]);

        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[classifier]\nk = 0\n").unwrap();

        assert!(matches!(
            loader.validate_config_file(temp_file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file() {
        assert!(matches!(
            ConfigLoader::with_file("/definitely/not/here.toml"),
            Err(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_config_error_becomes_configuration_error() {
        let err: GestureError = ConfigError::ParseError("bad table".to_string()).into();
        match &err {
            GestureError::Configuration { component, reason, .. } => {
                assert_eq!(component, "config_loader");
                assert!(reason.contains("bad table"));
            }
            other => panic!("Expected configuration error, got {:?}", other),
        }
        assert!(err.to_string().contains("load_system_config"));
    }

    #[test]
    fn test_env_override_parsing() {
        let mut value = toml::Value::try_from(&SystemConfig::default()).unwrap();
        apply_environment_overrides(
            &mut value,
            vec![
                ("GESTURE_CLASSIFIER_USE_CENTROIDS".to_string(), "false".to_string()),
                ("GESTURE_CLASSIFIER_K".to_string(), "7".to_string()),
                ("GESTURE_UNRELATED".to_string(), "1".to_string()),
                ("PATH".to_string(), "/usr/bin".to_string()),
            ],
        );

        let config: SystemConfig = value.try_into().unwrap();
        assert_eq!(config.classifier.k, 7);
        assert!(!config.classifier.use_centroids);
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        unsafe {
            std::env::set_var("GESTURE_CLASSIFIER_DOWNSAMPLE_LENGTH", "32");
        }

        let config = ConfigLoader::with_paths(vec![]).load_system_config().unwrap();
        assert_eq!(config.classifier.downsample_length, 32);

        unsafe {
            std::env::remove_var("GESTURE_CLASSIFIER_DOWNSAMPLE_LENGTH");
        }
    }

    #[test]
    #[serial]
    fn test_invalid_environment_override_rejected() {
        unsafe {
            std::env::set_var("GESTURE_CLASSIFIER_K", "0");
        }

        let result = ConfigLoader::with_paths(vec![]).load_system_config();
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        unsafe {
            std::env::remove_var("GESTURE_CLASSIFIER_K");
        }
    }

    #[test]
    fn test_config_export() {
        let temp_file = NamedTempFile::new().unwrap();
        ConfigLoader::export_config(&SystemConfig::default(), temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("[classifier]"));
    }
}
