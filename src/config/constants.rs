// src/config/constants.rs
//! System-wide configuration constants

/// Hand landmark layout
pub mod landmarks {
    /// Landmarks per hand pose
    pub const LANDMARKS_PER_HAND: usize = 21;
    pub const COORDS_PER_LANDMARK: usize = 3;
    pub const FEATURES_PER_HAND: usize = LANDMARKS_PER_HAND * COORDS_PER_LANDMARK; // 63
    pub const FRAME_FEATURES: usize = FEATURES_PER_HAND * 2; // 126

    pub const WRIST: usize = 0;
    /// Middle finger MCP joint, the scale reference
    pub const MIDDLE_MCP: usize = 9;

    /// Palm sizes at or below this are left unscaled
    pub const PALM_SIZE_EPSILON: f32 = 0.001;
}

/// Classifier defaults
pub mod classifier {
    pub const DEFAULT_K: usize = 3;
    pub const DEFAULT_DOWNSAMPLE_LENGTH: usize = 20;
    pub const DEFAULT_USE_CENTROIDS: bool = true;
    pub const MAX_K: usize = 64;
    pub const MAX_DOWNSAMPLE_LENGTH: usize = 1024;

    /// Label reported when there is nothing to compare against
    pub const UNKNOWN_LABEL: &str = "Unknown";
    pub const MODEL_TYPE: &str = "DTW_KNN";

    /// Added to the distance range before rescaling
    pub const CONFIDENCE_RANGE_EPSILON: f64 = 1e-8;
}

/// DTW band constants
pub mod dtw {
    /// Default Sakoe-Chiba half-width is max(n, m) / BAND_DIVISOR + 1
    pub const DEFAULT_BAND_DIVISOR: usize = 4;
}

/// Model artifact framing
pub mod artifact {
    pub const MAGIC: [u8; 4] = *b"GDTW";
    /// Version 1 artifacts never carry centroids
    pub const FORMAT_VERSION_NO_CENTROIDS: u16 = 1;
    pub const FORMAT_VERSION: u16 = 2;
}

/// Default filesystem layout
pub mod paths {
    pub const DEFAULT_GESTURES_DIR: &str = "gesture_workflow/gestures";
    pub const DEFAULT_MODELS_DIR: &str = "gesture_workflow/models";
    pub const DEFAULT_MODEL_FILE: &str = "gesture_model.bin";
    pub const DEFAULT_INFO_FILE: &str = "model_info.json";
    pub const DEFAULT_CLASSES_FILE: &str = "gesture_workflow/classes.json";
    pub const SEQUENCE_FILE_EXTENSION: &str = "json";

    pub const SYSTEM_CONFIG_PATH: &str = "/etc/gesture-core/config.toml";
    pub const USER_CONFIG_DIR: &str = ".config/gesture-core";
    pub const DEFAULT_CONFIG_FILE: &str = "config/default.toml";
    pub const LOCAL_CONFIG_FILE: &str = "config/local.toml";

    /// Prefix for environment overrides, e.g. GESTURE_CLASSIFIER_K
    pub const ENV_PREFIX: &str = "GESTURE_";
}

/// Streaming protocol
pub mod stream {
    pub const QUIT_COMMANDS: &[&str] = &["quit", "exit"];
}
