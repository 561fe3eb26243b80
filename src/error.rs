// src/error.rs
//! Unified error handling for Gesture Core
//!
//! Every fallible operation in the crate returns [`GestureResult`]. Errors carry an
//! [`ErrorContext`] naming the component and operation that failed so a caller can
//! tell a missing model apart from a corrupt one without string matching.
//!
//! Note that several situations are deliberately *not* errors: malformed hand data
//! becomes a zero pose, and classifying against an empty model yields the unknown
//! sentinel result. See [`crate::classifier`] and [`crate::landmarks`].

use std::error::Error;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::utils::integrity::IntegrityError;

/// Unified error type for the gesture recognition core
#[derive(Debug, thiserror::Error)]
pub enum GestureError {
    /// Configuration and setup errors
    #[error("[CONFIG] Configuration error in {component}: {reason} ({})", .context.operation)]
    Configuration {
        component: String,
        reason: String,
        context: ErrorContext,
    },

    /// Invalid input data that could not be recovered locally
    #[error("[DATA] Invalid {data_type}: {reason}{} ({})", expectation(.expected, .actual), .context.operation)]
    InvalidData {
        data_type: String,
        reason: String,
        expected: Option<String>,
        actual: Option<String>,
        context: ErrorContext,
    },

    /// Model artifact is missing, truncated or structurally invalid
    #[error("[MODEL] Failed to load model from {}: {reason}", .path.display())]
    ModelLoad {
        path: PathBuf,
        reason: String,
        context: ErrorContext,
    },

    /// Model artifact could not be written
    #[error("[MODEL] Failed to save model to {}: {reason}", .path.display())]
    ModelSave {
        path: PathBuf,
        reason: String,
        context: ErrorContext,
    },

    /// Template corpus problems that abort a whole training run
    #[error("[CORPUS] {reason} ({})", .path.display())]
    Corpus {
        path: PathBuf,
        reason: String,
        context: ErrorContext,
    },

    /// Checksum or framing failures
    #[error("[INTEGRITY] {0}")]
    Integrity(#[from] IntegrityError),

    /// Filesystem and stream errors
    #[error("[IO] {} failed during {}: {source}", describe_path(.path), .context.operation)]
    Io {
        path: Option<PathBuf>,
        source: std::io::Error,
        context: ErrorContext,
    },

    /// JSON / TOML encoding errors
    #[error("[SERDE] {format} error: {reason} ({})", .context.operation)]
    Serialization {
        format: &'static str,
        reason: String,
        context: ErrorContext,
    },

    /// Errors converted from foreign error types
    #[error("[SYSTEM] {subsystem} error: {reason} ({})", .context.operation)]
    System {
        subsystem: String,
        reason: String,
        context: ErrorContext,
    },
}

fn expectation(expected: &Option<String>, actual: &Option<String>) -> String {
    match (expected, actual) {
        (Some(exp), Some(act)) => format!(" (expected: {}, got: {})", exp, act),
        _ => String::new(),
    }
}

fn describe_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!("I/O on {}", p.display()),
        None => "I/O".to_string(),
    }
}

/// Error context for debugging and analysis
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub timestamp: SystemTime,
    pub component: String,
    pub operation: String,
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            component: component.to_string(),
            operation: operation.to_string(),
            file: None,
            line: None,
        }
    }

    /// Create error context with file and line information
    pub fn with_location(component: &str, operation: &str, file: &'static str, line: u32) -> Self {
        let mut context = Self::new(component, operation);
        context.file = Some(file);
        context.line = Some(line);
        context
    }
}

/// Macro for creating error context with file and line info
#[macro_export]
macro_rules! error_context {
    ($component:expr, $operation:expr) => {
        $crate::error::ErrorContext::with_location($component, $operation, file!(), line!())
    };
}

/// Result type alias for gesture operations
pub type GestureResult<T> = Result<T, GestureError>;

impl GestureError {
    /// Wrap an I/O error that happened on a known path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error, context: ErrorContext) -> Self {
        GestureError::Io {
            path: Some(path.into()),
            source,
            context,
        }
    }

    /// True for the load failures a caller must treat as "no usable model"
    pub fn is_model_load(&self) -> bool {
        matches!(self, GestureError::ModelLoad { .. })
    }

    /// Context of the failing operation, when the variant carries one
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            GestureError::Configuration { context, .. }
            | GestureError::InvalidData { context, .. }
            | GestureError::ModelLoad { context, .. }
            | GestureError::ModelSave { context, .. }
            | GestureError::Corpus { context, .. }
            | GestureError::Io { context, .. }
            | GestureError::Serialization { context, .. }
            | GestureError::System { context, .. } => Some(context),
            GestureError::Integrity(_) => None,
        }
    }
}

impl From<serde_json::Error> for GestureError {
    fn from(err: serde_json::Error) -> Self {
        GestureError::Serialization {
            format: "JSON",
            reason: err.to_string(),
            context: error_context!("serde_json", "json_codec"),
        }
    }
}

/// Error builder for convenient error construction
pub struct GestureErrorBuilder {
    component: String,
    operation: String,
}

impl GestureErrorBuilder {
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn configuration(self, reason: &str) -> GestureError {
        let context = ErrorContext::new(&self.component, &self.operation);

        GestureError::Configuration {
            component: self.component,
            reason: reason.to_string(),
            context,
        }
    }

    pub fn invalid_data(self, data_type: &str, reason: &str) -> GestureError {
        GestureError::InvalidData {
            data_type: data_type.to_string(),
            reason: reason.to_string(),
            expected: None,
            actual: None,
            context: ErrorContext::new(&self.component, &self.operation),
        }
    }

    pub fn mismatch(self, data_type: &str, reason: &str, expected: impl ToString, actual: impl ToString) -> GestureError {
        GestureError::InvalidData {
            data_type: data_type.to_string(),
            reason: reason.to_string(),
            expected: Some(expected.to_string()),
            actual: Some(actual.to_string()),
            context: ErrorContext::new(&self.component, &self.operation),
        }
    }

    pub fn model_load(self, path: impl Into<PathBuf>, reason: &str) -> GestureError {
        GestureError::ModelLoad {
            path: path.into(),
            reason: reason.to_string(),
            context: ErrorContext::new(&self.component, &self.operation),
        }
    }

    pub fn model_save(self, path: impl Into<PathBuf>, reason: &str) -> GestureError {
        GestureError::ModelSave {
            path: path.into(),
            reason: reason.to_string(),
            context: ErrorContext::new(&self.component, &self.operation),
        }
    }

    pub fn corpus(self, path: impl Into<PathBuf>, reason: &str) -> GestureError {
        GestureError::Corpus {
            path: path.into(),
            reason: reason.to_string(),
            context: ErrorContext::new(&self.component, &self.operation),
        }
    }
}

/// Convenience trait for error building
pub trait IntoGestureError<T> {
    fn gesture_err(self, component: &str, operation: &str) -> GestureResult<T>;
}

impl<T, E> IntoGestureError<T> for Result<T, E>
where
    E: Error + Send + Sync + 'static,
{
    fn gesture_err(self, component: &str, operation: &str) -> GestureResult<T> {
        self.map_err(|err| GestureError::System {
            subsystem: component.to_string(),
            reason: err.to_string(),
            context: ErrorContext::new(component, operation),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context_creation() {
        let context = ErrorContext::new("test_component", "test_operation");
        assert_eq!(context.component, "test_component");
        assert_eq!(context.operation, "test_operation");
        assert!(context.timestamp <= SystemTime::now());
    }

    #[test]
    fn test_error_context_macro_records_location() {
        let context = error_context!("store", "load");
        assert_eq!(context.file, Some(file!()));
        assert!(context.line.is_some());
    }

    #[test]
    fn test_error_builder() {
        let err = GestureErrorBuilder::new("config", "validate").configuration("k must be positive");

        match err {
            GestureError::Configuration { component, reason, .. } => {
                assert_eq!(component, "config");
                assert_eq!(reason, "k must be positive");
            }
            _ => panic!("Expected configuration error"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = GestureErrorBuilder::new("store", "decode").mismatch("sequence", "width mismatch", 126, 63);
        let display = format!("{}", err);
        assert!(display.contains("sequence"));
        assert!(display.contains("expected: 126"));
        assert!(display.contains("got: 63"));

        let err = GestureErrorBuilder::new("store", "load").model_load("/tmp/missing.bin", "file not found");
        assert!(err.is_model_load());
        assert!(format!("{}", err).contains("/tmp/missing.bin"));
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GestureError>();
    }

    #[test]
    fn test_io_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = GestureError::io("/tmp/x.json", io, ErrorContext::new("corpus", "read"));
        assert!(err.source().is_some());
        assert_eq!(err.context().map(|c| c.operation.as_str()), Some("read"));
    }

    #[test]
    fn test_into_gesture_error_trait() {
        let result: Result<i32, std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "test error"));

        match result.gesture_err("test_component", "test_operation").unwrap_err() {
            GestureError::System { subsystem, reason, .. } => {
                assert_eq!(subsystem, "test_component");
                assert!(reason.contains("test error"));
            }
            _ => panic!("Expected system error"),
        }
    }
}
