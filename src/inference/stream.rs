//! Line-oriented streaming classification
//!
//! Input is newline-delimited JSON requests, output one JSON line per request in
//! the same order, flushed after each. The first output line is a status record.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use crate::classifier::DtwClassifier;
use crate::config::constants::classifier::{MODEL_TYPE, UNKNOWN_LABEL};
use crate::config::StreamConfig;
use crate::error::{GestureError, GestureResult};
use crate::error_context;
use crate::inference::batch::{classify_frames, ClassificationRecord, ErrorRecord};
use crate::landmarks::FrameRecord;

/// One request line
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamRequest {
    #[serde(default)]
    pub frames: Vec<FrameRecord>,
    /// Minimum confidence to report a class
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Emitted once before any results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: String,
    pub classes: Vec<String>,
    pub model_type: String,
}

impl StatusRecord {
    pub fn loaded(classifier: &DtwClassifier) -> Self {
        Self {
            status: "loaded".to_string(),
            classes: classifier.class_names().to_vec(),
            model_type: MODEL_TYPE.to_string(),
        }
    }
}

/// Counters for a finished stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub requests: usize,
    pub classified: usize,
    pub errors: usize,
}

/// Handle a single request line
pub fn handle_line(classifier: &DtwClassifier, line: &str) -> Result<ClassificationRecord, ErrorRecord> {
    let request: StreamRequest = serde_json::from_str(line).map_err(ErrorRecord::new)?;
    let mut record = classify_frames(classifier, &request.frames).map_err(ErrorRecord::new)?;

    if let Some(threshold) = request.threshold {
        if record.result.confidence < threshold {
            record.result.predicted_class = UNKNOWN_LABEL.to_string();
        }
    }
    Ok(record)
}

/// Run until end of input or a quit command
///
/// A line that fails to decode or classify yields an error record and the stream
/// continues. Only a failing read or write ends it early.
pub fn run_stream<R, W>(classifier: &DtwClassifier, config: &StreamConfig, mut input: R, mut output: W) -> GestureResult<StreamStats>
where
    R: BufRead,
    W: Write,
{
    let _span = info_span!("stream").entered();
    let mut stats = StreamStats::default();
    let mut buf = Vec::new();

    write_line(&mut output, &StatusRecord::loaded(classifier))?;

    loop {
        buf.clear();
        let read = input.read_until(b'\n', &mut buf).map_err(|e| GestureError::Io {
            path: None,
            source: e,
            context: error_context!("stream", "read_line"),
        })?;
        if read == 0 {
            break;
        }

        let outcome = match std::str::from_utf8(&buf) {
            Ok(text) => {
                let line = text.trim();
                if line.is_empty() && config.skip_blank_lines {
                    continue;
                }
                if config.is_quit_command(line) {
                    info!("quit command received");
                    break;
                }
                handle_line(classifier, line)
            }
            Err(e) => Err(ErrorRecord::new(format!("request line is not valid UTF-8: {}", e))),
        };

        stats.requests += 1;
        match outcome {
            Ok(record) => {
                stats.classified += 1;
                write_line(&mut output, &record)?;
            }
            Err(error) => {
                stats.errors += 1;
                warn!(error = %error.error, "stream request failed");
                write_line(&mut output, &error)?;
            }
        }
    }

    info!(requests = stats.requests, errors = stats.errors, "stream finished");
    Ok(stats)
}

/// Serialize one record as a line and flush
pub fn write_line<W: Write, T: Serialize>(output: &mut W, record: &T) -> GestureResult<()> {
    let json = serde_json::to_string(record)?;
    writeln!(output, "{}", json)
        .and_then(|_| output.flush())
        .map_err(|e| GestureError::Io {
            path: None,
            source: e,
            context: error_context!("stream", "write_line"),
        })
}
