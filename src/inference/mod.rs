//! Batch and streaming classification front ends

pub mod batch;
pub mod stream;

pub use batch::{classify_file, classify_frames, classify_with_model, ClassificationRecord, ErrorRecord};
pub use stream::{handle_line, run_stream, write_line, StatusRecord, StreamRequest, StreamStats};
