//! Common utility functions for Gesture Core
//!
//! - Data integrity framing for persisted artifacts

pub mod integrity;

pub use integrity::{
    calculate_crc32,
    verify_crc32,
    frame_payload,
    unframe_payload,
    IntegrityError,
    IntegrityResult,
};
