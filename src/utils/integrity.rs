//! Data integrity utilities for Gesture Core
//!
//! Provides the framing used around persisted model artifacts:
//! - CRC-32 calculation and verification
//! - Magic/version header construction
//! - Truncation and corruption detection on read
//!
//! Frame layout (all integers little-endian):
//!
//! ```text
//! | magic (4) | version u16 | reserved u16 | payload len u64 | crc32 u32 | payload ... |
//! ```

use std::fmt;

/// Size of the fixed frame header in bytes
pub const FRAME_HEADER_LEN: usize = 4 + 2 + 2 + 8 + 4;

/// Data integrity error types
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrityError {
    /// CRC mismatch
    CrcMismatch {
        expected: u32,
        actual: u32,
        context: String,
    },
    /// Header magic does not identify a known frame
    BadMagic {
        expected: [u8; 4],
        actual: Vec<u8>,
    },
    /// Frame written by an incompatible format version
    UnsupportedVersion {
        version: u16,
        max_supported: u16,
    },
    /// Invalid data length for integrity check
    InvalidLength {
        actual: usize,
        expected: usize,
        context: String,
    },
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityError::CrcMismatch { expected, actual, context } => {
                write!(f, "CRC-32 mismatch in {}: expected 0x{:08X}, got 0x{:08X}", context, expected, actual)
            }
            IntegrityError::BadMagic { expected, actual } => {
                write!(f, "Bad frame magic: expected {:02X?}, got {:02X?}", expected, actual)
            }
            IntegrityError::UnsupportedVersion { version, max_supported } => {
                write!(f, "Unsupported frame version {} (newest supported: {})", version, max_supported)
            }
            IntegrityError::InvalidLength { actual, expected, context } => {
                write!(f, "Invalid data length in {}: actual {}, expected {}", context, actual, expected)
            }
        }
    }
}

impl std::error::Error for IntegrityError {}

/// Result type for integrity operations
pub type IntegrityResult<T> = Result<T, IntegrityError>;

/// Calculate CRC-32 (IEEE 802.3)
pub fn calculate_crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Verify CRC-32 (IEEE 802.3)
pub fn verify_crc32(data: &[u8], expected: u32, context: &str) -> IntegrityResult<()> {
    let actual = calculate_crc32(data);

    if actual != expected {
        return Err(IntegrityError::CrcMismatch {
            expected,
            actual,
            context: context.to_string(),
        });
    }

    Ok(())
}

/// Wrap a payload in a checksummed frame
pub fn frame_payload(magic: [u8; 4], version: u16, payload: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    framed.extend_from_slice(&magic);
    framed.extend_from_slice(&version.to_le_bytes());
    framed.extend_from_slice(&0u16.to_le_bytes());
    framed.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    framed.extend_from_slice(&calculate_crc32(payload).to_le_bytes());
    framed.extend_from_slice(payload);
    framed
}

/// Validate a frame and return its version and payload
///
/// Versions above `max_version` are rejected; older versions are returned so the
/// caller can decide how to upgrade them.
pub fn unframe_payload<'a>(
    framed: &'a [u8],
    magic: [u8; 4],
    max_version: u16,
    context: &str,
) -> IntegrityResult<(u16, &'a [u8])> {
    if framed.len() < FRAME_HEADER_LEN {
        return Err(IntegrityError::InvalidLength {
            actual: framed.len(),
            expected: FRAME_HEADER_LEN,
            context: format!("{}: frame header", context),
        });
    }

    if framed[0..4] != magic {
        return Err(IntegrityError::BadMagic {
            expected: magic,
            actual: framed[0..4].to_vec(),
        });
    }

    let version = u16::from_le_bytes([framed[4], framed[5]]);
    if version == 0 || version > max_version {
        return Err(IntegrityError::UnsupportedVersion {
            version,
            max_supported: max_version,
        });
    }

    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&framed[8..16]);
    let declared_len = u64::from_le_bytes(len_bytes) as usize;

    let mut crc_bytes = [0u8; 4];
    crc_bytes.copy_from_slice(&framed[16..20]);
    let expected_crc = u32::from_le_bytes(crc_bytes);

    let payload = &framed[FRAME_HEADER_LEN..];
    if payload.len() != declared_len {
        return Err(IntegrityError::InvalidLength {
            actual: payload.len(),
            expected: declared_len,
            context: format!("{}: payload", context),
        });
    }

    verify_crc32(payload, expected_crc, context)?;

    Ok((version, payload))
}
