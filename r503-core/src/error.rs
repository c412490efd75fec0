//! Error types for r503-core

/// Result type alias for core protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame is too short to carry its declared payload
    #[error("Frame too short: expected at least {expected} bytes, got {actual} bytes")]
    FrameTooShort { expected: usize, actual: usize },

    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    ChecksumMismatch { expected: u16, received: u16 },

    /// Unknown packet id tag
    #[error("Unknown packet id: 0x{0:02X}")]
    UnknownPacketId(u8),

    /// Frame payload is empty where a confirmation code was expected
    #[error("Frame carries no confirmation code")]
    EmptyPayload,
}
