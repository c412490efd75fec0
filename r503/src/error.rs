//! High-level error types

use r503_core::ConfirmationCode;

pub type Result<T> = std::result::Result<T, Error>;

/// Transport-tier and codec failures.
///
/// Device-reported outcomes are *not* errors — they come back as
/// [`ConfirmationCode`] values. An `Error` means no usable response was
/// obtained at all.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] r503_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] r503_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] r503_types::Error),

    #[error("Response shorter than a frame prefix")]
    ShortResponse,
}

impl Error {
    /// Legacy single-code projection: the original driver collapsed every
    /// timeout, undersized response and checksum mismatch onto one "no
    /// usable response" status. Kept for callers that want that behavior;
    /// the enum variants stay distinct for everyone else.
    pub fn confirmation(&self) -> ConfirmationCode {
        ConfirmationCode::NoResponse
    }
}
