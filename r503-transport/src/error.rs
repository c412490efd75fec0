//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested bytes did not arrive before the deadline
    #[error("Read timeout: got {actual} of {expected} bytes")]
    Timeout { expected: usize, actual: usize },

    /// Underlying I/O fault
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failed to open or reconfigure the port
    #[error("Serial port error: {0}")]
    Port(String),
}
