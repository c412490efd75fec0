//! Transport layer for the R503 protocol
//!
//! The module speaks a strictly synchronous request/response protocol over
//! an exclusively owned serial line, so the transport contract is blocking:
//! byte-exact reads with a deadline, never idle-timeout frame delimiting.

pub mod error;
pub mod serial;

pub use error::{Error, Result};
pub use serial::SerialTransport;

use bytes::BytesMut;
use std::time::Duration;

/// Transport trait for different byte-level connections
pub trait Transport: Send {
    /// Write all bytes
    fn write_all(&mut self, data: &[u8]) -> Result<()>;

    /// Read exactly `n` bytes, failing with [`Error::Timeout`] if they do
    /// not arrive within `timeout`
    fn read_exact(&mut self, n: usize, timeout: Duration) -> Result<BytesMut>;

    /// Read up to `limit` bytes, returning whatever arrived once the line
    /// goes idle or the limit is reached. Used for bulk uploads whose exact
    /// size is not known in advance.
    fn read_bulk(&mut self, limit: usize, timeout: Duration) -> Result<BytesMut>;

    /// Reconfigure the line speed
    fn set_baud(&mut self, baud: u32) -> Result<()>;
}
