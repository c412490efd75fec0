//! # r503
//!
//! Driver for the GROW R503 fingerprint sensor, speaking its framed binary
//! protocol over a serial line.
//!
//! ## Features
//!
//! - Frame codec with checksum verification
//! - One-command-one-response transaction engine with per-call timeouts
//! - Multi-packet bulk transfer for image and template upload/download
//! - Manual enrollment state machine and device-side auto enroll/identify
//!
//! ## Quick start
//!
//! ```no_run
//! use r503::{Session, SerialTransport};
//!
//! fn main() -> r503::Result<()> {
//!     let transport = SerialTransport::open("/dev/ttyUSB0", 57_600)?;
//!     let mut session = Session::new(Box::new(transport));
//!
//!     let code = session.verify_pw()?;
//!     println!("Handshake: {}", code);
//!
//!     if let Some(params) = session.read_sys_para()?.value {
//!         println!("{}", params);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! Device outcomes are returned as [`ConfirmationCode`] values for the
//! caller to inspect; `Err` is reserved for transport and codec failures.
//! [`Error::confirmation`] projects those onto the uniform
//! `ConfirmationCode::NoResponse` when a single status code is wanted.

pub mod bulk;
pub mod commands;
pub mod enroll;
pub mod error;
pub mod session;

#[cfg(test)]
pub(crate) mod testutil;

// Re-exports
pub use enroll::{AutoEnrollPolicy, Clock, EnrollConfig, EnrollState, ManualEnroll, SystemClock};
pub use error::{Error, Result};
pub use session::{Outcome, Response, Session};

// Re-export protocol types
pub use r503_core::{constants, ConfirmationCode, Frame, Instruction, PacketId};
pub use r503_transport::{SerialTransport, Transport};
pub use r503_types::{IndexTable, ProductInfo, SearchHit, SystemParameters, SystemStatus};
