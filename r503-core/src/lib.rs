//! # r503-core
//!
//! Core protocol implementation for the GROW R503 fingerprint sensor.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/decoding
//! - Checksum calculation
//! - Instruction and confirmation code definitions
//! - Protocol constants

pub mod checksum;
pub mod confirmation;
pub mod constants;
pub mod error;
pub mod frame;
pub mod instruction;

pub use confirmation::ConfirmationCode;
pub use error::{Error, Result};
pub use frame::{Frame, PacketId};
pub use instruction::Instruction;

/// Frame header constant, always the first two bytes on the wire
pub const HEADER: u16 = 0xEF01;

/// Fixed prefix size: header (2) + address (4) + packet id (1) + length (2)
pub const PREFIX_SIZE: usize = 9;
