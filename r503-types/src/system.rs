//! System parameter block returned by ReadSysPara

use bytes::Buf;
use std::fmt;

use crate::error::{Error, Result};

bitflags::bitflags! {
    /// Packed status word at the head of the system parameter block
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct SystemStatus: u16 {
        /// Module is busy executing another command
        const BUSY = 1 << 0;
        /// A matching finger was found by the last match operation
        const MATCH_FOUND = 1 << 1;
        /// Handshake password has been verified
        const PASSWORD_OK = 1 << 2;
        /// Image buffer contains a valid image
        const IMAGE_VALID = 1 << 3;
    }
}

/// System status and basic configuration
///
/// Sizes reported by the module are codes, not byte counts; the accessor
/// methods convert them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemParameters {
    /// Packed status word
    pub status: SystemStatus,

    /// System identifier code, a constant 0x0009 on this module family
    pub system_id: u16,

    /// Finger library capacity
    pub library_size: u16,

    /// Security level, 1-5
    pub security_level: u16,

    /// Configured module address
    pub device_address: u32,

    /// Data packet size code, 0-3
    pub packet_size_code: u16,

    /// Baud rate as a multiple of 9600
    pub baud_code: u16,
}

impl SystemParameters {
    /// Size of the parameter block on the wire
    pub const SIZE: usize = 16;

    /// Parse the 16-byte ReadSysPara payload (big-endian fields)
    pub fn parse(mut payload: &[u8]) -> Result<Self> {
        if payload.len() < Self::SIZE {
            return Err(Error::short("system parameters", Self::SIZE, payload.len()));
        }

        Ok(Self {
            status: SystemStatus::from_bits_retain(payload.get_u16()),
            system_id: payload.get_u16(),
            library_size: payload.get_u16(),
            security_level: payload.get_u16(),
            device_address: payload.get_u32(),
            packet_size_code: payload.get_u16(),
            baud_code: payload.get_u16(),
        })
    }

    /// Data packet size in bytes, or `None` for an out-of-range code
    pub fn packet_length(&self) -> Option<u16> {
        match self.packet_size_code {
            code @ 0..=3 => Some(32 << code),
            _ => None,
        }
    }

    /// Baud rate in bits per second
    pub fn baud_rate(&self) -> u32 {
        self.baud_code as u32 * 9_600
    }
}

impl fmt::Display for SystemParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SysPara[addr=0x{:08X}, lib={}, sec={}, pkt={:?}, baud={}]",
            self.device_address,
            self.library_size,
            self.security_level,
            self.packet_length(),
            self.baud_rate()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_payload() -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&0x000Cu16.to_be_bytes()); // password ok + image valid
        p.extend_from_slice(&0x0009u16.to_be_bytes());
        p.extend_from_slice(&200u16.to_be_bytes());
        p.extend_from_slice(&3u16.to_be_bytes());
        p.extend_from_slice(&0xFFFF_FFFFu32.to_be_bytes());
        p.extend_from_slice(&2u16.to_be_bytes());
        p.extend_from_slice(&6u16.to_be_bytes());
        p
    }

    #[test]
    fn test_parse_system_parameters() {
        let params = SystemParameters::parse(&sample_payload()).unwrap();

        assert!(params.status.contains(SystemStatus::PASSWORD_OK));
        assert!(params.status.contains(SystemStatus::IMAGE_VALID));
        assert!(!params.status.contains(SystemStatus::BUSY));
        assert_eq!(params.system_id, 0x0009);
        assert_eq!(params.library_size, 200);
        assert_eq!(params.security_level, 3);
        assert_eq!(params.device_address, 0xFFFF_FFFF);
        assert_eq!(params.packet_length(), Some(128));
        assert_eq!(params.baud_rate(), 57_600);
    }

    #[test]
    fn test_parse_short_payload() {
        let result = SystemParameters::parse(&[0x00; 10]);
        assert!(result.is_err());
    }

    #[test]
    fn test_packet_length_codes() {
        let mut payload = sample_payload();
        for (code, len) in [(0u16, 32u16), (1, 64), (2, 128), (3, 256)] {
            payload[12..14].copy_from_slice(&code.to_be_bytes());
            let params = SystemParameters::parse(&payload).unwrap();
            assert_eq!(params.packet_length(), Some(len));
        }
        payload[12..14].copy_from_slice(&9u16.to_be_bytes());
        assert_eq!(SystemParameters::parse(&payload).unwrap().packet_length(), None);
    }
}
