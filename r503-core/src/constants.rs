//! Protocol constants

/// Broadcast module address, the factory default
pub const DEFAULT_ADDRESS: u32 = 0xFFFF_FFFF;

/// Factory default handshake password
pub const DEFAULT_PASSWORD: u32 = 0;

/// Factory default baud rate
pub const DEFAULT_BAUD: u32 = 57_600;

/// Factory default data packet length in bytes
pub const DEFAULT_PACKET_LENGTH: u16 = 128;

/// Baud rates are configured as multiples of this unit
pub const BAUD_UNIT: u32 = 9_600;

/// Number of template pages in the flash library
pub const LIBRARY_CAPACITY: u16 = 200;

/// Number of index table pages (each covers 256 slots)
pub const INDEX_PAGE_COUNT: u8 = 4;

/// Number of notepad pages
pub const NOTEPAD_PAGE_COUNT: u8 = 16;

/// Size of one notepad page in bytes
pub const NOTEPAD_PAGE_SIZE: usize = 32;

/// Upper bound on a bulk upload read; an image is around 20 KB
pub const BULK_READ_LIMIT: usize = 22_000;

/// Upper bound on an information page read
pub const INFO_PAGE_READ_LIMIT: usize = 580;

/// System parameter register numbers for the SetSysPara instruction
pub mod registers {
    /// Baud rate control register
    pub const BAUD: u8 = 4;

    /// Security level register
    pub const SECURITY: u8 = 5;

    /// Data packet length register
    pub const PACKET_LENGTH: u8 = 6;
}

/// Baud rate divisor for the SetSysPara baud register, or `None` if the
/// rate is not one the module accepts
pub fn baud_divisor(baud: u32) -> Option<u8> {
    match baud {
        9_600 => Some(1),
        19_200 => Some(2),
        38_400 => Some(4),
        57_600 => Some(6),
        115_200 => Some(12),
        _ => None,
    }
}

/// Packet length code for the SetSysPara packet-length register, or `None`
/// if the length is not one the module accepts
pub fn packet_length_code(length: u16) -> Option<u8> {
    match length {
        32 => Some(0),
        64 => Some(1),
        128 => Some(2),
        256 => Some(3),
        _ => None,
    }
}

/// Packet length in bytes for a packet-size code reported by the module
pub fn packet_length_from_code(code: u16) -> Option<u16> {
    match code {
        0 => Some(32),
        1 => Some(64),
        2 => Some(128),
        3 => Some(256),
        _ => None,
    }
}

/// Whether a security level is one of the five the module accepts
pub fn valid_security_level(level: u8) -> bool {
    (1..=5).contains(&level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baud_divisors() {
        assert_eq!(baud_divisor(57_600), Some(6));
        assert_eq!(baud_divisor(115_200), Some(12));
        assert_eq!(baud_divisor(12_345), None);
    }

    #[test]
    fn test_packet_length_codes_round_trip() {
        for len in [32u16, 64, 128, 256] {
            let code = packet_length_code(len).unwrap();
            assert_eq!(packet_length_from_code(code as u16), Some(len));
        }
        assert_eq!(packet_length_code(100), None);
        assert_eq!(packet_length_from_code(7), None);
    }

    #[test]
    fn test_security_levels() {
        assert!(valid_security_level(1));
        assert!(valid_security_level(5));
        assert!(!valid_security_level(0));
        assert!(!valid_security_level(6));
    }
}
