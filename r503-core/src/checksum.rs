//! R503 frame checksum
//!
//! The checksum is the unsigned sum of every byte from the packet id
//! through the end of the payload (the length field included), truncated
//! to 16 bits and transmitted big-endian.

use tracing::trace;

/// Calculate the checksum for a frame with the given packet id and payload.
///
/// The two-byte length field covered by the sum is derived from the payload
/// (`payload length + 2` checksum bytes), so callers only pass the parts
/// that vary.
pub fn calculate(packet_id: u8, payload: &[u8]) -> u16 {
    let length = payload.len() as u16 + 2;

    let mut sum = packet_id as u32;
    sum += length.to_be_bytes().iter().map(|b| *b as u32).sum::<u32>();
    sum += payload.iter().map(|b| *b as u32).sum::<u32>();

    let checksum = sum as u16;

    trace!(
        packet_id = packet_id,
        payload_len = payload.len(),
        checksum = format!("0x{:04X}", checksum),
        "Calculated checksum"
    );

    checksum
}

/// Verify a received checksum
pub fn verify(packet_id: u8, payload: &[u8], expected: u16) -> bool {
    calculate(packet_id, payload) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_empty_payload() {
        // packet id 0x01, length 0x0002
        assert_eq!(calculate(0x01, &[]), 0x0003);
    }

    #[test]
    fn test_checksum_known_command() {
        // ReadSysPara command payload: instruction 0x0F, length 0x0003
        assert_eq!(calculate(0x01, &[0x0F]), 0x01 + 0x03 + 0x0F);
    }

    #[test]
    fn test_checksum_truncates_to_16_bits() {
        let payload = vec![0xFF; 1000];
        let checksum = calculate(0x02, &payload);

        let full: u32 = 0x02 + 0x03 + 0xEA + 1000 * 0xFF;
        assert_eq!(checksum, full as u16);
    }

    #[test]
    fn test_checksum_verify() {
        let payload = [0xAB, 0xCD];
        let checksum = calculate(0x01, &payload);

        assert!(verify(0x01, &payload, checksum));
        assert!(!verify(0x01, &payload, checksum.wrapping_add(1)));
    }
}
