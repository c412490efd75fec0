//! Product information page returned by ReadProdInfo

use bytes::Buf;
use std::fmt;

use crate::error::{Error, Result};

/// Fixed-width product information fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    /// Module model, e.g. "R503"
    pub module_type: String,

    /// Production batch number
    pub batch_number: String,

    /// Module serial number
    pub serial_number: String,

    /// Hardware version, major then minor
    pub hardware_version: (u8, u8),

    /// Sensor type identifier
    pub sensor_type: String,

    /// Sensor image width in pixels
    pub image_width: u16,

    /// Sensor image height in pixels
    pub image_height: u16,

    /// Template size code
    pub template_size: u16,

    /// Fingerprint database capacity
    pub database_size: u16,
}

impl ProductInfo {
    /// Size of the product info block on the wire
    pub const SIZE: usize = 46;

    /// Parse the 46-byte ReadProdInfo payload
    pub fn parse(payload: &[u8]) -> Result<Self> {
        if payload.len() < Self::SIZE {
            return Err(Error::short("product info", Self::SIZE, payload.len()));
        }

        let mut tail = &payload[38..];

        Ok(Self {
            module_type: ascii_field(&payload[..16]),
            batch_number: ascii_field(&payload[16..20]),
            serial_number: ascii_field(&payload[20..28]),
            hardware_version: (payload[28], payload[29]),
            sensor_type: ascii_field(&payload[30..38]),
            image_width: tail.get_u16(),
            image_height: tail.get_u16(),
            template_size: tail.get_u16(),
            database_size: tail.get_u16(),
        })
    }
}

/// Decode a fixed-width field, dropping NUL padding and non-ASCII bytes
fn ascii_field(bytes: &[u8]) -> String {
    bytes
        .iter()
        .filter(|b| b.is_ascii() && **b != 0)
        .map(|b| *b as char)
        .collect()
}

impl fmt::Display for ProductInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[SN: {}, HW: {}.{}, {}x{}]",
            self.module_type,
            self.serial_number,
            self.hardware_version.0,
            self.hardware_version.1,
            self.image_width,
            self.image_height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_payload() -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(b"R503\0\0\0\0\0\0\0\0\0\0\0\0");
        p.extend_from_slice(b"1024");
        p.extend_from_slice(b"00000042");
        p.extend_from_slice(&[1, 2]);
        p.extend_from_slice(b"GR192\0\0\0");
        p.extend_from_slice(&192u16.to_be_bytes());
        p.extend_from_slice(&192u16.to_be_bytes());
        p.extend_from_slice(&1536u16.to_be_bytes());
        p.extend_from_slice(&200u16.to_be_bytes());
        p
    }

    #[test]
    fn test_parse_product_info() {
        let info = ProductInfo::parse(&sample_payload()).unwrap();

        assert_eq!(info.module_type, "R503");
        assert_eq!(info.batch_number, "1024");
        assert_eq!(info.serial_number, "00000042");
        assert_eq!(info.hardware_version, (1, 2));
        assert_eq!(info.sensor_type, "GR192");
        assert_eq!(info.image_width, 192);
        assert_eq!(info.image_height, 192);
        assert_eq!(info.template_size, 1536);
        assert_eq!(info.database_size, 200);
    }

    #[test]
    fn test_parse_short_payload() {
        assert!(ProductInfo::parse(&[0u8; 20]).is_err());
    }
}
