//! Index table bitmap of occupied flash library slots
//!
//! The library has 200 addressable pages. Occupancy is reported as four
//! 256-bit index pages (32 bytes each); only slots 0-199 are meaningful,
//! so index page 0 already covers the whole library.

use crate::error::{Error, Result};

/// Slots covered by one index page
const SLOTS_PER_PAGE: u16 = 256;

/// One decoded index table page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTable {
    page: u8,
    bitmap: [u8; Self::SIZE],
}

impl IndexTable {
    /// Size of one index page bitmap in bytes
    pub const SIZE: usize = 32;

    /// Parse a ReadIndexTable payload for the given index page
    pub fn parse(page: u8, payload: &[u8]) -> Result<Self> {
        if payload.len() < Self::SIZE {
            return Err(Error::short("index table", Self::SIZE, payload.len()));
        }

        let mut bitmap = [0u8; Self::SIZE];
        bitmap.copy_from_slice(&payload[..Self::SIZE]);

        Ok(Self { page, bitmap })
    }

    /// Index page this table describes
    pub fn page(&self) -> u8 {
        self.page
    }

    /// Whether the given absolute slot number is occupied.
    /// Slots outside this page read as free.
    pub fn is_occupied(&self, slot: u16) -> bool {
        let base = self.page as u16 * SLOTS_PER_PAGE;
        if slot < base || slot >= base + SLOTS_PER_PAGE {
            return false;
        }

        let bit = slot - base;
        self.bitmap[(bit / 8) as usize] >> (bit % 8) & 1 != 0
    }

    /// Absolute slot numbers of every occupied location on this page
    pub fn occupied_slots(&self) -> Vec<u16> {
        let base = self.page as u16 * SLOTS_PER_PAGE;
        self.bitmap
            .iter()
            .enumerate()
            .flat_map(|(n, byte)| {
                (0..8).filter_map(move |i| {
                    (byte >> i & 1 != 0).then(|| base + 8 * n as u16 + i as u16)
                })
            })
            .collect()
    }

    /// Smallest free slot below `capacity`, or `None` when every slot this
    /// page covers (clamped to `capacity`) is taken
    pub fn first_free(&self, capacity: u16) -> Option<u16> {
        let base = self.page as u16 * SLOTS_PER_PAGE;
        let end = capacity.min(base + SLOTS_PER_PAGE);

        (base..end).find(|slot| !self.is_occupied(*slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bitmap_with(slots: &[u16]) -> Vec<u8> {
        let mut bitmap = vec![0u8; IndexTable::SIZE];
        for slot in slots {
            bitmap[(slot / 8) as usize] |= 1 << (slot % 8);
        }
        bitmap
    }

    #[test]
    fn test_decode_scattered_bits() {
        let table = IndexTable::parse(0, &bitmap_with(&[0, 3, 8, 199])).unwrap();
        assert_eq!(table.occupied_slots(), vec![0, 3, 8, 199]);
    }

    #[test]
    fn test_empty_table() {
        let table = IndexTable::parse(0, &bitmap_with(&[])).unwrap();
        assert_eq!(table.occupied_slots(), Vec::<u16>::new());
        assert_eq!(table.first_free(200), Some(0));
    }

    #[test]
    fn test_full_table_has_no_free_slot() {
        let table = IndexTable::parse(0, &bitmap_with(&(0..200).collect::<Vec<_>>())).unwrap();
        assert_eq!(table.first_free(200), None);
    }

    #[test]
    fn test_first_free_skips_occupied() {
        let table = IndexTable::parse(0, &bitmap_with(&[0, 1, 2])).unwrap();
        assert_eq!(table.first_free(200), Some(3));
    }

    #[test]
    fn test_second_page_offsets() {
        let table = IndexTable::parse(1, &bitmap_with(&[0, 5])).unwrap();
        assert_eq!(table.occupied_slots(), vec![256, 261]);
        assert!(table.is_occupied(261));
        assert!(!table.is_occupied(5));
    }

    #[test]
    fn test_parse_short_payload() {
        assert!(IndexTable::parse(0, &[0u8; 16]).is_err());
    }
}
