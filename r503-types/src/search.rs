//! Search and identify results

use bytes::Buf;

use crate::error::{Error, Result};

/// A library match: the page the template lives on and the match score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    /// Flash library page of the matched template
    pub page_id: u16,

    /// Similarity score reported by the module
    pub score: u16,
}

impl SearchHit {
    /// Size of a Search response payload
    pub const SIZE: usize = 4;

    /// Parse a Search response payload: page then score, big-endian
    pub fn parse(mut payload: &[u8]) -> Result<Self> {
        if payload.len() < Self::SIZE {
            return Err(Error::short("search hit", Self::SIZE, payload.len()));
        }

        Ok(Self {
            page_id: payload.get_u16(),
            score: payload.get_u16(),
        })
    }

    /// Parse an AutoIdentify response payload, which prefixes the hit with
    /// a one-byte step indicator
    pub fn parse_auto(payload: &[u8]) -> Result<Self> {
        if payload.len() < Self::SIZE + 1 {
            return Err(Error::short("identify hit", Self::SIZE + 1, payload.len()));
        }

        Self::parse(&payload[1..])
    }
}
