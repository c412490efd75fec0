//! Multi-packet bulk transfers
//!
//! Uploads arrive as one acknowledge frame followed by a run of Data frames
//! and a final EndOfData frame, all back to back. The transport drains the
//! whole burst in one bounded read; reassembly then splits the capture on
//! the frame marker (header plus module address) and strips the per-frame
//! framing, concatenating the raw payload bytes.
//!
//! Downloads are the reverse: one trigger command, then the data chunked by
//! the negotiated packet length into Data frames closed by an EndOfData
//! frame.

use bytes::{Bytes, BytesMut};
use tracing::{debug, warn};

use r503_core::{constants, ConfirmationCode, Frame, Instruction, PacketId, HEADER, PREFIX_SIZE};

use crate::error::{Error, Result};
use crate::session::{Outcome, Session};

/// Split `buf` on every occurrence of `marker`, python-str-split style:
/// the text before the first marker is a segment too, even when empty.
fn split_on_marker<'a>(buf: &'a [u8], marker: &[u8]) -> Vec<&'a [u8]> {
    let mut segments = Vec::new();
    let mut rest = buf;

    while let Some(pos) = rest
        .windows(marker.len())
        .position(|window| window == marker)
    {
        segments.push(&rest[..pos]);
        rest = &rest[pos + marker.len()..];
    }
    segments.push(rest);

    segments
}

/// Reassemble the data payloads out of a captured upload burst.
///
/// The first two split segments are the empty prefix and the acknowledge
/// frame; each remaining segment is one Data/EndOfData frame minus its
/// marker, so the packet id, length field and trailing checksum are
/// stripped before concatenation. Runt segments are dropped.
fn reassemble(buf: &[u8], address: u32) -> Bytes {
    let mut marker = [0u8; 6];
    marker[..2].copy_from_slice(&HEADER.to_be_bytes());
    marker[2..].copy_from_slice(&address.to_be_bytes());

    let mut data = BytesMut::new();
    for segment in split_on_marker(buf, &marker).into_iter().skip(2) {
        if segment.len() < 5 {
            warn!("Dropping {}-byte runt segment in bulk transfer", segment.len());
            continue;
        }
        data.extend_from_slice(&segment[3..segment.len() - 2]);
    }

    data.freeze()
}

impl Session {
    fn upload(
        &mut self,
        instruction: Instruction,
        args: &[u8],
        limit: usize,
    ) -> Result<Outcome<Bytes>> {
        let frame = Frame::command(self.address(), instruction, args);
        debug!("Sending {} (bulk upload, limit {} bytes)", instruction, limit);

        let timeout = self.bulk_timeout();
        self.transport_mut().write_all(&frame.encode())?;
        let buf = self.transport_mut().read_bulk(limit, timeout)?;

        if buf.len() <= PREFIX_SIZE {
            return Err(Error::ShortResponse);
        }

        let code = ConfirmationCode::from_raw(buf[PREFIX_SIZE]);
        if !code.is_success() {
            return Ok(Outcome::failure(code));
        }

        let data = reassemble(&buf, self.address());
        debug!("{} reassembled {} data bytes", instruction, data.len());
        Ok(Outcome::new(code, data))
    }

    fn download(
        &mut self,
        instruction: Instruction,
        args: &[u8],
        data: &[u8],
    ) -> Result<ConfirmationCode> {
        let code = self.transact(instruction, args)?.code;
        if !code.is_success() {
            return Ok(code);
        }

        let chunk_size = self.packet_length() as usize;
        let address = self.address();
        let chunks: Vec<&[u8]> = if data.is_empty() {
            vec![&[]]
        } else {
            data.chunks(chunk_size).collect()
        };

        let last = chunks.len() - 1;
        for (i, chunk) in chunks.into_iter().enumerate() {
            let packet_id = if i == last {
                PacketId::EndOfData
            } else {
                PacketId::Data
            };
            let frame = Frame::new(address, packet_id, Bytes::copy_from_slice(chunk));
            self.transport_mut().write_all(&frame.encode())?;
        }

        debug!("{} streamed {} data bytes", instruction, data.len());
        Ok(code)
    }

    /// Upload the image buffer's contents as raw image data
    pub fn up_image(&mut self) -> Result<Outcome<Bytes>> {
        self.upload(Instruction::UpImage, &[], constants::BULK_READ_LIMIT)
    }

    /// Upload the template held in a character buffer
    pub fn up_char(&mut self, buffer_id: u8) -> Result<Outcome<Bytes>> {
        self.upload(Instruction::UpChar, &[buffer_id], constants::BULK_READ_LIMIT)
    }

    /// Read the 512-byte flash information page
    pub fn read_info_page(&mut self) -> Result<Outcome<Bytes>> {
        self.upload(Instruction::ReadInfPage, &[], constants::INFO_PAGE_READ_LIMIT)
    }

    /// Download raw image data into the image buffer
    pub fn down_image(&mut self, data: &[u8]) -> Result<ConfirmationCode> {
        self.download(Instruction::DownImage, &[], data)
    }

    /// Download a template into a character buffer
    pub fn down_char(&mut self, buffer_id: u8, data: &[u8]) -> Result<ConfirmationCode> {
        self.download(Instruction::DownChar, &[buffer_id], data)
    }
}
