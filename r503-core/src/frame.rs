//! R503 protocol frame structure and encoding/decoding

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    checksum,
    error::{Error, Result},
    instruction::Instruction,
    HEADER, PREFIX_SIZE,
};

/// Frame role tag
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketId {
    /// Command from the host
    Command = 0x01,

    /// Intermediate chunk of a multi-packet transfer
    Data = 0x02,

    /// Acknowledge / response from the module
    Ack = 0x07,

    /// Final chunk of a multi-packet transfer
    EndOfData = 0x08,
}

impl TryFrom<u8> for PacketId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Command),
            0x02 => Ok(Self::Data),
            0x07 => Ok(Self::Ack),
            0x08 => Ok(Self::EndOfData),
            other => Err(Error::UnknownPacketId(other)),
        }
    }
}

/// A single protocol frame
///
/// # Wire layout
///
/// ```text
/// ┌──────────┬───────────┬───────────┬───────────┬───────────┬───────────┐
/// │  Header  │  Address  │ Packet id │  Length   │  Payload  │ Checksum  │
/// │  2 bytes │  4 bytes  │  1 byte   │  2 bytes  │  N bytes  │  2 bytes  │
/// │  0xEF01  │ (BE u32)  │           │ (BE u16)  │           │ (BE u16)  │
/// └──────────┴───────────┴───────────┴───────────┴───────────┴───────────┘
/// ```
///
/// All multi-byte values are big-endian. The length field counts the
/// payload plus the two checksum bytes; the checksum covers everything
/// from the packet id through the end of the payload.
///
/// # Examples
///
/// ```
/// use r503_core::{Frame, PacketId};
///
/// let frame = Frame::new(0xFFFFFFFF, PacketId::Ack, vec![0x00]);
/// let encoded = frame.encode();
/// let decoded = Frame::decode(&encoded).unwrap();
/// assert_eq!(frame, decoded);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Module address
    pub address: u32,

    /// Frame role
    pub packet_id: PacketId,

    /// Payload bytes (instruction code + arguments, or raw data)
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame
    pub fn new(address: u32, packet_id: PacketId, payload: impl Into<Bytes>) -> Self {
        Self {
            address,
            packet_id,
            payload: payload.into(),
        }
    }

    /// Create a command frame carrying an instruction code and its arguments
    pub fn command(address: u32, instruction: Instruction, args: &[u8]) -> Self {
        let mut payload = BytesMut::with_capacity(1 + args.len());
        payload.put_u8(instruction.into());
        payload.put_slice(args);

        Self::new(address, PacketId::Command, payload.freeze())
    }

    /// Declared length field: payload plus the two checksum bytes
    pub fn length(&self) -> u16 {
        self.payload.len() as u16 + 2
    }

    /// Calculate the checksum for this frame
    pub fn checksum(&self) -> u16 {
        checksum::calculate(self.packet_id as u8, &self.payload)
    }

    /// Total encoded size in bytes
    pub fn size(&self) -> usize {
        PREFIX_SIZE + self.length() as usize
    }

    /// Encode the frame to bytes
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.size());

        buf.put_u16(HEADER);
        buf.put_u32(self.address);
        buf.put_u8(self.packet_id as u8);
        buf.put_u16(self.length());
        buf.put_slice(&self.payload);
        buf.put_u16(self.checksum());

        buf
    }

    /// Decode a frame from bytes
    ///
    /// The buffer must hold the complete frame: the 9-byte prefix plus the
    /// number of bytes the length field declares. The checksum is recomputed
    /// and compared against the transmitted value. Header and address bytes
    /// are not validated against expected session values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the buffer is shorter than the declared frame size
    /// - the packet id tag is unknown
    /// - checksum verification fails
    pub fn decode(mut buf: &[u8]) -> Result<Self> {
        if buf.len() < PREFIX_SIZE + 2 {
            return Err(Error::FrameTooShort {
                expected: PREFIX_SIZE + 2,
                actual: buf.len(),
            });
        }

        let _header = buf.get_u16();
        let address = buf.get_u32();
        let packet_id = PacketId::try_from(buf.get_u8())?;
        let length = buf.get_u16() as usize;

        if buf.len() < length || length < 2 {
            return Err(Error::FrameTooShort {
                expected: PREFIX_SIZE + length,
                actual: PREFIX_SIZE + buf.len(),
            });
        }

        let payload = Bytes::copy_from_slice(&buf[..length - 2]);
        buf.advance(length - 2);
        let received = buf.get_u16();

        let calculated = checksum::calculate(packet_id as u8, &payload);
        if calculated != received {
            return Err(Error::ChecksumMismatch {
                expected: calculated,
                received,
            });
        }

        Ok(Self {
            address,
            packet_id,
            payload,
        })
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("address", &format!("0x{:08X}", self.address))
            .field("packet_id", &self.packet_id)
            .field("length", &self.length())
            .field("checksum", &format!("0x{:04X}", self.checksum()))
            .field("payload_len", &self.payload.len())
            .finish()
    }
}
