//! Session and transaction engine
//!
//! A [`Session`] owns the transport for the lifetime of the connection and
//! carries the module's communication settings. The protocol is strictly
//! synchronous: exactly one transaction is in flight at a time, and every
//! operation blocks the calling thread for up to its timeout. The driver
//! performs no internal locking; concurrent use needs external mutual
//! exclusion.

use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, trace};

use r503_core::{constants, ConfirmationCode, Frame, Instruction, PREFIX_SIZE};
use r503_transport::Transport;

use crate::error::{Error, Result};

/// A decoded response to one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status byte, zero on success
    pub code: ConfirmationCode,

    /// Response arguments following the status byte
    pub payload: Bytes,
}

/// A device outcome optionally carrying a decoded value.
///
/// `value` is present only when `code` is a success; a failed operation
/// still surfaces its confirmation code as an ordinary value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub code: ConfirmationCode,
    pub value: Option<T>,
}

impl<T> Outcome<T> {
    pub(crate) fn new(code: ConfirmationCode, value: T) -> Self {
        Self {
            code,
            value: Some(value),
        }
    }

    pub(crate) fn failure(code: ConfirmationCode) -> Self {
        Self { code, value: None }
    }

    /// True when the device reported success
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }
}

/// An open connection to an R503 module.
///
/// Created once per physical connection; configuration commands mutate the
/// session's settings on success only. Dropping the session (or calling
/// [`Session::into_transport`]) releases the transport.
pub struct Session {
    transport: Box<dyn Transport>,
    address: u32,
    password: u32,
    packet_length: u16,
    baud: u32,
    timeout: Duration,
    bulk_timeout: Duration,
}

impl Session {
    /// Create a session over an opened transport, with factory defaults:
    /// broadcast address, password 0, 128-byte packets, 57600 baud.
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            address: constants::DEFAULT_ADDRESS,
            password: constants::DEFAULT_PASSWORD,
            packet_length: constants::DEFAULT_PACKET_LENGTH,
            baud: constants::DEFAULT_BAUD,
            timeout: Duration::from_secs(1),
            bulk_timeout: Duration::from_secs(5),
        }
    }

    /// Set the module address
    pub fn with_address(mut self, address: u32) -> Self {
        self.address = address;
        self
    }

    /// Set the handshake password
    pub fn with_password(mut self, password: u32) -> Self {
        self.password = password;
        self
    }

    /// Set the per-transaction response timeout (default 1 s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the bulk upload timeout (default 5 s; increase for slow bauds)
    pub fn with_bulk_timeout(mut self, timeout: Duration) -> Self {
        self.bulk_timeout = timeout;
        self
    }

    /// Current module address
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Current handshake password
    pub fn password(&self) -> u32 {
        self.password
    }

    /// Negotiated data packet length in bytes
    pub fn packet_length(&self) -> u16 {
        self.packet_length
    }

    /// Current baud rate
    pub fn baud(&self) -> u32 {
        self.baud
    }

    pub(crate) fn bulk_timeout(&self) -> Duration {
        self.bulk_timeout
    }

    /// Release the underlying transport, ending the session
    pub fn into_transport(self) -> Box<dyn Transport> {
        self.transport
    }

    pub(crate) fn transport_mut(&mut self) -> &mut dyn Transport {
        self.transport.as_mut()
    }

    /// Issue one command frame and wait for exactly one response frame.
    ///
    /// Reads the fixed 9-byte prefix first to learn the declared length,
    /// then exactly that many more bytes; the response checksum is
    /// verified on decode.
    pub fn transact(&mut self, instruction: Instruction, args: &[u8]) -> Result<Response> {
        self.transact_with(instruction, args, self.timeout)
    }

    /// [`Session::transact`] with an explicit timeout for slow operations
    pub fn transact_with(
        &mut self,
        instruction: Instruction,
        args: &[u8],
        timeout: Duration,
    ) -> Result<Response> {
        let frame = Frame::command(self.address, instruction, args);
        debug!("Sending {}", instruction);

        self.transport.write_all(&frame.encode())?;
        let response = self.read_response(timeout)?;

        trace!("{} -> {}", instruction, response.code);
        Ok(response)
    }

    fn read_response(&mut self, timeout: Duration) -> Result<Response> {
        let mut buf = self.transport.read_exact(PREFIX_SIZE, timeout)?;
        let length = u16::from_be_bytes([buf[7], buf[8]]) as usize;

        let body = self.transport.read_exact(length, timeout)?;
        buf.unsplit(body);

        let frame = Frame::decode(&buf)?;
        let (code, payload) = match frame.payload.split_first() {
            Some((code, rest)) => (
                ConfirmationCode::from_raw(*code),
                frame.payload.slice_ref(rest),
            ),
            None => return Err(Error::Core(r503_core::Error::EmptyPayload)),
        };

        Ok(Response { code, payload })
    }

    // Configuration commands. Each mutates the session on success only.

    /// Verify the handshake password held by this session
    pub fn verify_pw(&mut self) -> Result<ConfirmationCode> {
        let pw = self.password.to_be_bytes();
        Ok(self.transact(Instruction::VfyPwd, &pw)?.code)
    }

    /// Set a new handshake password
    pub fn set_pw(&mut self, password: u32) -> Result<ConfirmationCode> {
        let code = self.transact(Instruction::SetPwd, &password.to_be_bytes())?.code;
        if code.is_success() {
            self.password = password;
        }
        Ok(code)
    }

    /// Set a new module address. Subsequent commands are issued to the new
    /// address.
    pub fn set_address(&mut self, address: u32) -> Result<ConfirmationCode> {
        let code = self.transact(Instruction::SetAddr, &address.to_be_bytes())?.code;
        if code.is_success() {
            debug!("Module address changed to 0x{:08X}", address);
            self.address = address;
        }
        Ok(code)
    }

    /// Set the baud rate. Unsupported rates are rejected locally with
    /// `InvalidParameter`, without contacting the device. On success the
    /// transport is reconfigured to match.
    pub fn set_baud(&mut self, baud: u32) -> Result<ConfirmationCode> {
        let Some(divisor) = constants::baud_divisor(baud) else {
            return Ok(ConfirmationCode::InvalidParameter);
        };

        let code = self
            .transact(Instruction::SetSysPara, &[constants::registers::BAUD, divisor])?
            .code;
        if code.is_success() {
            self.transport.set_baud(baud)?;
            self.baud = baud;
        }
        Ok(code)
    }

    /// Set the matching security level, 1 (loosest) to 5 (strictest)
    pub fn set_security(&mut self, level: u8) -> Result<ConfirmationCode> {
        if !constants::valid_security_level(level) {
            return Ok(ConfirmationCode::InvalidParameter);
        }

        Ok(self
            .transact(Instruction::SetSysPara, &[constants::registers::SECURITY, level])?
            .code)
    }

    /// Set the data packet length to one of 32, 64, 128 or 256 bytes.
    /// Bulk downloads chunk by this setting.
    pub fn set_pkg_length(&mut self, length: u16) -> Result<ConfirmationCode> {
        let Some(code_value) = constants::packet_length_code(length) else {
            return Ok(ConfirmationCode::InvalidParameter);
        };

        let code = self
            .transact(
                Instruction::SetSysPara,
                &[constants::registers::PACKET_LENGTH, code_value],
            )?
            .code;
        if code.is_success() {
            self.packet_length = length;
        }
        Ok(code)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("address", &format!("0x{:08X}", self.address))
            .field("packet_length", &self.packet_length)
            .field("baud", &self.baud)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ScriptedTransport;
    use pretty_assertions::assert_eq;
    use r503_core::constants::DEFAULT_ADDRESS;

    #[test]
    fn test_transact_round_trip() {
        let script = ScriptedTransport::new().ack(DEFAULT_ADDRESS, 0x00, &[0xAB, 0xCD]);
        let mut session = Session::new(script.boxed());

        let response = session.transact(Instruction::HandShake, &[]).unwrap();
        assert_eq!(response.code, ConfirmationCode::Success);
        assert_eq!(response.payload.as_ref(), &[0xAB, 0xCD]);

        // The command frame went out well-formed
        let sent = script.written();
        assert_eq!(sent.len(), 1);
        let frame = Frame::decode(&sent[0]).unwrap();
        assert_eq!(frame.payload.as_ref(), &[0x40]);
    }

    #[test]
    fn test_short_prefix_is_a_timeout() {
        let script = ScriptedTransport::new().raw(&[0xEF, 0x01, 0xFF, 0xFF, 0xFF]);
        let mut session = Session::new(script.boxed());

        let err = session.verify_pw().unwrap_err();
        assert!(matches!(
            err,
            Error::Transport(r503_transport::Error::Timeout { .. })
        ));
        assert_eq!(err.confirmation(), ConfirmationCode::NoResponse);
    }

    #[test]
    fn test_corrupt_checksum_projects_to_no_response() {
        let mut reply = Frame::new(
            DEFAULT_ADDRESS,
            r503_core::PacketId::Ack,
            vec![0x00, 0x01, 0x02],
        )
        .encode();
        let last = reply.len() - 1;
        reply[last] ^= 0xFF;

        let script = ScriptedTransport::new().raw(&reply);
        let mut session = Session::new(script.boxed());

        let err = session.handshake().unwrap_err();
        assert!(matches!(
            err,
            Error::Core(r503_core::Error::ChecksumMismatch { .. })
        ));
        // Same uniform code as the timeout above, by design
        assert_eq!(err.confirmation(), ConfirmationCode::NoResponse);
    }

    #[test]
    fn test_set_baud_rejects_unsupported_rate_locally() {
        let script = ScriptedTransport::new();
        let mut session = Session::new(script.boxed());

        let code = session.set_baud(12_345).unwrap();
        assert_eq!(code, ConfirmationCode::InvalidParameter);
        assert!(script.written().is_empty());
        assert_eq!(session.baud(), 57_600);
    }

    #[test]
    fn test_set_baud_reconfigures_transport_on_success() {
        let script = ScriptedTransport::new().ack(DEFAULT_ADDRESS, 0x00, &[]);
        let mut session = Session::new(script.boxed());

        let code = session.set_baud(115_200).unwrap();
        assert_eq!(code, ConfirmationCode::Success);
        assert_eq!(session.baud(), 115_200);
        assert_eq!(script.baud_changes(), vec![115_200]);
    }

    #[test]
    fn test_set_baud_keeps_setting_on_device_refusal() {
        let script = ScriptedTransport::new().ack(DEFAULT_ADDRESS, 0x1A, &[]);
        let mut session = Session::new(script.boxed());

        let code = session.set_baud(9_600).unwrap();
        assert_eq!(code, ConfirmationCode::InvalidRegister);
        assert_eq!(session.baud(), 57_600);
        assert!(script.baud_changes().is_empty());
    }

    #[test]
    fn test_set_security_validates_level_locally() {
        let script = ScriptedTransport::new();
        let mut session = Session::new(script.boxed());

        assert_eq!(
            session.set_security(0).unwrap(),
            ConfirmationCode::InvalidParameter
        );
        assert_eq!(
            session.set_security(6).unwrap(),
            ConfirmationCode::InvalidParameter
        );
        assert!(script.written().is_empty());
    }

    #[test]
    fn test_set_pkg_length_updates_session() {
        let script = ScriptedTransport::new().ack(DEFAULT_ADDRESS, 0x00, &[]);
        let mut session = Session::new(script.boxed());

        assert_eq!(
            session.set_pkg_length(100).unwrap(),
            ConfirmationCode::InvalidParameter
        );
        assert_eq!(session.packet_length(), 128);

        let code = session.set_pkg_length(256).unwrap();
        assert_eq!(code, ConfirmationCode::Success);
        assert_eq!(session.packet_length(), 256);
    }

    #[test]
    fn test_set_address_mutates_session_on_success_only() {
        let script = ScriptedTransport::new()
            .ack(DEFAULT_ADDRESS, 0x20, &[])
            .ack(DEFAULT_ADDRESS, 0x00, &[]);
        let mut session = Session::new(script.boxed());

        session.set_address(0x1234_5678).unwrap();
        assert_eq!(session.address(), DEFAULT_ADDRESS);

        session.set_address(0x1234_5678).unwrap();
        assert_eq!(session.address(), 0x1234_5678);
    }
}
