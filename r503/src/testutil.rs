//! Scripted in-memory transport for exercising the session without hardware

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use bytes::BytesMut;

use r503_core::{Frame, PacketId};
use r503_transport::{Error, Result, Transport};

#[derive(Default)]
struct State {
    /// Bytes queued for the session to read
    incoming: VecDeque<u8>,
    /// A reply replayed whenever the queue runs dry
    refill: Option<Vec<u8>>,
    /// Every buffer the session wrote, one entry per write_all
    written: Vec<Vec<u8>>,
    /// Baud rates the session switched to
    baud_changes: Vec<u32>,
}

/// A transport fed from a pre-scripted byte queue.
///
/// Clones share state, so tests keep one handle for inspection and hand a
/// boxed clone to the session.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    state: Arc<Mutex<State>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Queue an encoded Ack frame: confirmation code byte then payload
    pub(crate) fn ack(self, address: u32, code: u8, payload: &[u8]) -> Self {
        let mut body = Vec::with_capacity(1 + payload.len());
        body.push(code);
        body.extend_from_slice(payload);

        let encoded = Frame::new(address, PacketId::Ack, body).encode();
        self.raw(&encoded)
    }

    /// Queue raw bytes exactly as given
    pub(crate) fn raw(self, bytes: &[u8]) -> Self {
        self.lock().incoming.extend(bytes.iter().copied());
        self
    }

    /// Replay this Ack frame forever once the scripted queue is exhausted
    pub(crate) fn ack_forever(self, address: u32, code: u8, payload: &[u8]) -> Self {
        let mut body = Vec::with_capacity(1 + payload.len());
        body.push(code);
        body.extend_from_slice(payload);

        let encoded = Frame::new(address, PacketId::Ack, body).encode();
        self.lock().refill = Some(encoded.to_vec());
        self
    }

    /// Hand a shared-state clone to the session
    pub(crate) fn boxed(&self) -> Box<dyn Transport> {
        Box::new(self.clone())
    }

    /// Buffers written by the session, one per write_all call
    pub(crate) fn written(&self) -> Vec<Vec<u8>> {
        self.lock().written.clone()
    }

    /// Baud rates the session reconfigured the transport to
    pub(crate) fn baud_changes(&self) -> Vec<u32> {
        self.lock().baud_changes.clone()
    }
}

impl Transport for ScriptedTransport {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.lock().written.push(data.to_vec());
        Ok(())
    }

    fn read_exact(&mut self, n: usize, _timeout: Duration) -> Result<BytesMut> {
        let mut state = self.lock();

        if state.incoming.len() < n {
            if let Some(refill) = state.refill.clone() {
                while state.incoming.len() < n {
                    state.incoming.extend(refill.iter().copied());
                }
            }
        }

        if state.incoming.len() < n {
            // Drain the remainder, like a real port read that hit its deadline
            let actual = state.incoming.len();
            state.incoming.clear();
            return Err(Error::Timeout {
                expected: n,
                actual,
            });
        }

        Ok(state.incoming.drain(..n).collect())
    }

    fn read_bulk(&mut self, limit: usize, _timeout: Duration) -> Result<BytesMut> {
        let mut state = self.lock();
        let n = state.incoming.len().min(limit);
        Ok(state.incoming.drain(..n).collect())
    }

    fn set_baud(&mut self, baud: u32) -> Result<()> {
        self.lock().baud_changes.push(baud);
        Ok(())
    }
}
