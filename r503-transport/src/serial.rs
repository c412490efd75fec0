//! Serial port transport

use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use bytes::BytesMut;
use serialport::SerialPort;
use tracing::{debug, trace};

use crate::{error::*, Transport};

/// Blocking serial transport for an R503 module on a UART
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open a serial port at the given baud rate, e.g. `/dev/ttyUSB0`
    pub fn open(path: &str, baud: u32) -> Result<Self> {
        debug!("Opening serial port {} at {} baud", path, baud);

        let port = serialport::new(path, baud)
            .timeout(Duration::from_secs(1))
            .open()
            .map_err(|e| Error::Port(format!("{}: {}", path, e)))?;

        Ok(Self { port })
    }

    /// Wrap an already opened serial port
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }

    fn arm(&mut self, remaining: Duration) -> Result<()> {
        // serialport rejects a zero timeout on some platforms
        self.port
            .set_timeout(remaining.max(Duration::from_millis(1)))
            .map_err(|e| Error::Port(e.to_string()))
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        trace!("Writing {} bytes: {:02X?}", data.len(), &data[..data.len().min(16)]);

        self.port.write_all(data)?;
        self.port.flush()?;

        Ok(())
    }

    fn read_exact(&mut self, n: usize, timeout: Duration) -> Result<BytesMut> {
        let deadline = Instant::now() + timeout;
        let mut buf = BytesMut::zeroed(n);
        let mut filled = 0;

        while filled < n {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(Error::Timeout {
                    expected: n,
                    actual: filled,
                });
            }
            self.arm(remaining)?;

            match self.port.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(Error::Timeout {
                        expected: n,
                        actual: filled,
                    })
                }
                Ok(m) => filled += m,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    return Err(Error::Timeout {
                        expected: n,
                        actual: filled,
                    })
                }
                Err(e) => return Err(Error::Io(e)),
            }
        }

        trace!("Read {} bytes: {:02X?}", n, &buf[..n.min(16)]);
        Ok(buf)
    }

    fn read_bulk(&mut self, limit: usize, timeout: Duration) -> Result<BytesMut> {
        let deadline = Instant::now() + timeout;
        let mut buf = BytesMut::zeroed(limit);
        let mut filled = 0;

        while filled < limit {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            self.arm(remaining)?;

            match self.port.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(m) => filled += m,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(e) => return Err(Error::Io(e)),
            }
        }

        buf.truncate(filled);
        trace!("Bulk read collected {} bytes", filled);
        Ok(buf)
    }

    fn set_baud(&mut self, baud: u32) -> Result<()> {
        debug!("Reconfiguring serial port to {} baud", baud);

        self.port
            .set_baud_rate(baud)
            .map_err(|e| Error::Port(e.to_string()))
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("port", &self.port.name())
            .finish()
    }
}
