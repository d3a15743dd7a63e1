//! Serial transport: framed blocks and text commands over a byte stream.
//!
//! Outbound, data packets are written raw and the descriptor goes out as
//! one `\r\n`-terminated line. Inbound, everything available in one poll is
//! taken as one command message.
//!
//! ```text
//!  host ◀── {"sample_rate":…}\r\n ───┐
//!  host ──▶ "connect"               │  SerialTransport<S: ByteStream>
//!  host ◀── [i16 LE × cols × rows] ──┘
//! ```

use log::{debug, warn};

use crate::config::TransportKind;
use crate::error::TransportError;

use super::stream::ByteStream;
use super::{Inbound, LinkEvent, Transport, INBOUND_CAPACITY};

/// Scratch size for draining the receive side.
const RX_CHUNK: usize = 32;

pub struct SerialTransport<S: ByteStream> {
    stream: S,
}

impl<S: ByteStream> SerialTransport<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    fn write_all(&mut self, mut data: &[u8]) -> Result<(), TransportError> {
        while !data.is_empty() {
            match self.stream.write(data) {
                Ok(0) => return Err(TransportError::Unavailable),
                Ok(n) => data = &data[n.min(data.len())..],
                Err(e) => {
                    debug!("Serial: write failed: {:?}", e);
                    return Err(TransportError::Io);
                }
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        self.stream.flush().map_err(|e| {
            debug!("Serial: flush failed: {:?}", e);
            TransportError::Io
        })
    }
}

impl<S: ByteStream> Transport for SerialTransport<S> {
    fn kind(&self) -> TransportKind {
        TransportKind::Serial
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.write_all(bytes)?;
        self.flush()
    }

    fn poll_event(&mut self) -> Option<LinkEvent> {
        None
    }

    fn poll_inbound(&mut self) -> Option<Inbound> {
        if !self.stream.available() {
            return None;
        }

        let mut message = Inbound::new();
        let mut chunk = [0u8; RX_CHUNK];
        let mut truncated = false;
        loop {
            let n = match self.stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n.min(RX_CHUNK),
                Err(e) => {
                    debug!("Serial: read failed: {:?}", e);
                    break;
                }
            };
            let room = INBOUND_CAPACITY - message.len();
            let take = n.min(room);
            // `take` never exceeds the remaining capacity.
            let _ = message.extend_from_slice(&chunk[..take]);
            truncated |= take < n;
        }

        if truncated {
            warn!("Serial: inbound message longer than {} bytes truncated", INBOUND_CAPACITY);
        }
        (!message.is_empty()).then_some(message)
    }

    fn write_descriptor(&mut self, descriptor: &[u8]) -> Result<(), TransportError> {
        self.write_all(descriptor)?;
        self.write_all(b"\r\n")?;
        self.flush()
    }
}

// ── Tests ────────────────────────────────────────────────────
