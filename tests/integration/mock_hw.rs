//! Mock adapters for integration tests.
//!
//! Every port records what it was asked to do so tests can assert on the
//! full history without real UART, radio or LED hardware.

use std::collections::VecDeque;

use motionstream::app::events::AppEvent;
use motionstream::app::ports::{EventSink, IndicatorPort, SensorPort};
use motionstream::config::TransportKind;
use motionstream::drivers::indicator::Rgb;
use motionstream::error::TransportError;
use motionstream::sensors::SensorChannel;
use motionstream::transport::radio::GattPort;
use motionstream::transport::stream::ByteStream;
use motionstream::transport::{Inbound, LinkEvent, Transport};

// ── Sensor hub ────────────────────────────────────────────────

/// Hands out scripted rows in order; stale once the script runs out.
#[derive(Default)]
pub struct ScriptedSensor {
    pub rows: VecDeque<Vec<i16>>,
    pub updates: usize,
}

#[allow(dead_code)]
impl ScriptedSensor {
    pub fn new(rows: &[&[i16]]) -> Self {
        Self {
            rows: rows.iter().map(|r| r.to_vec()).collect(),
            updates: 0,
        }
    }
}

impl SensorPort for ScriptedSensor {
    fn update(&mut self) {
        self.updates += 1;
    }

    fn read_row(&mut self, _channels: &[SensorChannel], row: &mut [i16]) -> bool {
        match self.rows.pop_front() {
            Some(values) => {
                row.copy_from_slice(&values);
                true
            }
            None => false,
        }
    }
}

// ── LED ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockLed {
    pub shown: Vec<Rgb>,
}

#[allow(dead_code)]
impl MockLed {
    pub fn count(&self, colour: Rgb) -> usize {
        self.shown.iter().filter(|&&c| c == colour).count()
    }

    pub fn last(&self) -> Option<Rgb> {
        self.shown.last().copied()
    }
}

impl IndicatorPort for MockLed {
    fn show(&mut self, colour: Rgb) {
        self.shown.push(colour);
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn session_changes(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::SessionChanged { .. }))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Transport ─────────────────────────────────────────────────

/// Scripted link: events and inbound text are queued by the test, sent
/// frames and descriptors are recorded.
pub struct MockLink {
    pub kind: TransportKind,
    pub events: VecDeque<LinkEvent>,
    pub inbound: VecDeque<Vec<u8>>,
    pub sent: Vec<Vec<u8>>,
    pub descriptors: Vec<Vec<u8>>,
    pub fail_sends: bool,
}

#[allow(dead_code)]
impl MockLink {
    pub fn new(kind: TransportKind) -> Self {
        Self {
            kind,
            events: VecDeque::new(),
            inbound: VecDeque::new(),
            sent: Vec::new(),
            descriptors: Vec::new(),
            fail_sends: false,
        }
    }

    pub fn host_says(&mut self, text: &str) {
        self.inbound.push_back(text.as_bytes().to_vec());
    }
}

impl Transport for MockLink {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError::Unavailable);
        }
        self.sent.push(bytes.to_vec());
        Ok(())
    }

    fn poll_event(&mut self) -> Option<LinkEvent> {
        self.events.pop_front()
    }

    fn poll_inbound(&mut self) -> Option<Inbound> {
        let msg = self.inbound.pop_front()?;
        Inbound::from_slice(&msg).ok()
    }

    fn write_descriptor(&mut self, descriptor: &[u8]) -> Result<(), TransportError> {
        self.descriptors.push(descriptor.to_vec());
        Ok(())
    }
}

// ── Byte stream (for the real serial transport) ───────────────

/// In-memory UART: `from_host` is read by the node, `to_host` collects
/// everything the node wrote.
#[derive(Default)]
pub struct MemoryUart {
    pub from_host: VecDeque<u8>,
    pub to_host: Vec<u8>,
}

#[allow(dead_code)]
impl MemoryUart {
    pub fn host_writes(&mut self, text: &[u8]) {
        self.from_host.extend(text.iter().copied());
    }
}

impl ByteStream for MemoryUart {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let n = buf.len().min(self.from_host.len());
        for (slot, byte) in buf.iter_mut().zip(self.from_host.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        self.to_host.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn available(&mut self) -> bool {
        !self.from_host.is_empty()
    }
}

// ── GATT server (for the real radio transport) ────────────────

#[derive(Default)]
pub struct MockGatt {
    pub notified: Vec<Vec<u8>>,
    pub config: Vec<u8>,
    pub readvertised: usize,
}

impl GattPort for MockGatt {
    fn notify_data(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        self.notified.push(payload.to_vec());
        Ok(())
    }

    fn write_config(&mut self, value: &[u8]) -> Result<(), TransportError> {
        self.config = value.to_vec();
        Ok(())
    }

    fn set_connectable(&mut self) {
        self.readvertised += 1;
    }
}
