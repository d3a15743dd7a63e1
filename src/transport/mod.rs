//! Host link abstraction.
//!
//! Two variants share one contract: the radio transport (GATT notify per
//! sample row, connection events from the radio stack) and the serial
//! transport (framed blocks over a byte stream, text commands inbound).
//! The variant is picked once at startup and held in [`HostLink`].

pub mod radio;
pub mod serial;
pub mod stream;

use crate::config::TransportKind;
use crate::error::TransportError;

use radio::{GattPort, RadioTransport};
use serial::SerialTransport;
use stream::ByteStream;

/// Largest inbound command message kept (bytes). Excess is discarded.
pub const INBOUND_CAPACITY: usize = 64;

/// One inbound message from a command-oriented transport.
pub type Inbound = heapless::Vec<u8, INBOUND_CAPACITY>;

/// Peer connection signal from a connection-oriented transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    Connected,
    Disconnected,
}

/// Capabilities the control loop needs from a host link.
pub trait Transport {
    fn kind(&self) -> TransportKind;

    /// Send one data frame. Called only from the flush path; never retried.
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Next pending connection event, if any.
    fn poll_event(&mut self) -> Option<LinkEvent>;

    /// Next inbound command message, if any.
    fn poll_inbound(&mut self) -> Option<Inbound>;

    /// Publish the configuration descriptor on the config channel.
    fn write_descriptor(&mut self, descriptor: &[u8]) -> Result<(), TransportError>;
}

/// The active host link.
pub enum HostLink<'a, G: GattPort, S: ByteStream> {
    Radio(RadioTransport<'a, G>),
    Serial(SerialTransport<S>),
}

impl<G: GattPort, S: ByteStream> Transport for HostLink<'_, G, S> {
    fn kind(&self) -> TransportKind {
        match self {
            Self::Radio(t) => t.kind(),
            Self::Serial(t) => t.kind(),
        }
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        match self {
            Self::Radio(t) => t.send(bytes),
            Self::Serial(t) => t.send(bytes),
        }
    }

    fn poll_event(&mut self) -> Option<LinkEvent> {
        match self {
            Self::Radio(t) => t.poll_event(),
            Self::Serial(t) => t.poll_event(),
        }
    }

    fn poll_inbound(&mut self) -> Option<Inbound> {
        match self {
            Self::Radio(t) => t.poll_inbound(),
            Self::Serial(t) => t.poll_inbound(),
        }
    }

    fn write_descriptor(&mut self, descriptor: &[u8]) -> Result<(), TransportError> {
        match self {
            Self::Radio(t) => t.write_descriptor(descriptor),
            Self::Serial(t) => t.write_descriptor(descriptor),
        }
    }
}
