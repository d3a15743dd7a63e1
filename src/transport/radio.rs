//! Radio transport: sample rows as GATT notifications.
//!
//! The node exposes one primary service with two characteristics:
//!
//! | Characteristic | UUID                                   | Perms        |
//! |----------------|----------------------------------------|--------------|
//! | Config         | `16480001-0525-4ad5-b4fb-6dd83f49546b` | Read         |
//! | Data           | `16480002-0525-4ad5-b4fb-6dd83f49546b` | Notify       |
//!
//! Primary service UUID: `16480000-0525-4ad5-b4fb-6dd83f49546b`.
//!
//! The GATT server itself lives behind [`GattPort`]. Its connect and
//! disconnect callbacks run in the radio stack's context and must not touch
//! the session directly; they push into a [`LinkEvents`] queue that the
//! control loop drains once per tick.
//!
//! ```text
//!  radio stack cb ──push──▶ LinkEvents ──pop──▶ RadioTransport::poll_event
//!                             │ level ─────────▶ (reconciled when queue is empty)
//! ```
//!
//! Besides the queue, every push records the peer's current presence as a
//! level. The queue may drop events under a connect/disconnect storm, the
//! level never does: once the queue is drained, `poll_event` synthesises
//! whatever edge is needed to bring the transport in line with it.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{info, warn};

use crate::config::TransportKind;
use crate::descriptor::DESCRIPTOR_CAPACITY;
use crate::error::TransportError;

use super::{Inbound, LinkEvent, Transport};

// ── Constants ────────────────────────────────────────────────

/// Queue depth for link events.
const LINK_EVENT_DEPTH: usize = 4;

// ── GATT port ────────────────────────────────────────────────

/// What the radio transport needs from the GATT server.
pub trait GattPort {
    /// Notify the data characteristic.
    fn notify_data(&mut self, payload: &[u8]) -> Result<(), TransportError>;

    /// Replace the value of the config characteristic.
    fn write_config(&mut self, value: &[u8]) -> Result<(), TransportError>;

    /// Start advertising again after a peer left.
    fn set_connectable(&mut self);
}

/// GATT server stand-in for builds without a radio. Never connects.
#[derive(Debug, Default)]
pub struct NullGatt;

impl GattPort for NullGatt {
    fn notify_data(&mut self, _payload: &[u8]) -> Result<(), TransportError> {
        Err(TransportError::NotConnected)
    }

    fn write_config(&mut self, _value: &[u8]) -> Result<(), TransportError> {
        Ok(())
    }

    fn set_connectable(&mut self) {}
}

// ── Link event queue ─────────────────────────────────────────

/// Bounded queue between radio-stack callbacks and the control loop, plus
/// the latest peer presence.
pub struct LinkEvents {
    channel: Channel<CriticalSectionRawMutex, LinkEvent, LINK_EVENT_DEPTH>,
    peer_present: AtomicBool,
}

impl LinkEvents {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            peer_present: AtomicBool::new(false),
        }
    }

    /// Called from the radio stack. The presence level is always updated;
    /// returns `false` if the queue was full and the edge was dropped.
    pub fn push(&self, event: LinkEvent) -> bool {
        self.peer_present
            .store(event == LinkEvent::Connected, Ordering::Release);
        match self.channel.try_send(event) {
            Ok(()) => true,
            Err(_) => {
                warn!("Radio: link event queue full, dropped {:?}", event);
                false
            }
        }
    }

    pub fn pop(&self) -> Option<LinkEvent> {
        self.channel.try_receive().ok()
    }

    /// Whether a peer was connected as of the last push.
    pub fn peer_present(&self) -> bool {
        self.peer_present.load(Ordering::Acquire)
    }
}

impl Default for LinkEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Queue the device's GATT callbacks push into.
pub static RADIO_LINK_EVENTS: LinkEvents = LinkEvents::new();

// ── Transport ────────────────────────────────────────────────

pub struct RadioTransport<'a, G: GattPort> {
    gatt: G,
    events: &'a LinkEvents,
    connected: bool,
    payload_limit: usize,
}

impl<'a, G: GattPort> RadioTransport<'a, G> {
    pub fn new(gatt: G, events: &'a LinkEvents, payload_limit: usize) -> Self {
        Self {
            gatt,
            events,
            connected: false,
            payload_limit,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn gatt(&self) -> &G {
        &self.gatt
    }

    pub fn gatt_mut(&mut self) -> &mut G {
        &mut self.gatt
    }

    /// Edge implied by the presence level when no queued event explains it.
    fn reconcile(&self) -> Option<LinkEvent> {
        match (self.events.peer_present(), self.connected) {
            (true, false) => {
                warn!("Radio: missed connect edge, peer is present");
                Some(LinkEvent::Connected)
            }
            (false, true) => {
                warn!("Radio: missed disconnect edge, peer is gone");
                Some(LinkEvent::Disconnected)
            }
            _ => None,
        }
    }
}

impl<G: GattPort> Transport for RadioTransport<'_, G> {
    fn kind(&self) -> TransportKind {
        TransportKind::Radio
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        if bytes.len() > self.payload_limit {
            return Err(TransportError::PayloadTooLarge);
        }
        self.gatt.notify_data(bytes)
    }

    fn poll_event(&mut self) -> Option<LinkEvent> {
        let event = match self.events.pop() {
            Some(event) => event,
            None => self.reconcile()?,
        };
        match event {
            LinkEvent::Connected => {
                self.connected = true;
            }
            LinkEvent::Disconnected => {
                self.connected = false;
                info!("Radio: peer left, advertising again");
                self.gatt.set_connectable();
            }
        }
        Some(event)
    }

    fn poll_inbound(&mut self) -> Option<Inbound> {
        None
    }

    fn write_descriptor(&mut self, descriptor: &[u8]) -> Result<(), TransportError> {
        if descriptor.len() > DESCRIPTOR_CAPACITY {
            return Err(TransportError::PayloadTooLarge);
        }
        let mut value = [0u8; DESCRIPTOR_CAPACITY];
        value[..descriptor.len()].copy_from_slice(descriptor);
        self.gatt.write_config(&value)
    }
}

// ── Tests ────────────────────────────────────────────────────
