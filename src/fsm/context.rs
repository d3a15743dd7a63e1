//! Shared mutable context threaded through every session handler.
//!
//! Handlers never touch the buffer, scheduler or LED. They read the link
//! mode and the tick's timestamp from here and write *requests* that the
//! [`StreamService`](crate::app::service::StreamService) applies after the
//! input has been handled.

use crate::config::TransportKind;

// ---------------------------------------------------------------------------
// Indicator cues
// ---------------------------------------------------------------------------

/// One-shot indicator cue requested on a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Flash the connected colour, then go dark.
    Connected,
    /// Show the disconnected colour and make it the blink colour.
    Disconnected,
}

// ---------------------------------------------------------------------------
// Side-effect requests (written by handlers; consumed by the service)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionRequests {
    pub cue: Option<Cue>,
    /// Zero the sample buffer and rewind its write index.
    pub clear_buffer: bool,
    /// Restart the sampling interval from `now`.
    pub arm_scheduler: bool,
    /// Make the next descriptor broadcast due immediately.
    pub reset_broadcast: bool,
}

impl SessionRequests {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// SessionContext
// ---------------------------------------------------------------------------

pub struct SessionContext {
    /// Which link the session runs over. Fixed for the process lifetime.
    pub mode: TransportKind,
    /// Timestamp of the tick currently being processed.
    pub now_ms: u32,
    /// Pending side effects.
    pub requests: SessionRequests,
}

impl SessionContext {
    pub fn new(mode: TransportKind) -> Self {
        Self {
            mode,
            now_ms: 0,
            requests: SessionRequests::default(),
        }
    }

    pub fn is_radio(&self) -> bool {
        self.mode == TransportKind::Radio
    }

    /// Hand the pending requests to the caller and reset them.
    pub fn take_requests(&mut self) -> SessionRequests {
        core::mem::take(&mut self.requests)
    }
}
