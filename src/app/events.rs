//! Outbound application events.
//!
//! The [`StreamService`](super::service::StreamService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them: log lines, counters, a test recorder.

use crate::config::TransportKind;
use crate::error::TransportError;
use crate::fsm::SessionState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries link kind and initial state).
    Started {
        transport: TransportKind,
        state: SessionState,
    },

    /// The session moved between states.
    SessionChanged { from: SessionState, to: SessionState },

    /// A data frame went out.
    PacketFlushed { bytes: usize },

    /// A data frame could not be sent and was discarded.
    PacketDropped { bytes: usize, error: TransportError },

    /// The configuration descriptor was published.
    DescriptorBroadcast { bytes: usize },

    /// The descriptor could not be published.
    DescriptorFailed(TransportError),
}
