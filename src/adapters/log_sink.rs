//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (ESP-IDF logger on the device, `env_logger` on the
//! host). One tagged line per event.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { transport, state } => {
                info!("START | link={:?} | initial_state={}", transport, state);
            }
            AppEvent::SessionChanged { from, to } => {
                info!("SESSION | {} -> {}", from, to);
            }
            AppEvent::PacketFlushed { bytes } => {
                debug!("FLUSH | {} bytes", bytes);
            }
            AppEvent::PacketDropped { bytes, error } => {
                warn!("DROP | {} bytes | {}", bytes, error);
            }
            AppEvent::DescriptorBroadcast { bytes } => {
                debug!("DESC | {} bytes", bytes);
            }
            AppEvent::DescriptorFailed(error) => {
                warn!("DESC | failed | {}", error);
            }
        }
    }
}
