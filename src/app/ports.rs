//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ StreamService (domain)
//! ```
//!
//! Driven adapters (sensor hub, LED, clock, event sinks) implement these
//! traits. The [`StreamService`](super::service::StreamService) consumes
//! them via generics, so the domain core never touches hardware directly.
//! The host link has its own boundary in [`crate::transport`].

use crate::drivers::indicator::Rgb;
use crate::sensors::SensorChannel;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: sensor hub → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port over the motion sensor hub.
pub trait SensorPort {
    /// Service the hub (drain its FIFO). Called once per loop tick,
    /// whether or not a sample is admitted.
    fn update(&mut self);

    /// Copy the latest value of each of `channels` into `row`.
    ///
    /// Returns `false` if nothing new arrived since the previous read, in
    /// which case `row` must be left untouched.
    fn read_row(&mut self, channels: &[SensorChannel], row: &mut [i16]) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → LED)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the status LED.
pub trait IndicatorPort {
    fn show(&mut self, colour: Rgb);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond counter. Wraps at `u32::MAX`.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Readiness probe (startup only)
// ───────────────────────────────────────────────────────────────

/// Something that becomes ready some time after power-on: the host serial
/// port opening, the radio stack starting, etc.
pub trait ReadyProbe {
    fn is_ready(&mut self) -> bool;
}
