//! ESP32 time adapter.
//!
//! Provides the loop's millisecond clock and a blocking delay for the
//! startup wait.
//!
//! - **`feature = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(feature = "espidf")`**: uses `std::time::Instant` for
//!   host-side testing and simulation.
//!
//! The millisecond value is truncated to `u32` and wraps after ~49.7 days;
//! every consumer compares timestamps with
//! [`elapsed_ms`](crate::scheduler::elapsed_ms).

use crate::app::ports::ClockPort;

/// Monotonic clock for the ESP32-S3 platform.
pub struct Esp32Clock {
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32Clock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(feature = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since construction (monotonic).
    #[cfg(not(feature = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl ClockPort for Esp32Clock {
    fn now_ms(&self) -> u32 {
        (self.uptime_us() / 1_000) as u32
    }
}

// ── Delay ────────────────────────────────────────────────────

/// Blocking delay used only during startup.
#[cfg(feature = "espidf")]
pub type StartupDelay = esp_idf_svc::hal::delay::FreeRtos;

/// Blocking delay used only during startup.
#[cfg(not(feature = "espidf"))]
pub type StartupDelay = HostDelay;

#[cfg(feature = "espidf")]
pub fn startup_delay() -> StartupDelay {
    esp_idf_svc::hal::delay::FreeRtos
}

#[cfg(not(feature = "espidf"))]
pub fn startup_delay() -> StartupDelay {
    HostDelay
}

/// `DelayNs` over `std::thread::sleep`.
#[cfg(not(feature = "espidf"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct HostDelay;

#[cfg(not(feature = "espidf"))]
impl embedded_hal::delay::DelayNs for HostDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}
