//! Bounded startup wait.
//!
//! Power-on waits (host port open, radio stack up) poll a [`ReadyProbe`] a
//! fixed number of times and give up with [`TimedOut`] instead of spinning
//! forever.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::error::TimedOut;

use super::ports::ReadyProbe;

/// Proof that a probe reported ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ready {
    /// Probe calls it took, including the successful one.
    pub attempts: u32,
}

/// Poll `probe` up to `attempts` times, sleeping `poll_ms` between polls.
pub fn wait_until_ready(
    probe: &mut impl ReadyProbe,
    delay: &mut impl DelayNs,
    attempts: u32,
    poll_ms: u32,
) -> Result<Ready, TimedOut> {
    for attempt in 1..=attempts {
        if probe.is_ready() {
            info!("Startup: ready after {} poll(s)", attempt);
            return Ok(Ready { attempts: attempt });
        }
        if attempt < attempts {
            delay.delay_ms(poll_ms);
        }
    }
    warn!("Startup: not ready after {} polls", attempts);
    Err(TimedOut { attempts })
}
