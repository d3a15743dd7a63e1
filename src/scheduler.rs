//! Fixed-interval gates driven by the loop's millisecond clock.
//!
//! Coexists with the session FSM: the control loop consults
//! [`SampleScheduler::admit`] only while streaming, and
//! [`BroadcastTimer::due`] only while a serial session is waiting for
//! its acknowledgment.
//!
//! ```text
//!   now_ms (u32, wraps every ~49.7 days)
//!      │
//!      ├──▶ SampleScheduler.admit(now) ──▶ one row into SampleBuffer
//!      │
//!      └──▶ BroadcastTimer.due(now)   ──▶ descriptor re-broadcast
//! ```
//!
//! Both gates compare times with a wrapping difference reinterpreted as
//! `i32`, so a counter rollover never causes a missed or doubled fire as
//! long as consecutive checks are less than ~24.8 days apart.

use log::debug;

/// Milliseconds elapsed from `earlier` to `now`, safe across `u32` rollover.
#[inline]
pub fn elapsed_ms(now: u32, earlier: u32) -> i32 {
    now.wrapping_sub(earlier) as i32
}

// ═══════════════════════════════════════════════════════════════
//  Sample admission
// ═══════════════════════════════════════════════════════════════

/// Admits at most one sample-collection cycle per interval.
#[derive(Debug, Clone)]
pub struct SampleScheduler {
    interval_ms: u32,
    last_fired_ms: u32,
}

impl SampleScheduler {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_fired_ms: 0,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Restart timing so the next `admit(now)` fires immediately.
    ///
    /// Called when a session starts streaming; the scheduler is not polled
    /// while disconnected, so its last timestamp may be arbitrarily old.
    pub fn arm(&mut self, now: u32) {
        self.last_fired_ms = now.wrapping_sub(self.interval_ms);
        debug!("Scheduler: armed at {} ms (interval {} ms)", now, self.interval_ms);
    }

    /// Returns `true` at most once per interval and records `now` as the
    /// last fire time when it does.
    pub fn admit(&mut self, now: u32) -> bool {
        if elapsed_ms(now, self.last_fired_ms) >= self.interval_ms as i32 {
            self.last_fired_ms = now;
            true
        } else {
            false
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Descriptor re-broadcast
// ═══════════════════════════════════════════════════════════════

/// Periodic timer for the serial descriptor re-broadcast.
///
/// Due immediately after construction or [`reset`](Self::reset), then
/// once per period.
#[derive(Debug, Clone)]
pub struct BroadcastTimer {
    period_ms: u32,
    last_ms: Option<u32>,
}

impl BroadcastTimer {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            last_ms: None,
        }
    }

    /// Make the next check due immediately.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Returns `true` if a broadcast should go out now, and records it.
    pub fn due(&mut self, now: u32) -> bool {
        let fire = match self.last_ms {
            None => true,
            Some(last) => elapsed_ms(now, last) >= self.period_ms as i32,
        };
        if fire {
            self.last_ms = Some(now);
        }
        fire
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
