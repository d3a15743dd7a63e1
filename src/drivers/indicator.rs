//! Status indicator: non-blocking duty-cycle state machine.
//!
//! Pure logic: every method takes the loop's `now` and returns the colour
//! to drive onto the LED (if it changed). The caller forwards that to
//! the [`IndicatorPort`](crate::app::ports::IndicatorPort), so nothing here
//! touches hardware or sleeps.
//!
//! ```text
//!          ON_DURATION elapsed
//!   ┌────┐ ─────────────────▶ ┌─────┐
//!   │ ON │                    │ OFF │
//!   └────┘ ◀───────────────── └─────┘
//!          OFF_DURATION elapsed (re-apply pending colour)
//! ```
//!
//! One-shot cues (connect/disconnect) go through [`set`](StatusIndicator::set)
//! and [`flash`](StatusIndicator::flash). A flash ends at a fixed deadline
//! serviced by [`settle`](StatusIndicator::settle), which the loop calls even
//! when the duty cycle itself is suppressed.

use crate::scheduler::elapsed_ms;

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

pub const COLOUR_OFF: Rgb = (0, 0, 0);
pub const COLOUR_RED: Rgb = (255, 0, 0);
pub const COLOUR_GREEN: Rgb = (0, 255, 0);
pub const COLOUR_BLUE: Rgb = (0, 0, 255);
pub const COLOUR_YELLOW: Rgb = (255, 200, 0);

#[derive(Debug, Clone)]
pub struct StatusIndicator {
    /// Colour re-applied at the start of each on-phase.
    pending: Rgb,
    is_on: bool,
    last_change_ms: u32,
    on_duration_ms: u32,
    off_duration_ms: u32,
    /// End of an in-progress flash, if any.
    flash_until: Option<u32>,
}

impl StatusIndicator {
    /// Starts dark, with red pending: the first on-phase comes one
    /// off-duration after boot.
    pub fn new(on_duration_ms: u32, off_duration_ms: u32) -> Self {
        Self {
            pending: COLOUR_RED,
            is_on: false,
            last_change_ms: 0,
            on_duration_ms,
            off_duration_ms,
            flash_until: None,
        }
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn last_change_ms(&self) -> u32 {
        self.last_change_ms
    }

    pub fn pending_colour(&self) -> Rgb {
        self.pending
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_until.is_some()
    }

    /// Apply `colour` immediately and record `now` as the change time.
    /// Any flash in progress is cancelled.
    pub fn set(&mut self, colour: Rgb, now: u32) -> Rgb {
        self.flash_until = None;
        self.apply(colour, now)
    }

    /// Make `colour` the blink colour and show it now.
    pub fn set_pending(&mut self, colour: Rgb, now: u32) -> Rgb {
        self.pending = colour;
        self.set(colour, now)
    }

    /// Show `colour` for `duration_ms`, then go dark. `colour` becomes the
    /// blink colour.
    pub fn flash(&mut self, colour: Rgb, now: u32, duration_ms: u32) -> Rgb {
        self.pending = colour;
        let out = self.apply(colour, now);
        self.flash_until = Some(now.wrapping_add(duration_ms));
        out
    }

    /// End a flash whose deadline has passed. The off-phase is timed from
    /// the deadline, not from `now`.
    pub fn settle(&mut self, now: u32) -> Option<Rgb> {
        let deadline = self.flash_until?;
        if elapsed_ms(now, deadline) < 0 {
            return None;
        }
        self.flash_until = None;
        Some(self.apply(COLOUR_OFF, deadline))
    }

    /// Advance the duty cycle. Returns the new colour on a phase change.
    /// Does nothing while a flash is in progress.
    pub fn tick(&mut self, now: u32) -> Option<Rgb> {
        if self.flash_until.is_some() {
            return None;
        }
        let since = elapsed_ms(now, self.last_change_ms);
        if self.is_on {
            (since >= self.on_duration_ms as i32).then(|| self.apply(COLOUR_OFF, now))
        } else {
            (since >= self.off_duration_ms as i32).then(|| self.apply(self.pending, now))
        }
    }

    fn apply(&mut self, colour: Rgb, now: u32) -> Rgb {
        self.last_change_ms = now;
        self.is_on = colour != COLOUR_OFF;
        colour
    }
}
