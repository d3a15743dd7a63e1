//! Simulated motion sensor hub for host builds and tests.
//!
//! Produces a deterministic triangle wave per channel so a host-side
//! capture tool can eyeball the stream. Data becomes "fresh" once per
//! `update()` call that advances past the configured sensor period,
//! mirroring a hub FIFO that only refills at its own output rate.

use crate::app::ports::SensorPort;

use super::SensorChannel;

/// Peak amplitude of the simulated waveform.
const AMPLITUDE: i32 = 4096;
/// Waveform period in updates.
const PERIOD: u32 = 64;

pub struct SimulatedImu {
    phase: u32,
    /// Number of `update()` calls between fresh samples.
    sensor_period: u32,
    pending: u32,
    fresh: bool,
}

impl SimulatedImu {
    /// A hub that produces new data on every update.
    pub fn new() -> Self {
        Self::with_period(1)
    }

    /// A hub that produces new data every `sensor_period` updates.
    pub fn with_period(sensor_period: u32) -> Self {
        Self {
            phase: 0,
            sensor_period: sensor_period.max(1),
            pending: 0,
            fresh: false,
        }
    }

    fn sample(&self, channel: SensorChannel) -> i16 {
        // Offset each channel so the columns are distinguishable.
        let offset = channel as u32 * (PERIOD / 8);
        let pos = (self.phase + offset) % PERIOD;
        let half = PERIOD / 2;
        let ramp = if pos < half { pos } else { PERIOD - pos };
        let value = (ramp as i32 * 2 * AMPLITUDE) / PERIOD as i32 - AMPLITUDE / 2;
        value as i16
    }
}

impl Default for SimulatedImu {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for SimulatedImu {
    fn update(&mut self) {
        self.pending += 1;
        if self.pending >= self.sensor_period {
            self.pending = 0;
            self.phase = self.phase.wrapping_add(1);
            self.fresh = true;
        }
    }

    fn read_row(&mut self, channels: &[SensorChannel], row: &mut [i16]) -> bool {
        if !self.fresh {
            return false;
        }
        for (slot, &channel) in row.iter_mut().zip(channels) {
            *slot = self.sample(channel);
        }
        self.fresh = false;
        true
    }
}
