//! Stream configuration parameters.
//!
//! Everything the control loop needs to schedule sampling and framing.
//! All values are fixed at startup; there is no runtime reconfiguration.

use serde::{Deserialize, Serialize};

use crate::buffer::MAX_SAMPLES;
use crate::error::ConfigError;
use crate::sensors::{self, ChannelSet, SensorChannel};

/// Which host link the node streams over. Resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportKind {
    /// BLE GATT data characteristic, one notification per sample row.
    Radio,
    /// Byte-stream serial port, one write per full packet.
    Serial,
}

/// Core stream configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Active host link.
    pub transport: TransportKind,

    // --- Sampling ---
    /// Output data rate (Hz). The admission interval is `1000 / odr` ms.
    pub output_data_rate_hz: u16,
    /// Rows per framed packet (serial) / buffer capacity per column.
    pub samples_per_packet: u16,
    /// Enabled channels in column order.
    pub channels: ChannelSet,

    // --- Status LED ---
    /// LED on-time of the idle blink (milliseconds).
    pub led_on_duration_ms: u32,
    /// LED off-time of the idle blink (milliseconds).
    pub led_off_duration_ms: u32,
    /// Length of the "connected" flash (milliseconds).
    pub connect_flash_ms: u32,

    // --- Link ---
    /// Serial descriptor re-broadcast period while unacknowledged (milliseconds).
    pub descriptor_broadcast_interval_ms: u32,
    /// Largest payload one radio notification may carry (bytes).
    pub radio_payload_limit: usize,

    // --- Startup ---
    /// Delay between readiness probes at startup (milliseconds).
    pub startup_poll_ms: u32,
    /// Readiness probes before startup gives up.
    pub startup_attempts: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        let mut channels = ChannelSet::new();
        for c in SensorChannel::ACCEL.into_iter().chain(SensorChannel::GYRO) {
            // Six entries always fit in MAX_COLUMNS.
            let _ = channels.push(c);
        }

        Self {
            transport: TransportKind::Serial,

            // Sampling
            output_data_rate_hz: 100,
            samples_per_packet: 10,
            channels,

            // Status LED
            led_on_duration_ms: 100,
            led_off_duration_ms: 900,
            connect_flash_ms: 1000,

            // Link
            descriptor_broadcast_interval_ms: 1000,
            radio_payload_limit: 20,

            // Startup
            startup_poll_ms: 10,
            startup_attempts: 500, // 5 s
        }
    }
}

impl StreamConfig {
    /// Parse a JSON config document and validate it.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Admission interval in whole milliseconds.
    pub fn interval_ms(&self) -> u32 {
        1000 / u32::from(self.output_data_rate_hz.max(1))
    }

    /// Number of enabled columns.
    pub fn column_count(&self) -> usize {
        self.channels.len()
    }

    /// Byte length of one full framed packet.
    pub fn packet_bytes(&self) -> usize {
        self.column_count() * usize::from(self.samples_per_packet) * core::mem::size_of::<i16>()
    }

    /// Byte length of one sample row.
    pub fn row_bytes(&self) -> usize {
        self.column_count() * core::mem::size_of::<i16>()
    }

    /// Reject values that would break framing or scheduling.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_data_rate_hz == 0 || self.output_data_rate_hz > 1000 {
            return Err(ConfigError::ValidationFailed(
                "output_data_rate_hz must be 1..=1000",
            ));
        }
        if self.channels.is_empty() {
            return Err(ConfigError::ValidationFailed("no channels enabled"));
        }
        if sensors::has_duplicates(&self.channels) {
            return Err(ConfigError::ValidationFailed("duplicate channel"));
        }
        if self.samples_per_packet == 0 {
            return Err(ConfigError::ValidationFailed("samples_per_packet must be > 0"));
        }
        if self.column_count() * usize::from(self.samples_per_packet) > MAX_SAMPLES {
            return Err(ConfigError::ValidationFailed(
                "channels x samples_per_packet exceeds buffer storage",
            ));
        }
        if self.transport == TransportKind::Radio && self.row_bytes() > self.radio_payload_limit {
            return Err(ConfigError::ValidationFailed(
                "sample row exceeds radio payload limit",
            ));
        }
        if self.led_on_duration_ms == 0 || self.led_off_duration_ms == 0 {
            return Err(ConfigError::ValidationFailed("LED durations must be > 0"));
        }
        if self.startup_attempts == 0 {
            return Err(ConfigError::ValidationFailed("startup_attempts must be > 0"));
        }
        Ok(())
    }
}
