//! Sensor channels: the column identities of a sample packet.
//!
//! Register-level configuration of the sensor hub lives outside this
//! crate. The core only needs to know *which* axes are enabled and in what
//! order, because that order fixes the column layout of every packet and
//! is advertised to the host in the configuration descriptor.

pub mod sim;

use core::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of enabled channels (columns) per packet.
pub const MAX_COLUMNS: usize = 16;

/// Ordered set of enabled channels, fixed at configuration time.
pub type ChannelSet = heapless::Vec<SensorChannel, MAX_COLUMNS>;

/// One sensor axis streamed as a column of `i16` samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorChannel {
    AccelerometerX,
    AccelerometerY,
    AccelerometerZ,
    GyroscopeX,
    GyroscopeY,
    GyroscopeZ,
    MagnetometerX,
    MagnetometerY,
    MagnetometerZ,
    Temperature,
    Gas,
}

impl SensorChannel {
    /// Column name as advertised in the configuration descriptor.
    pub const fn name(self) -> &'static str {
        match self {
            Self::AccelerometerX => "AccelerometerX",
            Self::AccelerometerY => "AccelerometerY",
            Self::AccelerometerZ => "AccelerometerZ",
            Self::GyroscopeX => "GyroscopeX",
            Self::GyroscopeY => "GyroscopeY",
            Self::GyroscopeZ => "GyroscopeZ",
            Self::MagnetometerX => "MagnetometerX",
            Self::MagnetometerY => "MagnetometerY",
            Self::MagnetometerZ => "MagnetometerZ",
            Self::Temperature => "Temperature",
            Self::Gas => "Gas",
        }
    }

    /// Accelerometer X/Y/Z.
    pub const ACCEL: [Self; 3] = [Self::AccelerometerX, Self::AccelerometerY, Self::AccelerometerZ];
    /// Gyroscope X/Y/Z.
    pub const GYRO: [Self; 3] = [Self::GyroscopeX, Self::GyroscopeY, Self::GyroscopeZ];
    /// Magnetometer X/Y/Z.
    pub const MAG: [Self; 3] = [Self::MagnetometerX, Self::MagnetometerY, Self::MagnetometerZ];
}

impl fmt::Display for SensorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build a [`ChannelSet`] from a slice, silently capping at [`MAX_COLUMNS`].
pub fn channel_set(channels: &[SensorChannel]) -> ChannelSet {
    channels.iter().copied().take(MAX_COLUMNS).collect()
}

/// Returns `true` if any channel appears more than once.
pub fn has_duplicates(channels: &[SensorChannel]) -> bool {
    channels
        .iter()
        .enumerate()
        .any(|(i, c)| channels[..i].contains(c))
}
