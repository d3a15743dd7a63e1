//! Configuration descriptor: tells the host how to decode the stream.
//!
//! Packets carry no header, so the host learns the column layout and
//! framing out-of-band from this JSON message:
//!
//! ```json
//! {"sample_rate":100,"samples_per_packet":10,
//!  "column_location":{"AccelerometerX":0,"AccelerometerY":1, ...}}
//! ```
//!
//! Built once at startup and never modified; the transports decide how it
//! is delivered (config characteristic vs. a line on the serial port).

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::config::StreamConfig;
use crate::error::ConfigError;
use crate::sensors::ChannelSet;

/// Size of the radio configuration characteristic (bytes).
pub const DESCRIPTOR_CAPACITY: usize = 256;

#[derive(Debug, Clone, Serialize)]
pub struct ConfigDescriptor {
    pub sample_rate: u16,
    pub samples_per_packet: u16,
    pub column_location: ColumnLocation,
}

/// Channel name → column index, serialised as a JSON object in column order.
#[derive(Debug, Clone)]
pub struct ColumnLocation(pub ChannelSet);

impl Serialize for ColumnLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (index, channel) in self.0.iter().enumerate() {
            map.serialize_entry(channel.name(), &index)?;
        }
        map.end()
    }
}

impl ConfigDescriptor {
    pub fn from_config(config: &StreamConfig) -> Self {
        Self {
            sample_rate: config.output_data_rate_hz,
            samples_per_packet: config.samples_per_packet,
            column_location: ColumnLocation(config.channels.clone()),
        }
    }

    /// Serialise to compact JSON.
    ///
    /// Fails if the document would not fit [`DESCRIPTOR_CAPACITY`], since
    /// the radio transport could not deliver it whole.
    pub fn to_json(&self) -> Result<Vec<u8>, ConfigError> {
        let json = serde_json::to_vec(self).map_err(|_| ConfigError::Malformed)?;
        if json.len() > DESCRIPTOR_CAPACITY {
            return Err(ConfigError::DescriptorTooLarge);
        }
        Ok(json)
    }
}
