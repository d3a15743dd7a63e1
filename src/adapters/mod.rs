//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements            | Connects to              |
//! |------------|-----------------------|--------------------------|
//! | `log_sink` | EventSink             | `log` facade             |
//! | `time`     | ClockPort, DelayNs    | ESP32 system timer / std |
//! | `stdio`    | ByteStream, ReadyProbe| host stdin / stdout      |
//! | `uart`     | ByteStream, ReadyProbe| ESP-IDF UART driver      |

pub mod log_sink;
pub mod time;

#[cfg(not(feature = "espidf"))]
pub mod stdio;

#[cfg(feature = "espidf")]
pub mod uart;
