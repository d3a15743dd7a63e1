//! Unified error types for the MotionStream firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level control loop's error handling uniform. All variants are `Copy`
//! so they can be logged and counted without allocation.
//!
//! Note what is *not* here: appending past the end of a packet buffer is a
//! contract violation and panics (see [`SampleBuffer::append`]). Unknown host
//! text is not an error at all; it is dropped by the command parser.
//!
//! [`SampleBuffer::append`]: crate::buffer::SampleBuffer::append

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The host link failed to send or poll.
    Transport(TransportError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// A startup wait ran out of attempts.
    Startup(TimedOut),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Startup(e) => write!(f, "startup: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failures reported by a [`Transport`](crate::transport::Transport).
///
/// The control loop logs these and drops the affected packet or event.
/// None of them changes session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No peer is attached to the data channel.
    NotConnected,
    /// The underlying driver refused or timed out.
    Unavailable,
    /// The payload exceeds what the channel can carry in one write.
    PayloadTooLarge,
    /// Generic driver I/O error.
    Io,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "no peer connected"),
            Self::Unavailable => write!(f, "transport unavailable"),
            Self::PayloadTooLarge => write!(f, "payload too large"),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from loading or validating a [`StreamConfig`](crate::config::StreamConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// The config document could not be parsed.
    Malformed,
    /// The descriptor does not fit its output buffer.
    DescriptorTooLarge,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::Malformed => write!(f, "malformed config document"),
            Self::DescriptorTooLarge => write!(f, "descriptor too large"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

/// A bounded readiness wait exhausted its attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedOut {
    /// How many probes were made before giving up.
    pub attempts: u32,
}

impl fmt::Display for TimedOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not ready after {} attempts", self.attempts)
    }
}

impl From<TimedOut> for Error {
    fn from(e: TimedOut) -> Self {
        Self::Startup(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_converts_and_displays() {
        let e: Error = TransportError::PayloadTooLarge.into();
        assert_eq!(e, Error::Transport(TransportError::PayloadTooLarge));
        assert_eq!(e.to_string(), "transport: payload too large");
    }

    #[test]
    fn timed_out_reports_attempts() {
        let e: Error = TimedOut { attempts: 7 }.into();
        assert_eq!(e.to_string(), "startup: not ready after 7 attempts");
    }
}
