//! Byte-stream abstraction: any UART-like channel.
//!
//! Concrete implementations:
//! - UART on the ESP32-S3 ([`crate::adapters::uart`])
//! - stdin/stdout on the host ([`crate::adapters::stdio`])
//!
//! The serial transport is generic over `ByteStream`, so a new port needs
//! zero changes to the framing or command logic.

/// Byte-oriented, non-blocking stream.
pub trait ByteStream {
    /// Error type for this stream.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the stream.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Check if data is available for reading.
    fn available(&mut self) -> bool;
}

/// A null stream that discards all writes and never reads.
pub struct NullStream;

impl ByteStream for NullStream {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn available(&mut self) -> bool {
        false
    }
}
