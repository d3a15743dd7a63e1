//! Fuzz target: serial inbound path (`SerialTransport::poll_inbound` +
//! `HostCommand::parse_bytes`)
//!
//! Arbitrary host bytes are split into reads of fuzz-chosen size and
//! pushed through the serial transport into the command parser.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Inbound messages never exceed `INBOUND_CAPACITY`
//! - A recognised command always trims to one of the three known words
//!
//! cargo fuzz run fuzz_serial_command

#![no_main]

use std::collections::VecDeque;

use libfuzzer_sys::fuzz_target;
use motionstream::app::commands::HostCommand;
use motionstream::transport::serial::SerialTransport;
use motionstream::transport::stream::ByteStream;
use motionstream::transport::{Transport, INBOUND_CAPACITY};

/// Feeds at most `burst` bytes per read, like a slow UART FIFO.
struct Fifo {
    rx: VecDeque<u8>,
    burst: usize,
}

impl ByteStream for Fifo {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let n = buf.len().min(self.burst).min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn available(&mut self) -> bool {
        !self.rx.is_empty()
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&burst, payload)) = data.split_first() else {
        return;
    };

    if let Some(cmd) = HostCommand::parse_bytes(payload) {
        let word = core::str::from_utf8(payload)
            .map(|s| s.trim_matches(|c: char| c.is_ascii_whitespace()))
            .unwrap_or_default();
        assert!(matches!(word, "connect" | "cnnect" | "disconnect"), "{cmd:?} from {word:?}");
    }

    let mut link = SerialTransport::new(Fifo {
        rx: payload.iter().copied().collect(),
        burst: usize::from(burst).max(1),
    });

    while let Some(message) = link.poll_inbound() {
        assert!(!message.is_empty());
        assert!(message.len() <= INBOUND_CAPACITY);
        let _ = HostCommand::parse_bytes(&message);
    }
    assert!(!link.stream_mut().available(), "inbound bytes left undrained");
});
