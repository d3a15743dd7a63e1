//! Host stdio byte stream.
//!
//! Lets the host simulation speak the serial protocol on stdin/stdout, so
//! a capture tool can be pointed at the process through a pipe or pty.
//! A reader thread moves stdin lines into an mpsc channel; `read` never
//! blocks.
//!
//! Frames written to stdout are raw binary, so logs go to stderr
//! (`env_logger`'s default).

#![cfg(not(feature = "espidf"))]

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{debug, warn};

use crate::app::ports::ReadyProbe;
use crate::transport::stream::ByteStream;

pub struct StdioStream {
    rx: Receiver<Vec<u8>>,
    pending: VecDeque<u8>,
    stdout: io::Stdout,
    closed: bool,
}

impl StdioStream {
    /// Spawn the stdin reader thread.
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                let stdin = io::stdin();
                for line in stdin.lock().lines() {
                    match line {
                        Ok(line) => {
                            let mut bytes = line.into_bytes();
                            bytes.push(b'\n');
                            if tx.send(bytes).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("stdin: {}", e);
                            break;
                        }
                    }
                }
                debug!("stdin: closed");
            })?;

        Ok(Self::from_lines(rx))
    }

    fn from_lines(rx: Receiver<Vec<u8>>) -> Self {
        Self {
            rx,
            pending: VecDeque::new(),
            stdout: io::stdout(),
            closed: false,
        }
    }

    /// Move everything the reader thread has produced into `pending`.
    fn pump(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(line) => self.pending.extend(line),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    break;
                }
            }
        }
    }

    /// `true` once stdin hit EOF and every byte it produced was read.
    pub fn is_closed(&mut self) -> bool {
        self.pump();
        self.closed && self.pending.is_empty()
    }
}

impl ByteStream for StdioStream {
    type Error = io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.pump();
        let n = buf.len().min(self.pending.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.stdout.write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stdout.flush()
    }

    fn available(&mut self) -> bool {
        self.pump();
        !self.pending.is_empty()
    }
}

impl ReadyProbe for StdioStream {
    fn is_ready(&mut self) -> bool {
        // stdout is writable as soon as the process runs.
        true
    }
}
