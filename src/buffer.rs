//! Columnar sample buffer: one packet's worth of interleaved rows.
//!
//! ```text
//!   row 0: [ c0 c1 c2 … cN ]
//!   row 1: [ c0 c1 c2 … cN ]   ◀── write_index points at the next row
//!   …
//!   row S-1
//! ```
//!
//! Storage is a fixed-size `heapless::Vec<i16>` sized once at startup to
//! `columns × samples_per_packet`. Rows are stored contiguously so a full
//! packet can go out in one write with no reordering. Frames on the wire are
//! the raw samples as little-endian `i16`: no header, no checksum.

use heapless::Vec;

use crate::config::TransportKind;
use crate::sensors::{ChannelSet, MAX_COLUMNS};

/// Total `i16` slots available across all columns and rows.
pub const MAX_SAMPLES: usize = 1024;

/// Largest frame the buffer can produce, in bytes.
pub const MAX_FRAME_BYTES: usize = MAX_SAMPLES * core::mem::size_of::<i16>();

/// Encoded frame bytes ready to hand to a transport.
pub type Frame = Vec<u8, MAX_FRAME_BYTES>;

/// Largest single-row frame, in bytes.
pub const MAX_ROW_BYTES: usize = MAX_COLUMNS * core::mem::size_of::<i16>();

/// One encoded row, sized for the widest channel set.
pub type RowFrame = Vec<u8, MAX_ROW_BYTES>;

/// When the buffer is drained into the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushPolicy {
    /// Send each row as soon as it is appended (radio).
    PerSample,
    /// Accumulate until the packet is full, then send it whole (serial).
    FullBlock,
}

impl FlushPolicy {
    pub fn for_transport(kind: TransportKind) -> Self {
        match kind {
            TransportKind::Radio => Self::PerSample,
            TransportKind::Serial => Self::FullBlock,
        }
    }
}

pub struct SampleBuffer {
    columns: ChannelSet,
    capacity_per_column: usize,
    write_index: usize,
    storage: Vec<i16, MAX_SAMPLES>,
}

impl SampleBuffer {
    /// Allocate storage for `capacity_per_column` rows of `columns`.
    ///
    /// # Panics
    ///
    /// If `columns × capacity_per_column` exceeds [`MAX_SAMPLES`].
    /// [`StreamConfig::validate`](crate::config::StreamConfig::validate)
    /// rejects such configurations before they get here.
    pub fn new(columns: ChannelSet, capacity_per_column: usize) -> Self {
        let len = columns.len() * capacity_per_column;
        assert!(len <= MAX_SAMPLES, "sample buffer of {len} exceeds {MAX_SAMPLES}");
        let mut storage = Vec::new();
        // Length checked above.
        let _ = storage.resize(len, 0);
        Self {
            columns,
            capacity_per_column,
            write_index: 0,
            storage,
        }
    }

    pub fn columns(&self) -> &ChannelSet {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn capacity_per_column(&self) -> usize {
        self.capacity_per_column
    }

    /// Rows written since the last flush.
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    pub fn is_full(&self) -> bool {
        self.write_index == self.capacity_per_column
    }

    pub fn is_empty(&self) -> bool {
        self.write_index == 0
    }

    /// Write one row across all columns at `write_index` and advance.
    /// Returns the new occupancy.
    ///
    /// Appending to a full buffer is a caller bug: it would silently
    /// change the frame length the host agreed to, so it panics.
    pub fn append(&mut self, row: &[i16]) -> usize {
        assert!(
            self.write_index < self.capacity_per_column,
            "append past capacity ({} rows)",
            self.capacity_per_column
        );
        assert_eq!(row.len(), self.columns.len(), "row width mismatch");
        let start = self.write_index * self.columns.len();
        self.storage[start..start + row.len()].copy_from_slice(row);
        self.write_index += 1;
        self.write_index
    }

    /// Samples of the rows written so far, in row-major order.
    pub fn filled(&self) -> &[i16] {
        &self.storage[..self.write_index * self.columns.len()]
    }

    /// Samples of one row.
    pub fn row(&self, index: usize) -> &[i16] {
        let width = self.columns.len();
        &self.storage[index * width..(index + 1) * width]
    }

    /// Encode the rows written so far as little-endian `i16` bytes.
    pub fn encode_filled(&self) -> Frame {
        encode_le(self.filled())
    }

    /// Encode one row as little-endian `i16` bytes.
    pub fn encode_row(&self, index: usize) -> RowFrame {
        encode_le(self.row(index))
    }

    /// Zero one row's storage. Does not touch `write_index`.
    pub fn clear_row(&mut self, index: usize) {
        let width = self.columns.len();
        self.storage[index * width..(index + 1) * width].fill(0);
    }

    /// Zero all storage and reset `write_index`.
    pub fn clear(&mut self) {
        self.storage.fill(0);
        self.write_index = 0;
    }

    /// Reset `write_index` without touching storage.
    pub(crate) fn rewind(&mut self) {
        self.write_index = 0;
    }
}

/// Serialise samples as consecutive little-endian `i16` values.
///
/// Samples past the capacity `N` are dropped; callers size `N` from the
/// storage they encode (`MAX_FRAME_BYTES` or `MAX_ROW_BYTES`).
pub fn encode_le<const N: usize>(samples: &[i16]) -> Vec<u8, N> {
    let mut out = Vec::new();
    for s in samples {
        if out.extend_from_slice(&s.to_le_bytes()).is_err() {
            break;
        }
    }
    out
}
