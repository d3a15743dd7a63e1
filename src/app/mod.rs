//! Application core: pure domain logic, zero I/O.
//!
//! Session handling, sample scheduling and flushing for the stream node.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`] and the link abstraction in [`crate::transport`], keeping
//! this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod startup;
