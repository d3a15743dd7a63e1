//! MotionStream firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the host
//! simulation. All ESP-IDF-specific code is guarded by
//! `#[cfg(feature = "espidf")]` within each module; the feature is what
//! pulls in the ESP-IDF crates, so device builds must enable it.

#![deny(unused_must_use)]

#[cfg(all(target_os = "espidf", not(feature = "espidf")))]
compile_error!("ESP-IDF targets need the `espidf` feature: cargo build --features espidf");

pub mod app;
pub mod buffer;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod fsm;
pub mod scheduler;
pub mod transport;

pub mod adapters;
pub mod drivers;
pub mod pins;
pub mod sensors;
