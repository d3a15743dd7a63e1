//! UART byte stream (ESP-IDF only).
//!
//! Wraps an `esp-idf-hal` [`UartDriver`] configured at
//! [`UART_BAUD_RATE`](crate::pins::UART_BAUD_RATE) on the host-link pins.
//! Reads never block; writes block until the driver has queued the data.

#![cfg(feature = "espidf")]

use esp_idf_svc::hal::delay::{BLOCK, NON_BLOCK};
use esp_idf_svc::hal::gpio::{AnyIOPin, AnyInputPin, AnyOutputPin};
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, Uart, UartDriver};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::sys::EspError;
use log::info;

use crate::app::ports::ReadyProbe;
use crate::pins;
use crate::transport::stream::ByteStream;

pub struct UartStream<'d> {
    driver: UartDriver<'d>,
}

impl<'d> UartStream<'d> {
    pub fn new(
        uart: impl Peripheral<P = impl Uart> + 'd,
        tx: impl Peripheral<P = AnyOutputPin> + 'd,
        rx: impl Peripheral<P = AnyInputPin> + 'd,
    ) -> Result<Self, EspError> {
        let config = uart::config::Config::default().baudrate(Hertz(pins::UART_BAUD_RATE));
        let driver = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &config,
        )?;
        info!(
            "UART: host link on TX={} RX={} @ {} baud",
            pins::UART_TX_GPIO,
            pins::UART_RX_GPIO,
            pins::UART_BAUD_RATE
        );
        Ok(Self { driver })
    }
}

impl ByteStream for UartStream<'_> {
    type Error = EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.driver.read(buf, NON_BLOCK)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.driver.write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.driver.wait_tx_done(BLOCK)
    }

    fn available(&mut self) -> bool {
        self.driver.remaining_read().is_ok_and(|n| n > 0)
    }
}

impl ReadyProbe for UartStream<'_> {
    fn is_ready(&mut self) -> bool {
        // The driver is usable once installed; nothing to wait for.
        true
    }
}
