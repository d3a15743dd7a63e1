//! RGB status LED driver.
//!
//! Three LEDC PWM channels drive discrete R/G/B LEDs (or a
//! common-cathode RGB LED).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives three LEDC PWM channels via hw_init.
//! On host/test: tracks state in-memory only.

use crate::app::ports::IndicatorPort;
use crate::drivers::hw_init;
use crate::drivers::indicator::{Rgb, COLOUR_OFF};

pub struct StatusLed {
    current: Rgb,
}

impl StatusLed {
    pub fn new() -> Self {
        Self { current: COLOUR_OFF }
    }

    pub fn set_colour(&mut self, (r, g, b): Rgb) {
        hw_init::ledc_set(hw_init::LEDC_CH_LED_R, r);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_G, g);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_B, b);
        self.current = (r, g, b);
    }

    pub fn off(&mut self) {
        self.set_colour(COLOUR_OFF);
    }

    pub fn current_colour(&self) -> Rgb {
        self.current
    }
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorPort for StatusLed {
    fn show(&mut self, colour: Rgb) {
        self.set_colour(colour);
    }
}
