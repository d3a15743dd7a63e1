//! GPIO / peripheral pin assignments for the MotionStream sensor node.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Status LED (discrete RGB, common cathode)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 11;
pub const LED_G_GPIO: i32 = 12;
pub const LED_B_GPIO: i32 = 13;

/// LEDC frequency for the RGB status LED (1 kHz).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;

// ---------------------------------------------------------------------------
// Host data UART
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;

/// Host link baud rate.
pub const UART_BAUD_RATE: u32 = 921_600;
