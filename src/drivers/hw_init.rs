//! One-shot hardware peripheral initialization.
//!
//! Configures the LEDC timer and the three RGB status LED channels using
//! raw ESP-IDF sys calls. Called once from `main()` before the control
//! loop starts.

#[cfg(feature = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(feature = "espidf")]
use log::info;

#[cfg(feature = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    LedcTimerFailed(i32),
    LedcChannelFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::LedcTimerFailed(rc) => write!(f, "LEDC timer config failed (rc={})", rc),
            Self::LedcChannelFailed(rc) => write!(f, "LEDC channel config failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

/// LEDC channels driving the status LED.
pub const LEDC_CH_LED_R: u32 = 0;
pub const LEDC_CH_LED_G: u32 = 1;
pub const LEDC_CH_LED_B: u32 = 2;

#[cfg(feature = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe { init_ledc()? };
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(feature = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(feature = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::LED_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcTimerFailed(ret));
    }

    let led_gpios = [
        (LEDC_CH_LED_R, pins::LED_R_GPIO),
        (LEDC_CH_LED_G, pins::LED_G_GPIO),
        (LEDC_CH_LED_B, pins::LED_B_GPIO),
    ];
    for (channel, gpio) in led_gpios {
        let ret = unsafe {
            ledc_channel_config(&ledc_channel_config_t {
                speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
                channel,
                timer_sel: ledc_timer_t_LEDC_TIMER_0,
                gpio_num: gpio,
                duty: 0,
                hpoint: 0,
                ..Default::default()
            })
        };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::LedcChannelFailed(ret));
        }
    }

    info!("hw_init: LEDC configured (led=CH0-2)");
    Ok(())
}

#[cfg(feature = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the control loop calls this function.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(feature = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u8) {}
