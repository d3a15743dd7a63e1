//! MotionStream firmware entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimulatedImu   StatusLed      LogEventSink   Esp32Clock       │
//! │  (SensorPort)   (Indicator)    (EventSink)    (ClockPort)      │
//! │  UartStream / StdioStream ──▶ SerialTransport ┐                │
//! │  GattPort + LinkEvents    ──▶ RadioTransport  ┴▶ HostLink      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            StreamService (pure logic)                  │    │
//! │  │  Session FSM · Scheduler · SampleBuffer · Indicator    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! On the host, `motionstream [config.json]` speaks the serial protocol on
//! stdin/stdout with simulated sensor data and exits when stdin closes.
//! Logs go to stderr.
//!
//! The sensor hub driver and the GATT server are not part of this crate.
//! Device builds therefore stream [`SimulatedImu`] data, and the radio
//! link is wired to [`NullGatt`], which never reports a peer. Both sit
//! behind `SensorPort` / `GattPort`, so a board crate replaces them here.
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::{info, warn};

use motionstream::adapters::log_sink::LogEventSink;
use motionstream::adapters::time::{startup_delay, Esp32Clock};
use motionstream::app::ports::ClockPort;
use motionstream::app::service::StreamService;
use motionstream::app::startup::wait_until_ready;
use motionstream::config::{StreamConfig, TransportKind};
use motionstream::drivers::hw_init;
use motionstream::drivers::status_led::StatusLed;
use motionstream::error::Error;
use motionstream::sensors::sim::SimulatedImu;
use motionstream::transport::radio::{NullGatt, RadioTransport, RADIO_LINK_EVENTS};
use motionstream::transport::serial::SerialTransport;
use motionstream::transport::HostLink;

#[cfg(not(feature = "espidf"))]
use motionstream::adapters::stdio::StdioStream;
#[cfg(feature = "espidf")]
use motionstream::adapters::uart::UartStream;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Platform bootstrap ─────────────────────────────────
    init_platform()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  MotionStream v{}                 ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    hw_init::init_peripherals().context("peripheral init failed")?;

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config()?;
    info!(
        "Config: {:?} link, {} Hz, {} x {} samples, {} bytes/packet",
        config.transport,
        config.output_data_rate_hz,
        config.column_count(),
        config.samples_per_packet,
        config.packet_bytes()
    );

    // ── 3. Host link ──────────────────────────────────────────
    let mut stream = open_byte_stream()?;
    wait_until_ready(
        &mut stream,
        &mut startup_delay(),
        config.startup_attempts,
        config.startup_poll_ms,
    )
    .map_err(Error::from)
    .context("host link never became ready")?;

    let mut link = match config.transport {
        TransportKind::Serial => HostLink::Serial(SerialTransport::new(stream)),
        TransportKind::Radio => {
            warn!("No GATT server in this build; the radio link will never connect");
            HostLink::Radio(RadioTransport::new(
                NullGatt,
                &RADIO_LINK_EVENTS,
                config.radio_payload_limit,
            ))
        }
    };

    // ── 4. Adapters ───────────────────────────────────────────
    let mut sensor = SimulatedImu::new();
    let mut led = StatusLed::new();
    let mut sink = LogEventSink::new();
    let clock = Esp32Clock::new();

    // ── 5. Service ────────────────────────────────────────────
    let mut service = StreamService::new(config)
        .map_err(Error::from)
        .context("invalid stream configuration")?;
    service.start(clock.now_ms(), &mut link, &mut led, &mut sink);

    info!("System ready. Entering control loop.");

    // ── 6. Cooperative loop ───────────────────────────────────
    loop {
        service.tick(clock.now_ms(), &mut sensor, &mut link, &mut led, &mut sink);
        if host_closed(&mut link) {
            info!("Host closed stdin after {} ticks, exiting", service.tick_count());
            return Ok(());
        }
        idle();
    }
}

// ── Platform helpers ──────────────────────────────────────────

#[cfg(feature = "espidf")]
fn init_platform() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    Ok(())
}

#[cfg(not(feature = "espidf"))]
fn init_platform() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()?;
    Ok(())
}

#[cfg(feature = "espidf")]
fn load_config() -> Result<StreamConfig> {
    let config = StreamConfig::default();
    config.validate().map_err(Error::from)?;
    Ok(config)
}

#[cfg(not(feature = "espidf"))]
fn load_config() -> Result<StreamConfig> {
    let Some(path) = std::env::args().nth(1) else {
        info!("No config file given, using defaults");
        return Ok(StreamConfig::default());
    };
    let bytes = std::fs::read(&path).with_context(|| format!("reading {path}"))?;
    let config = StreamConfig::from_json(&bytes)
        .map_err(Error::from)
        .with_context(|| format!("parsing {path}"))?;
    info!("Loaded config from {}", path);
    Ok(config)
}

#[cfg(feature = "espidf")]
fn open_byte_stream() -> Result<UartStream<'static>> {
    use esp_idf_svc::hal::gpio::{InputPin, OutputPin};
    use esp_idf_svc::hal::peripherals::Peripherals;

    let peripherals = Peripherals::take()?;
    let stream = UartStream::new(
        peripherals.uart1,
        peripherals.pins.gpio17.downgrade_output(),
        peripherals.pins.gpio18.downgrade_input(),
    )?;
    Ok(stream)
}

#[cfg(not(feature = "espidf"))]
fn open_byte_stream() -> Result<StdioStream> {
    StdioStream::spawn().context("spawning stdin reader")
}

#[cfg(feature = "espidf")]
fn host_closed<L>(_link: &mut L) -> bool {
    false
}

#[cfg(not(feature = "espidf"))]
fn host_closed<G>(link: &mut HostLink<'_, G, StdioStream>) -> bool
where
    G: motionstream::transport::radio::GattPort,
{
    match link {
        HostLink::Serial(serial) => serial.stream_mut().is_closed(),
        HostLink::Radio(_) => false,
    }
}

/// Give the rest of the system a turn between ticks.
#[cfg(feature = "espidf")]
fn idle() {
    esp_idf_svc::hal::delay::FreeRtos::delay_ms(1);
}

#[cfg(not(feature = "espidf"))]
fn idle() {
    std::thread::sleep(std::time::Duration::from_millis(1));
}
