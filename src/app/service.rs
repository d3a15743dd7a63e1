//! Application service: the hexagonal core.
//!
//! [`StreamService`] owns the session FSM, the sample buffer, both timers
//! and the indicator state. It exposes one [`tick`](StreamService::tick)
//! that the enclosing loop calls as often as it can. All I/O flows through
//! port traits passed in at call sites, so the whole service runs against
//! mock adapters in tests.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ Transport
//!                 │        StreamService         │
//!  Transport  ──▶ │ Session · Scheduler · Buffer │ ──▶ IndicatorPort
//!                 └──────────────────────────────┘ ──▶ EventSink
//! ```
//!
//! Order inside one tick:
//!
//! 1. service the sensor hub
//! 2. drain link events and inbound commands into the session
//! 3. serial only, not streaming: re-broadcast the descriptor when due
//! 4. streaming and admitted: sample one row, flush per policy
//! 5. end an expired flash, then advance the blink unless radio-streaming
//!
//! Session side effects (cues, buffer clear, scheduler arm) are applied as
//! soon as each input is handled, so a disconnect drained in step 2
//! suppresses that tick's sampling.

use log::{debug, info};

use crate::buffer::{FlushPolicy, SampleBuffer};
use crate::config::{StreamConfig, TransportKind};
use crate::descriptor::ConfigDescriptor;
use crate::drivers::indicator::{
    StatusIndicator, COLOUR_BLUE, COLOUR_GREEN, COLOUR_YELLOW, Rgb,
};
use crate::error::ConfigError;
use crate::fsm::context::{Cue, SessionContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{SessionFsm, SessionInput, SessionState};
use crate::scheduler::{BroadcastTimer, SampleScheduler};
use crate::sensors::MAX_COLUMNS;
use crate::transport::{LinkEvent, Transport};

use super::commands::HostCommand;
use super::events::AppEvent;
use super::ports::{EventSink, IndicatorPort, SensorPort};

/// Upper bound on link events / inbound messages taken per tick, so a
/// chatty host cannot starve sampling.
const MAX_INPUTS_PER_TICK: usize = 8;

// ───────────────────────────────────────────────────────────────
// Link statistics
// ───────────────────────────────────────────────────────────────

/// Counters since startup. All wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub packets_sent: u32,
    pub packets_dropped: u32,
    pub rows_admitted: u32,
    /// Admitted rows for which the hub had no new data (sent as zeros).
    pub stale_rows: u32,
    pub broadcasts: u32,
}

// ───────────────────────────────────────────────────────────────
// StreamService
// ───────────────────────────────────────────────────────────────

pub struct StreamService {
    config: StreamConfig,
    fsm: SessionFsm,
    ctx: SessionContext,
    buffer: SampleBuffer,
    policy: FlushPolicy,
    scheduler: SampleScheduler,
    broadcast: BroadcastTimer,
    indicator: StatusIndicator,
    descriptor: Vec<u8>,
    stats: LinkStats,
    tick_count: u64,
}

impl StreamService {
    /// Validate `config` and size everything from it.
    ///
    /// Does **not** start the session; call [`start`](Self::start) next.
    pub fn new(config: StreamConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let descriptor = ConfigDescriptor::from_config(&config).to_json()?;

        let buffer = SampleBuffer::new(
            config.channels.clone(),
            usize::from(config.samples_per_packet),
        );

        Ok(Self {
            fsm: SessionFsm::new(build_state_table(), SessionState::Idle),
            ctx: SessionContext::new(config.transport),
            policy: FlushPolicy::for_transport(config.transport),
            scheduler: SampleScheduler::new(config.interval_ms()),
            broadcast: BroadcastTimer::new(config.descriptor_broadcast_interval_ms),
            indicator: StatusIndicator::new(config.led_on_duration_ms, config.led_off_duration_ms),
            buffer,
            descriptor,
            stats: LinkStats::default(),
            tick_count: 0,
            config,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the session in `Idle` and publish the descriptor once.
    ///
    /// On the radio link this fills the config characteristic. On serial it
    /// is the first broadcast, which also moves the session to `AwaitingAck`.
    pub fn start(
        &mut self,
        now: u32,
        link: &mut impl Transport,
        led: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        self.ctx.now_ms = now;
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started {
            transport: self.config.transport,
            state: self.fsm.current_state(),
        });
        info!(
            "StreamService started: {} columns x {} rows @ {} Hz over {:?}",
            self.buffer.column_count(),
            self.buffer.capacity_per_column(),
            self.config.output_data_rate_hz,
            self.config.transport
        );

        match self.config.transport {
            TransportKind::Radio => {
                self.publish_descriptor(link, sink);
            }
            TransportKind::Serial => self.broadcast_if_due(now, link, led, sink),
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one pass of the cooperative loop at time `now`.
    pub fn tick(
        &mut self,
        now: u32,
        sensor: &mut impl SensorPort,
        link: &mut impl Transport,
        led: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        self.ctx.now_ms = now;

        // 1. Hub FIFO
        sensor.update();

        // 2. Link events, then host commands
        self.drain_link(link, led, sink);

        // 3. Serial descriptor re-broadcast
        if self.config.transport == TransportKind::Serial && !self.fsm.is_streaming() {
            self.broadcast_if_due(now, link, led, sink);
        }

        // 4. Sampling
        if self.fsm.is_streaming() && self.scheduler.admit(now) {
            self.sample_row(sensor, link, sink);
        }

        // 5. Indicator
        if let Some(colour) = self.indicator.settle(now) {
            led.show(colour);
        }
        let radio_streaming =
            self.config.transport == TransportKind::Radio && self.fsm.is_streaming();
        if !radio_streaming {
            if let Some(colour) = self.indicator.tick(now) {
                led.show(colour);
            }
        }
    }

    /// Feed one input into the session and apply whatever it requested.
    pub fn feed(
        &mut self,
        input: SessionInput,
        led: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> Option<SessionState> {
        let transition = self.fsm.handle(input, &mut self.ctx)?;
        self.apply_requests(led);
        sink.emit(&AppEvent::SessionChanged {
            from: transition.from,
            to: transition.to,
        });
        Some(transition.to)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.fsm.current_state()
    }

    pub fn is_streaming(&self) -> bool {
        self.fsm.is_streaming()
    }

    pub fn last_transition_ms(&self) -> u32 {
        self.fsm.last_transition_ms()
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn indicator(&self) -> &StatusIndicator {
        &self.indicator
    }

    pub fn flush_policy(&self) -> FlushPolicy {
        self.policy
    }

    /// Serialised configuration descriptor.
    pub fn descriptor(&self) -> &[u8] {
        &self.descriptor
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn drain_link(
        &mut self,
        link: &mut impl Transport,
        led: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        for _ in 0..MAX_INPUTS_PER_TICK {
            let Some(event) = link.poll_event() else { break };
            let input = match event {
                LinkEvent::Connected => SessionInput::LinkConnected,
                LinkEvent::Disconnected => SessionInput::LinkDisconnected,
            };
            self.feed(input, led, sink);
        }

        for _ in 0..MAX_INPUTS_PER_TICK {
            let Some(message) = link.poll_inbound() else { break };
            match HostCommand::parse_bytes(&message) {
                Some(cmd) => {
                    self.feed(SessionInput::Command(cmd), led, sink);
                }
                None => debug!("Ignoring {} bytes of unrecognised host text", message.len()),
            }
        }
    }

    fn apply_requests(&mut self, led: &mut impl IndicatorPort) {
        let now = self.ctx.now_ms;
        let req = self.ctx.take_requests();

        if req.clear_buffer {
            self.buffer.clear();
        }
        if req.arm_scheduler {
            self.scheduler.arm(now);
        }
        if req.reset_broadcast {
            self.broadcast.reset();
        }
        match req.cue {
            Some(Cue::Connected) => {
                let colour = self.connected_colour();
                led.show(self.indicator.flash(colour, now, self.config.connect_flash_ms));
            }
            Some(Cue::Disconnected) => {
                led.show(self.indicator.set_pending(COLOUR_BLUE, now));
            }
            None => {}
        }
    }

    fn connected_colour(&self) -> Rgb {
        match self.config.transport {
            TransportKind::Radio => COLOUR_GREEN,
            TransportKind::Serial => COLOUR_YELLOW,
        }
    }

    fn broadcast_if_due(
        &mut self,
        now: u32,
        link: &mut impl Transport,
        led: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        if !self.broadcast.due(now) {
            return;
        }
        if self.publish_descriptor(link, sink) {
            self.feed(SessionInput::DescriptorBroadcast, led, sink);
        }
    }

    fn publish_descriptor(&mut self, link: &mut impl Transport, sink: &mut impl EventSink) -> bool {
        match link.write_descriptor(&self.descriptor) {
            Ok(()) => {
                self.stats.broadcasts = self.stats.broadcasts.wrapping_add(1);
                sink.emit(&AppEvent::DescriptorBroadcast {
                    bytes: self.descriptor.len(),
                });
                true
            }
            Err(error) => {
                sink.emit(&AppEvent::DescriptorFailed(error));
                false
            }
        }
    }

    fn sample_row(
        &mut self,
        sensor: &mut impl SensorPort,
        link: &mut impl Transport,
        sink: &mut impl EventSink,
    ) {
        let width = self.buffer.column_count();
        let mut scratch = [0i16; MAX_COLUMNS];
        let row = &mut scratch[..width];

        self.stats.rows_admitted = self.stats.rows_admitted.wrapping_add(1);
        if !sensor.read_row(self.buffer.columns(), row) {
            self.stats.stale_rows = self.stats.stale_rows.wrapping_add(1);
            debug!("Sensor hub stale, appending zero row");
        }

        let index = self.buffer.append(row) - 1;

        match self.policy {
            FlushPolicy::PerSample => {
                let frame = self.buffer.encode_row(index);
                self.buffer.clear_row(index);
                self.buffer.rewind();
                self.send(&frame, link, sink);
            }
            FlushPolicy::FullBlock => {
                if self.buffer.is_full() {
                    let frame = self.buffer.encode_filled();
                    self.buffer.clear();
                    self.send(&frame, link, sink);
                }
            }
        }
    }

    fn send(&mut self, frame: &[u8], link: &mut impl Transport, sink: &mut impl EventSink) {
        match link.send(frame) {
            Ok(()) => {
                self.stats.packets_sent = self.stats.packets_sent.wrapping_add(1);
                sink.emit(&AppEvent::PacketFlushed { bytes: frame.len() });
            }
            Err(error) => {
                self.stats.packets_dropped = self.stats.packets_dropped.wrapping_add(1);
                sink.emit(&AppEvent::PacketDropped {
                    bytes: frame.len(),
                    error,
                });
            }
        }
    }
}
