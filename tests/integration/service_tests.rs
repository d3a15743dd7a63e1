//! StreamService against mock ports: handshake, batching, flush policies,
//! indicator behaviour.

use super::mock_hw::{MockLed, MockLink, RecordingSink, ScriptedSensor};

use motionstream::app::events::AppEvent;
use motionstream::app::service::StreamService;
use motionstream::config::{StreamConfig, TransportKind};
use motionstream::drivers::indicator::{COLOUR_BLUE, COLOUR_GREEN, COLOUR_OFF, COLOUR_YELLOW};
use motionstream::error::TransportError;
use motionstream::fsm::SessionState;
use motionstream::sensors::{channel_set, SensorChannel};

struct Rig {
    svc: StreamService,
    sensor: ScriptedSensor,
    link: MockLink,
    led: MockLed,
    sink: RecordingSink,
}

impl Rig {
    fn new(config: StreamConfig) -> Self {
        let link = MockLink::new(config.transport);
        let mut rig = Self {
            svc: StreamService::new(config).expect("valid config"),
            sensor: ScriptedSensor::default(),
            link,
            led: MockLed::default(),
            sink: RecordingSink::default(),
        };
        rig.svc.start(0, &mut rig.link, &mut rig.led, &mut rig.sink);
        rig
    }

    fn tick(&mut self, now: u32) {
        self.svc
            .tick(now, &mut self.sensor, &mut self.link, &mut self.led, &mut self.sink);
    }
}

/// Two accelerometer axes, four rows per packet, 100 Hz.
fn two_channel(transport: TransportKind, samples_per_packet: u16) -> StreamConfig {
    StreamConfig {
        transport,
        channels: channel_set(&[SensorChannel::AccelerometerX, SensorChannel::AccelerometerY]),
        samples_per_packet,
        output_data_rate_hz: 100,
        ..StreamConfig::default()
    }
}

/// Serial rig already streaming since `t = 5`.
fn streaming_serial(samples_per_packet: u16, rows: &[&[i16]]) -> Rig {
    let mut rig = Rig::new(two_channel(TransportKind::Serial, samples_per_packet));
    rig.sensor = ScriptedSensor::new(rows);
    rig.link.host_says("connect");
    rig.tick(5);
    assert_eq!(rig.svc.state(), SessionState::Streaming);
    rig
}

// ── End-to-end scenario ───────────────────────────────────────

#[test]
fn four_rows_make_one_little_endian_block() {
    let mut rig = streaming_serial(4, &[&[1, 2], &[3, 4], &[5, 6], &[7, 8]]);

    // Row 1 was admitted on the connect tick; three more, one interval apart.
    for now in [10, 15, 20, 25, 30, 35] {
        rig.tick(now);
    }

    assert_eq!(
        rig.link.sent,
        vec![vec![1, 0, 2, 0, 3, 0, 4, 0, 5, 0, 6, 0, 7, 0, 8, 0]]
    );
    assert_eq!(rig.svc.buffer().write_index(), 0);
    for row in 0..4 {
        assert!(rig.svc.buffer().row(row).iter().all(|&s| s == 0));
    }
    assert_eq!(rig.svc.stats().packets_sent, 1);
    assert_eq!(rig.svc.stats().rows_admitted, 4);
}

#[test]
fn serial_never_sends_partial_blocks() {
    let mut rig = streaming_serial(4, &[]);
    // 0..=105 admits rows at 5, 15, …, 105: eleven rows, two full blocks.
    for now in (10..=105).step_by(5) {
        rig.tick(now);
    }
    assert_eq!(rig.link.sent.len(), 2);
    assert!(rig.link.sent.iter().all(|f| f.len() == 2 * 4 * 2));
    assert_eq!(rig.svc.buffer().write_index(), 3);
}

#[test]
fn stale_rows_are_zero_filled_and_counted() {
    let mut rig = streaming_serial(2, &[&[9, 9]]);
    rig.tick(15);
    assert_eq!(rig.link.sent, vec![vec![9, 0, 9, 0, 0, 0, 0, 0]]);
    assert_eq!(rig.svc.stats().stale_rows, 1);
}

// ── Handshake and idempotence ─────────────────────────────────

#[test]
fn descriptor_goes_out_at_startup_and_until_acknowledged() {
    let mut rig = Rig::new(two_channel(TransportKind::Serial, 4));
    assert_eq!(rig.link.descriptors.len(), 1);
    assert_eq!(rig.svc.state(), SessionState::AwaitingAck);

    rig.tick(1000);
    rig.tick(2000);
    assert_eq!(rig.link.descriptors.len(), 3);
    assert_eq!(rig.svc.stats().broadcasts, 3);

    let json: serde_json::Value = serde_json::from_slice(&rig.link.descriptors[0]).unwrap();
    assert_eq!(json["sample_rate"], 100);
    assert_eq!(json["samples_per_packet"], 4);
    assert_eq!(json["column_location"]["AccelerometerY"], 1);
}

#[test]
fn legacy_ack_spelling_accepted() {
    let mut rig = Rig::new(two_channel(TransportKind::Serial, 4));
    rig.link.host_says("cnnect\r\n");
    rig.tick(1);
    assert_eq!(rig.svc.state(), SessionState::Streaming);
}

#[test]
fn second_connect_is_a_no_op() {
    let mut rig = streaming_serial(4, &[]);
    assert_eq!(rig.led.count(COLOUR_YELLOW), 1);
    let changes = rig.sink.session_changes();

    rig.link.host_says("connect");
    rig.tick(10);

    assert_eq!(rig.svc.state(), SessionState::Streaming);
    assert_eq!(rig.led.count(COLOUR_YELLOW), 1);
    assert_eq!(rig.sink.session_changes(), changes);
}

#[test]
fn unknown_text_changes_nothing() {
    let mut rig = Rig::new(two_channel(TransportKind::Serial, 4));
    for text in ["hello", "Connect", "conect", ""] {
        rig.link.host_says(text);
    }
    rig.tick(1);
    assert_eq!(rig.svc.state(), SessionState::AwaitingAck);
}

// ── Disconnect ────────────────────────────────────────────────

#[test]
fn disconnect_discards_partial_packet() {
    let mut rig = streaming_serial(10, &[&[1, 1], &[2, 2], &[3, 3]]);
    rig.tick(15);
    rig.tick(25);
    assert_eq!(rig.svc.buffer().write_index(), 3);

    rig.link.host_says("disconnect");
    rig.tick(30);

    assert_eq!(rig.svc.buffer().write_index(), 0);
    assert!(rig.svc.buffer().row(0).iter().all(|&s| s == 0));
    assert!(rig.link.sent.is_empty());
    assert_eq!(rig.led.last(), Some(COLOUR_BLUE));
    assert!(rig.sink.events.contains(&AppEvent::SessionChanged {
        from: SessionState::Streaming,
        to: SessionState::Idle,
    }));
    // Back in Idle the descriptor is due immediately.
    assert_eq!(rig.svc.state(), SessionState::AwaitingAck);
    assert_eq!(rig.link.descriptors.len(), 2);
}

#[test]
fn disconnect_in_same_tick_suppresses_sampling() {
    let mut rig = streaming_serial(10, &[&[1, 1], &[2, 2]]);
    rig.link.host_says("disconnect");
    rig.tick(15);
    assert_eq!(rig.svc.stats().rows_admitted, 1);
}

#[test]
fn reconnect_starts_a_fresh_packet() {
    let mut rig = streaming_serial(2, &[&[1, 1], &[2, 2], &[3, 3]]);
    rig.link.host_says("disconnect");
    rig.tick(8);
    rig.link.host_says("connect");
    rig.tick(9);
    rig.tick(19);
    assert_eq!(rig.link.sent, vec![vec![2, 0, 2, 0, 3, 0, 3, 0]]);
}

// ── Flush failures ────────────────────────────────────────────

#[test]
fn failed_send_is_dropped_and_storage_cleared() {
    let mut rig = streaming_serial(2, &[&[1, 1], &[2, 2]]);
    rig.link.fail_sends = true;
    rig.tick(15);

    assert_eq!(rig.svc.state(), SessionState::Streaming);
    assert_eq!(rig.svc.stats().packets_dropped, 1);
    assert_eq!(rig.svc.buffer().write_index(), 0);
    assert!(rig.sink.events.contains(&AppEvent::PacketDropped {
        bytes: 8,
        error: TransportError::Unavailable,
    }));
}

// ── Radio ─────────────────────────────────────────────────────

#[test]
fn radio_connect_streams_rows_immediately() {
    let mut rig = Rig::new(two_channel(TransportKind::Radio, 4));
    rig.sensor = ScriptedSensor::new(&[&[1, -1], &[2, -2]]);
    assert_eq!(rig.link.descriptors.len(), 1);
    assert_eq!(rig.svc.state(), SessionState::Idle);

    rig.link.events.push_back(motionstream::transport::LinkEvent::Connected);
    rig.tick(50);
    rig.tick(60);

    assert_eq!(
        rig.link.sent,
        vec![vec![1, 0, 0xFF, 0xFF], vec![2, 0, 0xFE, 0xFF]]
    );
    assert_eq!(rig.led.shown, vec![COLOUR_GREEN]);
    // Radio never re-broadcasts; the config characteristic holds it.
    assert_eq!(rig.link.descriptors.len(), 1);
}

#[test]
fn radio_streaming_freezes_the_blink() {
    let mut rig = Rig::new(two_channel(TransportKind::Radio, 4));
    rig.link.events.push_back(motionstream::transport::LinkEvent::Connected);
    rig.tick(100);

    // The flash still ends on time.
    rig.tick(1100);
    assert_eq!(rig.led.shown, vec![COLOUR_GREEN, COLOUR_OFF]);
    let changed_at = rig.svc.indicator().last_change_ms();
    assert_eq!(changed_at, 1100);

    for now in (1200..10_000).step_by(100) {
        rig.tick(now);
    }
    assert_eq!(rig.svc.indicator().last_change_ms(), changed_at);
    assert_eq!(rig.led.shown.len(), 2);
}

#[test]
fn serial_streaming_keeps_blinking() {
    let mut rig = streaming_serial(4, &[]);
    for now in (10..5000).step_by(10) {
        rig.tick(now);
    }
    assert!(rig.led.count(COLOUR_YELLOW) > 1);
}

#[test]
fn radio_disconnect_returns_to_idle_blue() {
    let mut rig = Rig::new(two_channel(TransportKind::Radio, 4));
    rig.link.events.push_back(motionstream::transport::LinkEvent::Connected);
    rig.tick(10);
    rig.link.events.push_back(motionstream::transport::LinkEvent::Disconnected);
    rig.tick(20);

    assert_eq!(rig.svc.state(), SessionState::Idle);
    assert_eq!(rig.led.last(), Some(COLOUR_BLUE));
    assert_eq!(rig.svc.indicator().pending_colour(), COLOUR_BLUE);
    assert_eq!(rig.svc.last_transition_ms(), 20);
}

// ── Idle indicator ────────────────────────────────────────────

#[test]
fn idle_blinks_red_until_first_session() {
    let mut rig = Rig::new(two_channel(TransportKind::Radio, 4));
    rig.tick(899);
    assert!(rig.led.shown.is_empty());
    rig.tick(900);
    rig.tick(1000);
    assert_eq!(
        rig.led.shown,
        vec![motionstream::drivers::indicator::COLOUR_RED, COLOUR_OFF]
    );
}
