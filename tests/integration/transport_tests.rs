//! StreamService over the real serial and radio transports.

use super::mock_hw::{MemoryUart, MockGatt, MockLed, RecordingSink, ScriptedSensor};

use motionstream::app::service::StreamService;
use motionstream::config::{StreamConfig, TransportKind};
use motionstream::descriptor::DESCRIPTOR_CAPACITY;
use motionstream::fsm::SessionState;
use motionstream::sensors::{channel_set, SensorChannel};
use motionstream::transport::radio::{LinkEvents, RadioTransport};
use motionstream::transport::serial::SerialTransport;
use motionstream::transport::LinkEvent;

fn config(transport: TransportKind) -> StreamConfig {
    StreamConfig {
        transport,
        channels: channel_set(&[SensorChannel::GyroscopeZ]),
        samples_per_packet: 2,
        output_data_rate_hz: 50,
        ..StreamConfig::default()
    }
}

#[test]
fn serial_wire_format() {
    let mut svc = StreamService::new(config(TransportKind::Serial)).unwrap();
    let mut link = SerialTransport::new(MemoryUart::default());
    let mut sensor = ScriptedSensor::new(&[&[0x0102], &[-3]]);
    let (mut led, mut sink) = (MockLed::default(), RecordingSink::default());

    svc.start(0, &mut link, &mut led, &mut sink);
    let descriptor_line = link.stream().to_host.clone();
    assert!(descriptor_line.ends_with(b"\r\n"));
    let json: serde_json::Value =
        serde_json::from_slice(&descriptor_line[..descriptor_line.len() - 2]).unwrap();
    assert_eq!(json["sample_rate"], 50);
    assert_eq!(json["column_location"]["GyroscopeZ"], 0);

    link.stream_mut().host_writes(b"cnnect\n");
    svc.tick(1, &mut sensor, &mut link, &mut led, &mut sink);
    assert_eq!(svc.state(), SessionState::Streaming);
    // 50 Hz → 20 ms interval.
    svc.tick(21, &mut sensor, &mut link, &mut led, &mut sink);

    let wire = &link.stream().to_host[descriptor_line.len()..];
    assert_eq!(wire, &[0x02, 0x01, 0xFD, 0xFF]);
}

#[test]
fn serial_host_disconnect_then_rebroadcast() {
    let mut svc = StreamService::new(config(TransportKind::Serial)).unwrap();
    let mut link = SerialTransport::new(MemoryUart::default());
    let mut sensor = ScriptedSensor::default();
    let (mut led, mut sink) = (MockLed::default(), RecordingSink::default());

    svc.start(0, &mut link, &mut led, &mut sink);
    link.stream_mut().host_writes(b"connect");
    svc.tick(1, &mut sensor, &mut link, &mut led, &mut sink);
    link.stream_mut().host_writes(b"disconnect\r\n");
    svc.tick(2, &mut sensor, &mut link, &mut led, &mut sink);

    assert_eq!(svc.state(), SessionState::AwaitingAck);
    assert_eq!(svc.stats().broadcasts, 2);
}

#[test]
fn radio_rows_as_notifications() {
    let events = LinkEvents::new();
    let mut svc = StreamService::new(config(TransportKind::Radio)).unwrap();
    let mut link = RadioTransport::new(MockGatt::default(), &events, 20);
    let mut sensor = ScriptedSensor::new(&[&[7], &[8], &[9]]);
    let (mut led, mut sink) = (MockLed::default(), RecordingSink::default());

    svc.start(0, &mut link, &mut led, &mut sink);
    assert_eq!(link.gatt().config.len(), DESCRIPTOR_CAPACITY);
    assert_eq!(link.gatt().config[0], b'{');

    // Nothing is sampled before a peer arrives.
    svc.tick(5, &mut sensor, &mut link, &mut led, &mut sink);
    assert!(link.gatt().notified.is_empty());

    events.push(LinkEvent::Connected);
    svc.tick(10, &mut sensor, &mut link, &mut led, &mut sink);
    svc.tick(30, &mut sensor, &mut link, &mut led, &mut sink);
    assert_eq!(link.gatt().notified, vec![vec![7, 0], vec![8, 0]]);

    events.push(LinkEvent::Disconnected);
    svc.tick(50, &mut sensor, &mut link, &mut led, &mut sink);
    assert_eq!(svc.state(), SessionState::Idle);
    assert_eq!(link.gatt().readvertised, 1);
    assert_eq!(link.gatt().notified.len(), 2);
}

#[test]
fn radio_flap_overflowing_queue_still_ends_idle() {
    let events = LinkEvents::new();
    let mut svc = StreamService::new(config(TransportKind::Radio)).unwrap();
    let mut link = RadioTransport::new(MockGatt::default(), &events, 20);
    let mut sensor = ScriptedSensor::default();
    let (mut led, mut sink) = (MockLed::default(), RecordingSink::default());

    svc.start(0, &mut link, &mut led, &mut sink);
    events.push(LinkEvent::Connected);
    svc.tick(10, &mut sensor, &mut link, &mut led, &mut sink);
    assert_eq!(svc.state(), SessionState::Streaming);

    // Five edges against a four-deep queue: the final disconnect is dropped.
    for event in [
        LinkEvent::Disconnected,
        LinkEvent::Connected,
        LinkEvent::Disconnected,
        LinkEvent::Connected,
        LinkEvent::Disconnected,
    ] {
        events.push(event);
    }
    svc.tick(20, &mut sensor, &mut link, &mut led, &mut sink);

    assert_eq!(svc.state(), SessionState::Idle);
    assert!(!link.is_connected());
    assert_eq!(link.gatt().readvertised, 3);
    assert_eq!(led.last(), Some(motionstream::drivers::indicator::COLOUR_BLUE));
}
