//! Integration tests for the module runtime and the channel outbox.

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::{Duration, Instant};
use nukihub_mqtt::{
    ChannelOutbox, ModuleRuntime, MqttModule, Publish, PublishChannel, PublishOutbox, QoS,
    TopicCollector,
};

// -----------------------------------------------------------------------------
// Fakes
// -----------------------------------------------------------------------------

#[derive(Default)]
struct Session {
    subscriptions: Vec<String>,
    published: Vec<(String, Vec<u8>, bool)>,
}

impl TopicCollector for Session {
    fn add(&mut self, topic: &str) {
        self.subscriptions.push(topic.to_owned());
    }
}

impl PublishOutbox for Session {
    fn publish(&mut self, topic: &str, payload: &[u8], _qos: QoS, retain: bool) {
        self.published.push((topic.to_owned(), payload.to_vec(), retain));
    }
}

#[derive(Default)]
struct CountingModule {
    starts: usize,
    reconnects: usize,
    ticks: usize,
    messages: Vec<String>,
    urgent: bool,
}

impl MqttModule for CountingModule {
    fn register(&self, collector: &mut dyn TopicCollector) {
        collector.add("dev/cmd");
    }

    fn on_start(&mut self, outbox: &mut dyn PublishOutbox) {
        self.starts += 1;
        outbox.publish("dev/cmd", b"--", QoS::AtLeastOnce, true);
    }

    fn on_message(&mut self, msg: &Publish<'_>, _outbox: &mut dyn PublishOutbox) {
        self.messages.push(msg.topic.to_owned());
        self.urgent = msg.payload == b"now";
    }

    fn on_tick(&mut self, _outbox: &mut dyn PublishOutbox) -> Duration {
        self.ticks += 1;
        self.urgent = false;
        Duration::from_secs(10)
    }

    fn on_reconnect(&mut self) {
        self.reconnects += 1;
    }

    fn needs_immediate_publish(&self) -> bool {
        self.urgent
    }
}

fn at(secs: u64) -> Instant {
    Instant::from_secs(secs)
}

// -----------------------------------------------------------------------------
// ModuleRuntime
// -----------------------------------------------------------------------------

#[test]
fn first_connect_registers_and_starts_once() {
    let mut runtime = ModuleRuntime::new(CountingModule::default());
    let mut session = Session::default();

    runtime.on_connected(&mut session, at(0));

    assert_eq!(session.subscriptions, ["dev/cmd"]);
    assert_eq!(runtime.module().starts, 1);
    assert_eq!(runtime.module().reconnects, 0);
    assert_eq!(session.published.len(), 1);
    assert!(session.published[0].2);
}

#[test]
fn reconnect_resubscribes_without_restarting() {
    let mut runtime = ModuleRuntime::new(CountingModule::default());
    let mut session = Session::default();

    runtime.on_connected(&mut session, at(0));
    runtime.on_disconnected();
    assert!(!runtime.is_connected());
    runtime.on_connected(&mut session, at(5));

    assert_eq!(session.subscriptions, ["dev/cmd", "dev/cmd"]);
    assert_eq!(runtime.module().starts, 1);
    assert_eq!(runtime.module().reconnects, 1);
}

#[test]
fn ticks_follow_the_returned_interval() {
    let mut runtime = ModuleRuntime::new(CountingModule::default());
    let mut session = Session::default();

    assert_eq!(runtime.poll(&mut session, at(0)), None);

    runtime.on_connected(&mut session, at(0));
    assert_eq!(runtime.poll(&mut session, at(0)), Some(at(10)));
    assert_eq!(runtime.module().ticks, 1);

    assert_eq!(runtime.poll(&mut session, at(3)), Some(at(10)));
    assert_eq!(runtime.module().ticks, 1);

    assert_eq!(runtime.poll(&mut session, at(10)), Some(at(20)));
    assert_eq!(runtime.module().ticks, 2);
}

#[test]
fn urgent_message_pulls_the_tick_forward() {
    let mut runtime = ModuleRuntime::new(CountingModule::default());
    let mut session = Session::default();

    runtime.on_connected(&mut session, at(0));
    runtime.poll(&mut session, at(0));

    runtime.on_message(&Publish::new("dev/cmd", b"now"), &mut session, at(2));
    assert_eq!(runtime.poll(&mut session, at(2)), Some(at(12)));
    assert_eq!(runtime.module().ticks, 2);
    assert_eq!(runtime.module().messages, ["dev/cmd"]);
}

#[test]
fn disconnected_runtime_does_not_tick() {
    let mut runtime = ModuleRuntime::new(CountingModule::default());
    let mut session = Session::default();

    runtime.on_connected(&mut session, at(0));
    runtime.on_disconnected();

    assert_eq!(runtime.poll(&mut session, at(100)), None);
    assert_eq!(runtime.module().ticks, 0);
}

#[test]
fn runtime_drives_trait_objects() {
    let mut module = CountingModule::default();
    let mut session = Session::default();
    {
        let dyn_module: &mut dyn MqttModule = &mut module;
        let mut runtime = ModuleRuntime::new(dyn_module);
        runtime.on_connected(&mut session, at(0));
        runtime.poll(&mut session, at(0));
    }
    assert_eq!(module.starts, 1);
    assert_eq!(module.ticks, 1);
}

// -----------------------------------------------------------------------------
// ChannelOutbox
// -----------------------------------------------------------------------------

#[test]
fn channel_outbox_queues_requests_in_order() {
    let channel: PublishChannel<NoopRawMutex, 32, 16, 4> = PublishChannel::new();
    let mut outbox = ChannelOutbox::new(&channel);

    outbox.publish("nuki/lock/state", b"locked", QoS::AtLeastOnce, true);
    outbox.publish("nuki/lock/trigger", b"manual", QoS::AtMostOnce, false);

    let first = channel.try_receive().unwrap();
    assert_eq!(first.topic.as_str(), "nuki/lock/state");
    assert_eq!(first.payload.as_slice(), b"locked");
    assert_eq!(first.qos, QoS::AtLeastOnce);
    assert!(first.retain);

    let second = channel.try_receive().unwrap();
    assert_eq!(second.topic.as_str(), "nuki/lock/trigger");
    assert!(!second.retain);

    assert!(channel.try_receive().is_err());
    assert_eq!(outbox.dropped(), 0);
}

#[test]
fn channel_outbox_drops_oversized_and_overflowing_requests() {
    let channel: PublishChannel<NoopRawMutex, 16, 4, 1> = PublishChannel::new();
    let mut outbox = ChannelOutbox::new(&channel);

    outbox.publish("nuki/lock/state", b"unlocked", QoS::AtLeastOnce, true);
    assert_eq!(outbox.dropped(), 1);

    outbox.publish("nuki/a", b"1", QoS::AtLeastOnce, true);
    outbox.publish("nuki/b", b"2", QoS::AtLeastOnce, true);
    assert_eq!(outbox.dropped(), 2);

    let only = channel.try_receive().unwrap();
    assert_eq!(only.topic.as_str(), "nuki/a");
}
