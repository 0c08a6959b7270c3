//! Module runtime
//!
//! Modules never own the connection. The transport hands them two narrow
//! capabilities: a [`TopicCollector`] used while (re)subscribing and a
//! [`PublishOutbox`] used to queue outgoing messages. Everything runs on the
//! caller's loop; no method here blocks or awaits.

use embassy_time::{Duration, Instant};

use crate::packet::{Publish, QoS};

/// Receives the topics a module wants to be subscribed to.
pub trait TopicCollector {
    fn add(&mut self, topic: &str);
}

/// Accepts outgoing publishes from a module.
pub trait PublishOutbox {
    fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS, retain: bool);
}

/// A unit of MQTT behaviour driven by [`ModuleRuntime`].
///
/// The trait is dyn-compatible, so a runtime can drive either a concrete
/// module or `&mut dyn MqttModule`.
pub trait MqttModule {
    /// Declare subscriptions. Called on every successful connect.
    fn register(&self, collector: &mut dyn TopicCollector);

    /// Called once, after the first successful connect.
    fn on_start(&mut self, outbox: &mut dyn PublishOutbox);

    /// Handle an inbound message on one of the registered topics.
    fn on_message(&mut self, msg: &Publish<'_>, outbox: &mut dyn PublishOutbox);

    /// Periodic work. Returns the delay until the next tick.
    fn on_tick(&mut self, outbox: &mut dyn PublishOutbox) -> Duration;

    /// Called when the connection comes back after an outage.
    fn on_reconnect(&mut self) {}

    /// Whether the runtime should tick right away instead of waiting for the
    /// scheduled deadline.
    fn needs_immediate_publish(&self) -> bool {
        false
    }
}

impl<M: MqttModule + ?Sized> MqttModule for &mut M {
    fn register(&self, collector: &mut dyn TopicCollector) {
        (**self).register(collector);
    }

    fn on_start(&mut self, outbox: &mut dyn PublishOutbox) {
        (**self).on_start(outbox);
    }

    fn on_message(&mut self, msg: &Publish<'_>, outbox: &mut dyn PublishOutbox) {
        (**self).on_message(msg, outbox);
    }

    fn on_tick(&mut self, outbox: &mut dyn PublishOutbox) -> Duration {
        (**self).on_tick(outbox)
    }

    fn on_reconnect(&mut self) {
        (**self).on_reconnect();
    }

    fn needs_immediate_publish(&self) -> bool {
        (**self).needs_immediate_publish()
    }
}

/// Synchronous driver for a single [`MqttModule`].
///
/// The transport calls into the runtime from its own loop and passes a
/// session object that can both subscribe and publish. Time is supplied by
/// the caller so the schedule stays deterministic.
pub struct ModuleRuntime<M: MqttModule> {
    module: M,
    started: bool,
    connected: bool,
    next_tick: Option<Instant>,
}

impl<M: MqttModule> ModuleRuntime<M> {
    pub fn new(module: M) -> Self {
        Self {
            module,
            started: false,
            connected: false,
            next_tick: None,
        }
    }

    pub fn module(&self) -> &M {
        &self.module
    }

    pub fn module_mut(&mut self) -> &mut M {
        &mut self.module
    }

    pub fn into_inner(self) -> M {
        self.module
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Transport reports an established session.
    ///
    /// Subscriptions are re-registered on every connect. The first connect
    /// starts the module; later ones are reported as reconnects.
    pub fn on_connected<S>(&mut self, session: &mut S, now: Instant)
    where
        S: TopicCollector + PublishOutbox,
    {
        self.module.register(session);

        if self.started {
            log::info!("mqtt: session re-established");
            self.module.on_reconnect();
        } else {
            log::info!("mqtt: session established, starting module");
            self.module.on_start(session);
            self.started = true;
        }

        self.connected = true;
        self.next_tick = Some(now);
    }

    /// Transport lost the session. Ticks pause until the next connect.
    pub fn on_disconnected(&mut self) {
        if self.connected {
            log::warn!("mqtt: connection lost");
        }
        self.connected = false;
        self.next_tick = None;
    }

    /// Forward an inbound message to the module.
    pub fn on_message(&mut self, msg: &Publish<'_>, outbox: &mut dyn PublishOutbox, now: Instant) {
        self.module.on_message(msg, outbox);
        if self.connected && self.module.needs_immediate_publish() {
            self.next_tick = Some(now);
        }
    }

    /// Run the module's tick if it is due.
    ///
    /// Returns the deadline of the next tick, or `None` while disconnected.
    pub fn poll(&mut self, outbox: &mut dyn PublishOutbox, now: Instant) -> Option<Instant> {
        let due = self.next_tick?;
        if now >= due || self.module.needs_immediate_publish() {
            let interval = self.module.on_tick(outbox);
            self.next_tick = Some(now + interval);
        }
        self.next_tick
    }
}
