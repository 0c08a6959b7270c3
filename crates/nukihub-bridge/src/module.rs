//! Lock MQTT Module
//!
//! [`LockModule`] pairs a [`LockBridge`] with the [`LockPort`] it serves and
//! implements [`MqttModule`], so a [`ModuleRuntime`](nukihub_mqtt::ModuleRuntime)
//! can drive it.
//!
//! # Poll cycle
//!
//! Each tick:
//! 1. consumes the reconnect flag; after a reconnect every mirrored field is
//!    republished and config, lock state and battery (and keypad, when keypad
//!    control is on) are refreshed,
//! 2. drains the pending refresh requests and serves each one from the port,
//! 3. mirrors the port's key turner state when it differs from the last one
//!    published.
//!
//! # Usage
//!
//! ```ignore
//! use nukihub_bridge::LockModule;
//! use nukihub_mqtt::ModuleRuntime;
//!
//! let module: LockModule<_, 2048> = LockModule::load(port, &mut prefs)?;
//! let mut runtime = ModuleRuntime::new(module);
//! ```

use embassy_time::Duration;
use nukihub_mqtt::{MqttModule, Publish, PublishOutbox, TopicCollector};

use crate::{
    bridge::LockBridge,
    config::{BridgeConfig, PreferenceStore},
    error::BridgeError,
    ports::LockPort,
    query::QueryKind,
    topic::TopicResolver,
};

pub struct LockModule<P: LockPort, const BUF_SIZE: usize> {
    port: P,
    bridge: LockBridge<BUF_SIZE>,
}

impl<P: LockPort, const BUF_SIZE: usize> LockModule<P, BUF_SIZE> {
    pub fn new(port: P, resolver: TopicResolver, config: BridgeConfig) -> Self {
        Self {
            port,
            bridge: LockBridge::new(resolver, config),
        }
    }

    /// Build the module with the lock path and flags from stored preferences.
    pub fn load(port: P, prefs: &mut impl PreferenceStore) -> Result<Self, BridgeError> {
        Ok(Self {
            port,
            bridge: LockBridge::load(prefs)?,
        })
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn bridge(&self) -> &LockBridge<BUF_SIZE> {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut LockBridge<BUF_SIZE> {
        &mut self.bridge
    }

    /// Run one poll cycle.
    ///
    /// Every step runs even when an earlier one fails; the first error is
    /// returned.
    pub fn poll<O: PublishOutbox + ?Sized>(&mut self, outbox: &mut O) -> Result<(), BridgeError> {
        let mut result = Ok(());

        if self.bridge.take_reconnected() {
            log::info!("lock: reconnected, republishing lock state");
            self.bridge.force_full_publish();
            for kind in QueryKind::ALL {
                self.bridge.request_query(kind);
            }
        }

        for kind in self.bridge.drain_queries().iter() {
            result = result.and(self.serve_query(kind, outbox));
        }

        if let Some(state) = self.port.key_turner_state()
            && self.bridge.is_stale(&state)
        {
            result = result.and(self.bridge.publish_key_turner_state(outbox, &state));
        }

        result
    }

    fn serve_query<O: PublishOutbox + ?Sized>(
        &mut self,
        kind: QueryKind,
        outbox: &mut O,
    ) -> Result<(), BridgeError> {
        log::debug!("lock: serving {:?} query", kind);
        let mut result = Ok(());

        match kind {
            QueryKind::Config => {
                if let Some(config) = self.port.config() {
                    result = result.and(self.bridge.publish_config(outbox, config));
                }
                if let Some(advanced) = self.port.advanced_config() {
                    result = result.and(self.bridge.publish_advanced_config(outbox, advanced));
                }
            }
            QueryKind::LockState => {
                if let Some(entries) = self.port.log_entries() {
                    result = result.and(self.bridge.publish_authorization_info(outbox, entries));
                }
                if let Some(state) = self.port.key_turner_state() {
                    result = result.and(self.bridge.publish_key_turner_state(outbox, &state));
                }
            }
            QueryKind::Keypad => {
                if let Some(entries) = self.port.keypad_entries() {
                    result = result.and(self.bridge.publish_keypad(outbox, entries));
                }
            }
            QueryKind::Battery => {
                if let Some(report) = self.port.battery_report() {
                    self.bridge.publish_battery_report(outbox, &report);
                }
            }
        }

        result
    }
}

impl<P: LockPort, const BUF_SIZE: usize> MqttModule for LockModule<P, BUF_SIZE> {
    fn register(&self, collector: &mut dyn TopicCollector) {
        self.bridge.register(collector);
    }

    fn on_start(&mut self, outbox: &mut dyn PublishOutbox) {
        self.bridge.seed_defaults(outbox);
    }

    fn on_message(&mut self, msg: &Publish<'_>, outbox: &mut dyn PublishOutbox) {
        self.bridge.handle_message(msg, &mut self.port, outbox);
    }

    fn on_tick(&mut self, outbox: &mut dyn PublishOutbox) -> Duration {
        if let Err(e) = self.poll(outbox) {
            log::error!("lock: poll failed: {}", e);
        }
        self.bridge.config().tick_interval
    }

    fn on_reconnect(&mut self) {
        self.bridge.notify_reconnected();
    }

    fn needs_immediate_publish(&self) -> bool {
        self.bridge.has_pending_work()
    }
}
