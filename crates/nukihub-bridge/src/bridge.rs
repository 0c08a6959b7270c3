//! Lock bridge core
//!
//! [`LockBridge`] owns all bridge state (staged keypad command, pending
//! queries, last published snapshot, republish and reconnect flags) and is
//! driven by `&mut` from a single loop. Inbound messages go through
//! [`LockBridge::handle_message`]; the owner pushes fresh lock data through
//! the `publish_*` operations.

use nukihub_lock::{AdvancedConfig, BatteryReport, Config, KeyTurnerState, KeypadEntry, LogEntry};
use nukihub_mqtt::{Publish, PublishOutbox, TopicCollector};

use crate::{
    config::{BridgeConfig, PreferenceStore},
    error::BridgeError,
    keypad::KeypadStaging,
    mirror::{AuthorizedUser, StateMirror, derive_authorized_user},
    ports::LockCommandHandler,
    publisher::TopicPublisher,
    query::{QueryCoalescer, QueryCommands, QueryKind},
    registrar::SubscriptionRegistrar,
    render::{self, AdvancedConfigJson, ConfigJson, KeypadJson, LogJson},
    result::{self, PLACEHOLDER, is_protocol_echo},
    topic::TopicResolver,
    topics::{self, keypad_slot, slot_field},
};

/// Payload of the reset topic that restarts the device
const RESET_REQUEST: &str = "1";

/// Bridge between the lock and its MQTT topic tree.
///
/// Routes inbound command topics to a [`LockCommandHandler`] and publishes
/// lock data handed in by the owner. Every publish is retained.
///
/// # Type Parameters
///
/// - `BUF_SIZE`: Size of the JSON serialization buffer. A JSON payload that
///   does not fit is not published and [`BridgeError::BufferTooSmall`] is
///   returned.
///
/// # Example
///
/// ```ignore
/// let mut bridge: LockBridge<2048> = LockBridge::load(&mut prefs)?;
///
/// bridge.register(&mut session);
/// bridge.seed_defaults(&mut session);
/// bridge.handle_message(&msg, &mut lock, &mut session);
/// bridge.publish_key_turner_state(&mut session, &state)?;
/// ```
pub struct LockBridge<const BUF_SIZE: usize> {
    resolver: TopicResolver,
    config: BridgeConfig,
    registrar: SubscriptionRegistrar,
    queries: QueryCoalescer,
    keypad: KeypadStaging,
    mirror: StateMirror,
    auth: AuthorizedUser,
    reconnected: bool,
    buf: [u8; BUF_SIZE],
}

impl<const BUF_SIZE: usize> LockBridge<BUF_SIZE> {
    /// Create a bridge.
    ///
    /// # Arguments
    ///
    /// - `resolver`: Lock path every topic is built under
    /// - `config`: Keypad control and presentation flags, slot count
    pub fn new(resolver: TopicResolver, config: BridgeConfig) -> Self {
        Self {
            resolver,
            config,
            registrar: SubscriptionRegistrar::new(config.keypad_control_enabled),
            queries: QueryCoalescer::new(),
            keypad: KeypadStaging::new(),
            mirror: StateMirror::new(config.ha_enabled),
            auth: AuthorizedUser::default(),
            reconnected: false,
            buf: [0u8; BUF_SIZE],
        }
    }

    /// Build the bridge from stored preferences.
    ///
    /// # Returns
    ///
    /// `Err(BridgeError::PrefixTooLong)` if the stored lock path does not
    /// fit, `Err(BridgeError::Persistence)` if writing the default path back
    /// fails.
    pub fn load(prefs: &mut impl PreferenceStore) -> Result<Self, BridgeError> {
        let resolver = TopicResolver::load(prefs)?;
        let config = BridgeConfig::load(prefs);
        log::info!(
            "lock: bridge on '{}' (keypad control: {}, presentation: {})",
            resolver.prefix(),
            config.keypad_control_enabled,
            config.ha_enabled
        );
        Ok(Self::new(resolver, config))
    }

    /// Lock path resolver
    pub fn resolver(&self) -> &TopicResolver {
        &self.resolver
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Last derived authorized user
    pub fn authorized_user(&self) -> &AuthorizedUser {
        &self.auth
    }

    /// Keypad command staged so far
    pub fn keypad_staging(&self) -> &KeypadStaging {
        &self.keypad
    }

    // ---------------------------------------------------------------------
    // Subscriptions
    // ---------------------------------------------------------------------

    /// Subscribe to every active command topic.
    ///
    /// Keypad command topics are only included with keypad control enabled.
    /// Call on every connect.
    pub fn register(&self, collector: &mut dyn TopicCollector) {
        self.registrar.register(&self.resolver, collector);
    }

    /// Publish the command topic defaults. Only the first call publishes.
    pub fn seed_defaults<O: PublishOutbox + ?Sized>(&mut self, outbox: &mut O) -> bool {
        let mut publisher = TopicPublisher::new(&self.resolver, outbox);
        self.registrar.seed_defaults(&mut publisher)
    }

    /// Transport reconnected; consumed by [`take_reconnected`](Self::take_reconnected).
    pub fn notify_reconnected(&mut self) {
        self.reconnected = true;
    }

    /// Read and clear the reconnect flag.
    pub fn take_reconnected(&mut self) -> bool {
        core::mem::take(&mut self.reconnected)
    }

    /// Make the next key turner publish republish every field.
    pub fn force_full_publish(&mut self) {
        self.mirror.force_full_publish();
    }

    /// Whether publishing `state` would send anything besides the full-state
    /// JSON.
    pub fn is_stale(&self, state: &KeyTurnerState) -> bool {
        self.mirror.is_first_publish() || self.mirror.previous() != state
    }

    /// Refresh requests not yet drained
    pub fn pending_queries(&self) -> QueryCommands {
        self.queries.pending()
    }

    /// Take every pending refresh request.
    pub fn drain_queries(&mut self) -> QueryCommands {
        self.queries.drain()
    }

    /// Request a refresh as if it arrived over MQTT, without acknowledging.
    pub fn request_query(&mut self, kind: QueryKind) {
        if kind == QueryKind::Keypad && !self.config.keypad_control_enabled {
            return;
        }
        self.queries.request(kind);
    }

    /// Whether the poll cycle has work that should not wait for the next tick.
    pub fn has_pending_work(&self) -> bool {
        self.reconnected || !self.queries.pending().is_empty()
    }

    // ---------------------------------------------------------------------
    // Inbound
    // ---------------------------------------------------------------------

    /// Route an inbound message by topic.
    ///
    /// Messages on topics outside the lock path, on inactive topics, or with
    /// a non-UTF-8 payload are ignored.
    ///
    /// # Arguments
    ///
    /// - `msg`: Inbound message
    /// - `handler`: Executes lock actions, config updates, keypad commands
    ///   and restarts
    /// - `outbox`: Receives result tokens, query acknowledgements and keypad
    ///   defaults
    pub fn handle_message<O, H>(&mut self, msg: &Publish<'_>, handler: &mut H, outbox: &mut O)
    where
        O: PublishOutbox + ?Sized,
        H: LockCommandHandler + ?Sized,
    {
        let Some(suffix) = self.resolver.suffix_of(msg.topic) else {
            return;
        };
        if !self.registrar.is_active(suffix) {
            log::debug!("lock: ignoring message on inactive topic '{}'", msg.topic);
            return;
        }
        let Ok(value) = core::str::from_utf8(msg.payload) else {
            log::warn!("lock: non UTF-8 payload on '{}', ignoring", msg.topic);
            return;
        };

        let mut publisher = TopicPublisher::new(&self.resolver, outbox);

        match suffix {
            topics::MAINTENANCE_RESET => {
                if value == RESET_REQUEST {
                    log::warn!("lock: restart requested via MQTT");
                    handler.on_restart_requested();
                }
            }
            topics::LOCK_ACTION => {
                if is_protocol_echo(value) {
                    return;
                }
                log::info!("lock: lock action received: {}", value);
                let code = handler.on_lock_action(value);
                result::report(&mut publisher, topics::LOCK_ACTION, code);
            }
            topics::CONFIG_ACTION => {
                if is_protocol_echo(value) {
                    return;
                }
                log::info!("lock: config action received: {}", value);
                let code = handler.on_config_update(value);
                result::report(&mut publisher, topics::CONFIG_ACTION, code);
            }
            topics::KEYPAD_COMMAND_ACTION => {
                self.keypad.commit(
                    value,
                    |command| handler.on_keypad_command(command),
                    &mut publisher,
                );
            }
            topics::KEYPAD_COMMAND_ID => self.keypad.set_id(value),
            topics::KEYPAD_COMMAND_NAME => {
                self.keypad.set_name(value);
            }
            topics::KEYPAD_COMMAND_CODE => {
                self.keypad.set_code(value);
            }
            topics::KEYPAD_COMMAND_ENABLED => self.keypad.set_enabled(value),
            other => {
                if let Some(kind) = QueryKind::from_suffix(other) {
                    self.queries.on_request(kind, value, &mut publisher);
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Outbound
    // ---------------------------------------------------------------------

    /// Mirror a key turner snapshot. See [`StateMirror::publish`].
    ///
    /// # Returns
    ///
    /// `Err(BridgeError::BufferTooSmall)` if `lock/json` does not fit; the
    /// changed fields are published regardless.
    pub fn publish_key_turner_state<O: PublishOutbox + ?Sized>(
        &mut self,
        outbox: &mut O,
        state: &KeyTurnerState,
    ) -> Result<(), BridgeError> {
        let mut publisher = TopicPublisher::new(&self.resolver, outbox);
        self.mirror
            .publish(&mut publisher, state, &self.auth, &mut self.buf)
    }

    /// Publish the recent log and the user behind the last action.
    ///
    /// When none of the recent entries is a lock or keypad action the
    /// previously derived user is kept and not republished.
    ///
    /// # Arguments
    ///
    /// - `entries`: Log entries, newest first. Only the first five are used.
    pub fn publish_authorization_info<O: PublishOutbox + ?Sized>(
        &mut self,
        outbox: &mut O,
        entries: &[LogEntry],
    ) -> Result<(), BridgeError> {
        let mut publisher = TopicPublisher::new(&self.resolver, outbox);
        let rendered = publisher.publish_json(topics::LOCK_LOG, &LogJson(entries), &mut self.buf);

        if let Some(user) = derive_authorized_user(entries) {
            publisher.publish_uint(topics::LOCK_AUTH_ID, user.id);
            publisher.publish_str(topics::LOCK_AUTH_NAME, user.name.as_str());
            self.auth = user;
        }
        rendered
    }

    /// Reset the log and authorization channels to their placeholders.
    pub fn clear_authorization_info<O: PublishOutbox + ?Sized>(&self, outbox: &mut O) {
        let mut publisher = TopicPublisher::new(&self.resolver, outbox);
        publisher.publish_str(topics::LOCK_LOG, PLACEHOLDER);
        publisher.publish_uint(topics::LOCK_AUTH_ID, 0);
        publisher.publish_str(topics::LOCK_AUTH_NAME, PLACEHOLDER);
    }

    /// Publish voltage (V), drain (mWs), max turn current (A) and lock
    /// distance (degrees).
    pub fn publish_battery_report<O: PublishOutbox + ?Sized>(
        &self,
        outbox: &mut O,
        report: &BatteryReport,
    ) {
        let mut publisher = TopicPublisher::new(&self.resolver, outbox);
        publisher.publish_float(topics::BATTERY_VOLTAGE, report.voltage(), 2);
        publisher.publish_uint(topics::BATTERY_DRAIN, u32::from(report.battery_drain));
        publisher.publish_float(
            topics::BATTERY_MAX_TURN_CURRENT,
            report.max_turn_current_amps(),
            2,
        );
        publisher.publish_uint(
            topics::BATTERY_LOCK_DISTANCE,
            u32::from(report.lock_distance),
        );
    }

    /// Publish the basic configuration JSON and its individual topics.
    ///
    /// # Returns
    ///
    /// `Err(BridgeError::BufferTooSmall)` if the JSON does not fit. Nothing
    /// is published in that case.
    pub fn publish_config<O: PublishOutbox + ?Sized>(
        &mut self,
        outbox: &mut O,
        config: &Config,
    ) -> Result<(), BridgeError> {
        let mut publisher = TopicPublisher::new(&self.resolver, outbox);
        publisher.publish_json(
            topics::CONFIG_BASIC_JSON,
            &ConfigJson::from(config),
            &mut self.buf,
        )?;

        publisher.publish_bool(topics::CONFIG_BUTTON_ENABLED, config.button_enabled);
        publisher.publish_bool(topics::CONFIG_LED_ENABLED, config.led_enabled);
        publisher.publish_uint(
            topics::CONFIG_LED_BRIGHTNESS,
            u32::from(config.led_brightness),
        );
        publisher.publish_bool(topics::CONFIG_SINGLE_LOCK, config.single_lock);
        publisher.publish_str(
            topics::INFO_FIRMWARE_VERSION,
            render::firmware_version(config).as_str(),
        );
        publisher.publish_str(
            topics::INFO_HARDWARE_VERSION,
            render::hardware_revision(config).as_str(),
        );
        Ok(())
    }

    /// Publish the advanced configuration JSON and its individual topics.
    ///
    /// Fails like [`publish_config`](Self::publish_config).
    pub fn publish_advanced_config<O: PublishOutbox + ?Sized>(
        &mut self,
        outbox: &mut O,
        config: &AdvancedConfig,
    ) -> Result<(), BridgeError> {
        let mut publisher = TopicPublisher::new(&self.resolver, outbox);
        publisher.publish_json(
            topics::CONFIG_ADVANCED_JSON,
            &AdvancedConfigJson::from(config),
            &mut self.buf,
        )?;

        publisher.publish_bool(topics::CONFIG_AUTO_UNLOCK, !config.auto_unlock_disabled);
        publisher.publish_bool(topics::CONFIG_AUTO_LOCK, config.auto_lock_enabled);
        Ok(())
    }

    /// Publish the keypad listing and one topic group per slot.
    ///
    /// Slots `0..max_keypad_code_count` are always published; slots without a
    /// known entry carry an empty record.
    ///
    /// # Returns
    ///
    /// `Err(BridgeError::BufferTooSmall)` if `keypad/json` does not fit; the
    /// slot topics are published regardless.
    pub fn publish_keypad<O: PublishOutbox + ?Sized>(
        &mut self,
        outbox: &mut O,
        entries: &[KeypadEntry],
    ) -> Result<(), BridgeError> {
        let max = self.config.max_keypad_code_count;
        let mut publisher = TopicPublisher::new(&self.resolver, outbox);

        let mut index: u16 = 0;
        for entry in entries.iter().take(usize::from(max)) {
            publish_keypad_slot(&mut publisher, index, entry);
            index += 1;
        }

        let rendered =
            publisher.publish_json(topics::KEYPAD_JSON, &KeypadJson(entries), &mut self.buf);

        let empty = KeypadEntry::default();
        while index < max {
            publish_keypad_slot(&mut publisher, index, &empty);
            index += 1;
        }
        rendered
    }

    /// Report the outcome of a lock action executed by the owner.
    pub fn publish_command_result<O: PublishOutbox + ?Sized>(&self, outbox: &mut O, result: &str) {
        TopicPublisher::new(&self.resolver, outbox)
            .publish_str(topics::LOCK_ACTION_COMMAND_RESULT, result);
    }

    /// Report the outcome of a lock state refresh.
    pub fn publish_lockstate_command_result<O: PublishOutbox + ?Sized>(
        &self,
        outbox: &mut O,
        result: &str,
    ) {
        TopicPublisher::new(&self.resolver, outbox)
            .publish_str(topics::QUERY_LOCKSTATE_COMMAND_RESULT, result);
    }

    /// Report the outcome of a committed keypad command.
    pub fn publish_keypad_command_result<O: PublishOutbox + ?Sized>(
        &self,
        outbox: &mut O,
        result: &str,
    ) {
        TopicPublisher::new(&self.resolver, outbox)
            .publish_str(topics::KEYPAD_COMMAND_RESULT, result);
    }

    /// Signal strength of the radio link, in dBm
    pub fn publish_rssi<O: PublishOutbox + ?Sized>(&self, outbox: &mut O, rssi: i32) {
        TopicPublisher::new(&self.resolver, outbox).publish_int(topics::LOCK_RSSI, i64::from(rssi));
    }

    /// Retry state of the last lock command
    pub fn publish_retry<O: PublishOutbox + ?Sized>(&self, outbox: &mut O, message: &str) {
        TopicPublisher::new(&self.resolver, outbox).publish_str(topics::LOCK_RETRY, message);
    }

    /// Radio address of the paired lock
    pub fn publish_ble_address<O: PublishOutbox + ?Sized>(&self, outbox: &mut O, address: &str) {
        TopicPublisher::new(&self.resolver, outbox).publish_str(topics::LOCK_ADDRESS, address);
    }
}

fn publish_keypad_slot<O: PublishOutbox + ?Sized>(
    publisher: &mut TopicPublisher<'_, O>,
    index: u16,
    entry: &KeypadEntry,
) {
    let created = entry.created;
    publisher.publish_uint(&keypad_slot(index, slot_field::ID), u32::from(entry.code_id));
    publisher.publish_bool(&keypad_slot(index, slot_field::ENABLED), entry.enabled);
    publisher.publish_str(&keypad_slot(index, slot_field::NAME), entry.name.as_str());
    publisher.publish_uint(
        &keypad_slot(index, slot_field::CREATED_YEAR),
        u32::from(created.year),
    );
    publisher.publish_uint(
        &keypad_slot(index, slot_field::CREATED_MONTH),
        u32::from(created.month),
    );
    publisher.publish_uint(&keypad_slot(index, slot_field::CREATED_DAY), u32::from(created.day));
    publisher.publish_uint(
        &keypad_slot(index, slot_field::CREATED_HOUR),
        u32::from(created.hour),
    );
    publisher.publish_uint(
        &keypad_slot(index, slot_field::CREATED_MIN),
        u32::from(created.minute),
    );
    publisher.publish_uint(
        &keypad_slot(index, slot_field::CREATED_SEC),
        u32::from(created.second),
    );
    publisher.publish_uint(
        &keypad_slot(index, slot_field::LOCK_COUNT),
        u32::from(entry.lock_count),
    );
}
