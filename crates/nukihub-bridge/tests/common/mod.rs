//! Fakes shared by the bridge integration tests.

#![allow(dead_code, unreachable_pub)]

use std::collections::HashMap;

use nukihub_bridge::{
    KeypadCommand, LockCommandHandler, LockStateReader, PersistenceError, PreferenceStore,
    ResultCode, config::PreferenceValue,
};
use nukihub_lock::{
    AdvancedConfig, BatteryReport, CompletionStatus, Config, DoorSensorState, KeyTurnerState,
    KeypadEntry, LockAction, LockState, LogEntry, LogPayload, LoggingType, Name, Timestamp,
    Trigger,
};
use nukihub_mqtt::{PublishOutbox, QoS, TopicCollector};

// -----------------------------------------------------------------------------
// Transport
// -----------------------------------------------------------------------------

/// Records subscriptions and publishes in order.
#[derive(Default)]
pub struct Recorder {
    pub subscriptions: Vec<String>,
    pub published: Vec<(String, String)>,
}

impl Recorder {
    pub fn clear(&mut self) {
        self.published.clear();
    }

    /// Payloads published on `topic`, oldest first.
    pub fn on(&self, topic: &str) -> Vec<&str> {
        self.published
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| p.as_str())
            .collect()
    }

    pub fn last(&self, topic: &str) -> Option<&str> {
        self.on(topic).last().copied()
    }

    pub fn topics(&self) -> Vec<&str> {
        self.published.iter().map(|(t, _)| t.as_str()).collect()
    }
}

impl TopicCollector for Recorder {
    fn add(&mut self, topic: &str) {
        self.subscriptions.push(topic.to_owned());
    }
}

impl PublishOutbox for Recorder {
    fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS, retain: bool) {
        assert_eq!(qos, QoS::AtLeastOnce, "publish to {topic} not at least once");
        assert!(retain, "publish to {topic} not retained");
        let payload = String::from_utf8(payload.to_vec()).expect("payload is UTF-8");
        self.published.push((topic.to_owned(), payload));
    }
}

// -----------------------------------------------------------------------------
// Preferences
// -----------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryPrefs {
    pub strings: HashMap<String, String>,
    pub bools: HashMap<String, bool>,
    pub ints: HashMap<String, i32>,
}

impl MemoryPrefs {
    pub fn with_string(mut self, key: &str, value: &str) -> Self {
        self.strings.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn with_bool(mut self, key: &str, value: bool) -> Self {
        self.bools.insert(key.to_owned(), value);
        self
    }

    pub fn with_int(mut self, key: &str, value: i32) -> Self {
        self.ints.insert(key.to_owned(), value);
        self
    }
}

impl PreferenceStore for MemoryPrefs {
    fn get_string(&self, key: &str) -> Option<PreferenceValue> {
        let value = self.strings.get(key)?;
        let mut out = PreferenceValue::new();
        out.push_str(value).ok()?;
        Some(out)
    }

    fn put_string(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.strings.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn get_bool(&self, key: &str) -> bool {
        self.bools.get(key).copied().unwrap_or(false)
    }

    fn get_int(&self, key: &str) -> Option<i32> {
        self.ints.get(key).copied()
    }
}

// -----------------------------------------------------------------------------
// Lock
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedKeypadCommand {
    pub action: String,
    pub id: u32,
    pub name: String,
    pub code: String,
    pub enabled: i32,
}

/// Lock port answering every command with `result`.
pub struct FakeLock {
    pub result: ResultCode,
    pub lock_actions: Vec<String>,
    pub config_updates: Vec<String>,
    pub keypad_commands: Vec<RecordedKeypadCommand>,
    pub restarts: usize,

    pub state: Option<KeyTurnerState>,
    pub logs: Option<Vec<LogEntry>>,
    pub config: Option<Config>,
    pub advanced_config: Option<AdvancedConfig>,
    pub battery: Option<BatteryReport>,
    pub keypad: Option<Vec<KeypadEntry>>,
}

impl Default for FakeLock {
    fn default() -> Self {
        Self {
            result: ResultCode::Success,
            lock_actions: Vec::new(),
            config_updates: Vec::new(),
            keypad_commands: Vec::new(),
            restarts: 0,
            state: None,
            logs: None,
            config: None,
            advanced_config: None,
            battery: None,
            keypad: None,
        }
    }
}

impl LockCommandHandler for FakeLock {
    fn on_lock_action(&mut self, action: &str) -> ResultCode {
        self.lock_actions.push(action.to_owned());
        self.result
    }

    fn on_config_update(&mut self, update: &str) -> ResultCode {
        self.config_updates.push(update.to_owned());
        self.result
    }

    fn on_keypad_command(&mut self, command: &KeypadCommand<'_>) {
        self.keypad_commands.push(RecordedKeypadCommand {
            action: command.action.to_owned(),
            id: command.id,
            name: command.name.to_owned(),
            code: command.code.to_owned(),
            enabled: command.enabled,
        });
    }

    fn on_restart_requested(&mut self) {
        self.restarts += 1;
    }
}

impl LockStateReader for FakeLock {
    fn key_turner_state(&self) -> Option<KeyTurnerState> {
        self.state
    }

    fn log_entries(&self) -> Option<&[LogEntry]> {
        self.logs.as_deref()
    }

    fn config(&self) -> Option<&Config> {
        self.config.as_ref()
    }

    fn advanced_config(&self) -> Option<&AdvancedConfig> {
        self.advanced_config.as_ref()
    }

    fn battery_report(&self) -> Option<BatteryReport> {
        self.battery
    }

    fn keypad_entries(&self) -> Option<&[KeypadEntry]> {
        self.keypad.as_deref()
    }
}

// -----------------------------------------------------------------------------
// Builders
// -----------------------------------------------------------------------------

pub fn name(text: &str) -> Name {
    let mut name = Name::new();
    name.push_str(text).unwrap();
    name
}

pub fn locked_state() -> KeyTurnerState {
    KeyTurnerState {
        lock_state: LockState::Locked,
        trigger: Trigger::Manual,
        last_lock_action: LockAction::Lock,
        last_lock_action_completion_status: CompletionStatus::Success,
        door_sensor_state: DoorSensorState::DoorClosed,
        critical_battery_state: 0b1100_1000,
        accessory_battery_state: 0,
    }
}

pub fn log_entry(index: u32, logging_type: LoggingType, auth_id: u32, user: &str) -> LogEntry {
    let payload = match logging_type {
        LoggingType::LockAction => LogPayload::LockAction {
            action: LockAction::Unlock,
            trigger: Trigger::Manual,
            completion_status: CompletionStatus::Success,
        },
        LoggingType::KeypadAction => LogPayload::KeypadAction {
            action: LockAction::Lock,
            completion_status: CompletionStatus::Success,
        },
        _ => LogPayload::None,
    };

    LogEntry {
        index,
        auth_id,
        name: name(user),
        timestamp: Timestamp::new(2024, 5, 6, 7, 8, 9),
        logging_type,
        payload,
    }
}

pub fn keypad_entry(code_id: u16, user: &str) -> KeypadEntry {
    KeypadEntry {
        code_id,
        enabled: true,
        name: name(user),
        created: Timestamp::new(2023, 12, 24, 18, 30, 0),
        lock_count: 4,
    }
}
