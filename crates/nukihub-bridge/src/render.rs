//! JSON payload structures
//!
//! Wire shapes of the structured topics. They borrow from the lock model and
//! are serialized with `serde-json-core` straight into the module buffer.

use core::fmt::Write;

use heapless::String;
use nukihub_lock::{
    AdvancedConfig, Config, KeyTurnerState, KeypadEntry, LogEntry, LogPayload, Timestamp,
};
use serde::{Serialize, Serializer};

/// Log entries rendered per publish
pub const MAX_LOG_ENTRIES: usize = 5;

/// Text field assembled from numbers (times, versions, ids)
type ShortText = String<24>;

fn short_text(args: core::fmt::Arguments<'_>) -> ShortText {
    let mut text = ShortText::new();
    // Callers only format bounded integers
    let _ = text.write_fmt(args);
    text
}

/// `lock/json`
#[derive(Debug, Clone, Serialize)]
pub struct LockStateJson<'a> {
    pub lock_state: &'a str,
    pub trigger: &'a str,
    pub last_lock_action: &'a str,
    pub lock_completion_status: &'a str,
    pub door_sensor_state: &'a str,
    pub auth_id: u32,
    pub auth_name: &'a str,
}

impl<'a> LockStateJson<'a> {
    pub fn new(state: &KeyTurnerState, auth_id: u32, auth_name: &'a str) -> Self {
        Self {
            lock_state: state.lock_state.as_str(),
            trigger: state.trigger.as_str(),
            last_lock_action: state.last_lock_action.as_str(),
            lock_completion_status: state.last_lock_action_completion_status.as_str(),
            door_sensor_state: state.door_sensor_state.as_str(),
            auth_id,
            auth_name,
        }
    }
}

/// One element of `lock/log`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryJson<'a> {
    pub index: u32,
    pub authorization_id: u32,
    pub authorization_name: &'a str,
    pub time_year: u16,
    pub time_month: u8,
    pub time_day: u8,
    pub time_hour: u8,
    pub time_minute: u8,
    pub time_second: u8,
    #[serde(rename = "type")]
    pub kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_status: Option<&'a str>,
}

impl<'a> From<&'a LogEntry> for LogEntryJson<'a> {
    fn from(entry: &'a LogEntry) -> Self {
        let (action, trigger, completion_status) = match entry.payload {
            LogPayload::LockAction {
                action,
                trigger,
                completion_status,
            } => (
                Some(action.as_str()),
                Some(trigger.as_str()),
                Some(completion_status.as_str()),
            ),
            LogPayload::KeypadAction {
                action,
                completion_status,
            } => (Some(action.as_str()), None, Some(completion_status.as_str())),
            LogPayload::DoorSensor {
                event,
                completion_status,
            } => (Some(event.as_str()), None, Some(completion_status.as_str())),
            LogPayload::None => (None, None, None),
        };

        let Timestamp {
            year,
            month,
            day,
            hour,
            minute,
            second,
        } = entry.timestamp;

        Self {
            index: entry.index,
            authorization_id: entry.auth_id,
            authorization_name: entry.name.as_str(),
            time_year: year,
            time_month: month,
            time_day: day,
            time_hour: hour,
            time_minute: minute,
            time_second: second,
            kind: entry.logging_type.as_str(),
            action,
            trigger,
            completion_status,
        }
    }
}

/// `lock/log`: the most recent [`MAX_LOG_ENTRIES`] entries, newest first.
pub struct LogJson<'a>(pub &'a [LogEntry]);

impl Serialize for LogJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().take(MAX_LOG_ENTRIES).map(LogEntryJson::from))
    }
}

/// One element of `keypad/json`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeypadEntryJson<'a> {
    pub id: u16,
    pub enabled: bool,
    pub name: &'a str,
    pub created_year: u16,
    pub created_month: u8,
    pub created_day: u8,
    pub created_hour: u8,
    pub created_min: u8,
    pub created_sec: u8,
    pub lock_count: u16,
}

impl<'a> From<&'a KeypadEntry> for KeypadEntryJson<'a> {
    fn from(entry: &'a KeypadEntry) -> Self {
        Self {
            id: entry.code_id,
            enabled: entry.enabled,
            name: entry.name.as_str(),
            created_year: entry.created.year,
            created_month: entry.created.month,
            created_day: entry.created.day,
            created_hour: entry.created.hour,
            created_min: entry.created.minute,
            created_sec: entry.created.second,
            lock_count: entry.lock_count,
        }
    }
}

/// `keypad/json`: every known entry
pub struct KeypadJson<'a>(pub &'a [KeypadEntry]);

impl Serialize for KeypadJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(KeypadEntryJson::from))
    }
}

/// `a.b.c` firmware version
pub fn firmware_version(config: &Config) -> ShortText {
    let [major, minor, patch] = config.firmware_version;
    short_text(format_args!("{}.{}.{}", major, minor, patch))
}

/// `a.b` hardware revision
pub fn hardware_revision(config: &Config) -> ShortText {
    let [major, minor] = config.hardware_revision;
    short_text(format_args!("{}.{}", major, minor))
}

/// `configuration/basicJson`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigJson<'a> {
    #[serde(rename = "nukiID")]
    pub nuki_id: ShortText,
    pub name: &'a str,
    pub latitude: f32,
    pub auto_unlatch: bool,
    pub longitude: f32,
    pub pairing_enabled: bool,
    pub button_enabled: bool,
    pub led_enabled: bool,
    pub led_brightness: u8,
    pub current_time: ShortText,
    pub time_zone_offset: i16,
    pub dst_mode: u8,
    pub has_fob: bool,
    pub fob_action1: u8,
    pub fob_action2: u8,
    pub fob_action3: u8,
    pub single_lock: bool,
    pub advertising_mode: u8,
    pub has_keypad: bool,
    #[serde(rename = "hasKeypadV2")]
    pub has_keypad_v2: bool,
    pub firmware_version: ShortText,
    pub hardware_revision: ShortText,
    #[serde(rename = "homeKitStatus")]
    pub homekit_status: u8,
    pub time_zone_id: u16,
}

impl<'a> From<&'a Config> for ConfigJson<'a> {
    fn from(config: &'a Config) -> Self {
        let time = config.current_time;
        Self {
            nuki_id: short_text(format_args!("{:x}", config.nuki_id)),
            name: config.name.as_str(),
            latitude: config.latitude,
            auto_unlatch: config.auto_unlatch,
            longitude: config.longitude,
            pairing_enabled: config.pairing_enabled,
            button_enabled: config.button_enabled,
            led_enabled: config.led_enabled,
            led_brightness: config.led_brightness,
            current_time: short_text(format_args!(
                "{}-{}-{} {}:{}:{}",
                time.year, time.month, time.day, time.hour, time.minute, time.second
            )),
            time_zone_offset: config.time_zone_offset,
            dst_mode: config.dst_mode,
            has_fob: config.has_fob,
            fob_action1: config.fob_action_1,
            fob_action2: config.fob_action_2,
            fob_action3: config.fob_action_3,
            single_lock: config.single_lock,
            advertising_mode: config.advertising_mode,
            has_keypad: config.has_keypad,
            has_keypad_v2: config.has_keypad_v2,
            firmware_version: firmware_version(config),
            hardware_revision: hardware_revision(config),
            homekit_status: config.homekit_status,
            time_zone_id: config.time_zone_id,
        }
    }
}

/// `configuration/advancedJson`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedConfigJson {
    pub total_degrees: u16,
    pub unlocked_position_offset_degrees: i16,
    pub locked_position_offset_degrees: i16,
    pub single_locked_position_offset_degrees: i16,
    pub unlocked_to_locked_transition_offset_degrees: i16,
    pub lock_ngo_timeout: u8,
    pub single_button_press_action: u8,
    pub double_button_press_action: u8,
    pub detached_cylinder: bool,
    pub battery_type: u8,
    pub automatic_battery_type_detection: bool,
    pub unlatch_duration: u8,
    #[serde(rename = "autoLockTimeOut")]
    pub auto_lock_timeout: u16,
    #[serde(rename = "autoUnLockDisabled")]
    pub auto_unlock_disabled: bool,
    pub night_mode_enabled: bool,
    pub night_mode_start_time: ShortText,
    pub night_mode_end_time: ShortText,
    pub night_mode_auto_lock_enabled: bool,
    pub night_mode_auto_unlock_disabled: bool,
    pub night_mode_immediate_lock_on_start: bool,
    pub auto_lock_enabled: bool,
    pub immediate_auto_lock_enabled: bool,
    pub auto_update_enabled: bool,
}

impl From<&AdvancedConfig> for AdvancedConfigJson {
    fn from(config: &AdvancedConfig) -> Self {
        let [start_hour, start_minute] = config.night_mode_start_time;
        let [end_hour, end_minute] = config.night_mode_end_time;
        Self {
            total_degrees: config.total_degrees,
            unlocked_position_offset_degrees: config.unlocked_position_offset_degrees,
            locked_position_offset_degrees: config.locked_position_offset_degrees,
            single_locked_position_offset_degrees: config.single_locked_position_offset_degrees,
            unlocked_to_locked_transition_offset_degrees: config
                .unlocked_to_locked_transition_offset_degrees,
            lock_ngo_timeout: config.lock_n_go_timeout,
            single_button_press_action: config.single_button_press_action,
            double_button_press_action: config.double_button_press_action,
            detached_cylinder: config.detached_cylinder,
            battery_type: config.battery_type,
            automatic_battery_type_detection: config.automatic_battery_type_detection,
            unlatch_duration: config.unlatch_duration,
            auto_lock_timeout: config.auto_lock_timeout,
            auto_unlock_disabled: config.auto_unlock_disabled,
            night_mode_enabled: config.night_mode_enabled,
            night_mode_start_time: short_text(format_args!("{}:{}", start_hour, start_minute)),
            night_mode_end_time: short_text(format_args!("{}:{}", end_hour, end_minute)),
            night_mode_auto_lock_enabled: config.night_mode_auto_lock_enabled,
            night_mode_auto_unlock_disabled: config.night_mode_auto_unlock_disabled,
            night_mode_immediate_lock_on_start: config.night_mode_immediate_lock_on_start,
            auto_lock_enabled: config.auto_lock_enabled,
            immediate_auto_lock_enabled: config.immediate_auto_lock_enabled,
            auto_update_enabled: config.auto_update_enabled,
        }
    }
}
