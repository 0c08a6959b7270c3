//! Topic suffix catalog
//!
//! Every suffix is appended to the configured lock path, e.g. `nuki` +
//! `/lock/state`.

use core::fmt::Write;

use heapless::String;

use crate::topic::MAX_SUFFIX_LEN;

// Lock
pub const LOCK_ACTION: &str = "/lock/action";
pub const LOCK_STATE: &str = "/lock/state";
pub const LOCK_HA_STATE: &str = "/lock/hastate";
pub const LOCK_BINARY_STATE: &str = "/lock/binaryState";
pub const LOCK_TRIGGER: &str = "/lock/trigger";
pub const LOCK_LAST_LOCK_ACTION: &str = "/lock/lastLockAction";
pub const LOCK_COMPLETION_STATUS: &str = "/lock/completionStatus";
pub const LOCK_DOOR_SENSOR_STATE: &str = "/lock/doorSensorState";
pub const LOCK_JSON: &str = "/lock/json";
pub const LOCK_LOG: &str = "/lock/log";
pub const LOCK_AUTH_ID: &str = "/lock/authorizationId";
pub const LOCK_AUTH_NAME: &str = "/lock/authorizationName";
pub const LOCK_ACTION_COMMAND_RESULT: &str = "/lock/commandResult";
pub const LOCK_RSSI: &str = "/lock/rssi";
pub const LOCK_RETRY: &str = "/lock/retry";
pub const LOCK_ADDRESS: &str = "/lock/address";

// Battery
pub const BATTERY_CRITICAL: &str = "/battery/critical";
pub const BATTERY_CHARGING: &str = "/battery/charging";
pub const BATTERY_LEVEL: &str = "/battery/level";
pub const BATTERY_KEYPAD_CRITICAL: &str = "/battery/keypadCritical";
pub const BATTERY_VOLTAGE: &str = "/battery/voltage";
pub const BATTERY_DRAIN: &str = "/battery/drain";
pub const BATTERY_MAX_TURN_CURRENT: &str = "/battery/maxTurnCurrent";
pub const BATTERY_LOCK_DISTANCE: &str = "/battery/lockDistance";

// Configuration
pub const CONFIG_ACTION: &str = "/configuration/action";
pub const CONFIG_BASIC_JSON: &str = "/configuration/basicJson";
pub const CONFIG_ADVANCED_JSON: &str = "/configuration/advancedJson";
pub const CONFIG_BUTTON_ENABLED: &str = "/configuration/buttonEnabled";
pub const CONFIG_LED_ENABLED: &str = "/configuration/ledEnabled";
pub const CONFIG_LED_BRIGHTNESS: &str = "/configuration/ledBrightness";
pub const CONFIG_SINGLE_LOCK: &str = "/configuration/singleLock";
pub const CONFIG_AUTO_UNLOCK: &str = "/configuration/autoUnlock";
pub const CONFIG_AUTO_LOCK: &str = "/configuration/autoLock";
pub const INFO_FIRMWARE_VERSION: &str = "/info/firmwareVersion";
pub const INFO_HARDWARE_VERSION: &str = "/info/hardwareVersion";

// Maintenance and queries
pub const MAINTENANCE_RESET: &str = "/maintenance/reset";
pub const QUERY_CONFIG: &str = "/query/config";
pub const QUERY_LOCKSTATE: &str = "/query/lockstate";
pub const QUERY_KEYPAD: &str = "/query/keypad";
pub const QUERY_BATTERY: &str = "/query/battery";
pub const QUERY_LOCKSTATE_COMMAND_RESULT: &str = "/query/lockstateCommandResult";

// Keypad
pub const KEYPAD: &str = "/keypad";
pub const KEYPAD_JSON: &str = "/keypad/json";
pub const KEYPAD_COMMAND_ACTION: &str = "/keypad/command/action";
pub const KEYPAD_COMMAND_ID: &str = "/keypad/command/id";
pub const KEYPAD_COMMAND_NAME: &str = "/keypad/command/name";
pub const KEYPAD_COMMAND_CODE: &str = "/keypad/command/code";
pub const KEYPAD_COMMAND_ENABLED: &str = "/keypad/command/enabled";
pub const KEYPAD_COMMAND_RESULT: &str = "/keypad/commandResult";

/// Fields rendered under every keypad slot
pub mod slot_field {
    pub const ID: &str = "/id";
    pub const ENABLED: &str = "/enabled";
    pub const NAME: &str = "/name";
    pub const CREATED_YEAR: &str = "/createdYear";
    pub const CREATED_MONTH: &str = "/createdMonth";
    pub const CREATED_DAY: &str = "/createdDay";
    pub const CREATED_HOUR: &str = "/createdHour";
    pub const CREATED_MIN: &str = "/createdMin";
    pub const CREATED_SEC: &str = "/createdSec";
    pub const LOCK_COUNT: &str = "/lockCount";
}

/// Suffix built at runtime from the fixed keypad slot pattern
pub type SlotSuffix = String<MAX_SUFFIX_LEN>;

/// `/keypad/code_<index><field>`, e.g. `/keypad/code_3/name`.
///
/// The pattern is bounded: `u16` index plus the longest slot field stays
/// well under [`MAX_SUFFIX_LEN`].
pub fn keypad_slot(index: u16, field: &str) -> SlotSuffix {
    let mut suffix = SlotSuffix::new();
    let written = write!(suffix, "{}/code_{}{}", KEYPAD, index, field);
    assert!(written.is_ok(), "keypad slot suffix exceeds MAX_SUFFIX_LEN");
    suffix
}
