use embassy_time::Duration;
use heapless::String;

use crate::error::PersistenceError;

/// Topic prefix used when none is stored
pub const DEFAULT_LOCK_PATH: &str = "nuki";
/// Number of keypad slots rendered when none is stored
pub const DEFAULT_MAX_KEYPAD_CODES: u16 = 20;
/// Interval of the poll cycle
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Largest preference value the bridge reads
pub const MAX_PREFERENCE_LEN: usize = 128;

/// Preference value as returned by the store
pub type PreferenceValue = String<MAX_PREFERENCE_LEN>;

/// Names of the preference keys read by the bridge
pub mod keys {
    pub const MQTT_LOCK_PATH: &str = "mqttpath";
    pub const KEYPAD_CONTROL_ENABLED: &str = "kpEnabled";
    pub const HASS_DISCOVERY: &str = "hassdiscovery";
    pub const MAX_KEYPAD_CODES: &str = "kpMaxCodes";
}

/// Persistent key-value configuration owned by the host firmware.
pub trait PreferenceStore {
    /// Stored string, `None` when the key is unset.
    fn get_string(&self, key: &str) -> Option<PreferenceValue>;

    fn put_string(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Stored flag, `false` when the key is unset.
    fn get_bool(&self, key: &str) -> bool;

    fn get_int(&self, key: &str) -> Option<i32>;
}

/// Feature flags and limits of the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Register the keypad command topics and accept keypad edits
    pub keypad_control_enabled: bool,
    /// Publish the derived presentation channels (`lock/hastate`, `lock/binaryState`)
    pub ha_enabled: bool,
    /// Keypad slots always rendered, filled with empty records
    pub max_keypad_code_count: u16,
    pub tick_interval: Duration,
}

impl BridgeConfig {
    pub const fn new() -> Self {
        Self {
            keypad_control_enabled: false,
            ha_enabled: false,
            max_keypad_code_count: DEFAULT_MAX_KEYPAD_CODES,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    #[must_use]
    pub const fn with_keypad_control(mut self, enabled: bool) -> Self {
        self.keypad_control_enabled = enabled;
        self
    }

    #[must_use]
    pub const fn with_ha(mut self, enabled: bool) -> Self {
        self.ha_enabled = enabled;
        self
    }

    #[must_use]
    pub const fn with_max_keypad_code_count(mut self, count: u16) -> Self {
        self.max_keypad_code_count = count;
        self
    }

    #[must_use]
    pub const fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Read the flags from the preference store.
    ///
    /// Discovery counts as enabled whenever a discovery topic is stored.
    pub fn load(prefs: &impl PreferenceStore) -> Self {
        let ha_enabled = prefs
            .get_string(keys::HASS_DISCOVERY)
            .is_some_and(|topic| !topic.is_empty());
        let max_keypad_code_count = prefs
            .get_int(keys::MAX_KEYPAD_CODES)
            .and_then(|count| u16::try_from(count).ok())
            .unwrap_or(DEFAULT_MAX_KEYPAD_CODES);

        Self::new()
            .with_keypad_control(prefs.get_bool(keys::KEYPAD_CONTROL_ENABLED))
            .with_ha(ha_enabled)
            .with_max_keypad_code_count(max_keypad_code_count)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}
