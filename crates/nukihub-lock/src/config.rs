//! Lock configuration records
//!
//! Both records are read on operator request and published wholesale.

use crate::{Name, log::Timestamp};

/// Basic lock configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub nuki_id: u32,
    pub name: Name,
    pub latitude: f32,
    pub longitude: f32,
    pub auto_unlatch: bool,
    pub pairing_enabled: bool,
    pub button_enabled: bool,
    pub led_enabled: bool,
    pub led_brightness: u8,
    pub current_time: Timestamp,
    /// Minutes
    pub time_zone_offset: i16,
    pub dst_mode: u8,
    pub has_fob: bool,
    pub fob_action_1: u8,
    pub fob_action_2: u8,
    pub fob_action_3: u8,
    pub single_lock: bool,
    pub advertising_mode: u8,
    pub has_keypad: bool,
    pub has_keypad_v2: bool,
    /// Major, minor, patch
    pub firmware_version: [u8; 3],
    /// Major, minor
    pub hardware_revision: [u8; 2],
    pub homekit_status: u8,
    pub time_zone_id: u16,
}

/// Advanced lock configuration: mechanics, timings and night mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvancedConfig {
    pub total_degrees: u16,
    pub unlocked_position_offset_degrees: i16,
    pub locked_position_offset_degrees: i16,
    pub single_locked_position_offset_degrees: i16,
    pub unlocked_to_locked_transition_offset_degrees: i16,
    /// Seconds
    pub lock_n_go_timeout: u8,
    pub single_button_press_action: u8,
    pub double_button_press_action: u8,
    pub detached_cylinder: bool,
    pub battery_type: u8,
    pub automatic_battery_type_detection: bool,
    /// Seconds
    pub unlatch_duration: u8,
    /// Seconds
    pub auto_lock_timeout: u16,
    pub auto_unlock_disabled: bool,
    pub night_mode_enabled: bool,
    /// Hour, minute
    pub night_mode_start_time: [u8; 2],
    /// Hour, minute
    pub night_mode_end_time: [u8; 2],
    pub night_mode_auto_lock_enabled: bool,
    pub night_mode_auto_unlock_disabled: bool,
    pub night_mode_immediate_lock_on_start: bool,
    pub auto_lock_enabled: bool,
    pub immediate_auto_lock_enabled: bool,
    pub auto_update_enabled: bool,
}
