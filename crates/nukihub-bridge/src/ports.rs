use nukihub_lock::{AdvancedConfig, BatteryReport, Config, KeyTurnerState, KeypadEntry, LogEntry};

use crate::{keypad::KeypadCommand, result::ResultCode};

/// Handler interface for commands received over MQTT
pub trait LockCommandHandler {
    /// Execute a lock action token such as `unlock` or `lockNgo`
    fn on_lock_action(&mut self, action: &str) -> ResultCode;

    /// Apply a configuration update (JSON text)
    fn on_config_update(&mut self, update: &str) -> ResultCode;

    /// Execute a committed keypad command.
    ///
    /// Outcomes are reported by the owner through
    /// [`LockBridge::publish_keypad_command_result`](crate::LockBridge::publish_keypad_command_result).
    fn on_keypad_command(&mut self, command: &KeypadCommand<'_>);

    /// Restart the device
    fn on_restart_requested(&mut self);
}

/// Reader interface for the lock state cached by the radio side
///
/// Every getter returns `None` while the value has not been read yet.
pub trait LockStateReader {
    fn key_turner_state(&self) -> Option<KeyTurnerState>;

    /// Log entries, newest first
    fn log_entries(&self) -> Option<&[LogEntry]>;

    fn config(&self) -> Option<&Config>;

    fn advanced_config(&self) -> Option<&AdvancedConfig>;

    fn battery_report(&self) -> Option<BatteryReport>;

    fn keypad_entries(&self) -> Option<&[KeypadEntry]>;
}

/// Port interface the lock module drives
pub trait LockPort: LockCommandHandler + LockStateReader {}

impl<T: LockCommandHandler + LockStateReader> LockPort for T {}
