//! Key turner state
//!
//! Wire values follow the lock's BLE protocol.

wire_enum! {
    /// Position of the lock mechanism.
    pub enum LockState (fallback = Undefined) {
        Uncalibrated = 0x00 => "uncalibrated",
        Locked = 0x01 => "locked",
        Unlocking = 0x02 => "unlocking",
        Unlocked = 0x03 => "unlocked",
        Locking = 0x04 => "locking",
        Unlatched = 0x05 => "unlatched",
        /// Unlocked by "lock 'n' go"
        UnlockedLnga = 0x06 => "unlockedLnga",
        Unlatching = 0x07 => "unlatching",
        Calibration = 0xFC => "calibration",
        BootRun = 0xFD => "bootRun",
        MotorBlocked = 0xFE => "motorBlocked",
        /// No valid reading
        Undefined = 0xFF => "undefined",
    }
}

impl LockState {
    pub const fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }
}

wire_enum! {
    /// What caused the last state change.
    pub enum Trigger (fallback = Undefined) {
        System = 0x00 => "system",
        Manual = 0x01 => "manual",
        Button = 0x02 => "button",
        Automatic = 0x03 => "automatic",
        AutoLock = 0x06 => "autoLock",
        HomeKit = 0xAB => "homekit",
        Mqtt = 0xAC => "mqtt",
        Undefined = 0xFF => "undefined",
    }
}

wire_enum! {
    /// Lock action, as reported by the lock and as accepted in commands.
    pub enum LockAction (fallback = Undefined) {
        Unlock = 0x01 => "Unlock",
        Lock = 0x02 => "Lock",
        Unlatch = 0x03 => "Unlatch",
        LockNgo = 0x04 => "LockNgo",
        LockNgoUnlatch = 0x05 => "LockNgoUnlatch",
        FullLock = 0x06 => "FullLock",
        FobAction1 = 0x81 => "FobAction1",
        FobAction2 = 0x82 => "FobAction2",
        FobAction3 = 0x83 => "FobAction3",
        Undefined = 0xFF => "undefined",
    }
}

impl LockAction {
    /// Parse the command token accepted on the lock action topic.
    pub fn parse_command(token: &str) -> Option<Self> {
        Some(match token {
            "unlock" => Self::Unlock,
            "lock" => Self::Lock,
            "unlatch" => Self::Unlatch,
            "lockNgo" => Self::LockNgo,
            "lockNgoUnlatch" => Self::LockNgoUnlatch,
            "fullLock" => Self::FullLock,
            "fobAction1" => Self::FobAction1,
            "fobAction2" => Self::FobAction2,
            "fobAction3" => Self::FobAction3,
            _ => return None,
        })
    }
}

wire_enum! {
    /// Outcome of the last lock action.
    pub enum CompletionStatus (fallback = Unknown) {
        Success = 0x00 => "success",
        MotorBlocked = 0x01 => "motorBlocked",
        Canceled = 0x02 => "canceled",
        TooRecent = 0x03 => "tooRecent",
        Busy = 0x04 => "busy",
        LowMotorVoltage = 0x05 => "lowMotorVoltage",
        ClutchFailure = 0x06 => "clutchFailure",
        MotorPowerFailure = 0x07 => "motorPowerFailure",
        IncompleteFailure = 0x08 => "incomplete",
        OtherError = 0xFE => "otherError",
        Unknown = 0xFF => "unknown",
    }
}

wire_enum! {
    pub enum DoorSensorState (fallback = Undefined) {
        Unavailable = 0x00 => "unavailable",
        Deactivated = 0x01 => "deactivated",
        DoorClosed = 0x02 => "doorClosed",
        DoorOpened = 0x03 => "doorOpened",
        DoorStateUnknown = 0x04 => "doorStateUnknown",
        Calibrating = 0x05 => "calibrating",
        Undefined = 0xFF => "undefined",
    }
}

/// Point-in-time snapshot of the lock as polled over the radio link.
///
/// The battery bytes keep the lock's packed wire layout; decode them with
/// [`BatteryStatus::from_packed`](crate::BatteryStatus::from_packed) and
/// [`AccessoryBatteryStatus::from_packed`](crate::AccessoryBatteryStatus::from_packed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyTurnerState {
    pub lock_state: LockState,
    pub trigger: Trigger,
    pub last_lock_action: LockAction,
    pub last_lock_action_completion_status: CompletionStatus,
    pub door_sensor_state: DoorSensorState,
    /// Bit 0 critical, bit 1 charging, bits 2-7 level
    pub critical_battery_state: u8,
    /// Bit 7 accessory present, bit 6 accessory battery critical
    pub accessory_battery_state: u8,
}
