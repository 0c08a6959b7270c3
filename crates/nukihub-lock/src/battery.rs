const CRITICAL_MASK: u8 = 0b0000_0001;
const CHARGING_MASK: u8 = 0b0000_0010;
const LEVEL_MASK: u8 = 0b1111_1100;

const ACCESSORY_PRESENT_MASK: u8 = 1 << 7;
const ACCESSORY_CRITICAL_MASK: u8 = 1 << 6;

/// Main battery state decoded from the packed key turner byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatteryStatus {
    pub critical: bool,
    pub charging: bool,
    pub level: u8,
}

impl BatteryStatus {
    pub const fn from_packed(byte: u8) -> Self {
        Self {
            critical: byte & CRITICAL_MASK != 0,
            charging: byte & CHARGING_MASK != 0,
            level: (byte & LEVEL_MASK) >> 1,
        }
    }
}

/// Keypad (accessory) battery state decoded from the packed byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessoryBatteryStatus {
    pub present: bool,
    pub critical: bool,
}

impl AccessoryBatteryStatus {
    pub const fn from_packed(byte: u8) -> Self {
        Self {
            present: byte & ACCESSORY_PRESENT_MASK != 0,
            critical: byte & ACCESSORY_CRITICAL_MASK != 0,
        }
    }

    /// The critical flag only counts when an accessory is present.
    pub const fn reports_critical(self) -> bool {
        self.present && self.critical
    }
}

/// Detailed battery report, read on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatteryReport {
    /// Millivolts
    pub battery_voltage: u16,
    /// Milliwatt seconds
    pub battery_drain: u16,
    /// Milliamperes
    pub max_turn_current: u16,
    /// Degrees
    pub lock_distance: u16,
}

impl BatteryReport {
    pub fn voltage(&self) -> f32 {
        f32::from(self.battery_voltage) / 1000.0
    }

    pub fn max_turn_current_amps(&self) -> f32 {
        f32::from(self.max_turn_current) / 1000.0
    }
}
