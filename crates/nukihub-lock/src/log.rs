//! Lock log entries

use serde::Serialize;

use crate::{
    Name,
    state::{CompletionStatus, LockAction, Trigger},
};

wire_enum! {
    pub enum LoggingType (fallback = Unknown) {
        LoggingEnabled = 0x01 => "LoggingEnabled",
        LockAction = 0x02 => "LockAction",
        Calibration = 0x03 => "Calibration",
        InitializationRun = 0x04 => "InitializationRun",
        KeypadAction = 0x05 => "KeypadAction",
        DoorSensor = 0x06 => "DoorSensor",
        DoorSensorLoggingEnabled = 0x07 => "DoorSensorLoggingEnabled",
        Unknown = 0xFF => "Unknown",
    }
}

wire_enum! {
    /// Event recorded by the door sensor.
    pub enum DoorSensorEvent (fallback = Unknown) {
        Opened = 0x00 => "DoorOpened",
        Closed = 0x01 => "DoorClosed",
        SensorJammed = 0x02 => "SensorJammed",
        Unknown = 0xFF => "Unknown",
    }
}

/// Calendar timestamp as reported by the lock (no time zone).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Timestamp {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }
}

/// Type-dependent part of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogPayload {
    LockAction {
        action: LockAction,
        trigger: Trigger,
        completion_status: CompletionStatus,
    },
    KeypadAction {
        action: LockAction,
        completion_status: CompletionStatus,
    },
    DoorSensor {
        event: DoorSensorEvent,
        completion_status: CompletionStatus,
    },
    #[default]
    None,
}

impl LogPayload {
    /// Decode the raw data bytes the lock attaches to a log entry.
    pub const fn from_raw(logging_type: LoggingType, data: &[u8; 5]) -> Self {
        match logging_type {
            LoggingType::LockAction => Self::LockAction {
                action: LockAction::from_raw(data[0]),
                trigger: Trigger::from_raw(data[1]),
                completion_status: CompletionStatus::from_raw(data[3]),
            },
            LoggingType::KeypadAction => Self::KeypadAction {
                action: LockAction::from_raw(data[0]),
                completion_status: CompletionStatus::from_raw(data[2]),
            },
            LoggingType::DoorSensor => Self::DoorSensor {
                event: DoorSensorEvent::from_raw(data[0]),
                completion_status: CompletionStatus::from_raw(data[2]),
            },
            _ => Self::None,
        }
    }
}

/// One historical event from the lock's log.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogEntry {
    pub index: u32,
    pub auth_id: u32,
    pub name: Name,
    pub timestamp: Timestamp,
    pub logging_type: LoggingType,
    pub payload: LogPayload,
}

impl LogEntry {
    /// Lock and keypad actions identify the user who operated the lock.
    pub const fn is_authorized_action(&self) -> bool {
        matches!(
            self.logging_type,
            LoggingType::LockAction | LoggingType::KeypadAction
        )
    }
}
