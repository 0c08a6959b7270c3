//! Integration tests for the lock domain model.

use nukihub_lock::{
    AccessoryBatteryStatus, BatteryReport, BatteryStatus, CompletionStatus, DoorSensorEvent,
    DoorSensorState, LockAction, LockState, LogEntry, LogPayload, LoggingType, Trigger,
};

// -----------------------------------------------------------------------------
// Wire enums
// -----------------------------------------------------------------------------

#[test]
fn lock_state_decodes_wire_values() {
    assert_eq!(LockState::from_raw(0x01), LockState::Locked);
    assert_eq!(LockState::from_raw(0x06), LockState::UnlockedLnga);
    assert_eq!(LockState::from_raw(0xFE), LockState::MotorBlocked);
    assert_eq!(LockState::from_raw(0x42), LockState::Undefined);
    assert_eq!(LockState::Unlatching.raw(), 0x07);
}

#[test]
fn enums_render_their_mqtt_text() {
    assert_eq!(LockState::UnlockedLnga.as_str(), "unlockedLnga");
    assert_eq!(Trigger::from_raw(0xAC).as_str(), "mqtt");
    assert_eq!(LockAction::LockNgoUnlatch.as_str(), "LockNgoUnlatch");
    assert_eq!(CompletionStatus::IncompleteFailure.as_str(), "incomplete");
    assert_eq!(DoorSensorState::DoorOpened.as_str(), "doorOpened");
}

#[test]
fn unknown_values_fall_back() {
    assert_eq!(Trigger::from_raw(0x10), Trigger::Undefined);
    assert_eq!(CompletionStatus::from_raw(0x20), CompletionStatus::Unknown);
    assert_eq!(LoggingType::from_raw(0x00), LoggingType::Unknown);
    assert_eq!(LockState::default(), LockState::Undefined);
}

#[test]
fn lock_action_command_tokens() {
    assert_eq!(LockAction::parse_command("unlatch"), Some(LockAction::Unlatch));
    assert_eq!(LockAction::parse_command("fobAction2"), Some(LockAction::FobAction2));
    assert_eq!(LockAction::parse_command("Unlatch"), None);
    assert_eq!(LockAction::parse_command("open_sesame"), None);
}

// -----------------------------------------------------------------------------
// Battery
// -----------------------------------------------------------------------------

#[test]
fn battery_byte_unpacks_critical_charging_level() {
    let status = BatteryStatus::from_packed(0b0000_0101);

    assert!(status.critical);
    assert!(!status.charging);
    assert_eq!(status.level, 2);
}

#[test]
fn battery_byte_full_and_charging() {
    let status = BatteryStatus::from_packed(0b1100_1010);

    assert!(!status.critical);
    assert!(status.charging);
    assert_eq!(status.level, 100);
}

#[test]
fn accessory_critical_requires_presence() {
    assert!(AccessoryBatteryStatus::from_packed(0b1100_0000).reports_critical());
    assert!(!AccessoryBatteryStatus::from_packed(0b0100_0000).reports_critical());
    assert!(!AccessoryBatteryStatus::from_packed(0b1000_0000).reports_critical());
}

#[test]
fn battery_report_converts_units() {
    let report = BatteryReport {
        battery_voltage: 5_830,
        battery_drain: 42,
        max_turn_current: 1_250,
        lock_distance: 380,
    };

    assert!((report.voltage() - 5.83).abs() < 1e-4);
    assert!((report.max_turn_current_amps() - 1.25).abs() < 1e-4);
}

// -----------------------------------------------------------------------------
// Log entries
// -----------------------------------------------------------------------------

#[test]
fn lock_action_payload_reads_action_trigger_and_status() {
    let payload = LogPayload::from_raw(LoggingType::LockAction, &[0x02, 0x01, 0x00, 0x04, 0x00]);

    assert_eq!(
        payload,
        LogPayload::LockAction {
            action: LockAction::Lock,
            trigger: Trigger::Manual,
            completion_status: CompletionStatus::Busy,
        }
    );
}

#[test]
fn keypad_and_door_sensor_payloads() {
    let keypad = LogPayload::from_raw(LoggingType::KeypadAction, &[0x01, 0x00, 0x01, 0x00, 0x00]);
    assert_eq!(
        keypad,
        LogPayload::KeypadAction {
            action: LockAction::Unlock,
            completion_status: CompletionStatus::MotorBlocked,
        }
    );

    let door = LogPayload::from_raw(LoggingType::DoorSensor, &[0x02, 0, 0x03, 0, 0]);
    assert_eq!(
        door,
        LogPayload::DoorSensor {
            event: DoorSensorEvent::SensorJammed,
            completion_status: CompletionStatus::TooRecent,
        }
    );

    let other = LogPayload::from_raw(LoggingType::Calibration, &[1, 2, 3, 4, 5]);
    assert_eq!(other, LogPayload::None);
}

#[test]
fn only_lock_and_keypad_actions_identify_users() {
    let mut entry = LogEntry {
        logging_type: LoggingType::KeypadAction,
        ..LogEntry::default()
    };
    assert!(entry.is_authorized_action());

    entry.logging_type = LoggingType::DoorSensor;
    assert!(!entry.is_authorized_action());
}
