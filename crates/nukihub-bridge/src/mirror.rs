//! Differential lock state mirror
//!
//! Publishes only the key turner fields that changed since the previous
//! snapshot, except right after startup or a reconnect when everything is
//! published once. The full-state JSON goes out on every call.

use nukihub_lock::{
    AccessoryBatteryStatus, BatteryStatus, CompletionStatus, DoorSensorState, KeyTurnerState,
    LockAction, LockState, LogEntry, Name, Trigger,
};
use nukihub_mqtt::PublishOutbox;

use crate::{
    error::BridgeError,
    publisher::TopicPublisher,
    render::{LockStateJson, MAX_LOG_ENTRIES},
    topics,
};

/// Presentation of a lock state as a lock entity (`lock/hastate`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaLockState {
    Locked,
    Locking,
    Unlocking,
    Unlocked,
    Jammed,
}

impl HaLockState {
    pub const fn as_str(self) -> &'static str {
        match self {
            HaLockState::Locked => "locked",
            HaLockState::Locking => "locking",
            HaLockState::Unlocking => "unlocking",
            HaLockState::Unlocked => "unlocked",
            HaLockState::Jammed => "jammed",
        }
    }

    /// `None` for [`LockState::Undefined`].
    pub const fn from_lock_state(state: LockState) -> Option<Self> {
        Some(match state {
            LockState::Locked => HaLockState::Locked,
            LockState::Locking => HaLockState::Locking,
            LockState::Unlocking => HaLockState::Unlocking,
            LockState::Unlocked
            | LockState::Unlatched
            | LockState::Unlatching
            | LockState::UnlockedLnga => HaLockState::Unlocked,
            LockState::Uncalibrated
            | LockState::Calibration
            | LockState::BootRun
            | LockState::MotorBlocked => HaLockState::Jammed,
            LockState::Undefined => return None,
        })
    }

    /// Two-state form (`lock/binaryState`). Jammed has none.
    pub const fn binary(self) -> Option<&'static str> {
        match self {
            HaLockState::Locked | HaLockState::Locking => Some("locked"),
            HaLockState::Unlocking | HaLockState::Unlocked => Some("unlocked"),
            HaLockState::Jammed => None,
        }
    }
}

/// User behind the most recent lock or keypad action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizedUser {
    pub id: u32,
    pub name: Name,
}

/// First lock or keypad action among the [`MAX_LOG_ENTRIES`] most recent
/// entries. Entries are ordered newest first.
pub fn derive_authorized_user(entries: &[LogEntry]) -> Option<AuthorizedUser> {
    entries
        .iter()
        .take(MAX_LOG_ENTRIES)
        .find(|entry| entry.is_authorized_action())
        .map(|entry| AuthorizedUser {
            id: entry.auth_id,
            name: entry.name.clone(),
        })
}

/// Last published key turner snapshot and the republish flag.
#[derive(Debug)]
pub struct StateMirror {
    previous: KeyTurnerState,
    first_publish: bool,
    ha_enabled: bool,
}

impl StateMirror {
    pub const fn new(ha_enabled: bool) -> Self {
        Self {
            previous: KeyTurnerState {
                lock_state: LockState::Undefined,
                trigger: Trigger::Undefined,
                last_lock_action: LockAction::Undefined,
                last_lock_action_completion_status: CompletionStatus::Unknown,
                door_sensor_state: DoorSensorState::Undefined,
                critical_battery_state: 0,
                accessory_battery_state: 0,
            },
            first_publish: true,
            ha_enabled,
        }
    }

    pub const fn is_first_publish(&self) -> bool {
        self.first_publish
    }

    pub const fn previous(&self) -> &KeyTurnerState {
        &self.previous
    }

    /// Make the next [`publish`](Self::publish) treat every field as changed.
    pub fn force_full_publish(&mut self) {
        self.first_publish = true;
    }

    /// Publish the differences between `current` and the previous snapshot,
    /// then the full-state JSON.
    ///
    /// The snapshot is recorded even when the JSON does not fit `buf`.
    pub fn publish<O: PublishOutbox + ?Sized>(
        &mut self,
        publisher: &mut TopicPublisher<'_, O>,
        current: &KeyTurnerState,
        auth: &AuthorizedUser,
        buf: &mut [u8],
    ) -> Result<(), BridgeError> {
        let previous = self.previous;
        let all = self.first_publish;

        if (all || current.lock_state != previous.lock_state) && !current.lock_state.is_undefined()
        {
            publisher.publish_str(topics::LOCK_STATE, current.lock_state.as_str());
            if self.ha_enabled {
                publish_ha_state(publisher, current.lock_state);
            }
        }

        if all || current.trigger != previous.trigger {
            publisher.publish_str(topics::LOCK_TRIGGER, current.trigger.as_str());
        }
        if all || current.last_lock_action != previous.last_lock_action {
            publisher.publish_str(
                topics::LOCK_LAST_LOCK_ACTION,
                current.last_lock_action.as_str(),
            );
        }
        if all
            || current.last_lock_action_completion_status
                != previous.last_lock_action_completion_status
        {
            publisher.publish_str(
                topics::LOCK_COMPLETION_STATUS,
                current.last_lock_action_completion_status.as_str(),
            );
        }
        if all || current.door_sensor_state != previous.door_sensor_state {
            publisher.publish_str(
                topics::LOCK_DOOR_SENSOR_STATE,
                current.door_sensor_state.as_str(),
            );
        }

        if all || current.critical_battery_state != previous.critical_battery_state {
            let battery = BatteryStatus::from_packed(current.critical_battery_state);
            publisher.publish_bool(topics::BATTERY_CRITICAL, battery.critical);
            publisher.publish_bool(topics::BATTERY_CHARGING, battery.charging);
            publisher.publish_uint(topics::BATTERY_LEVEL, u32::from(battery.level));
        }
        if all || current.accessory_battery_state != previous.accessory_battery_state {
            let accessory = AccessoryBatteryStatus::from_packed(current.accessory_battery_state);
            publisher.publish_bool(topics::BATTERY_KEYPAD_CRITICAL, accessory.reports_critical());
        }

        self.previous = *current;
        self.first_publish = false;

        let json = LockStateJson::new(current, auth.id, auth.name.as_str());
        publisher.publish_json(topics::LOCK_JSON, &json, buf)
    }
}

fn publish_ha_state<O: PublishOutbox + ?Sized>(
    publisher: &mut TopicPublisher<'_, O>,
    state: LockState,
) {
    let Some(ha_state) = HaLockState::from_lock_state(state) else {
        return;
    };
    publisher.publish_str(topics::LOCK_HA_STATE, ha_state.as_str());
    if let Some(binary) = ha_state.binary() {
        publisher.publish_str(topics::LOCK_BINARY_STATE, binary);
    }
}
