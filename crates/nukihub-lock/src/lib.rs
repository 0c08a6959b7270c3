#![no_std]

//! Lock domain model
//!
//! Types describing what the smart lock reports over its radio link, decoded
//! into named Rust types at the boundary:
//! - `state` - key turner state enums and the [`KeyTurnerState`] snapshot
//! - `battery` - packed battery bytes and the battery report
//! - `log` - historical log entries with type-dependent payloads
//! - `keypad` - keypad code entries
//! - `config` - basic and advanced lock configuration
//!
//! Every enum keeps its wire value (`from_raw` / `raw`) and the text form
//! published on MQTT (`as_str`, also used for JSON serialization).

#[macro_use]
mod macros;

pub mod battery;
pub mod config;
pub mod keypad;
pub mod log;
pub mod state;

use heapless::String;

/// Capacity of names reported by the lock (log entries, keypad codes).
pub const NAME_LEN: usize = 32;

/// Bounded name text as stored by the lock.
pub type Name = String<NAME_LEN>;

pub use battery::{AccessoryBatteryStatus, BatteryReport, BatteryStatus};
pub use config::{AdvancedConfig, Config};
pub use keypad::KeypadEntry;
pub use log::{DoorSensorEvent, LogEntry, LogPayload, LoggingType, Timestamp};
pub use state::{CompletionStatus, DoorSensorState, KeyTurnerState, LockAction, LockState, Trigger};
