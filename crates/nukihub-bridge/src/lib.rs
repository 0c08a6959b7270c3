//! # Lock state bridge
//!
//! `nukihub-bridge` mirrors a smart lock onto an MQTT topic tree and turns
//! commands published on that tree back into lock operations.
//!
//! ## Architecture
//!
//! - [`topic`]: [`TopicResolver`], building `prefix ‖ suffix` topics from the
//!   catalog in [`topics`].
//! - [`registrar`]: inbound topics, registered on every connect, with their
//!   defaults seeded once.
//! - [`query`]: refresh requests coalesced into [`QueryCommands`].
//! - [`keypad`]: multi-message keypad command staging.
//! - [`mirror`]: differential publishing of the key turner state.
//! - [`result`]: [`ResultCode`] tokens answering lock and config commands.
//! - [`render`]: JSON payloads.
//! - [`bridge`]: [`LockBridge`], owning all of the above.
//! - [`module`]: [`LockModule`], the [`MqttModule`](nukihub_mqtt::MqttModule)
//!   running the poll cycle against a [`LockPort`].
//!
//! The lock and the device are reached through the traits in [`ports`] and
//! [`config::PreferenceStore`]; the transport through `nukihub-mqtt`.

#![no_std]

pub mod bridge;
pub mod config;
pub mod error;
pub mod keypad;
pub mod mirror;
pub mod module;
pub mod ports;
pub mod publisher;
pub mod query;
pub mod registrar;
pub mod render;
pub mod result;
pub mod shared;
pub mod topic;
pub mod topics;

pub use bridge::LockBridge;
pub use config::{BridgeConfig, PreferenceStore};
pub use error::{BridgeError, PersistenceError};
pub use keypad::{KeypadCommand, KeypadStaging, PendingKeypadCommand};
pub use mirror::{AuthorizedUser, HaLockState, StateMirror, derive_authorized_user};
pub use module::LockModule;
pub use ports::{LockCommandHandler, LockPort, LockStateReader};
pub use publisher::TopicPublisher;
pub use query::{QueryCoalescer, QueryCommands, QueryKind};
pub use registrar::SubscriptionRegistrar;
pub use result::ResultCode;
pub use shared::SharedLockModule;
pub use topic::{Topic, TopicResolver};
