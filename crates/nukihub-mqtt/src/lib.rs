//! # MQTT module seam for the lock bridge
//!
//! `nukihub-mqtt` is the narrow, `no_std` boundary between device-side
//! modules and whatever MQTT transport carries their traffic. It does not
//! speak the MQTT wire protocol itself: connecting, encoding packets and
//! retained-message storage belong to the transport.
//!
//! ## Architecture
//!
//! - [`packet`]: `QoS` and the borrowed inbound [`Publish`] message.
//! - [`runtime`]: the [`MqttModule`] trait a module implements, the
//!   [`TopicCollector`] and [`PublishOutbox`] capabilities the transport
//!   provides, and [`ModuleRuntime`], a synchronous driver that registers
//!   subscriptions on every connect, starts the module once, forwards
//!   messages, signals reconnects and schedules ticks.
//! - [`outbox`]: [`ChannelOutbox`], a bounded publish queue on top of an
//!   `embassy-sync` channel for transports that drain publishes from another
//!   task.
//!
//! ```ignore
//! use nukihub_mqtt::{ModuleRuntime, Publish};
//!
//! let mut runtime = ModuleRuntime::new(module);
//! runtime.on_connected(&mut session, now);
//! runtime.on_message(&Publish::new("nuki/lock/action", b"unlock"), &mut session, now);
//! runtime.poll(&mut session, now);
//! ```

#![no_std]

pub mod outbox;
pub mod packet;
pub mod runtime;

pub use outbox::{ChannelOutbox, PublishChannel, PublishRequest};
pub use packet::{Publish, QoS};
pub use runtime::{ModuleRuntime, MqttModule, PublishOutbox, TopicCollector};
