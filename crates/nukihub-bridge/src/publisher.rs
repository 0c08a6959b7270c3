//! Typed publishes under the lock path
//!
//! Every bridge publish is retained and sent with `AtLeastOnce`, so a client
//! subscribing later still sees the last known value.

use core::fmt::Write;

use heapless::String;
use nukihub_mqtt::{PublishOutbox, QoS};
use serde::Serialize;

use crate::{error::BridgeError, topic::TopicResolver};

const QOS: QoS = QoS::AtLeastOnce;
const RETAIN: bool = true;

/// Longest rendered scalar (`i64::MIN`, floats with a few decimals)
const SCALAR_LEN: usize = 24;

/// Publishes values to topics under one lock path.
///
/// Borrows the resolver and the outbox for the duration of one operation.
pub struct TopicPublisher<'a, O: PublishOutbox + ?Sized> {
    resolver: &'a TopicResolver,
    outbox: &'a mut O,
}

impl<'a, O: PublishOutbox + ?Sized> TopicPublisher<'a, O> {
    pub fn new(resolver: &'a TopicResolver, outbox: &'a mut O) -> Self {
        Self { resolver, outbox }
    }

    pub fn resolver(&self) -> &TopicResolver {
        self.resolver
    }

    /// Publish `payload` as-is.
    ///
    /// # Arguments
    ///
    /// - `suffix`: Catalog suffix, resolved against the lock path
    /// - `payload`: Message body
    pub fn publish_raw(&mut self, suffix: &str, payload: &[u8]) {
        let topic = self.resolver.resolve(suffix);
        self.outbox.publish(topic.as_str(), payload, QOS, RETAIN);
    }

    pub fn publish_str(&mut self, suffix: &str, value: &str) {
        self.publish_raw(suffix, value.as_bytes());
    }

    /// Decimal text of a signed integer.
    pub fn publish_int(&mut self, suffix: &str, value: i64) {
        let mut text = String::<SCALAR_LEN>::new();
        let _ = write!(text, "{}", value);
        self.publish_str(suffix, text.as_str());
    }

    pub fn publish_uint(&mut self, suffix: &str, value: u32) {
        self.publish_int(suffix, i64::from(value));
    }

    /// Booleans are published as `1` / `0`.
    pub fn publish_bool(&mut self, suffix: &str, value: bool) {
        self.publish_str(suffix, if value { "1" } else { "0" });
    }

    /// Decimal text with a fixed number of fraction digits.
    pub fn publish_float(&mut self, suffix: &str, value: f32, precision: usize) {
        let mut text = String::<SCALAR_LEN>::new();
        if write!(text, "{:.*}", precision, value).is_err() {
            log::warn!("lock: float for '{}' does not fit, skipping", suffix);
            return;
        }
        self.publish_str(suffix, text.as_str());
    }

    /// Serialize `value` into `buf` and publish it.
    ///
    /// # Returns
    ///
    /// `Err(BridgeError::BufferTooSmall)` if the document does not fit `buf`.
    /// Nothing is published in that case.
    pub fn publish_json<T: Serialize>(
        &mut self,
        suffix: &str,
        value: &T,
        buf: &mut [u8],
    ) -> Result<(), BridgeError> {
        let len = serde_json_core::to_slice(value, buf)?;
        self.publish_raw(suffix, &buf[..len]);
        Ok(())
    }
}
