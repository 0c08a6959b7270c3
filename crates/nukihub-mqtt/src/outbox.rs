//! Channel-backed publish queue
//!
//! Lets a module publish from one context while the transport task drains
//! the queue from another. Requests are copied into fixed-size buffers; a
//! request that does not fit, or a full queue, is dropped and logged rather
//! than truncated.

use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};
use heapless::{String, Vec};

use crate::{packet::QoS, runtime::PublishOutbox};

/// Owned copy of an outgoing publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest<const TOPIC_LEN: usize, const PAYLOAD_LEN: usize> {
    pub topic: String<TOPIC_LEN>,
    pub payload: Vec<u8, PAYLOAD_LEN>,
    pub qos: QoS,
    pub retain: bool,
}

impl<const TOPIC_LEN: usize, const PAYLOAD_LEN: usize> PublishRequest<TOPIC_LEN, PAYLOAD_LEN> {
    /// Copy a publish into owned buffers. `None` if either part is too long.
    pub fn new(topic: &str, payload: &[u8], qos: QoS, retain: bool) -> Option<Self> {
        let mut owned_topic = String::new();
        owned_topic.push_str(topic).ok()?;
        let owned_payload = Vec::from_slice(payload).ok()?;
        Some(Self {
            topic: owned_topic,
            payload: owned_payload,
            qos,
            retain,
        })
    }
}

/// Queue shared between the publishing module and the transport task.
pub type PublishChannel<M, const TOPIC_LEN: usize, const PAYLOAD_LEN: usize, const DEPTH: usize> =
    Channel<M, PublishRequest<TOPIC_LEN, PAYLOAD_LEN>, DEPTH>;

/// [`PublishOutbox`] that enqueues into a [`PublishChannel`].
pub struct ChannelOutbox<
    'a,
    M: RawMutex,
    const TOPIC_LEN: usize,
    const PAYLOAD_LEN: usize,
    const DEPTH: usize,
> {
    channel: &'a PublishChannel<M, TOPIC_LEN, PAYLOAD_LEN, DEPTH>,
    dropped: usize,
}

impl<'a, M: RawMutex, const TOPIC_LEN: usize, const PAYLOAD_LEN: usize, const DEPTH: usize>
    ChannelOutbox<'a, M, TOPIC_LEN, PAYLOAD_LEN, DEPTH>
{
    pub const fn new(channel: &'a PublishChannel<M, TOPIC_LEN, PAYLOAD_LEN, DEPTH>) -> Self {
        Self {
            channel,
            dropped: 0,
        }
    }

    /// Number of publishes rejected since creation.
    pub const fn dropped(&self) -> usize {
        self.dropped
    }
}

impl<M: RawMutex, const TOPIC_LEN: usize, const PAYLOAD_LEN: usize, const DEPTH: usize>
    PublishOutbox for ChannelOutbox<'_, M, TOPIC_LEN, PAYLOAD_LEN, DEPTH>
{
    fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS, retain: bool) {
        let Some(request) = PublishRequest::new(topic, payload, qos, retain) else {
            log::warn!(
                "mqtt: publish to '{}' exceeds outbox limits ({} bytes payload)",
                topic,
                payload.len()
            );
            self.dropped += 1;
            return;
        };

        if self.channel.try_send(request).is_err() {
            log::warn!("mqtt: outbox full, dropping publish to '{}'", topic);
            self.dropped += 1;
        }
    }
}
